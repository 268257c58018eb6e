//! Error types for the Fieldmark core library.

use thiserror::Error;

/// All errors that can occur within the Fieldmark core library.
#[derive(Debug, Error)]
pub enum FieldmarkError {
    /// The text between the frontmatter markers is not valid YAML, or is
    /// valid YAML that does not form a key-value mapping.
    ///
    /// `block` carries the offending block text so callers can show the user
    /// what needs fixing. Never auto-corrected: an update call fails rather
    /// than rewrite a header it could not decode.
    #[error("Invalid frontmatter: {message}")]
    Decode { message: String, block: String },

    /// A mapping could not be re-serialized into a frontmatter block.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored settings could not be serialized to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`FieldmarkError`].
pub type Result<T> = std::result::Result<T, FieldmarkError>;

impl FieldmarkError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Decode { message, .. } => {
                format!("Frontmatter is not valid YAML: {message}")
            }
            Self::Yaml(e) => format!("Failed to write frontmatter: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Settings format error: {e}"),
        }
    }
}
