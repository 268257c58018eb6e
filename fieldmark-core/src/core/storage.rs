//! Note storage behind a small trait so the engine never touches the
//! filesystem directly.

use crate::core::frontmatter::{update_note, NoteUpdate};
use crate::Result;
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and write access to note files.
pub trait NoteStore {
    /// Reads the full text of the note at `path`.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replaces the note at `path` with `content`.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Notes as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths are taken relative to the root; an absolute path is used as is.
    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl NoteStore for FileStore {
    fn read(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(path))?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(resolved, content)?;
        Ok(())
    }
}

/// Reads the note at `path`, runs `transform` on its frontmatter, and
/// writes the result back only when the text actually changed.
///
/// # Errors
///
/// Propagates store errors and [`crate::FieldmarkError::Decode`] from the
/// parse.
pub fn edit_note<S, F>(store: &S, path: &Path, transform: F) -> Result<NoteUpdate>
where
    S: NoteStore + ?Sized,
    F: FnOnce(Mapping) -> Mapping,
{
    let text = store.read(path)?;
    let update = update_note(&text, transform)?;
    if update.changed {
        store.write(path, &update.content)?;
    } else {
        log::debug!("Note {} unchanged, skipping write", path.display());
    }
    Ok(update)
}
