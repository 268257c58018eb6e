//! Surgical frontmatter parsing and rewriting.
//!
//! [`ParsedNote::parse`] splits a note into its YAML frontmatter mapping and
//! body text. [`ParsedNote::update`] is the single mutation path: it applies
//! a caller-supplied transform to a copy of the mapping and re-serializes
//! only when the result is structurally different. An unchanged mapping
//! returns the original note text byte-for-byte, never a re-serialization,
//! so repeated updates cannot drift the file's formatting.

use crate::{FieldmarkError, Result};
use serde_yaml::{Mapping, Value};

/// Marker line that opens and closes a frontmatter block.
const MARKER: &str = "---";

/// Line-ending style of a note, detected from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineStyle {
    Lf,
    Crlf,
}

impl NewlineStyle {
    /// Detects the style: CRLF if the text contains a `\r\n` pair anywhere,
    /// LF otherwise.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// The literal separator characters for this style.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// A note split into frontmatter and body.
///
/// Transient: parsed on demand, used for one read or update, then dropped.
#[derive(Debug, Clone)]
pub struct ParsedNote {
    source: String,
    /// Key-value pairs from the frontmatter block, in document order.
    /// Empty when the note has no frontmatter.
    pub frontmatter: Mapping,
    /// Everything after the closing marker's trailing newline, or the whole
    /// text when there is no frontmatter.
    pub body: String,
    pub has_frontmatter: bool,
    pub newline: NewlineStyle,
}

/// The outcome of a frontmatter update.
#[derive(Debug, Clone)]
pub struct NoteUpdate {
    /// Full note text after the update. When `changed` is false this is the
    /// original text verbatim.
    pub content: String,
    /// The mapping produced by the transform, now in effect.
    pub frontmatter: Mapping,
    /// The mapping as it was before the transform ran.
    pub previous_frontmatter: Mapping,
    /// Whether the note text needed rewriting.
    pub changed: bool,
}

impl ParsedNote {
    /// Parses `text` into frontmatter and body.
    ///
    /// A frontmatter block is recognized only when the text begins with the
    /// `---` marker on its own first line and a later line consists of the
    /// closing `---`. Text with no such block parses as all body. An empty
    /// or comment-only block is an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`FieldmarkError::Decode`] when the block between the markers
    /// is not valid YAML or decodes to something other than a mapping. The
    /// error carries the block text; callers should surface it rather than
    /// rewrite a header they could not read.
    pub fn parse(text: &str) -> Result<Self> {
        let newline = NewlineStyle::detect(text);

        let Some((block, body_start)) = find_block(text) else {
            return Ok(Self {
                source: text.to_string(),
                frontmatter: Mapping::new(),
                body: text.to_string(),
                has_frontmatter: false,
                newline,
            });
        };

        let frontmatter = decode_block(block)?;
        Ok(Self {
            source: text.to_string(),
            frontmatter,
            body: text[body_start..].to_string(),
            has_frontmatter: true,
            newline,
        })
    }

    /// The original note text this parse came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Applies `transform` to a copy of the frontmatter mapping and returns
    /// the updated note text.
    ///
    /// The transform receives its own clone, so the parse itself is never
    /// mutated; deleting a key is omitting it from the returned mapping.
    /// If the returned mapping is structurally equal to the current one
    /// (mapping key order ignored, sequence order significant), the original
    /// text is returned with `changed = false`. If the returned mapping is
    /// empty, the frontmatter block is removed along with one separator
    /// newline; otherwise the block is re-serialized in the note's own
    /// newline style.
    ///
    /// # Errors
    ///
    /// Returns [`FieldmarkError::Yaml`] if the new mapping cannot be
    /// serialized.
    pub fn update<F>(&self, transform: F) -> Result<NoteUpdate>
    where
        F: FnOnce(Mapping) -> Mapping,
    {
        let previous = self.frontmatter.clone();
        let next = transform(self.frontmatter.clone());

        if next == previous {
            return Ok(NoteUpdate {
                content: self.source.clone(),
                frontmatter: next,
                previous_frontmatter: previous,
                changed: false,
            });
        }

        let content = if next.is_empty() {
            self.content_without_header()
        } else {
            self.content_with_header(&next)?
        };

        Ok(NoteUpdate {
            content,
            frontmatter: next,
            previous_frontmatter: previous,
            changed: true,
        })
    }

    /// Convenience wrapper over [`update`](Self::update) whose transform
    /// deletes `key`. Removing a key that is not present reports
    /// `changed = false`.
    pub fn remove_field(&self, key: &str) -> Result<NoteUpdate> {
        self.update(|mut mapping| {
            // shift_remove keeps the surviving keys in parse order.
            mapping.shift_remove(key);
            mapping
        })
    }

    fn content_without_header(&self) -> String {
        if !self.has_frontmatter {
            return self.body.clone();
        }
        // Strip exactly one separator newline; the rest of the body stays.
        let nl = self.newline.as_str();
        self.body.strip_prefix(nl).unwrap_or(&self.body).to_string()
    }

    fn content_with_header(&self, mapping: &Mapping) -> Result<String> {
        let yaml = serde_yaml::to_string(mapping)?;
        // Older serde_yaml prepended a document marker; strip it if present.
        let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
        let nl = self.newline.as_str();
        let block = match self.newline {
            NewlineStyle::Lf => yaml.to_string(),
            NewlineStyle::Crlf => yaml.replace('\n', "\r\n"),
        };

        let mut content = String::with_capacity(block.len() + self.body.len() + 16);
        content.push_str(MARKER);
        content.push_str(nl);
        content.push_str(&block);
        content.push_str(MARKER);
        if self.body.is_empty() {
            content.push_str(nl);
        } else if self.body.starts_with(nl) {
            // The body's own leading newline terminates the marker line.
            content.push_str(&self.body);
        } else {
            content.push_str(nl);
            content.push_str(&self.body);
        }
        Ok(content)
    }
}

/// Parses `text` and applies `transform` in one step.
///
/// # Errors
///
/// Propagates [`FieldmarkError::Decode`] from the parse and
/// [`FieldmarkError::Yaml`] from re-serialization.
pub fn update_note<F>(text: &str, transform: F) -> Result<NoteUpdate>
where
    F: FnOnce(Mapping) -> Mapping,
{
    ParsedNote::parse(text)?.update(transform)
}

/// Parses `text` and deletes `key` from its frontmatter in one step.
pub fn remove_field(text: &str, key: &str) -> Result<NoteUpdate> {
    ParsedNote::parse(text)?.remove_field(key)
}

/// Locates the frontmatter block. Returns the raw text between the markers
/// and the byte offset where the body starts.
fn find_block(text: &str) -> Option<(&str, usize)> {
    let after_marker = text.strip_prefix(MARKER)?;
    let after_open = after_marker
        .strip_prefix("\r\n")
        .or_else(|| after_marker.strip_prefix('\n'))?;
    let open_len = text.len() - after_open.len();

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n').trim_end_matches('\r');
        if trimmed == MARKER {
            let block = &after_open[..offset];
            let body_start = open_len + offset + line.len();
            return Some((block, body_start));
        }
        offset += line.len();
    }
    None
}

fn decode_block(block: &str) -> Result<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(block).map_err(|e| FieldmarkError::Decode {
        message: e.to_string(),
        block: block.to_string(),
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        // A block of nothing but comments decodes to null.
        Value::Null => Ok(Mapping::new()),
        other => Err(FieldmarkError::Decode {
            message: format!("expected a key-value mapping, found {}", value_kind(&other)),
            block: block.to_string(),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
