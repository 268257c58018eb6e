//! Applying preset defaults and preset bindings to notes.
//!
//! Application goes through [`ParsedNote::update`], so it inherits the
//! codec's guarantees: applying a preset whose keys are already all present
//! in insert mode leaves the note byte-identical.

use crate::core::frontmatter::{NoteUpdate, ParsedNote};
use crate::core::preset::{Preset, BINDING_KEY};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A concrete value destined for a frontmatter key.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// The YAML node this value is written as.
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number((*number).into()),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::List(items) => {
                Value::Sequence(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// How existing frontmatter keys are treated during application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyMode {
    /// Only add keys the note does not have yet.
    Insert,
    /// Overwrite existing keys with the supplied values.
    Replace,
}

/// One planned application of values to a note's frontmatter.
#[derive(Debug, Clone)]
pub struct PresetApplication {
    pub mode: ApplyMode,
    /// Key-value pairs, written in this order.
    pub values: Vec<(String, FieldValue)>,
}

/// The default value of every field of `preset`, in field order.
pub fn preset_values(preset: &Preset) -> Vec<(String, FieldValue)> {
    preset
        .fields
        .iter()
        .map(|field| (field.key.clone(), field.default_value()))
        .collect()
}

/// Writes `application` into the note's frontmatter.
///
/// # Errors
///
/// Propagates [`crate::FieldmarkError::Yaml`] from re-serialization.
pub fn apply_preset(note: &ParsedNote, application: &PresetApplication) -> Result<NoteUpdate> {
    note.update(|mut mapping: Mapping| {
        for (key, value) in &application.values {
            let exists = mapping.contains_key(key.as_str());
            match application.mode {
                ApplyMode::Insert if exists => {}
                _ => {
                    mapping.insert(Value::String(key.clone()), value.to_yaml());
                }
            }
        }
        mapping
    })
}

/// Applies the defaults of `preset` in one step.
pub fn apply_preset_defaults(
    note: &ParsedNote,
    preset: &Preset,
    mode: ApplyMode,
) -> Result<NoteUpdate> {
    let application = PresetApplication {
        mode,
        values: preset_values(preset),
    };
    apply_preset(note, &application)
}

/// Rewrites the note's preset binding. A single id is stored as a plain
/// string, several as a sequence, and an empty list removes the key.
pub fn bind_presets(note: &ParsedNote, ids: &[String]) -> Result<NoteUpdate> {
    note.update(|mut mapping| {
        let key = Value::String(BINDING_KEY.to_string());
        match ids {
            [] => {
                mapping.shift_remove(BINDING_KEY);
            }
            [only] => {
                mapping.insert(key, Value::String(only.clone()));
            }
            many => {
                let sequence = many.iter().cloned().map(Value::String).collect();
                mapping.insert(key, Value::Sequence(sequence));
            }
        }
        mapping
    })
}
