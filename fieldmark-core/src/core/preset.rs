//! Preset and field schema types shared across the Fieldmark core.
//!
//! A [`Preset`] is a named, reusable set of [`Field`] definitions describing
//! the frontmatter a note is expected to carry. Presets are owned by the
//! settings store; the engine only reads them, except when it builds a
//! merged preset from several bound ones.

use crate::core::apply::FieldValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Frontmatter key that binds a note to one or more preset ids.
///
/// Its value may be a bare string (one id) or a sequence of strings. Every
/// other frontmatter key passes through the engine untouched.
pub const BINDING_KEY: &str = "presets";

/// Field key that receives union-merge semantics instead of first-wins.
pub const TAGS_KEY: &str = "tags";

/// Format used for timestamp-enabled field defaults.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The input widget and merge class of a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Select,
    Date,
    MultiSelect,
}

/// Describes a single typed frontmatter field within a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Frontmatter key this field writes to; the merge identity.
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display name shown by the host UI's field form.
    pub label: String,
    #[serde(default)]
    pub default: String,
    /// Allowed option strings. Non-empty only for `select` and
    /// `multi-select` fields.
    #[serde(default)]
    pub options: Vec<String>,
    /// When set, the field's default resolves to the current timestamp at
    /// apply time instead of the literal `default` string.
    #[serde(default)]
    pub use_templater_timestamp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Creates a field with the given key and type; label defaults to the key.
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            label: key.to_string(),
            default: String::new(),
            options: Vec::new(),
            use_templater_timestamp: false,
            description: None,
        }
    }

    /// Resolves the field's default into a concrete value.
    ///
    /// Timestamp-enabled fields format `now`; multi-select fields split
    /// their default on commas; everything else keeps the literal default.
    pub fn default_value_at(&self, now: NaiveDateTime) -> FieldValue {
        if self.use_templater_timestamp {
            return FieldValue::Text(now.format(TIMESTAMP_FORMAT).to_string());
        }
        match self.field_type {
            FieldType::MultiSelect => FieldValue::List(split_list_default(&self.default)),
            _ => FieldValue::Text(self.default.clone()),
        }
    }

    /// [`default_value_at`](Self::default_value_at) with the current local time.
    pub fn default_value(&self) -> FieldValue {
        self.default_value_at(chrono::Local::now().naive_local())
    }
}

/// A named, reusable set of field definitions.
///
/// `id` is unique within a catalog. Field keys are unique within one preset
/// by convention but not enforced; across presets they routinely collide,
/// which is what the merge rules in [`merge`](crate::core::merge) are for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Preset {
    /// Creates an empty preset with a fresh UUID id.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            fields: Vec::new(),
            description: None,
        }
    }
}

fn split_list_default(default: &str) -> Vec<String> {
    default
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
