//! Persistent engine settings: the preset catalog and matcher options.
//!
//! Settings live in a single JSON file owned by the embedding application.
//! Loading is forgiving: a missing or corrupt file falls back to defaults
//! with a warning, never an error.

use crate::core::matcher::MatchOptions;
use crate::core::preset::Preset;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Current settings schema version.
pub const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub version: u32,
    /// The preset catalog, in user-defined order.
    pub presets: Vec<Preset>,
    pub match_options: MatchOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            presets: Vec::new(),
            match_options: MatchOptions::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// is missing, unreadable, or not valid JSON.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read settings file {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Settings file {} is corrupt, using defaults: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Writes settings to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Finds a preset by id. Later catalog entries shadow earlier ones,
    /// matching how note references resolve.
    pub fn preset_by_id(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().rev().find(|preset| preset.id == id)
    }

    /// Replaces the preset with the same id, or appends it.
    pub fn upsert_preset(&mut self, preset: Preset) {
        match self.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(slot) => *slot = preset,
            None => self.presets.push(preset),
        }
    }

    /// Removes the preset with `id`. Returns whether anything was removed.
    pub fn remove_preset(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|preset| preset.id != id);
        self.presets.len() != before
    }

    /// Applies a partial override on top of the current settings.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(presets) = &patch.presets {
            self.presets = presets.clone();
        }
        if let Some(options) = &patch.match_options {
            options.apply_to(&mut self.match_options);
        }
    }
}

/// Partial settings override. Unset fields keep their current value; when
/// several patches are applied in turn, the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub presets: Option<Vec<Preset>>,
    pub match_options: Option<MatchOptionsPatch>,
}

/// Partial override of [`MatchOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptionsPatch {
    pub use_content_score: Option<bool>,
    pub use_field_name_score: Option<bool>,
    pub use_field_count_score: Option<bool>,
    pub content_weight: Option<f64>,
    pub field_name_weight: Option<f64>,
    pub field_count_weight: Option<f64>,
}

impl MatchOptionsPatch {
    pub fn apply_to(&self, options: &mut MatchOptions) {
        if let Some(v) = self.use_content_score {
            options.use_content_score = v;
        }
        if let Some(v) = self.use_field_name_score {
            options.use_field_name_score = v;
        }
        if let Some(v) = self.use_field_count_score {
            options.use_field_count_score = v;
        }
        if let Some(v) = self.content_weight {
            options.content_weight = v;
        }
        if let Some(v) = self.field_name_weight {
            options.field_name_weight = v;
        }
        if let Some(v) = self.field_count_weight {
            options.field_count_weight = v;
        }
    }
}
