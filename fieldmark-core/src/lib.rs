//! Core library for Fieldmark — frontmatter preset management for plain-text
//! note collections.
//!
//! The engine parses a note into its YAML frontmatter and body, reconciles
//! the frontmatter against the presets the note is bound to, and rewrites
//! the file only when something actually changed. [`ParsedNote`] is the
//! entry point for single-note work; [`Settings`] owns the preset catalog
//! and matcher configuration.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    apply::{
        apply_preset, apply_preset_defaults, bind_presets, preset_values, ApplyMode, FieldValue,
        PresetApplication,
    },
    error::{FieldmarkError, Result},
    frontmatter::{remove_field, update_note, NewlineStyle, NoteUpdate, ParsedNote},
    matcher::{
        best_match, extract_template_variables, match_presets, MatchOptions, MatchResult,
        MATCH_FLOOR,
    },
    merge::{merge_presets, resolve_note_binding, MergedPreset, NoteBinding},
    preset::{Field, FieldType, Preset, BINDING_KEY, TAGS_KEY},
    resolver::{
        normalize_preset_ids, note_preset_ids, resolve_note_presets, resolve_preset_ids,
        PresetResolution,
    },
    settings::{MatchOptionsPatch, Settings, SettingsPatch, SETTINGS_VERSION},
    storage::{edit_note, FileStore, NoteStore},
};
