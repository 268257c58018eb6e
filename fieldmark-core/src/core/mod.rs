//! Internal domain modules for the Fieldmark core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod apply;
pub mod error;
pub mod frontmatter;
pub mod matcher;
pub mod merge;
pub mod preset;
pub mod resolver;
pub mod settings;
pub mod storage;

#[doc(inline)]
pub use apply::{
    apply_preset, apply_preset_defaults, bind_presets, preset_values, ApplyMode, FieldValue,
    PresetApplication,
};
#[doc(inline)]
pub use error::{FieldmarkError, Result};
#[doc(inline)]
pub use frontmatter::{remove_field, update_note, NewlineStyle, NoteUpdate, ParsedNote};
#[doc(inline)]
pub use matcher::{
    best_match, extract_template_variables, match_presets, MatchOptions, MatchResult, MATCH_FLOOR,
};
#[doc(inline)]
pub use merge::{merge_presets, resolve_note_binding, MergedPreset, NoteBinding};
#[doc(inline)]
pub use preset::{Field, FieldType, Preset, BINDING_KEY, TAGS_KEY};
#[doc(inline)]
pub use resolver::{
    normalize_preset_ids, note_preset_ids, resolve_note_presets, resolve_preset_ids,
    PresetResolution,
};
#[doc(inline)]
pub use settings::{MatchOptionsPatch, Settings, SettingsPatch, SETTINGS_VERSION};
#[doc(inline)]
pub use storage::{edit_note, FileStore, NoteStore};
