//! Resolution of preset references stored in note frontmatter.
//!
//! The binding value under [`BINDING_KEY`] is whatever the user last wrote:
//! a single id string, a sequence of ids, or junk. Normalization flattens
//! all of those into a clean id list without ever failing; resolution then
//! splits the list into known and unknown presets against a catalog.

use crate::core::frontmatter::ParsedNote;
use crate::core::preset::{Preset, BINDING_KEY};
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};

/// The outcome of resolving a list of preset ids against a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetResolution<'a> {
    /// Presets found in the catalog, in reference order.
    pub matched: Vec<&'a Preset>,
    /// Ids with no catalog entry, in reference order.
    pub missing: Vec<String>,
}

impl PresetResolution<'_> {
    /// True when every referenced id was found.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Normalizes a raw binding value into an ordered, deduplicated id list.
///
/// A string value yields one id, a sequence yields one id per string
/// element, and anything else yields none. Ids are trimmed, blanks are
/// dropped, and only the first occurrence of a repeated id is kept.
pub fn normalize_preset_ids(value: Option<&Value>) -> Vec<String> {
    let candidates: Vec<&str> = match value {
        Some(Value::String(id)) => vec![id.as_str()],
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect(),
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for candidate in candidates {
        let id = candidate.trim();
        if !id.is_empty() && seen.insert(id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Looks up `ids` in `catalog`, splitting them into matched presets and
/// missing ids.
///
/// When the catalog itself contains duplicate ids the later entry wins.
/// Repeated ids in `ids` count once, at their first position.
pub fn resolve_preset_ids<'a>(ids: &[String], catalog: &'a [Preset]) -> PresetResolution<'a> {
    let mut index: HashMap<&str, &Preset> = HashMap::with_capacity(catalog.len());
    for preset in catalog {
        index.insert(preset.id.as_str(), preset);
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        match index.get(id.as_str()) {
            Some(preset) => matched.push(*preset),
            None => missing.push(id.clone()),
        }
    }

    PresetResolution { matched, missing }
}

/// Reads the binding out of a parsed note and resolves it in one step.
pub fn resolve_note_presets<'a>(
    note: &ParsedNote,
    catalog: &'a [Preset],
) -> PresetResolution<'a> {
    let ids = note_preset_ids(note);
    resolve_preset_ids(&ids, catalog)
}

/// The normalized preset ids a note refers to.
pub fn note_preset_ids(note: &ParsedNote) -> Vec<String> {
    normalize_preset_ids(note.frontmatter.get(BINDING_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset_with_id(id: &str) -> Preset {
        let mut preset = Preset::new(&id.to_uppercase());
        preset.id = id.to_string();
        preset
    }

    #[test]
    fn test_normalize_string_value() {
        let value = Value::String("  daily  ".to_string());
        assert_eq!(normalize_preset_ids(Some(&value)), vec!["daily"]);
    }

    #[test]
    fn test_normalize_sequence_trims_dedupes_and_drops_blanks() {
        let value: Value = serde_yaml::from_str("[b, a, b, ' ', a]").unwrap();
        assert_eq!(normalize_preset_ids(Some(&value)), vec!["b", "a"]);
    }

    #[test]
    fn test_normalize_ignores_non_string_elements() {
        let value: Value = serde_yaml::from_str("[1, daily, true]").unwrap();
        assert_eq!(normalize_preset_ids(Some(&value)), vec!["daily"]);
    }

    #[test]
    fn test_normalize_other_values_yield_nothing() {
        assert!(normalize_preset_ids(None).is_empty());
        assert!(normalize_preset_ids(Some(&Value::Number(7.into()))).is_empty());
        assert!(normalize_preset_ids(Some(&Value::Null)).is_empty());
        let mapping: Value = serde_yaml::from_str("a: 1").unwrap();
        assert!(normalize_preset_ids(Some(&mapping)).is_empty());
    }

    #[test]
    fn test_normalize_blank_string_yields_nothing() {
        let value = Value::String("   ".to_string());
        assert!(normalize_preset_ids(Some(&value)).is_empty());
    }

    #[test]
    fn test_resolve_splits_matched_and_missing() {
        let catalog = vec![preset_with_id("x"), preset_with_id("y")];
        let ids = vec![
            "y".to_string(),
            "z".to_string(),
            "y".to_string(),
            "x".to_string(),
        ];
        let resolution = resolve_preset_ids(&ids, &catalog);
        let matched: Vec<&str> = resolution.matched.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(matched, vec!["y", "x"]);
        assert_eq!(resolution.missing, vec!["z"]);
        assert!(!resolution.is_complete());
    }

    #[test]
    fn test_resolve_duplicate_catalog_entry_last_wins() {
        let mut first = preset_with_id("dup");
        first.name = "First".to_string();
        let mut second = preset_with_id("dup");
        second.name = "Second".to_string();
        let catalog = vec![first, second];

        let resolution = resolve_preset_ids(&["dup".to_string()], &catalog);
        assert_eq!(resolution.matched.len(), 1);
        assert_eq!(resolution.matched[0].name, "Second");
    }

    #[test]
    fn test_resolve_empty_ids() {
        let catalog = vec![preset_with_id("x")];
        let resolution = resolve_preset_ids(&[], &catalog);
        assert!(resolution.matched.is_empty());
        assert!(resolution.missing.is_empty());
        assert!(resolution.is_complete());
    }

    #[test]
    fn test_resolve_note_presets_reads_binding_key() {
        let catalog = vec![preset_with_id("daily"), preset_with_id("work")];
        let note =
            ParsedNote::parse("---\npresets:\n- work\n- gone\n---\nBody\n").unwrap();
        let resolution = resolve_note_presets(&note, &catalog);
        let matched: Vec<&str> = resolution.matched.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(matched, vec!["work"]);
        assert_eq!(resolution.missing, vec!["gone"]);
    }

    #[test]
    fn test_note_preset_ids_single_string_binding() {
        let note = ParsedNote::parse("---\npresets: daily\n---\n").unwrap();
        assert_eq!(note_preset_ids(&note), vec!["daily"]);
    }
}
