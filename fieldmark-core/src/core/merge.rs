//! Combining several presets into the single effective preset for a note.
//!
//! Merging is deterministic and biased toward the note's reference order:
//! the field list keeps the order in which keys first appear across the
//! presets, and a colliding key keeps its first definition wholesale. Only
//! the tags field is special-cased: it is always carried as multi-select
//! and its options are unioned across presets, so no preset's tag
//! vocabulary is lost.

use crate::core::frontmatter::ParsedNote;
use crate::core::preset::{Field, FieldType, Preset, TAGS_KEY};
use crate::core::resolver::resolve_note_presets;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A preset synthesized from one or more source presets.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPreset {
    /// The effective preset a note should be filled against.
    pub preset: Preset,
    /// Ids of the presets that contributed, in merge order.
    pub source_ids: Vec<String>,
}

/// The effective preset for a note, plus any ids that failed to resolve.
#[derive(Debug, Clone)]
pub struct NoteBinding {
    pub merged: Option<MergedPreset>,
    pub missing: Vec<String>,
}

/// Merges `presets` in order into one effective preset.
///
/// The field list is built by first occurrence: the first definition of a
/// key wins wholesale. The tags field is upgraded to multi-select even when
/// only one preset carries it, and its options are unioned across all
/// presets (trimmed, blanks dropped, first occurrence kept). Sources are
/// never mutated. A single preset keeps its own identity; several get a
/// synthetic one derived from the source ids. An empty slice merges to an
/// empty field list and no source ids.
pub fn merge_presets(presets: &[&Preset]) -> MergedPreset {
    let source_ids: Vec<String> = presets.iter().map(|p| p.id.clone()).collect();

    let mut fields: IndexMap<String, Field> = IndexMap::new();
    for preset in presets {
        for field in &preset.fields {
            match fields.entry(field.key.clone()) {
                Entry::Occupied(mut slot) => {
                    if field.key == TAGS_KEY {
                        let unioned = union_tag_fields(slot.get(), field);
                        slot.insert(unioned);
                    }
                    // Any other colliding key keeps its first definition.
                }
                Entry::Vacant(slot) => {
                    if field.key == TAGS_KEY {
                        slot.insert(upgrade_tag_field(field));
                    } else {
                        slot.insert(field.clone());
                    }
                }
            }
        }
    }

    let preset = match presets {
        [only] => Preset {
            fields: fields.into_values().collect(),
            ..(*only).clone()
        },
        _ => Preset {
            id: format!("merged:{}", source_ids.join("+")),
            name: presets
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(" + "),
            fields: fields.into_values().collect(),
            description: None,
        },
    };
    MergedPreset { preset, source_ids }
}

/// Resolves a note's preset references and merges whatever matched.
///
/// Unknown ids are logged and reported back; they never fail the merge.
/// `merged` is `None` only when no reference resolved at all.
pub fn resolve_note_binding(note: &ParsedNote, catalog: &[Preset]) -> NoteBinding {
    let resolution = resolve_note_presets(note, catalog);
    for id in &resolution.missing {
        log::warn!("Note references unknown preset '{id}'");
    }
    let merged = if resolution.matched.is_empty() {
        None
    } else {
        Some(merge_presets(&resolution.matched))
    };
    NoteBinding {
        merged,
        missing: resolution.missing,
    }
}

/// A copy of `field` carried as multi-select, its options run through the
/// union pipeline.
fn upgrade_tag_field(field: &Field) -> Field {
    let mut upgraded = field.clone();
    upgraded.field_type = FieldType::MultiSelect;
    upgraded.options = dedup_options(field.options.iter());
    upgraded
}

/// Unions two tag fields. Label and default come from the field seen first.
fn union_tag_fields(current: &Field, incoming: &Field) -> Field {
    let mut merged = current.clone();
    merged.field_type = FieldType::MultiSelect;
    merged.options = dedup_options(current.options.iter().chain(incoming.options.iter()));
    merged
}

/// Trims options, drops blanks, and keeps the first occurrence of each.
fn dedup_options<'a, I>(options: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for option in options {
        let trimmed = option.trim();
        if !trimmed.is_empty() && seen.insert(trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(id: &str, name: &str, fields: Vec<Field>) -> Preset {
        Preset {
            id: id.to_string(),
            name: name.to_string(),
            fields,
            description: None,
        }
    }

    fn tag_field(field_type: FieldType, options: &[&str]) -> Field {
        let mut field = Field::new(TAGS_KEY, field_type);
        field.options = options.iter().map(|o| o.to_string()).collect();
        field
    }

    #[test]
    fn test_merge_empty_input_yields_empty_result() {
        let merged = merge_presets(&[]);
        assert!(merged.preset.fields.is_empty());
        assert!(merged.source_ids.is_empty());
    }

    #[test]
    fn test_merge_single_without_tags_is_a_copy() {
        let p = preset("daily", "Daily", vec![Field::new("title", FieldType::Text)]);
        let merged = merge_presets(&[&p]);
        assert_eq!(merged.preset, p);
        assert_eq!(merged.source_ids, vec!["daily"]);
    }

    #[test]
    fn test_merge_single_upgrades_select_tags() {
        let p = preset(
            "daily",
            "Daily",
            vec![
                Field::new("title", FieldType::Text),
                tag_field(FieldType::Select, &["work", "home"]),
            ],
        );
        let merged = merge_presets(&[&p]);
        assert_eq!(merged.preset.id, "daily");
        let tags = &merged.preset.fields[1];
        assert_eq!(tags.field_type, FieldType::MultiSelect);
        assert_eq!(tags.options, vec!["work", "home"]);
        // The input preset is untouched.
        assert_eq!(p.fields[1].field_type, FieldType::Select);
    }

    #[test]
    fn test_tag_fields_union_into_multi_select() {
        let mut first_tags = tag_field(FieldType::Select, &["alpha", "beta"]);
        first_tags.label = "Topic".to_string();
        first_tags.default = "alpha".to_string();
        let a = preset("a", "A", vec![first_tags]);
        let b = preset(
            "b",
            "B",
            vec![tag_field(FieldType::MultiSelect, &["beta", "gamma"])],
        );

        let merged = merge_presets(&[&a, &b]);
        let tags = &merged.preset.fields[0];
        assert_eq!(tags.field_type, FieldType::MultiSelect);
        assert_eq!(tags.options, vec!["alpha", "beta", "gamma"]);
        assert_eq!(tags.label, "Topic");
        assert_eq!(tags.default, "alpha");
    }

    #[test]
    fn test_tag_union_trims_and_drops_blank_options() {
        let a = preset("a", "A", vec![tag_field(FieldType::MultiSelect, &[" rust ", ""])]);
        let b = preset("b", "B", vec![tag_field(FieldType::MultiSelect, &["rust", "cli"])]);
        let merged = merge_presets(&[&a, &b]);
        assert_eq!(merged.preset.fields[0].options, vec!["rust", "cli"]);
    }

    #[test]
    fn test_lone_tag_field_still_upgrades() {
        let a = preset("a", "A", vec![tag_field(FieldType::Select, &["x "])]);
        let b = preset("b", "B", vec![Field::new("title", FieldType::Text)]);
        let merged = merge_presets(&[&a, &b]);
        assert_eq!(merged.preset.fields[0].field_type, FieldType::MultiSelect);
        assert_eq!(merged.preset.fields[0].options, vec!["x"]);
    }

    #[test]
    fn test_non_tag_collision_keeps_first_definition() {
        let mut status_text = Field::new("status", FieldType::Text);
        status_text.default = "draft".to_string();
        let mut status_select = Field::new("status", FieldType::Select);
        status_select.options = vec!["open".to_string(), "done".to_string()];

        let a = preset("a", "A", vec![status_text]);
        let b = preset("b", "B", vec![status_select]);
        let merged = merge_presets(&[&a, &b]);

        let status = &merged.preset.fields[0];
        assert_eq!(status.field_type, FieldType::Text);
        assert_eq!(status.default, "draft");
        assert!(status.options.is_empty());
    }

    #[test]
    fn test_field_order_is_first_occurrence() {
        let a = preset(
            "a",
            "A",
            vec![
                Field::new("title", FieldType::Text),
                tag_field(FieldType::MultiSelect, &["x"]),
            ],
        );
        let b = preset(
            "b",
            "B",
            vec![
                tag_field(FieldType::MultiSelect, &["y"]),
                Field::new("status", FieldType::Text),
            ],
        );
        let merged = merge_presets(&[&a, &b]);
        let keys: Vec<&str> = merged.preset.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["title", "tags", "status"]);
    }

    #[test]
    fn test_merged_identity_is_deterministic() {
        let a = preset("a", "Alpha", vec![]);
        let b = preset("b", "Beta", vec![]);
        let merged = merge_presets(&[&a, &b]);
        assert_eq!(merged.preset.id, "merged:a+b");
        assert_eq!(merged.preset.name, "Alpha + Beta");
        assert_eq!(merged.source_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_three_way_tag_union_keeps_preset_order() {
        let a = preset("a", "A", vec![tag_field(FieldType::Select, &["one"])]);
        let b = preset("b", "B", vec![tag_field(FieldType::Select, &["two", "one"])]);
        let c = preset("c", "C", vec![tag_field(FieldType::Select, &["three"])]);
        let merged = merge_presets(&[&a, &b, &c]);
        let tags = &merged.preset.fields[0];
        assert_eq!(tags.field_type, FieldType::MultiSelect);
        assert_eq!(tags.options, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_resolve_note_binding_merges_matched_and_reports_missing() {
        let catalog = vec![
            preset("daily", "Daily", vec![Field::new("title", FieldType::Text)]),
        ];
        let note =
            ParsedNote::parse("---\npresets:\n- daily\n- ghost\n---\nBody\n").unwrap();
        let binding = resolve_note_binding(&note, &catalog);
        assert_eq!(binding.missing, vec!["ghost"]);
        let merged = binding.merged.unwrap();
        assert_eq!(merged.preset.id, "daily");
        assert_eq!(merged.source_ids, vec!["daily"]);
    }

    #[test]
    fn test_resolve_note_binding_without_references() {
        let note = ParsedNote::parse("No header\n").unwrap();
        let binding = resolve_note_binding(&note, &[]);
        assert!(binding.merged.is_none());
        assert!(binding.missing.is_empty());
    }
}
