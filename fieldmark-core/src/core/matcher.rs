//! Heuristic scoring of presets against note content.
//!
//! Matching is a ranking aid, not a classifier: each preset gets a weighted
//! sum of cheap signals (field evidence in the text, template variables that
//! line up with field names, similarity of field and variable counts) plus a
//! small floor so that a defined preset never vanishes from the list
//! entirely. Every contribution is explained with a reason string.

use crate::core::frontmatter::ParsedNote;
use crate::core::preset::{Field, FieldType, Preset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score assigned when no signal fires but the preset has fields.
pub const MATCH_FLOOR: f64 = 0.1;

static TEMPLATE_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("valid regex"));

const DATE_KEYWORDS: &[&str] = &["date", "time", "day", "日期", "时间"];
const TEXT_KEYWORDS: &[&str] = &["title", "name", "summary", "标题", "名称"];
const SELECT_KEYWORDS: &[&str] = &["status", "type", "category", "状态", "类型", "分类"];
const MULTI_SELECT_KEYWORDS: &[&str] = &["tags", "labels", "标签"];

/// Toggles and weights for the match signals.
///
/// Defaults reproduce the stock behavior: all signals on, weighted
/// 0.4 / 0.4 / 0.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    pub use_content_score: bool,
    pub use_field_name_score: bool,
    pub use_field_count_score: bool,
    pub content_weight: f64,
    pub field_name_weight: f64,
    pub field_count_weight: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            use_content_score: true,
            use_field_name_score: true,
            use_field_count_score: true,
            content_weight: 0.4,
            field_name_weight: 0.4,
            field_count_weight: 0.2,
        }
    }
}

/// One preset's score against a note, with the signals that produced it.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub preset: &'a Preset,
    /// Weighted sum of the signals, clamped to `1.0`.
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Scores every preset against `text`, best first.
///
/// The sort is stable, so presets with equal scores keep their catalog
/// order. Presets with no fields score `0.0` and sort last.
pub fn match_presets<'a>(
    text: &str,
    presets: &'a [Preset],
    options: &MatchOptions,
) -> Vec<MatchResult<'a>> {
    let haystack = text.to_lowercase();
    let variables = extract_template_variables(text);

    let mut results: Vec<MatchResult<'a>> = presets
        .iter()
        .map(|preset| score_preset(preset, &haystack, &variables, options))
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results
}

/// The highest-scoring preset, if any scored above zero.
pub fn best_match<'a>(
    text: &str,
    presets: &'a [Preset],
    options: &MatchOptions,
) -> Option<MatchResult<'a>> {
    match_presets(text, presets, options)
        .into_iter()
        .find(|result| result.score > 0.0)
}

/// Collects template variables from a note: every `{{name}}` placeholder in
/// the text, plus each top-level frontmatter key whose string value holds a
/// placeholder. Trimmed, first occurrence wins. A header that fails to
/// parse contributes no keys but never makes extraction fail.
pub fn extract_template_variables(text: &str) -> Vec<String> {
    let mut variables = Vec::new();
    for capture in TEMPLATE_VAR.captures_iter(text) {
        let name = capture[1].trim().to_string();
        if !name.is_empty() && !variables.contains(&name) {
            variables.push(name);
        }
    }

    if let Ok(note) = ParsedNote::parse(text) {
        for (key, value) in &note.frontmatter {
            let (Some(key), Some(value)) = (key.as_str(), value.as_str()) else {
                continue;
            };
            if TEMPLATE_VAR.is_match(value) {
                let key = key.trim().to_string();
                if !key.is_empty() && !variables.contains(&key) {
                    variables.push(key);
                }
            }
        }
    }

    variables
}

fn score_preset<'a>(
    preset: &'a Preset,
    haystack: &str,
    variables: &[String],
    options: &MatchOptions,
) -> MatchResult<'a> {
    let mut score = 0.0;
    let mut reasons = Vec::new();
    let total_fields = preset.fields.len();

    if options.use_content_score && total_fields > 0 {
        let matched = preset
            .fields
            .iter()
            .filter(|field| field_in_text(field, haystack))
            .count();
        if matched > 0 {
            score += options.content_weight * (matched as f64 / total_fields as f64);
            reasons.push(format!(
                "{matched} of {total_fields} preset fields appear in the note"
            ));
        }
    }

    if options.use_field_name_score && !variables.is_empty() {
        // Variables must match a field key exactly; only the content scan
        // above is case-insensitive.
        let matched = variables
            .iter()
            .filter(|var| preset.fields.iter().any(|f| &f.key == *var))
            .count();
        if matched > 0 {
            let total_vars = variables.len();
            score += options.field_name_weight * (matched as f64 / total_vars as f64);
            reasons.push(format!(
                "{matched} of {total_vars} template variables match field names"
            ));
        }
    }

    if options.use_field_count_score && !variables.is_empty() {
        let fields = total_fields as f64;
        let vars = variables.len() as f64;
        let ratio = fields.min(vars) / fields.max(vars);
        if ratio > 0.0 {
            score += options.field_count_weight * ratio;
            reasons.push(format!(
                "{total_fields} fields against {} template variables",
                variables.len()
            ));
        }
    }

    if score == 0.0 && total_fields > 0 {
        score = MATCH_FLOOR;
        reasons.push("No direct signals, kept as a weak candidate".to_string());
    }

    MatchResult {
        preset,
        score: score.min(1.0),
        reasons,
    }
}

fn field_in_text(field: &Field, haystack: &str) -> bool {
    haystack.contains(&field.key.to_lowercase())
        || type_keywords(field.field_type)
            .iter()
            .any(|keyword| haystack.contains(keyword))
}

fn type_keywords(field_type: FieldType) -> &'static [&'static str] {
    match field_type {
        FieldType::Text => TEXT_KEYWORDS,
        FieldType::Select => SELECT_KEYWORDS,
        FieldType::Date => DATE_KEYWORDS,
        FieldType::MultiSelect => MULTI_SELECT_KEYWORDS,
    }
}
