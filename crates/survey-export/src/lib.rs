//! Comparison export document.
//!
//! Everything a rendering layer needs in one JSON file: a `meta` block with
//! source labels and the section taxonomy, per-source question projections
//! keyed by normalized code, and full diff trees keyed by a directed
//! `"<a> → <b>"` pair label.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use survey_model::{ComparisonResult, ElementType, Question, QuestionDiff, QuestionStatus};
use survey_sections::SectionGroup;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Glyph joining the two source labels of a directed diff key.
pub const DIFF_KEY_ARROW: &str = " → ";

/// A coded item as projected into the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub code: String,
    pub texts: BTreeMap<String, String>,
}

/// A question as projected into the export document. Matrix questions carry
/// flattened rows/columns, all other types carry their choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: i64,
    pub code: String,
    pub element_type: ElementType,
    pub section_name: Option<String>,
    pub texts: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ItemView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_rows: Option<Vec<ItemView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_columns: Option<Vec<ItemView>>,
}

/// Summary block of the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub sources: Vec<String>,
    pub short_names: BTreeMap<String, String>,
    pub reference: String,
    pub languages: Vec<String>,
    pub sections: Vec<SectionGroup>,
    pub total_questions: usize,
    pub status_counts: BTreeMap<String, usize>,
}

/// The full export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    /// Per source label, per normalized code.
    pub questions: BTreeMap<String, BTreeMap<String, QuestionView>>,
    /// Per directed pair label, per normalized code.
    pub diffs: BTreeMap<String, BTreeMap<String, QuestionDiff>>,
}

fn texts_map(texts: &[survey_model::LocalizedText]) -> BTreeMap<String, String> {
    texts
        .iter()
        .map(|lt| (lt.language.clone(), lt.text.clone()))
        .collect()
}

fn question_view(question: &Question) -> QuestionView {
    let mut view = QuestionView {
        id: question.id,
        code: question.code.clone(),
        element_type: question.element_type,
        section_name: question.section_name.clone(),
        texts: texts_map(&question.texts),
        choices: None,
        matrix_rows: None,
        matrix_columns: None,
    };
    if question.is_matrix() {
        view.matrix_rows = Some(
            question
                .matrix_rows
                .iter()
                .map(|row| ItemView {
                    code: row.code.clone(),
                    texts: texts_map(&row.texts),
                })
                .collect(),
        );
        view.matrix_columns = Some(
            question
                .flattened_columns()
                .map(|column| ItemView {
                    code: column.code.clone(),
                    texts: texts_map(&column.texts),
                })
                .collect(),
        );
    } else {
        view.choices = Some(
            question
                .choices
                .iter()
                .map(|choice| ItemView {
                    code: choice.code.clone(),
                    texts: texts_map(&choice.texts),
                })
                .collect(),
        );
    }
    view
}

/// Directed diff key for a comparison result.
pub fn diff_key(source_a: &str, source_b: &str) -> String {
    format!("{source_a}{DIFF_KEY_ARROW}{source_b}")
}

fn status_priority(status: QuestionStatus) -> u8 {
    match status {
        QuestionStatus::StructureChanged => 0,
        QuestionStatus::TextChanged => 1,
        QuestionStatus::Added => 2,
        QuestionStatus::Removed => 3,
        QuestionStatus::Identical => 4,
    }
}

/// Count codes by their worst status across every comparison they appear
/// in. `structure_changed` dominates; `identical` only survives when
/// nothing else was reported.
fn count_statuses(
    diffs: &BTreeMap<String, BTreeMap<String, QuestionDiff>>,
) -> BTreeMap<String, usize> {
    let mut worst_by_code: BTreeMap<&str, QuestionStatus> = BTreeMap::new();
    for per_code in diffs.values() {
        for (code, diff) in per_code {
            worst_by_code
                .entry(code.as_str())
                .and_modify(|current| {
                    if status_priority(diff.status) < status_priority(*current) {
                        *current = diff.status;
                    }
                })
                .or_insert(diff.status);
        }
    }

    let mut counts: BTreeMap<String, usize> = [
        QuestionStatus::Identical,
        QuestionStatus::TextChanged,
        QuestionStatus::StructureChanged,
        QuestionStatus::Added,
        QuestionStatus::Removed,
    ]
    .iter()
    .map(|status| (status.to_string(), 0))
    .collect();
    for status in worst_by_code.values() {
        *counts.entry(status.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Assemble the export document.
///
/// `questions_by_source` supplies the source order for `meta.sources`;
/// `short_names` maps each source label to its display name; `sections` is
/// the canonical grouping from the section normalizer.
pub fn build_export(
    results: &[ComparisonResult],
    questions_by_source: &[(String, Vec<Question>)],
    short_names: BTreeMap<String, String>,
    sections: Vec<SectionGroup>,
    reference: &str,
) -> ExportDocument {
    let sources: Vec<String> = questions_by_source
        .iter()
        .map(|(name, _)| name.clone())
        .collect();

    let mut languages: BTreeSet<String> = BTreeSet::new();
    for (_, questions) in questions_by_source {
        for question in questions {
            for lt in &question.texts {
                languages.insert(lt.language.clone());
            }
        }
    }
    let languages: Vec<String> = if languages.is_empty() {
        vec!["en".to_string()]
    } else {
        languages.into_iter().collect()
    };

    let mut question_views: BTreeMap<String, BTreeMap<String, QuestionView>> = BTreeMap::new();
    for (name, questions) in questions_by_source {
        let per_code = question_views.entry(name.clone()).or_default();
        for question in questions {
            per_code.insert(question.normalized_code(), question_view(question));
        }
    }

    let mut diffs: BTreeMap<String, BTreeMap<String, QuestionDiff>> = BTreeMap::new();
    for result in results {
        let per_code = diffs
            .entry(diff_key(&result.source_a, &result.source_b))
            .or_default();
        for diff in &result.question_diffs {
            per_code.insert(diff.code.clone(), diff.clone());
        }
    }

    let mut all_codes: BTreeSet<&str> = BTreeSet::new();
    for per_code in question_views.values() {
        all_codes.extend(per_code.keys().map(String::as_str));
    }
    for per_code in diffs.values() {
        all_codes.extend(per_code.keys().map(String::as_str));
    }

    let status_counts = count_statuses(&diffs);

    info!(
        sources = sources.len(),
        comparisons = diffs.len(),
        total_questions = all_codes.len(),
        "built export document"
    );

    ExportDocument {
        meta: ExportMeta {
            sources,
            short_names,
            reference: reference.to_string(),
            languages,
            sections,
            total_questions: all_codes.len(),
            status_counts,
        },
        questions: question_views,
        diffs,
    }
}

/// Write the export document as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save_export(document: &ExportDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "export written");
    Ok(())
}
