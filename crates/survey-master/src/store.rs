//! The master question store.
//!
//! The master is a long-lived, manually curatable reference set of
//! questions, keyed by normalized code and persisted as hand-editable YAML.
//! Comparisons against the master show how each export drifted from the
//! curated baseline.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use survey_model::{
    AnswerOption, ElementType, LocalizedText, MatrixColumn, MatrixColumnGroup, MatrixRow, Question,
};

use crate::error::{MasterError, Result};

/// A coded sub-entity as persisted: code plus language→text map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub code: String,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

/// One master question as persisted. Empty collections and absent section
/// data are omitted so the file stays pleasant to edit by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub section_index: usize,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ItemRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matrix_rows: Vec<ItemRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matrix_columns: Vec<ItemRecord>,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// The master mapping: normalized question code → record.
pub type Master = BTreeMap<String, MasterRecord>;

fn texts_map(texts: &[LocalizedText]) -> BTreeMap<String, String> {
    texts
        .iter()
        .map(|lt| (lt.language.clone(), lt.text.clone()))
        .collect()
}

fn item_record(code: &str, texts: &[LocalizedText]) -> ItemRecord {
    ItemRecord {
        code: code.to_string(),
        texts: texts_map(texts),
    }
}

fn question_to_record(question: &Question) -> MasterRecord {
    MasterRecord {
        element_type: question.element_type,
        section_name: question.section_name.clone(),
        section_index: question.section_index,
        texts: texts_map(&question.texts),
        choices: question
            .choices
            .iter()
            .map(|c| item_record(&c.code, &c.texts))
            .collect(),
        matrix_rows: question
            .matrix_rows
            .iter()
            .map(|r| item_record(&r.code, &r.texts))
            .collect(),
        matrix_columns: question
            .flattened_columns()
            .map(|c| item_record(&c.code, &c.texts))
            .collect(),
    }
}

/// Build a master mapping from a question list, keyed by normalized code.
/// A later question with the same normalized code overwrites an earlier one.
pub fn extract_master(questions: &[Question]) -> Master {
    questions
        .iter()
        .map(|q| (q.normalized_code(), question_to_record(q)))
        .collect()
}

/// Merge per-export masters supplied oldest to newest: the newest export
/// wins per code, older exports fill in codes absent from all newer ones.
pub fn merge_masters(masters: Vec<Master>) -> Master {
    let mut merged = Master::new();
    for master in masters {
        merged.extend(master);
    }
    merged
}

/// Write the master to a YAML file, creating parent directories as needed.
pub fn save_master(master: &Master, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| MasterError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let yaml = serde_yaml::to_string(master)?;
    fs::write(path, yaml).map_err(|source| MasterError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), questions = master.len(), "master saved");
    Ok(())
}

/// Read a master YAML file back into a mapping. An empty file is an empty
/// master, not an error.
pub fn load_master(path: &Path) -> Result<Master> {
    let contents = fs::read_to_string(path).map_err(|source| MasterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Master::new());
    }
    let master: Master = serde_yaml::from_str(&contents).map_err(|source| MasterError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), questions = master.len(), "master loaded");
    Ok(master)
}

fn record_texts(texts: &BTreeMap<String, String>) -> Vec<LocalizedText> {
    texts
        .iter()
        .map(|(language, text)| LocalizedText::new(language.clone(), text.clone()))
        .collect()
}

/// Reconstruct comparable [`Question`]s from a loaded master mapping.
///
/// Identifiers are synthesized (`id` 0) and omitted section fields take
/// their defaults; every field captured by the persisted shape survives.
pub fn master_to_questions(master: &Master) -> Vec<Question> {
    master
        .iter()
        .map(|(code, record)| {
            let matrix_column_groups = if record.matrix_columns.is_empty() {
                Vec::new()
            } else {
                vec![MatrixColumnGroup {
                    id: 0,
                    choice_type: "Text".to_string(),
                    columns: record
                        .matrix_columns
                        .iter()
                        .map(|item| MatrixColumn {
                            id: 0,
                            code: item.code.clone(),
                            texts: record_texts(&item.texts),
                            choice_type: "Text".to_string(),
                        })
                        .collect(),
                }]
            };
            Question {
                id: 0,
                code: code.clone(),
                element_type: record.element_type,
                texts: record_texts(&record.texts),
                hint_texts: Vec::new(),
                choices: record
                    .choices
                    .iter()
                    .map(|item| AnswerOption {
                        id: 0,
                        code: item.code.clone(),
                        texts: record_texts(&item.texts),
                        allow_text_entry: false,
                        exclusive: false,
                    })
                    .collect(),
                matrix_rows: record
                    .matrix_rows
                    .iter()
                    .map(|item| MatrixRow {
                        id: 0,
                        code: item.code.clone(),
                        texts: record_texts(&item.texts),
                    })
                    .collect(),
                matrix_column_groups,
                force_response: false,
                section_name: record.section_name.clone(),
                section_index: record.section_index,
                conditions: None,
            }
        })
        .collect()
}
