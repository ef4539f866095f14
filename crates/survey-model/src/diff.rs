//! Comparison result entities.
//!
//! Diff entities are ephemeral: each comparison run builds its own tree and
//! nothing mutates them after construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::question::ElementType;

/// Outcome of comparing one language's text between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStatus {
    Exact,
    Similar,
    Different,
    Added,
    Removed,
}

impl TextStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStatus::Exact => "exact",
            TextStatus::Similar => "similar",
            TextStatus::Different => "different",
            TextStatus::Added => "added",
            TextStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for TextStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing one coded item (answer option, matrix row or
/// matrix column) between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceStatus {
    Unchanged,
    TextChanged,
    Added,
    Removed,
}

impl ChoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceStatus::Unchanged => "unchanged",
            ChoiceStatus::TextChanged => "text_changed",
            ChoiceStatus::Added => "added",
            ChoiceStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for ChoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall outcome for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Identical,
    TextChanged,
    StructureChanged,
    Added,
    Removed,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Identical => "identical",
            QuestionStatus::TextChanged => "text_changed",
            QuestionStatus::StructureChanged => "structure_changed",
            QuestionStatus::Added => "added",
            QuestionStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison result for a single language's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDiff {
    pub language: String,
    pub status: TextStatus,
    pub similarity: f64,
    pub old_text: String,
    pub new_text: String,
}

/// Comparison result for a single coded item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDiff {
    pub code: String,
    pub status: ChoiceStatus,
    #[serde(default)]
    pub text_diffs: Vec<TextDiff>,
}

impl ChoiceDiff {
    pub fn added(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: ChoiceStatus::Added,
            text_diffs: Vec::new(),
        }
    }

    pub fn removed(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: ChoiceStatus::Removed,
            text_diffs: Vec::new(),
        }
    }
}

/// Full diff for one question across two questionnaire versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDiff {
    pub code: String,
    pub element_type: ElementType,
    pub status: QuestionStatus,
    #[serde(default)]
    pub text_diffs: Vec<TextDiff>,
    #[serde(default)]
    pub choice_diffs: Vec<ChoiceDiff>,
    #[serde(default)]
    pub matrix_row_diffs: Vec<ChoiceDiff>,
    #[serde(default)]
    pub matrix_column_diffs: Vec<ChoiceDiff>,
}

impl QuestionDiff {
    /// Diff for a question present only in the newer survey.
    pub fn added(code: impl Into<String>, element_type: ElementType) -> Self {
        Self::presence_only(code, element_type, QuestionStatus::Added)
    }

    /// Diff for a question present only in the older survey.
    pub fn removed(code: impl Into<String>, element_type: ElementType) -> Self {
        Self::presence_only(code, element_type, QuestionStatus::Removed)
    }

    fn presence_only(
        code: impl Into<String>,
        element_type: ElementType,
        status: QuestionStatus,
    ) -> Self {
        Self {
            code: code.into(),
            element_type,
            status,
            text_diffs: Vec::new(),
            choice_diffs: Vec::new(),
            matrix_row_diffs: Vec::new(),
            matrix_column_diffs: Vec::new(),
        }
    }

    /// All coded-item diffs of this question, across choices, matrix rows
    /// and matrix columns.
    pub fn item_diffs(&self) -> impl Iterator<Item = &ChoiceDiff> {
        self.choice_diffs
            .iter()
            .chain(&self.matrix_row_diffs)
            .chain(&self.matrix_column_diffs)
    }
}

/// Complete comparison output for two questionnaires.
///
/// `source_a` and `source_b` are opaque labels supplied by the caller;
/// nothing here interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub source_a: String,
    pub source_b: String,
    #[serde(default)]
    pub question_diffs: Vec<QuestionDiff>,
}

impl ComparisonResult {
    /// Questions present in both surveys.
    pub fn matched(&self) -> impl Iterator<Item = &QuestionDiff> {
        self.question_diffs.iter().filter(|d| {
            !matches!(d.status, QuestionStatus::Added | QuestionStatus::Removed)
        })
    }

    /// Questions present only in survey B.
    pub fn added(&self) -> impl Iterator<Item = &QuestionDiff> {
        self.question_diffs
            .iter()
            .filter(|d| d.status == QuestionStatus::Added)
    }

    /// Questions present only in survey A.
    pub fn removed(&self) -> impl Iterator<Item = &QuestionDiff> {
        self.question_diffs
            .iter()
            .filter(|d| d.status == QuestionStatus::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_as_snake_case() {
        let json = serde_json::to_string(&QuestionStatus::StructureChanged).unwrap();
        assert_eq!(json, "\"structure_changed\"");
        let json = serde_json::to_string(&ChoiceStatus::TextChanged).unwrap();
        assert_eq!(json, "\"text_changed\"");
        let json = serde_json::to_string(&TextStatus::Exact).unwrap();
        assert_eq!(json, "\"exact\"");
    }

    #[test]
    fn comparison_result_views_filter_by_status() {
        let result = ComparisonResult {
            source_a: "a".to_string(),
            source_b: "b".to_string(),
            question_diffs: vec![
                QuestionDiff::added("Q1", ElementType::OpenQuestion),
                QuestionDiff::removed("Q2", ElementType::OpenQuestion),
                QuestionDiff {
                    code: "Q3".to_string(),
                    element_type: ElementType::SingleChoice,
                    status: QuestionStatus::Identical,
                    text_diffs: Vec::new(),
                    choice_diffs: Vec::new(),
                    matrix_row_diffs: Vec::new(),
                    matrix_column_diffs: Vec::new(),
                },
            ],
        };
        assert_eq!(result.matched().count(), 1);
        assert_eq!(result.added().count(), 1);
        assert_eq!(result.removed().count(), 1);
        assert_eq!(result.matched().next().unwrap().code, "Q3");
    }
}
