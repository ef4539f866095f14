use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::code::normalize_code;
use crate::error::ModelError;

/// Element types treated as questions. Everything else in an export is
/// presentational and never reaches the comparison pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    SingleChoice,
    MultipleChoice,
    OpenQuestion,
    Matrix,
    Dropdown,
}

impl ElementType {
    /// Canonical name as it appears in export files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::SingleChoice => "SingleChoice",
            ElementType::MultipleChoice => "MultipleChoice",
            ElementType::OpenQuestion => "OpenQuestion",
            ElementType::Matrix => "Matrix",
            ElementType::Dropdown => "Dropdown",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SingleChoice" => Ok(ElementType::SingleChoice),
            "MultipleChoice" => Ok(ElementType::MultipleChoice),
            "OpenQuestion" => Ok(ElementType::OpenQuestion),
            "Matrix" => Ok(ElementType::Matrix),
            "Dropdown" => Ok(ElementType::Dropdown),
            other => Err(ModelError::UnknownElementType(other.to_string())),
        }
    }
}

/// A single text value with its language code.
///
/// Language codes are compared case-insensitively wherever texts are used as
/// map keys; the parser already lowercases them on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

impl LocalizedText {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Any sub-entity identified within its parent by a code and carrying
/// multilingual texts: answer options, matrix rows, matrix columns.
pub trait Coded {
    fn code(&self) -> &str;
    fn texts(&self) -> &[LocalizedText];
}

impl<T: Coded + ?Sized> Coded for &T {
    fn code(&self) -> &str {
        (**self).code()
    }

    fn texts(&self) -> &[LocalizedText] {
        (**self).texts()
    }
}

/// One selectable choice inside a question.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub texts: Vec<LocalizedText>,
    #[serde(default)]
    pub allow_text_entry: bool,
    #[serde(default)]
    pub exclusive: bool,
}

impl Coded for AnswerOption {
    fn code(&self) -> &str {
        &self.code
    }

    fn texts(&self) -> &[LocalizedText] {
        &self.texts
    }
}

/// A row (sub-question) inside a matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatrixRow {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub texts: Vec<LocalizedText>,
}

impl Coded for MatrixRow {
    fn code(&self) -> &str {
        &self.code
    }

    fn texts(&self) -> &[LocalizedText] {
        &self.texts
    }
}

/// A column (answer option) inside a matrix column group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixColumn {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub texts: Vec<LocalizedText>,
    #[serde(default = "default_choice_type")]
    pub choice_type: String,
}

impl Coded for MatrixColumn {
    fn code(&self) -> &str {
        &self.code
    }

    fn texts(&self) -> &[LocalizedText] {
        &self.texts
    }
}

/// A group of columns in a matrix question.
///
/// Groups exist purely for presentation; comparisons flatten all columns
/// across all groups of a question into one code-keyed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixColumnGroup {
    pub id: i64,
    #[serde(default = "default_choice_type")]
    pub choice_type: String,
    #[serde(default)]
    pub columns: Vec<MatrixColumn>,
}

pub(crate) fn default_choice_type() -> String {
    "Text".to_string()
}

/// Normalized representation of one questionnaire element.
///
/// For `Matrix` questions `choices` is empty and the structure lives in
/// `matrix_rows` / `matrix_column_groups`; for every other type the matrix
/// fields are empty and `choices` carries the structure. Questions are
/// immutable once parsed; the comparison pipeline only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub code: String,
    pub element_type: ElementType,
    #[serde(default)]
    pub texts: Vec<LocalizedText>,
    #[serde(default)]
    pub hint_texts: Vec<LocalizedText>,
    #[serde(default)]
    pub choices: Vec<AnswerOption>,
    #[serde(default)]
    pub matrix_rows: Vec<MatrixRow>,
    #[serde(default)]
    pub matrix_column_groups: Vec<MatrixColumnGroup>,
    #[serde(default)]
    pub force_response: bool,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default)]
    pub section_index: usize,
    #[serde(default)]
    pub conditions: Option<Vec<serde_json::Value>>,
}

impl Question {
    /// Code with the survey-type prefix stripped, used as the cross-edition
    /// matching key. Always derived from `code`, never cached.
    pub fn normalized_code(&self) -> String {
        normalize_code(&self.code)
    }

    /// Text for `language` (case-insensitive), falling back to the first
    /// available text, or an empty string if the question has none.
    pub fn text_for(&self, language: &str) -> &str {
        self.texts
            .iter()
            .find(|lt| lt.language.eq_ignore_ascii_case(language))
            .or_else(|| self.texts.first())
            .map(|lt| lt.text.as_str())
            .unwrap_or("")
    }

    pub fn is_matrix(&self) -> bool {
        self.element_type == ElementType::Matrix
    }

    /// All matrix columns of this question, flattened across groups.
    pub fn flattened_columns(&self) -> impl Iterator<Item = &MatrixColumn> {
        self.matrix_column_groups
            .iter()
            .flat_map(|group| group.columns.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_with_texts(texts: Vec<LocalizedText>) -> Question {
        Question {
            id: 1,
            code: "FQ1".to_string(),
            element_type: ElementType::OpenQuestion,
            texts,
            hint_texts: Vec::new(),
            choices: Vec::new(),
            matrix_rows: Vec::new(),
            matrix_column_groups: Vec::new(),
            force_response: false,
            section_name: None,
            section_index: 0,
            conditions: None,
        }
    }

    #[test]
    fn element_type_round_trips_through_strings() {
        for name in [
            "SingleChoice",
            "MultipleChoice",
            "OpenQuestion",
            "Matrix",
            "Dropdown",
        ] {
            let parsed: ElementType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("Heading".parse::<ElementType>().is_err());
    }

    #[test]
    fn text_for_matches_language_case_insensitively() {
        let q = question_with_texts(vec![
            LocalizedText::new("de-ch", "Hallo"),
            LocalizedText::new("en", "Hello"),
        ]);
        assert_eq!(q.text_for("DE-CH"), "Hallo");
        assert_eq!(q.text_for("en"), "Hello");
    }

    #[test]
    fn text_for_falls_back_to_first_available() {
        let q = question_with_texts(vec![LocalizedText::new("en", "Hello")]);
        assert_eq!(q.text_for("fr"), "Hello");
        assert_eq!(question_with_texts(Vec::new()).text_for("en"), "");
    }

    #[test]
    fn normalized_code_is_derived_from_code() {
        let q = question_with_texts(Vec::new());
        assert_eq!(q.normalized_code(), "Q1");
    }

    #[test]
    fn flattened_columns_cross_group_boundaries() {
        let mut q = question_with_texts(Vec::new());
        q.element_type = ElementType::Matrix;
        q.matrix_column_groups = vec![
            MatrixColumnGroup {
                id: 1,
                choice_type: "Text".to_string(),
                columns: vec![MatrixColumn {
                    id: 10,
                    code: "1".to_string(),
                    texts: Vec::new(),
                    choice_type: "Text".to_string(),
                }],
            },
            MatrixColumnGroup {
                id: 2,
                choice_type: "Text".to_string(),
                columns: vec![MatrixColumn {
                    id: 11,
                    code: "2".to_string(),
                    texts: Vec::new(),
                    choice_type: "Text".to_string(),
                }],
            },
        ];
        let codes: Vec<&str> = q.flattened_columns().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["1", "2"]);
    }
}
