//! Parse survey-platform JSON exports into normalized [`Question`]s.
//!
//! Only the five question element types survive parsing; headings, page
//! breaks and other presentational elements are skipped. Matrix elements
//! store their rows in the top-level `choices` array of the export, so
//! parsing moves them into `matrix_rows` and leaves `choices` empty.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use survey_model::{
    AnswerOption, ElementType, LocalizedText, MatrixColumn, MatrixColumnGroup, MatrixRow, Question,
};

use crate::error::{IngestError, Result};
use crate::text::clean_text;

#[derive(Debug, Deserialize)]
struct RawSurvey {
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    code: String,
    #[serde(default)]
    element_type: Option<String>,
    #[serde(default)]
    text: Vec<RawLocalized>,
    #[serde(default)]
    hint_text: Vec<RawLocalized>,
    #[serde(default)]
    choices: Vec<RawChoice>,
    #[serde(default)]
    column_groups: Vec<RawColumnGroup>,
    #[serde(default)]
    force_response: bool,
    #[serde(default)]
    conditions: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocalized {
    language_code: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChoice {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    code: String,
    #[serde(default)]
    text: Vec<RawLocalized>,
    #[serde(default)]
    allow_text_entry: bool,
    #[serde(default)]
    exclusive: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumnGroup {
    #[serde(default)]
    id: i64,
    #[serde(default = "default_choice_type")]
    choice_type: String,
    #[serde(default)]
    choices: Vec<RawChoice>,
}

fn default_choice_type() -> String {
    "Text".to_string()
}

fn parse_localized(raw: &[RawLocalized]) -> Vec<LocalizedText> {
    raw.iter()
        .map(|item| LocalizedText::new(item.language_code.to_lowercase(), clean_text(&item.text)))
        .collect()
}

fn parse_choice(raw: &RawChoice) -> AnswerOption {
    AnswerOption {
        id: raw.id,
        code: raw.code.clone(),
        texts: parse_localized(&raw.text),
        allow_text_entry: raw.allow_text_entry,
        exclusive: raw.exclusive,
    }
}

fn parse_matrix_column(raw: &RawChoice) -> MatrixColumn {
    MatrixColumn {
        id: raw.id,
        code: raw.code.clone(),
        texts: parse_localized(&raw.text),
        choice_type: "Text".to_string(),
    }
}

fn parse_element(
    element: &RawElement,
    section_name: Option<&str>,
    section_index: usize,
) -> Option<Question> {
    let element_type = element
        .element_type
        .as_deref()
        .and_then(|name| ElementType::from_str(name).ok())?;

    let mut question = Question {
        id: element.id,
        code: element.code.clone(),
        element_type,
        texts: parse_localized(&element.text),
        hint_texts: parse_localized(&element.hint_text),
        choices: element.choices.iter().map(parse_choice).collect(),
        matrix_rows: Vec::new(),
        matrix_column_groups: Vec::new(),
        force_response: element.force_response,
        section_name: section_name.map(String::from),
        section_index,
        conditions: element.conditions.clone(),
    };

    if element_type == ElementType::Matrix {
        question.matrix_column_groups = element
            .column_groups
            .iter()
            .map(|group| MatrixColumnGroup {
                id: group.id,
                choice_type: group.choice_type.clone(),
                columns: group.choices.iter().map(parse_matrix_column).collect(),
            })
            .collect();
        // Matrix rows arrive as the element's top-level choices.
        question.matrix_rows = element
            .choices
            .iter()
            .map(|choice| MatrixRow {
                id: choice.id,
                code: choice.code.clone(),
                texts: parse_localized(&choice.text),
            })
            .collect();
        question.choices = Vec::new();
    }

    Some(question)
}

fn parse_survey(survey: &RawSurvey) -> Vec<Question> {
    let mut questions = Vec::new();
    for (section_index, section) in survey.sections.iter().enumerate() {
        for element in &section.elements {
            if let Some(question) =
                parse_element(element, section.name.as_deref(), section_index)
            {
                questions.push(question);
            }
        }
    }
    questions
}

/// Parse a full export document from its JSON text.
pub fn parse_survey_str(contents: &str) -> std::result::Result<Vec<Question>, serde_json::Error> {
    let survey: RawSurvey = serde_json::from_str(contents)?;
    Ok(parse_survey(&survey))
}

/// Load and parse one export file.
pub fn load_export(path: &Path) -> Result<Vec<Question>> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let questions = parse_survey_str(&contents).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), questions = questions.len(), "parsed export");
    Ok(questions)
}
