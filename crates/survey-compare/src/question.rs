//! Question-level comparison.

use survey_model::{ChoiceStatus, Question, QuestionDiff, QuestionStatus, TextStatus};

use crate::items::{compare_choices, compare_matrix_columns, compare_matrix_rows};
use crate::similarity::compare_texts;

/// Produce a full diff for a single question present in both surveys.
///
/// The caller guarantees that `old` and `new` represent the same question
/// (typically matched by normalized code); this function only diffs. When
/// either side is a Matrix the matrix rows/columns are compared and answer
/// options are left alone, so a question whose type changed across editions
/// still diffs without losing its matrix structure.
///
/// The returned diff's `code` is the old question's raw code; the survey
/// differ overwrites it with the matching key it actually used.
pub fn compare_questions(old: &Question, new: &Question, threshold: f64) -> QuestionDiff {
    let text_diffs = compare_texts(&old.texts, &new.texts, threshold);

    let mut choice_diffs = Vec::new();
    let mut matrix_row_diffs = Vec::new();
    let mut matrix_column_diffs = Vec::new();
    if old.is_matrix() || new.is_matrix() {
        matrix_row_diffs = compare_matrix_rows(&old.matrix_rows, &new.matrix_rows, threshold);
        matrix_column_diffs = compare_matrix_columns(
            &old.matrix_column_groups,
            &new.matrix_column_groups,
            threshold,
        );
    } else {
        choice_diffs = compare_choices(&old.choices, &new.choices, threshold);
    }

    let item_diffs = choice_diffs
        .iter()
        .chain(&matrix_row_diffs)
        .chain(&matrix_column_diffs);
    let has_structure_change = item_diffs
        .clone()
        .any(|cd| matches!(cd.status, ChoiceStatus::Added | ChoiceStatus::Removed));
    let has_item_text_change = item_diffs
        .clone()
        .any(|cd| cd.status == ChoiceStatus::TextChanged);
    let has_text_change = text_diffs.iter().any(|td| td.status != TextStatus::Exact);

    let status = if has_structure_change {
        QuestionStatus::StructureChanged
    } else if has_text_change || has_item_text_change {
        QuestionStatus::TextChanged
    } else {
        QuestionStatus::Identical
    };

    QuestionDiff {
        code: old.code.clone(),
        element_type: old.element_type,
        status,
        text_diffs,
        choice_diffs,
        matrix_row_diffs,
        matrix_column_diffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::{
        AnswerOption, ElementType, LocalizedText, MatrixColumn, MatrixColumnGroup, MatrixRow,
    };

    use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

    fn option(code: &str, text: &str) -> AnswerOption {
        AnswerOption {
            id: 0,
            code: code.to_string(),
            texts: vec![LocalizedText::new("en", text)],
            allow_text_entry: false,
            exclusive: false,
        }
    }

    fn single_choice(text: &str, choices: Vec<AnswerOption>) -> Question {
        Question {
            id: 1,
            code: "FQ1".to_string(),
            element_type: ElementType::SingleChoice,
            texts: vec![LocalizedText::new("en", text)],
            hint_texts: Vec::new(),
            choices,
            matrix_rows: Vec::new(),
            matrix_column_groups: Vec::new(),
            force_response: false,
            section_name: None,
            section_index: 0,
            conditions: None,
        }
    }

    fn matrix(text: &str, rows: Vec<MatrixRow>, columns: Vec<MatrixColumn>) -> Question {
        Question {
            id: 2,
            code: "FM1".to_string(),
            element_type: ElementType::Matrix,
            texts: vec![LocalizedText::new("en", text)],
            hint_texts: Vec::new(),
            choices: Vec::new(),
            matrix_rows: rows,
            matrix_column_groups: vec![MatrixColumnGroup {
                id: 1,
                choice_type: "Text".to_string(),
                columns,
            }],
            force_response: false,
            section_name: None,
            section_index: 0,
            conditions: None,
        }
    }

    fn row(code: &str, text: &str) -> MatrixRow {
        MatrixRow {
            id: 0,
            code: code.to_string(),
            texts: vec![LocalizedText::new("en", text)],
        }
    }

    fn column(code: &str, text: &str) -> MatrixColumn {
        MatrixColumn {
            id: 0,
            code: code.to_string(),
            texts: vec![LocalizedText::new("en", text)],
            choice_type: "Text".to_string(),
        }
    }

    #[test]
    fn identical_questions_report_identical() {
        let old = single_choice("Pick one", vec![option("1", "Yes")]);
        let new = single_choice("Pick one", vec![option("1", "Yes")]);
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diff.status, QuestionStatus::Identical);
        assert_eq!(diff.code, "FQ1");
    }

    #[test]
    fn changed_top_level_text_reports_text_changed() {
        let old = single_choice("Pick one", vec![option("1", "Yes")]);
        let new = single_choice("Choose exactly one", vec![option("1", "Yes")]);
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diff.status, QuestionStatus::TextChanged);
    }

    #[test]
    fn changed_choice_text_reports_text_changed() {
        let old = single_choice("Pick one", vec![option("1", "Yes")]);
        let new = single_choice("Pick one", vec![option("1", "Certainly")]);
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diff.status, QuestionStatus::TextChanged);
    }

    #[test]
    fn structure_change_dominates_text_change() {
        let old = single_choice("Pick one", vec![option("1", "Yes")]);
        let new = single_choice(
            "Choose exactly one",
            vec![option("1", "Yes"), option("2", "No")],
        );
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diff.status, QuestionStatus::StructureChanged);
    }

    #[test]
    fn matrix_questions_diff_rows_and_columns() {
        let old = matrix(
            "Rate these",
            vec![row("r1", "Quality")],
            vec![column("1", "Bad"), column("2", "Good")],
        );
        let new = matrix(
            "Rate these",
            vec![row("r1", "Quality"), row("r2", "Price")],
            vec![column("1", "Bad"), column("2", "Good")],
        );
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diff.status, QuestionStatus::StructureChanged);
        assert!(diff.choice_diffs.is_empty());
        assert_eq!(diff.matrix_row_diffs.len(), 2);
        assert_eq!(diff.matrix_column_diffs.len(), 2);
    }

    #[test]
    fn type_change_to_matrix_takes_the_matrix_branch() {
        let old = single_choice("Rate this", vec![option("1", "Yes")]);
        let new = matrix("Rate this", vec![row("r1", "Quality")], vec![column("1", "Bad")]);
        let diff = compare_questions(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        // The old side has no matrix structure, so everything reports added.
        assert_eq!(diff.status, QuestionStatus::StructureChanged);
        assert!(diff.choice_diffs.is_empty());
        assert_eq!(diff.matrix_row_diffs[0].status, ChoiceStatus::Added);
    }
}
