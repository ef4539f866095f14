//! Full survey comparison.

use std::collections::BTreeMap;

use tracing::debug;

use survey_model::{ComparisonResult, Question, QuestionDiff};

use crate::question::compare_questions;

/// Compare two full question lists and return a [`ComparisonResult`].
///
/// Questions are matched by normalized code, which is what allows comparing
/// editions that prefix otherwise-identical codes with different letters.
/// Duplicate normalized codes within one side are a data-quality condition;
/// the last-seen question wins. `source_a`/`source_b` are opaque labels for
/// the caller's benefit.
pub fn compare_surveys(
    questions_a: &[Question],
    questions_b: &[Question],
    source_a: &str,
    source_b: &str,
    threshold: f64,
) -> ComparisonResult {
    let mut index_a: BTreeMap<String, &Question> = BTreeMap::new();
    for question in questions_a {
        index_a.insert(question.normalized_code(), question);
    }
    let mut index_b: BTreeMap<String, &Question> = BTreeMap::new();
    for question in questions_b {
        index_b.insert(question.normalized_code(), question);
    }

    let mut codes: Vec<String> = Vec::new();
    for question in questions_a.iter().chain(questions_b) {
        let code = question.normalized_code();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    let question_diffs: Vec<QuestionDiff> = codes
        .into_iter()
        .map(|code| match (index_a.get(&code), index_b.get(&code)) {
            (None, Some(b)) => QuestionDiff::added(code, b.element_type),
            (Some(a), None) => QuestionDiff::removed(code, a.element_type),
            (Some(a), Some(b)) => {
                let mut diff = compare_questions(a, b, threshold);
                // Report under the matching key, not the raw edition code.
                diff.code = code;
                diff
            }
            (None, None) => unreachable!("code missing from both sides"),
        })
        .collect();

    debug!(
        source_a,
        source_b,
        questions_a = questions_a.len(),
        questions_b = questions_b.len(),
        diffs = question_diffs.len(),
        "compared surveys"
    );

    ComparisonResult {
        source_a: source_a.to_string(),
        source_b: source_b.to_string(),
        question_diffs,
    }
}
