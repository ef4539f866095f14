//! Lexical text similarity and per-language text comparison.
//!
//! Uses Indel normalized similarity (twice the matched length over the total
//! length of both strings), which is symmetric and reaches 1.0 exactly when
//! the strings are equal.

use std::collections::BTreeMap;

use rapidfuzz::distance::indel;
use survey_model::{LocalizedText, TextDiff, TextStatus};

/// Default threshold above which two texts count as "similar".
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Similarity score in `[0, 1]` for two strings. Equal strings
/// short-circuit to exactly `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

/// Classify a similarity score against a threshold.
pub fn text_status(score: f64, threshold: f64) -> TextStatus {
    if score == 1.0 {
        TextStatus::Exact
    } else if score >= threshold {
        TextStatus::Similar
    } else {
        TextStatus::Different
    }
}

/// Map lowercased language code to text. First occurrence wins on
/// duplicate languages.
fn text_index(texts: &[LocalizedText]) -> BTreeMap<String, &str> {
    let mut index = BTreeMap::new();
    for lt in texts {
        index
            .entry(lt.language.to_lowercase())
            .or_insert(lt.text.as_str());
    }
    index
}

/// Compare multilingual texts and return per-language diffs.
///
/// The result covers the union of languages on both sides, sorted by
/// language code. A language present only in `new` reports `added`, only
/// in `old` reports `removed`, otherwise the similarity classification.
pub fn compare_texts(old: &[LocalizedText], new: &[LocalizedText], threshold: f64) -> Vec<TextDiff> {
    let old_index = text_index(old);
    let new_index = text_index(new);

    let mut languages: Vec<&String> = old_index.keys().collect();
    for language in new_index.keys() {
        if !old_index.contains_key(language) {
            languages.push(language);
        }
    }
    languages.sort();

    languages
        .into_iter()
        .map(|language| {
            let old_text = old_index.get(language).copied();
            let new_text = new_index.get(language).copied();
            match (old_text, new_text) {
                (None, new_text) => TextDiff {
                    language: language.clone(),
                    status: TextStatus::Added,
                    similarity: 0.0,
                    old_text: String::new(),
                    new_text: new_text.unwrap_or("").to_string(),
                },
                (Some(old_text), None) => TextDiff {
                    language: language.clone(),
                    status: TextStatus::Removed,
                    similarity: 0.0,
                    old_text: old_text.to_string(),
                    new_text: String::new(),
                },
                (Some(old_text), Some(new_text)) => {
                    let score = similarity(old_text, new_text);
                    TextDiff {
                        language: language.clone(),
                        status: text_status(score, threshold),
                        similarity: score,
                        old_text: old_text.to_string(),
                        new_text: new_text.to_string(),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_are_exact() {
        assert_eq!(similarity("Hello", "Hello"), 1.0);
        assert_eq!(
            text_status(similarity("Hello", "Hello"), DEFAULT_SIMILARITY_THRESHOLD),
            TextStatus::Exact
        );
    }

    #[test]
    fn unrelated_strings_are_different() {
        let score = similarity("apples", "oranges");
        assert!(score < DEFAULT_SIMILARITY_THRESHOLD, "score was {score}");
        assert_eq!(
            text_status(score, DEFAULT_SIMILARITY_THRESHOLD),
            TextStatus::Different
        );
    }

    #[test]
    fn near_duplicates_are_similar_at_a_loose_threshold() {
        let score = similarity("Hello world", "Hello World");
        assert!(score >= 0.8, "score was {score}");
        assert!(score < 1.0);
        assert_eq!(text_status(score, 0.8), TextStatus::Similar);
    }

    #[test]
    fn union_of_languages_reports_added_and_removed() {
        let old = vec![LocalizedText::new("de-ch", "Hallo")];
        let new = vec![
            LocalizedText::new("de-ch", "Hallo"),
            LocalizedText::new("en", "Hello"),
        ];

        let diffs = compare_texts(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].language, "de-ch");
        assert_eq!(diffs[0].status, TextStatus::Exact);
        assert_eq!(diffs[1].language, "en");
        assert_eq!(diffs[1].status, TextStatus::Added);
        assert_eq!(diffs[1].new_text, "Hello");

        let reversed = compare_texts(&new, &old, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(reversed[1].language, "en");
        assert_eq!(reversed[1].status, TextStatus::Removed);
        assert_eq!(reversed[1].old_text, "Hello");
    }

    #[test]
    fn language_codes_match_case_insensitively() {
        let old = vec![LocalizedText::new("DE-CH", "Hallo")];
        let new = vec![LocalizedText::new("de-ch", "Hallo")];
        let diffs = compare_texts(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].status, TextStatus::Exact);
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_languages() {
        let old = vec![
            LocalizedText::new("en", "first"),
            LocalizedText::new("EN", "second"),
        ];
        let new = vec![LocalizedText::new("en", "first")];
        let diffs = compare_texts(&old, &new, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].status, TextStatus::Exact);
        assert_eq!(diffs[0].old_text, "first");
    }
}
