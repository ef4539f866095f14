//! Generic differ for code-identified sub-entities.
//!
//! Answer options, matrix rows and matrix columns all expose `{code, texts}`
//! through the [`Coded`] trait, so one routine serves all three.

use std::collections::BTreeMap;

use survey_model::{
    ChoiceDiff, ChoiceStatus, Coded, MatrixColumnGroup, TextStatus,
};

use crate::similarity::compare_texts;

/// Compare two ordered collections of coded items.
///
/// Codes are enumerated in first-seen order, old items first in their
/// original order, then any new-only codes in theirs. Items present on both
/// sides carry their full per-language text diffs regardless of status.
pub fn compare_coded_items<T: Coded>(old: &[T], new: &[T], threshold: f64) -> Vec<ChoiceDiff> {
    let mut old_index: BTreeMap<&str, &T> = BTreeMap::new();
    for item in old {
        old_index.insert(item.code(), item);
    }
    let mut new_index: BTreeMap<&str, &T> = BTreeMap::new();
    for item in new {
        new_index.insert(item.code(), item);
    }

    let mut codes: Vec<&str> = Vec::new();
    for item in old.iter().map(Coded::code).chain(new.iter().map(Coded::code)) {
        if !codes.contains(&item) {
            codes.push(item);
        }
    }

    codes
        .into_iter()
        .map(|code| {
            match (old_index.get(code), new_index.get(code)) {
                (None, Some(_)) => ChoiceDiff::added(code),
                (Some(_), None) => ChoiceDiff::removed(code),
                (Some(old_item), Some(new_item)) => {
                    let text_diffs = compare_texts(old_item.texts(), new_item.texts(), threshold);
                    let changed = text_diffs.iter().any(|td| td.status != TextStatus::Exact);
                    ChoiceDiff {
                        code: code.to_string(),
                        status: if changed {
                            ChoiceStatus::TextChanged
                        } else {
                            ChoiceStatus::Unchanged
                        },
                        text_diffs,
                    }
                }
                // The union is built from both sides, so every code resolves.
                (None, None) => unreachable!("code missing from both sides"),
            }
        })
        .collect()
}

/// Compare answer options by code.
pub fn compare_choices<T: Coded>(old: &[T], new: &[T], threshold: f64) -> Vec<ChoiceDiff> {
    compare_coded_items(old, new, threshold)
}

/// Compare matrix rows by code.
pub fn compare_matrix_rows<T: Coded>(old: &[T], new: &[T], threshold: f64) -> Vec<ChoiceDiff> {
    compare_coded_items(old, new, threshold)
}

/// Compare matrix columns by code, flattening column groups first.
///
/// Group membership is presentational and is not compared.
pub fn compare_matrix_columns(
    old_groups: &[MatrixColumnGroup],
    new_groups: &[MatrixColumnGroup],
    threshold: f64,
) -> Vec<ChoiceDiff> {
    let old_columns: Vec<_> = old_groups.iter().flat_map(|g| g.columns.iter()).collect();
    let new_columns: Vec<_> = new_groups.iter().flat_map(|g| g.columns.iter()).collect();
    compare_coded_items(&old_columns, &new_columns, threshold)
}
