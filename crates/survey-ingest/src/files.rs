//! Export file discovery and filename conventions.
//!
//! Export filenames follow `survey_<Short>_<Label>_<YYYYMMDD>_<HHMM>.json`.
//! The embedded date orders exports oldest-first; the token between the
//! first two underscores is the short display name.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{IngestError, Result};

static FILENAME_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{8})_\d{4}\.json$").expect("valid regex"));

/// Extract the export date from a filename, if the filename carries one.
pub fn extract_date_from_filename(filename: &str) -> Option<NaiveDate> {
    let captures = FILENAME_DATE.captures(filename)?;
    NaiveDate::parse_from_str(&captures[1], "%Y%m%d").ok()
}

/// Short display name: the token between the first two underscores, or the
/// input unchanged when the pattern does not apply.
pub fn extract_short_name(name: &str) -> String {
    let mut parts = name.split('_');
    match (parts.next(), parts.next()) {
        (Some(_), Some(short)) => short.to_string(),
        _ => name.to_string(),
    }
}

/// Source label for an export path: the file stem.
pub fn source_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

fn file_date(path: &Path) -> Option<NaiveDate> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(extract_date_from_filename)
}

/// Sort export files by embedded date, oldest first. Files without a date
/// sort before dated ones; filename breaks ties.
pub fn sort_exports_by_date(files: &mut [PathBuf]) {
    files.sort_by_key(|path| {
        (
            file_date(path).unwrap_or(NaiveDate::MIN),
            path.file_name().map(|name| name.to_os_string()),
        )
    });
}

/// List all JSON exports in a directory, sorted oldest first.
pub fn list_export_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            files.push(path);
        }
    }

    sort_exports_by_date(&mut files);
    debug!(dir = %dir.display(), count = files.len(), "listed exports");
    Ok(files)
}
