//! Operator-maintained section alias configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SectionError};

/// Load the section alias map (`variant name: canonical name`) from a YAML
/// file. A missing file means no aliases are configured and yields an empty
/// map, not an error.
pub fn load_section_aliases(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        debug!(path = %path.display(), "no section alias file, using empty table");
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path).map_err(|source| SectionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_yaml::from_str(&contents).map_err(|source| SectionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_table() {
        let aliases = load_section_aliases(Path::new("/nonexistent/aliases.yaml")).unwrap();
        assert!(aliases.is_empty());
    }

    #[test]
    fn loads_variant_to_canonical_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.yaml");
        std::fs::write(&path, "\"Section A\": \"Section B\"\n").unwrap();

        let aliases = load_section_aliases(&path).unwrap();
        assert_eq!(aliases.get("Section A").map(String::as_str), Some("Section B"));
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.yaml");
        std::fs::write(&path, "").unwrap();

        let aliases = load_section_aliases(&path).unwrap();
        assert!(aliases.is_empty());
    }
}
