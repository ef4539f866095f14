use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("failed to read alias file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse alias file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, SectionError>;
