pub mod aliases;
pub mod error;
pub mod normalizer;

pub use aliases::load_section_aliases;
pub use error::{Result, SectionError};
pub use normalizer::{
    DEFAULT_SECTION_NAME, SECTION_MERGE_THRESHOLD, SectionGroup, SectionNormalizer,
};
