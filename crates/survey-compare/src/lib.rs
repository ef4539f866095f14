pub mod items;
pub mod question;
pub mod similarity;
pub mod survey;

pub use items::{
    compare_choices, compare_coded_items, compare_matrix_columns, compare_matrix_rows,
};
pub use question::compare_questions;
pub use similarity::{DEFAULT_SIMILARITY_THRESHOLD, compare_texts, similarity, text_status};
pub use survey::compare_surveys;
