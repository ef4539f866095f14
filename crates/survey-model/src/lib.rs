pub mod code;
pub mod diff;
pub mod error;
pub mod question;

pub use code::normalize_code;
pub use diff::{
    ChoiceDiff, ChoiceStatus, ComparisonResult, QuestionDiff, QuestionStatus, TextDiff, TextStatus,
};
pub use error::{ModelError, Result};
pub use question::{
    AnswerOption, Coded, ElementType, LocalizedText, MatrixColumn, MatrixColumnGroup, MatrixRow,
    Question,
};
