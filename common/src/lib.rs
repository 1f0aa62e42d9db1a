//! EcoSort Common Library
//!
//! CLIとHTTP APIで共有される型とキーワード分類器

pub mod types;
pub mod keywords;
pub mod classifier;
pub mod tips;
pub mod validation;
pub mod error;

pub use types::{Category, ClassificationResult, ClassifyImageRequest, ClassifyTextRequest};
pub use keywords::KeywordTable;
pub use classifier::{classify_image, classify_text, Classifier, Scores};
pub use tips::tip_for;
pub use validation::{
    mime_for_extension, validate_image, validate_text, ValidationError, ValidationIssue,
    ALLOWED_MIME_TYPES, MAX_TEXT_CHARS, MAX_UPLOAD_BYTES,
};
pub use error::{Error, Result};
