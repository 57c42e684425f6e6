//! FILENAME: core/cube-format/src/error.rs

use cube_engine::CubeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    /// Malformed JSON, a missing field, or an unrecognized enum tag.
    #[error("invalid cube document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("measure '{0}' uses a currency format without a currency code")]
    MissingCurrency(String),

    #[error("descriptor '{0}' has an empty fieldName")]
    EmptyFieldName(String),

    #[error("invalid cube configuration: {0}")]
    Config(#[from] CubeError),
}
