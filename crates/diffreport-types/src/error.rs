use thiserror::Error;

/// Errors produced while building the value model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("normalization failed: {0}")]
    Normalization(String),

    #[error("invalid JSON snapshot: {0}")]
    InvalidJson(String),
}
