use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid operation code {0}: expected 0 (read) or 1 (write)")]
    InvalidOpCode(u8),

    #[error("invalid operation name: {0}")]
    InvalidOpName(String),
}
