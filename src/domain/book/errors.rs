//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("Value id={0} cannot be <= 0")]
    InvalidId(i64),

    #[error("Unsupported automerge value: {0}")]
    InvalidAutomerge(String),
}
