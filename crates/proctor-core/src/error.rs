//! Error types for the proctoring core.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProctorError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
