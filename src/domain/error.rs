//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors come from the block model. The tree operations themselves never fail.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid block: {message}")]
    InvalidBlock { message: String },

    #[error("node not found: {0}")]
    UnknownNode(NodeId),
}

impl DomainError {
    pub fn invalid_block(message: impl Into<String>) -> Self {
        Self::InvalidBlock {
            message: message.into(),
        }
    }
}
