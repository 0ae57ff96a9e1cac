//! Error types for the node service.

use thiserror::Error;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the node.
#[derive(Debug, Error)]
pub enum Error {
    /// Group engine rejected the input or configuration
    #[error("Group error: {0}")]
    Groups(#[from] motenet_groups::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if only the current input line is affected.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Groups(e) => e.is_recoverable() || matches!(e, motenet_groups::Error::Serialization(_)),
            Error::Serialization(_) => true,
            Error::Io(_) => false,
        }
    }
}
