//! Error types for motenet-groups.

use thiserror::Error;

use crate::record::MoteId;

/// Result type for motenet-groups operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tracking groups.
#[derive(Debug, Error)]
pub enum Error {
    /// Sender belongs to no group and every slot is occupied.
    #[error("no free group slot for sender {sender}")]
    NoCapacity { sender: MoteId },

    /// Input violated the ingestion contract.
    #[error("malformed report: {0}")]
    MalformedReport(String),

    /// Configuration rejected by validation or parsing.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if the failure only affects the offending report.
    ///
    /// Callers drop the report and keep going; the store is untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoCapacity { .. } | Error::MalformedReport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_errors_are_recoverable() {
        let err = Error::NoCapacity {
            sender: MoteId::from("m9"),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "no free group slot for sender m9");

        assert!(Error::MalformedReport("no sender".into()).is_recoverable());
        assert!(!Error::InvalidConfig("num_motes".into()).is_recoverable());
    }
}
