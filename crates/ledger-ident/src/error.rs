//! Error types for the caller.

use ledger_ident_core::PrincipalError;
use thiserror::Error;

/// Errors surfaced by boundary calls.
///
/// Every status code the callee can legally return maps onto one variant.
/// Codes outside that set are protocol violations and panic instead.
#[derive(Debug, Error)]
pub enum Error {
    /// An output did not fit its configured capacity. Retrying with a larger
    /// capacity can succeed.
    #[error("{operation}: {output} buffer too small")]
    DataOverflow {
        operation: &'static str,
        output: &'static str,
    },

    /// The callee failed and explained why.
    #[error("{operation} failed: {message}")]
    Internal {
        operation: &'static str,
        message: String,
    },

    /// The callee failed but its explanation did not fit the diagnostic
    /// buffer.
    #[error("{operation} failed and its diagnostic did not fit")]
    ErrInfoOverflow { operation: &'static str },

    /// Signing was requested from an anonymous identity.
    #[error("anonymous identity cannot sign")]
    AnonymousSign,

    /// Bytes returned by the callee do not form a principal.
    #[error("invalid principal: {0}")]
    Principal(#[from] PrincipalError),

    /// An input cannot be handed to the callee.
    #[error("invalid input to {operation}: {reason}")]
    InvalidInput {
        operation: &'static str,
        reason: String,
    },

    /// [`Capacities::install`](crate::Capacities::install) ran after the
    /// process-wide capacities were already fixed.
    #[error("capacities already installed")]
    CapacitiesInstalled,
}

impl Error {
    /// Whether the same call can succeed with larger capacities.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataOverflow { .. })
    }
}

/// Result type for caller operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_overflow_is_recoverable() {
        let overflow = Error::DataOverflow {
            operation: "principal_anonymous",
            output: "identifier",
        };
        assert!(overflow.is_recoverable());

        let internal = Error::Internal {
            operation: "principal_from_text",
            message: "text is too short to carry a checksum".into(),
        };
        assert!(!internal.is_recoverable());
        assert!(!Error::ErrInfoOverflow {
            operation: "principal_from_bytes"
        }
        .is_recoverable());
        assert!(!Error::AnonymousSign.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = Error::Internal {
            operation: "principal_from_bytes",
            message: "principal is 30 bytes long, the maximum is 29".into(),
        };
        assert_eq!(
            err.to_string(),
            "principal_from_bytes failed: principal is 30 bytes long, the maximum is 29"
        );
    }
}
