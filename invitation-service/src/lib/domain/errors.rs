use thiserror::Error;

/// Transient storage failure.
///
/// Raised by outbound adapters once their own retry is exhausted. It never
/// encodes a domain decision: a timeout while recording a response is
/// reported as this error, not as any attendance status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfrastructureError {
    #[error("Storage operation `{operation}` timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Storage operation `{operation}` failed: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
}

impl InfrastructureError {
    pub const KIND: &'static str = "INFRASTRUCTURE";
}
