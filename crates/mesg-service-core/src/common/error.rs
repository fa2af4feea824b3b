//! Error types for MESG services.
//!
//! This module defines the central `Error` enum, which captures every failure
//! a service can observe while talking to the core daemon, from bad
//! configuration at startup to a single malformed task payload.
//!
//! ## Error Cases
//! - `Config`: Endpoint or token missing. Reported before any dial.
//! - `Transport`: The gRPC channel could not be established.
//! - `Timeout`: An outbound call or the dial exceeded its time budget.
//! - `Rpc`: The daemon answered a call with a non-OK status.
//! - `AlreadyConfigured`: Tasks were registered a second time.
//! - `NoTasks`: Registration was attempted with an empty task list.
//! - `ClosedConnection`: The task stream ended or the service was closed.
//! - `Decode` / `Encode`: JSON payload (de)serialization failed.
//! - `ChannelError`: An in-process channel was closed or full.

use core::time::Duration;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for MESG services.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required setting was not provided.
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Dialing the daemon failed.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The operation did not complete within its budget.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The daemon rejected a call.
    #[error("RPC error: {0}")]
    Rpc(#[from] tonic::Status),

    /// The task registry has already been populated.
    #[error("Tasks already set")]
    AlreadyConfigured,

    /// Registration requires at least one task.
    #[error("At least one task is required")]
    NoTasks,

    /// The task stream is gone, either closed by the daemon or by the local
    /// side shutting down.
    #[error("Closed connection")]
    ClosedConnection,

    /// A payload could not be deserialized.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A payload could not be serialized.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Internal channel send/receive failure (e.g., closed or full channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },
}

impl Error {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error means the task stream is gone.
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedConnection)
    }
}

/// Builds a [`Error::Config`] for a missing or empty setting.
pub fn missing(setting: &str) -> Error {
    Error::config(format!("{setting} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_setting_message() {
        assert_eq!(
            missing("endpoint").to_string(),
            "Configuration error: endpoint is not set"
        );
    }

    #[test]
    fn timeout_message_names_operation() {
        let err = Error::Timeout {
            operation: "SubmitResult",
            timeout: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "SubmitResult timed out after 10s");
        assert!(!err.is_closed());
        assert!(Error::ClosedConnection.is_closed());
    }
}
