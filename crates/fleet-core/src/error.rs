use thiserror::Error;

use crate::status::{classify_status, ErrorDisposition};

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider is not ready yet")]
    ProviderNotReady,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FleetError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// How the sync layer should react to this error.
    ///
    /// Cancellation has no disposition: it is an outcome, not a failure, and
    /// callers must check [`FleetError::is_cancelled`] before asking.
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::Http { status, .. } => classify_status(*status),
            Self::Network(_) | Self::ProviderNotReady => ErrorDisposition::Retry,
            Self::Cancelled
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_) => ErrorDisposition::Report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_empty_result() {
        let err = FleetError::http(403, "forbidden");
        assert_eq!(err.disposition(), ErrorDisposition::EmptyResult);
    }

    #[test]
    fn test_network_and_not_ready_are_retryable() {
        assert_eq!(
            FleetError::Network("reset".into()).disposition(),
            ErrorDisposition::Retry
        );
        assert_eq!(
            FleetError::ProviderNotReady.disposition(),
            ErrorDisposition::Retry
        );
    }

    #[test]
    fn test_display_includes_status() {
        let err = FleetError::http(502, "bad gateway");
        assert_eq!(err.to_string(), "HTTP error 502: bad gateway");
    }
}
