use thiserror::Error;

/// Common error types used across the application.
///
/// Only `Config` is fatal for a run. Fetch errors are recovered by the
/// monitor (treated as "no items found") and delivery errors are recovered
/// per item by the dispatcher.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Whether this error must fail the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(AppError::Config("missing token".into()).is_fatal());
        assert!(!AppError::UpstreamFetch("502".into()).is_fatal());
        assert!(!AppError::Delivery("channel_not_found".into()).is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::Config("INPUT_GIT_SECRET is required".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: INPUT_GIT_SECRET is required"
        );
    }
}
