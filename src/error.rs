use std::fmt;
use thiserror::Error;

/// Short classifier attached to every [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No response was received: connection refused, DNS failure, timeout.
    Network,
    /// The server answered with an error status.
    Http(u16),
    /// Anything else, e.g. a response body that does not decode.
    Unknown,
}

impl ErrorCode {
    pub const NOT_FOUND: Self = Self::Http(404);
    pub const BAD_REQUEST: Self = Self::Http(400);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Network => f.write_str("NETWORK_ERROR"),
            ErrorCode::Http(status) => write!(f, "{}", status),
            ErrorCode::Unknown => f.write_str("UNKNOWN_ERROR"),
        }
    }
}

/// The one error shape callers of the gateway ever observe.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} ({code})")]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
    /// Diagnostic payload, usually the server's error body.
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NOT_FOUND, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors raised outside the gateway funnel.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Network.to_string(), "NETWORK_ERROR");
        assert_eq!(ErrorCode::Http(503).to_string(), "503");
        assert_eq!(ErrorCode::NOT_FOUND.to_string(), "404");
        assert_eq!(ErrorCode::Unknown.to_string(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = ApiError::not_found("Transaction not found");
        assert_eq!(err.to_string(), "Transaction not found (404)");
        assert!(err.details.is_none());
    }
}
