//! Error types for dmbridge.

use thiserror::Error;

/// Common error type for dmbridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A remote API answered with a non-success status.
    ///
    /// The message is the upstream response body, carried through unchanged.
    #[error("{message}")]
    Api {
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body.
        message: String,
    },

    /// Transport-level HTTP failure (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A platform reference could not be parsed.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Missing or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input or remote payloads.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Upstream status code, if this error came from a remote API response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            BridgeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BridgeError::NotFound(_)) || self.upstream_status() == Some(404)
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::Http(e.to_string())
    }
}

/// Result type alias for dmbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_upstream_message() {
        let err = BridgeError::Api {
            status: 409,
            message: "Item with the same name already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Item with the same name already exists");
        assert_eq!(err.upstream_status(), Some(409));
    }

    #[test]
    fn test_invalid_reference_display() {
        let err = BridgeError::InvalidReference("empty storage id".to_string());
        assert_eq!(err.to_string(), "invalid reference: empty storage id");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BridgeError::NotFound("version".to_string());
        assert_eq!(err.to_string(), "version not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_api_404_is_not_found() {
        let err = BridgeError::Api {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(err.is_not_found());

        let err = BridgeError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BridgeError = io_err.into();
        assert!(matches!(err, BridgeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BridgeError::Unauthorized("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
