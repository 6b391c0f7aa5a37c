//! Error types for the NS1 provider
//!
//! This module defines all error types used throughout the workspace, and the
//! adapter that normalizes client failures into a single API error shape.

use std::fmt;

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Metadata of the HTTP response an API error was produced from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// HTTP method of the originating request
    pub method: String,
    /// Full URL of the originating request
    pub url: String,
}

impl ApiResponse {
    /// Create response metadata
    pub fn new(status: u16, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            method: method.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.method, self.url, self.status)
    }
}

/// An error reported by the NS1 API, carrying the response it came with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The response the error was read from
    pub response: ApiResponse,
    /// Message from the API body, or the local failure description
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.response, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Core error type for the NS1 provider
#[derive(Error, Debug)]
pub enum Error {
    /// Error response from the NS1 API
    #[error("NS1 API error: {0}")]
    Api(ApiError),

    /// The requested object does not exist remotely
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more local validation failures, reported together
    #[error("{}", format_validation(.errors))]
    Validation {
        /// Field-scoped failure messages
        errors: Vec<String>,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation the API or resource does not support
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Transport failures where no response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

fn format_validation(errors: &[String]) -> String {
    match errors {
        [single] => single.clone(),
        _ => format!(
            "{} validation errors occurred: {}",
            errors.len(),
            errors.join("; ")
        ),
    }
}

impl Error {
    /// Create an API error from response metadata
    pub fn api(response: ApiResponse, message: impl Into<String>) -> Self {
        Self::Api(ApiError {
            response,
            message: message.into(),
        })
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error with a single message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![msg.into()],
        }
    }

    /// Create a validation error from collected messages
    ///
    /// Returns `Ok(())` when nothing was collected.
    pub fn from_validation(errors: Vec<String>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation { errors })
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error is the not-found signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error already has the API error shape
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api(_) | Self::NotFound(_))
    }

    /// Validation messages carried by this error, if any
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Self::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Normalize a client outcome into the API error shape
///
/// - No response: the outcome passes through untouched (transport failures).
/// - Success: passes through.
/// - Already an API error: passes through, never wrapped twice.
/// - Anything else with a response: wrapped into [`Error::Api`] carrying the
///   response and the original message.
pub fn convert_to_ns1_error<T>(response: Option<&ApiResponse>, result: Result<T>) -> Result<T> {
    let Some(response) = response else {
        return result;
    };

    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_api_error() => Err(err),
        Err(err) => Err(Error::api(response.clone(), err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> ApiResponse {
        ApiResponse::new(500, "GET", "https://api.nsone.net/v1/zones/example.io")
    }

    #[test]
    fn test_no_response_passes_error_through() {
        let result: Result<()> = convert_to_ns1_error(None, Err(Error::http("connection reset")));

        match result {
            Err(Error::Http(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_response_without_error_is_ok() {
        let result = convert_to_ns1_error(Some(&response()), Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_response_with_plain_error_is_wrapped() {
        let result: Result<()> =
            convert_to_ns1_error(Some(&response()), Err(Error::Other("bad body".to_string())));

        match result {
            Err(Error::Api(api)) => {
                assert_eq!(api.response, response());
                assert_eq!(api.message, "bad body");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_is_not_wrapped_twice() {
        let original = Error::api(
            ApiResponse::new(400, "PUT", "https://api.nsone.net/v1/zones/x"),
            "invalid zone",
        );
        let result: Result<()> = convert_to_ns1_error(Some(&response()), Err(original));

        match result {
            Err(Error::Api(api)) => {
                assert_eq!(api.response.status, 400);
                assert_eq!(api.message, "invalid zone");
            }
            other => panic!("expected original Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_is_not_wrapped() {
        let result: Result<()> =
            convert_to_ns1_error(Some(&response()), Err(Error::not_found("zone not found")));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_validation_display_aggregates() {
        let single = Error::validation("zone: required");
        assert_eq!(single.to_string(), "zone: required");

        let many = Error::Validation {
            errors: vec!["a: bad".to_string(), "b: bad".to_string()],
        };
        assert_eq!(many.to_string(), "2 validation errors occurred: a: bad; b: bad");
    }

    #[test]
    fn test_from_validation_empty_is_ok() {
        assert!(Error::from_validation(Vec::new()).is_ok());
        assert!(Error::from_validation(vec!["x".to_string()]).is_err());
    }
}
