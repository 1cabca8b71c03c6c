//! Error types for the Engagerr SDK.

use engagerr_domain::RelationshipViolation;
use thiserror::Error;

/// Message shown when the server gives no reason for a failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Server-provided message, if any
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SdkError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the API answered 409
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Message to show a person: the server's reason when it sent one,
    /// otherwise a generic fallback
    pub fn user_message(&self) -> String {
        match self {
            SdkError::ApiError {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            SdkError::InvalidRequest(message) => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SdkError::DecodeError(e.to_string())
        } else if e.is_timeout() {
            SdkError::ConnectionError("Request timeout".to_string())
        } else if e.is_status() {
            SdkError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(500),
                message: None,
            }
        } else if e.is_builder() {
            SdkError::InvalidRequest(e.to_string())
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::DecodeError(format!("JSON parsing error: {}", e))
    }
}

impl From<RelationshipViolation> for SdkError {
    fn from(v: RelationshipViolation) -> Self {
        SdkError::InvalidRequest(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = SdkError::ApiError {
            status: 409,
            message: Some("Relationship already exists".to_string()),
        };
        assert_eq!(err.user_message(), "Relationship already exists");
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = SdkError::ApiError {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(err.to_string(), "HTTP 500: request failed");

        let err = SdkError::ConnectionError("connection refused".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_violation_becomes_invalid_request() {
        let err = SdkError::from(RelationshipViolation::SelfReference("c1".to_string()));
        assert!(matches!(err, SdkError::InvalidRequest(_)));
        assert_eq!(err.user_message(), "Content c1 cannot be related to itself");
    }
}
