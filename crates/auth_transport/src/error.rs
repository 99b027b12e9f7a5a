use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum TransportError {
    InvalidBaseUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    /// The session could not be restored: the refresh call failed or returned
    /// no credential. The caller has already been logged out.
    SessionExpired(String),
    Serde(JsonError),
}

impl TransportError {
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// HTTP status carried by this error, when one exists.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status, _) => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidHeader(value) => write!(f, "invalid header: {value}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::SessionExpired(message) => write!(f, "session expired: {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for TransportError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<ErrorPayloadFields>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
}

/// Extract a displayable message from an error response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        let nested = payload.error.and_then(|fields| fields.message);
        if let Some(message) = nested.or(payload.message).filter(|value| !value.trim().is_empty()) {
            return message;
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::parse_error_message;

    #[test]
    fn error_message_prefers_nested_error_object() {
        let message =
            parse_error_message(StatusCode::FORBIDDEN, r#"{"error":{"message":"no access"}}"#);
        assert_eq!(message, "no access");
    }

    #[test]
    fn error_message_accepts_flat_message_field() {
        let message = parse_error_message(StatusCode::BAD_REQUEST, r#"{"message":"bad input"}"#);
        assert_eq!(message, "bad input");
    }

    #[test]
    fn error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, ""),
            "Bad Gateway"
        );
    }
}
