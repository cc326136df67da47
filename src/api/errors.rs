use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::constants::SESSION_EXPIRED_MESSAGE;

/// Failure of a single backend call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response at all (DNS, refused connection, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx answer other than 401
    #[error("{}", server_display(.status, .message))]
    Server { status: u16, message: Option<String> },

    /// 401: the stored token is missing, expired or revoked
    #[error("{}", unauthorized_display(.message))]
    Unauthorized { message: Option<String> },

    /// 2xx answer whose body did not match the expected schema
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

fn server_display(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status {}", status),
    }
}

fn unauthorized_display(message: &Option<String>) -> String {
    message
        .clone()
        .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string())
}

impl ApiError {
    /// Build the error for a non-success status and its raw body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_server_message(body);
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { message }
        } else {
            Self::Server {
                status: status.as_u16(),
                message,
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Text to show inline on a page: the server's own words when it gave
    /// any, otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Unauthorized { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UnexpectedShape(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::UnexpectedShape(err.to_string())
    }
}

/// Pull a human-readable message out of an error body
///
/// Looks at `error`, `detail` and `message` first, then falls back to the
/// first field of a validation-error object (`{"email": ["already taken"]}`).
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["error", "detail", "message"] {
        if let Some(text) = object.get(key).and_then(first_text) {
            return Some(text);
        }
    }

    object.values().find_map(first_text)
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
