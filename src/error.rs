//! Error types surfaced by the client.

use thiserror::Error;

/// Local document validation failure. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Connection-level failure reported by a transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid request: {0}")]
    Request(String),
    #[error("transport error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AtolError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("token acquisition failed: code={code}, error_id={error_id}, text={text}")]
    Auth {
        error_id: String,
        code: i64,
        text: String,
    },

    #[error("request rejected: code={code}, error_id={error_id}, text={text}")]
    Client {
        error_id: String,
        code: i64,
        text: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response (http {status}): {reason}")]
    Decode { status: u16, reason: String },
}

pub type Result<T> = std::result::Result<T, AtolError>;

impl AtolError {
    /// Short label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AtolError::Validation(_) => "validation",
            AtolError::Auth { .. } => "auth",
            AtolError::Client { .. } => "client",
            AtolError::Transport(_) => "transport",
            AtolError::Decode { .. } => "decode",
        }
    }
}
