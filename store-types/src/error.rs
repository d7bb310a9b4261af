//! Error classification for collaborator failures.
//!
//! Every feature maps a failed collaborator call to the same fixed taxonomy,
//! keyed by the response status. Only the resulting display string travels
//! any further (into a failure action and from there into state).

use std::fmt;
use thiserror::Error;

/// Fallback message when a failure carries neither a known status nor text.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Classified collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// HTTP 400.
    InvalidRequest,
    /// HTTP 401. Re-authentication is handled outside the store.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 409.
    Conflict,
    /// HTTP 500.
    ServerError,
    /// Any other status, or a failure with no status at all.
    Unknown,
}

impl ErrorClass {
    /// Classify a response status. `None` means the call never produced one
    /// (transport failure, decode failure).
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400) => Self::InvalidRequest,
            Some(401) => Self::Unauthorized,
            Some(403) => Self::Forbidden,
            Some(404) => Self::NotFound,
            Some(409) => Self::Conflict,
            Some(500) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// The fixed user-facing message for this class, if it has one.
    ///
    /// `Unknown` has no fixed message: the raw failure text is shown instead.
    pub fn fixed_message(self) -> Option<&'static str> {
        match self {
            Self::InvalidRequest => Some("Bad request. Please check your data."),
            Self::Unauthorized => Some("Unauthorized. Please login again."),
            Self::Forbidden => Some("Forbidden. You do not have permission."),
            Self::NotFound => Some("Resource not found."),
            Self::Conflict => Some("Conflict. Resource already exists."),
            Self::ServerError => Some("Internal server error. Please try again later."),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::ServerError => "server error",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Turn a failure into the display string carried by a failure action.
pub fn failure_message(status: Option<u16>, raw: &str) -> String {
    match ErrorClass::from_status(status).fixed_message() {
        Some(fixed) => fixed.to_string(),
        None if raw.trim().is_empty() => UNEXPECTED_ERROR.to_string(),
        None => raw.to_string(),
    }
}

/// A string did not name a known variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field}: {value}")]
pub struct ParseEnumError {
    /// Which field was being parsed.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
}
