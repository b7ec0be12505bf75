//! Scope error types

use thiserror::Error;

use crate::scope::ScopeLevel;

/// Errors that can occur while encoding scopes or fetching the menu
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Cannot encode a scope at level {0}")]
    UnknownLevel(ScopeLevel),

    #[error("Missing {segment} identifier for {level} scope")]
    MissingSegment { level: ScopeLevel, segment: &'static str },

    #[error("Invalid scope segment {0:?}: must be non-empty and must not contain '/'")]
    InvalidSegment(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScopeError {
    /// Check if this error came from talking to the menu backend
    pub fn is_network(&self) -> bool {
        matches!(self, ScopeError::Network(_) | ScopeError::Api { .. })
    }

    /// Check if this error was caused by caller-supplied scope identifiers
    pub fn is_invalid_input(&self) -> bool {
        match self {
            ScopeError::UnknownLevel(_) => true,
            ScopeError::MissingSegment { .. } => true,
            ScopeError::InvalidSegment(_) => true,
            ScopeError::Network(_) => false,
            ScopeError::Api { .. } => false,
            ScopeError::InvalidResponse(_) => false,
            ScopeError::Json(_) => false,
            ScopeError::Io(_) => false,
        }
    }
}
