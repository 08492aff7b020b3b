//! Core error types.

use thiserror::Error;

/// Errors from the conversion engine.
#[derive(Debug, Error)]
pub enum KleeneError {
    #[error("invalid regular expression '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("invalid automaton: {reason}")]
    InvariantViolation { reason: String },

    #[error("cannot eliminate the {role} state '{state}'")]
    IllegalElimination { state: String, role: &'static str },

    #[error("state not found: {state}")]
    UnknownState { state: String },

    #[error("subset construction exceeded {limit} states")]
    StateLimitExceeded { limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl KleeneError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        KleeneError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        KleeneError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Returns a stable error code suitable for scripting.
    pub fn error_code(&self) -> &'static str {
        match self {
            KleeneError::Parse { .. } => "PARSE_ERROR",
            KleeneError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            KleeneError::IllegalElimination { .. } => "ILLEGAL_ELIMINATION",
            KleeneError::UnknownState { .. } => "UNKNOWN_STATE",
            KleeneError::StateLimitExceeded { .. } => "STATE_LIMIT_EXCEEDED",
            KleeneError::Json(_) => "BAD_DEFINITION",
            KleeneError::Yaml(_) => "BAD_DEFINITION",
        }
    }
}
