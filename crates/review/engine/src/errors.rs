//! Transition failure taxonomy
//!
//! Guard denial and validation failure are structured results returned to
//! the caller, never panics. Persistence failure surfaces the store's
//! message without interpreting it. State inconsistency is a programming or
//! data error, not something the user can correct.

use review_store::StoreError;
use review_types::TransitionKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// One field-level validation violation. Failures are always returned as a
/// complete list so a form layer can attach each message to its field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// Role/state mismatch; the reason is surfaced verbatim to the caller
    #[error("{transition} denied: {reason}")]
    GuardDenied {
        transition: TransitionKind,
        reason: String,
    },

    /// One or more field-level violations, never truncated to the first
    #[error("validation failed ({} violation(s))", .0.len())]
    ValidationFailed(Vec<Violation>),

    /// The save collaborator reported an error; the in-memory record is
    /// left in its last-known-persisted shape
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// An invariant the engine assumes did not hold
    #[error("inconsistent record state: {0}")]
    StateInconsistent(String),
}

impl EngineError {
    /// The violation list, when this is a validation failure
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::ValidationFailed(v) => Some(v),
            _ => None,
        }
    }
}
