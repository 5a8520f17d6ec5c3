//! Domain invariant errors
//!
//! These cover violations of aggregate invariants (duplicate approval slots,
//! resuming a request that is not on hold). Transition-level failures
//! (guard denial, validation) have their own taxonomy in `review-engine`.

use crate::ApprovalId;
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("an approval of type '{0}' is already attached")]
    DuplicateApprovalKind(String),

    #[error("approval '{0}' not found")]
    ApprovalNotFound(ApprovalId),

    #[error("request is not on hold")]
    NotOnHold,
}
