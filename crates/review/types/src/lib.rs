//! Domain types for the legal review request lifecycle
//!
//! A [`ReviewRequest`] moves through intake, attorney assignment, parallel
//! legal/compliance review, closeout, and a post-closeout documents phase,
//! with side paths to hold and cancellation. This crate owns the aggregate,
//! its status machines, the approvals collection, and the stage timers.
//!
//! Transition logic (guards, validators, time accounting) lives in
//! `review-engine`; persistence lives in `review-store`.

#![deny(unsafe_code)]

pub mod actions;
pub mod approval;
pub mod errors;
pub mod principal;
pub mod request;
pub mod review;
pub mod timers;

pub use actions::{
    CloseoutPayload, ComplianceReviewPayload, DraftFields, EditPayload, LegalReviewPayload,
    ReviewTarget, TransitionAction, TransitionKind,
};
pub use approval::{Approval, ApprovalId, ApprovalKind};
pub use errors::{DomainError, DomainResult};
pub use principal::{groups, Principal, PrincipalId, RoleFlags};
pub use request::{
    CancelRecord, HoldRecord, RequestId, RequestStatus, ReviewAudience, ReviewRequest,
};
pub use review::{
    ComplianceReview, ComplianceReviewOutcome, ComplianceReviewStatus, LegalReview,
    LegalReviewOutcome, LegalReviewStatus, NoteEntry,
};
pub use timers::{Stage, StageOwner, StageTimers, StageWindow};
