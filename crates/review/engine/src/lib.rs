//! Transition engine for legal review requests
//!
//! Drives every workflow mutation through one pipeline: resolve the
//! caller's roles against the record, run the transition's guard, validate
//! the payload, apply the mutation to a working copy, and persist through
//! the record store. Nothing mutates on a denied guard or a failed
//! validation, and a persistence failure leaves the caller's record in its
//! last-known-persisted shape.
//!
//! Elapsed stage time is charged in business minutes (09:00-17:00 UTC,
//! weekdays, minus calendar holidays) to whichever side of the desk owned
//! the stage, with a calendar-minute fallback for intervals that fall
//! entirely outside the business window.

#![deny(unsafe_code)]

pub mod approvals;
pub mod business_time;
pub mod engine;
pub mod errors;
pub mod guards;
pub mod roles;
pub mod validators;

pub use approvals::{evaluate_approvals, AttachmentLookup, MemoryAttachments};
pub use business_time::{
    business_minutes_between, elapsed_stage_minutes, HolidayCalendar, BUSINESS_DAY_END,
    BUSINESS_DAY_START,
};
pub use engine::{NotificationSink, Severity, TracingSink, TransitionEngine};
pub use errors::{EngineError, EngineResult, Violation};
pub use guards::GuardDecision;
pub use roles::resolve_roles;
