//! The transition engine
//!
//! Single entry point for every workflow mutation. An invocation resolves
//! the caller's roles against the record, runs the transition's guard,
//! validates the payload, applies the mutation to a working copy, and saves
//! through the record store. A denied guard or a failed validation returns
//! before any mutation, so the caller's record is never half-transitioned.

use crate::approvals::{self, AttachmentLookup};
use crate::business_time::{close_window, flip_window, HolidayCalendar};
use crate::errors::{EngineError, EngineResult, Violation};
use crate::{guards, roles, validators};
use chrono::{DateTime, NaiveDate, Utc};
use review_store::RecordStore;
use review_types::{
    ComplianceReview, DraftFields, LegalReview, NoteEntry, Principal, PrincipalId, RequestStatus,
    ReviewRequest, ReviewTarget, Stage, StageOwner, TransitionAction, TransitionKind,
};

// ── Notifications ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Outbound notification seam. The engine reports every transition outcome
/// here; delivery (email, webhook, nothing) is the sink's business.
pub trait NotificationSink {
    fn notify(
        &self,
        request: &ReviewRequest,
        transition: TransitionKind,
        severity: Severity,
        message: &str,
    );
}

/// Default sink: structured log records, no external delivery
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(
        &self,
        request: &ReviewRequest,
        transition: TransitionKind,
        severity: Severity,
        message: &str,
    ) {
        match severity {
            Severity::Info => tracing::info!(
                request = %request.code,
                transition = %transition,
                status = %request.status,
                message,
            ),
            Severity::Warning => tracing::warn!(
                request = %request.code,
                transition = %transition,
                status = %request.status,
                message,
            ),
            Severity::Error => tracing::error!(
                request = %request.code,
                transition = %transition,
                status = %request.status,
                message,
            ),
        }
    }
}

// ── Engine ───────────────────────────────────────────────────────────

/// Orchestrates guard, validation, mutation, and persistence for every
/// workflow transition
pub struct TransitionEngine<S, A, N = TracingSink> {
    store: S,
    attachments: A,
    notifier: N,
    calendar: HolidayCalendar,
}

impl<S, A> TransitionEngine<S, A, TracingSink>
where
    S: RecordStore,
    A: AttachmentLookup,
{
    pub fn new(store: S, attachments: A) -> Self {
        Self {
            store,
            attachments,
            notifier: TracingSink,
            calendar: HolidayCalendar::empty(),
        }
    }
}

impl<S, A, N> TransitionEngine<S, A, N>
where
    S: RecordStore,
    A: AttachmentLookup,
    N: NotificationSink,
{
    pub fn with_notifier<N2: NotificationSink>(self, notifier: N2) -> TransitionEngine<S, A, N2> {
        TransitionEngine {
            store: self.store,
            attachments: self.attachments,
            notifier,
            calendar: self.calendar,
        }
    }

    pub fn with_calendar(mut self, calendar: HolidayCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn attachments_mut(&mut self) -> &mut A {
        &mut self.attachments
    }

    /// Attempt a transition at the current wall-clock time
    pub fn invoke(
        &mut self,
        request: &ReviewRequest,
        principal: &Principal,
        action: TransitionAction,
    ) -> EngineResult<ReviewRequest> {
        self.invoke_at(request, principal, action, Utc::now())
    }

    /// Attempt a transition at an explicit timestamp.
    ///
    /// On success the returned record carries the store's bumped revision;
    /// the caller's copy is untouched on every failure path.
    pub fn invoke_at(
        &mut self,
        request: &ReviewRequest,
        principal: &Principal,
        action: TransitionAction,
        now: DateTime<Utc>,
    ) -> EngineResult<ReviewRequest> {
        let kind = action.kind();
        let flags = roles::resolve_roles(principal, request);

        let target = match &action {
            TransitionAction::Resubmit { target, .. } => Some(*target),
            _ => None,
        };
        let decision = guards::check(kind, request, &flags, &principal.id, target);
        if !decision.allowed {
            let reason = decision.reason().to_string();
            self.notifier
                .notify(request, kind, Severity::Warning, &reason);
            return Err(EngineError::GuardDenied {
                transition: kind,
                reason,
            });
        }

        let violations = self.validate(request, &action, now.date_naive());
        if !violations.is_empty() {
            self.notifier.notify(
                request,
                kind,
                Severity::Warning,
                &format!("{} validation violation(s)", violations.len()),
            );
            return Err(EngineError::ValidationFailed(violations));
        }

        let mut next = request.clone();
        self.apply(&mut next, principal, &action, now)?;
        next.touch();

        let saved = match self.store.save(&next) {
            Ok(saved) => saved,
            Err(err) => {
                self.notifier
                    .notify(request, kind, Severity::Error, &err.to_string());
                return Err(EngineError::Persistence(err));
            }
        };

        self.notifier
            .notify(&saved, kind, Severity::Info, "transition applied");
        Ok(saved)
    }

    // ── Validation ───────────────────────────────────────────────────

    fn validate(
        &self,
        request: &ReviewRequest,
        action: &TransitionAction,
        today: NaiveDate,
    ) -> Vec<Violation> {
        match action {
            TransitionAction::Submit(fields) => {
                let mut violations = validators::validate_submit(fields, today);
                // Approval rules see the form flags as they will be after
                // the fields are applied
                let mut preview = request.clone();
                apply_draft_fields(&mut preview, fields);
                violations.extend(approvals::evaluate_approvals(
                    &preview,
                    &self.attachments,
                    today,
                ));
                violations
            }
            TransitionAction::SubmitComplianceReview(payload) => {
                validators::validate_compliance_review(payload)
            }
            TransitionAction::Closeout(payload) => {
                validators::validate_closeout(payload, request.requires_foreside_documents())
            }
            TransitionAction::ConfirmForesideDocuments { confirmation } => {
                validators::validate_confirmation(confirmation)
            }
            TransitionAction::Cancel { reason } | TransitionAction::Hold { reason } => {
                validators::validate_reason("reason", reason)
            }
            TransitionAction::Edit(payload) => validators::validate_edit(payload),
            _ => Vec::new(),
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    fn apply(
        &self,
        next: &mut ReviewRequest,
        principal: &Principal,
        action: &TransitionAction,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        match action {
            TransitionAction::SaveDraft(fields) => {
                apply_draft_fields(next, fields);
            }

            TransitionAction::Submit(fields) => {
                apply_draft_fields(next, fields);
                next.submitter = Some(principal.id.clone());
                next.submitted_at = Some(now);
                next.status = RequestStatus::LegalIntake;
                next.timers
                    .window_mut(Stage::LegalIntake)
                    .open(StageOwner::Reviewer, now);
            }

            TransitionAction::AssignAttorney { attorney }
            | TransitionAction::CommitteeAssignAttorney { attorney } => {
                self.begin_reviews(next, attorney.clone(), now);
            }

            TransitionAction::SendToCommittee => {
                // Intake keeps accruing to the reviewing side while the
                // committee deliberates
                next.status = RequestStatus::AssignAttorney;
            }

            TransitionAction::SubmitLegalReview(payload) => {
                let review = next
                    .legal_review
                    .as_mut()
                    .ok_or_else(|| EngineError::StateInconsistent("legal review not started".into()))?;
                if let Some(text) = non_blank(payload.notes.as_deref()) {
                    review.append_note(note(principal, text, now));
                }
                review.record_outcome(payload.outcome);

                let window = next.timers.window_mut(Stage::LegalReview);
                if payload.outcome.is_terminal() {
                    close_window(&self.calendar, window, now);
                } else {
                    flip_window(&self.calendar, window, StageOwner::Submitter, now);
                }
                self.maybe_enter_closeout(next, now);
            }

            TransitionAction::SubmitComplianceReview(payload) => {
                let review = next.compliance_review.as_mut().ok_or_else(|| {
                    EngineError::StateInconsistent("compliance review not started".into())
                })?;
                if let Some(text) = non_blank(payload.notes.as_deref()) {
                    review.append_note(note(principal, text, now));
                }
                review.is_foreside_review_required = payload.is_foreside_review_required;
                review.is_retail_use = payload.is_retail_use;
                review.record_outcome(payload.outcome);

                let window = next.timers.window_mut(Stage::ComplianceReview);
                if payload.outcome.is_terminal() {
                    close_window(&self.calendar, window, now);
                } else {
                    flip_window(&self.calendar, window, StageOwner::Submitter, now);
                }
                self.maybe_enter_closeout(next, now);
            }

            TransitionAction::Resubmit { target, notes } => match target {
                ReviewTarget::Legal => {
                    let review = next.legal_review.as_mut().ok_or_else(|| {
                        EngineError::StateInconsistent("legal review not started".into())
                    })?;
                    if let Some(text) = non_blank(notes.as_deref()) {
                        review.append_note(note(principal, text, now));
                    }
                    review.resubmit();
                    flip_window(
                        &self.calendar,
                        next.timers.window_mut(Stage::LegalReview),
                        StageOwner::Reviewer,
                        now,
                    );
                }
                ReviewTarget::Compliance => {
                    let review = next.compliance_review.as_mut().ok_or_else(|| {
                        EngineError::StateInconsistent("compliance review not started".into())
                    })?;
                    if let Some(text) = non_blank(notes.as_deref()) {
                        review.append_note(note(principal, text, now));
                    }
                    review.resubmit();
                    flip_window(
                        &self.calendar,
                        next.timers.window_mut(Stage::ComplianceReview),
                        StageOwner::Reviewer,
                        now,
                    );
                }
            },

            TransitionAction::Closeout(payload) => {
                next.tracking_id = non_blank(payload.tracking_id.as_deref()).map(str::to_string);
                close_window(&self.calendar, next.timers.window_mut(Stage::Closeout), now);
                if next.requires_foreside_documents() {
                    next.status = RequestStatus::AwaitingForesideDocuments;
                } else {
                    next.status = RequestStatus::Completed;
                    next.completed_at = Some(now);
                }
            }

            TransitionAction::ConfirmForesideDocuments { confirmation } => {
                next.foreside_confirmation = Some(confirmation.clone());
                next.status = RequestStatus::Completed;
                next.completed_at = Some(now);
            }

            TransitionAction::Cancel { reason } => {
                next.cancel(principal.id.clone(), reason.clone(), now);
                for stage in next.timers.open_stages() {
                    close_window(&self.calendar, next.timers.window_mut(stage), now);
                }
            }

            // Open stage windows are deliberately left running across a
            // hold: held time accrues to whoever owned the stage
            TransitionAction::Hold { reason } => {
                next.hold(principal.id.clone(), reason.clone(), now);
            }

            TransitionAction::Resume => {
                next.resume()
                    .map_err(|err| EngineError::StateInconsistent(err.to_string()))?;
            }

            TransitionAction::Edit(payload) => {
                if let Some(title) = &payload.title {
                    next.title = title.clone();
                }
                if let Some(purpose) = &payload.purpose {
                    next.purpose = purpose.clone();
                }
                if let Some(method) = &payload.distribution_method {
                    next.distribution_method = method.clone();
                }
                if let Some(date) = payload.target_return_date {
                    next.target_return_date = Some(date);
                }
                if let Some(rationale) = &payload.rush_rationale {
                    next.rush_rationale = rationale.clone();
                }
                if let Some(attachments) = &payload.attachments {
                    next.attachments = attachments.clone();
                }
            }
        }
        Ok(())
    }

    /// Close intake, wire up the review sub-workflows the audience selects,
    /// and move the request into review
    fn begin_reviews(&self, next: &mut ReviewRequest, attorney: PrincipalId, now: DateTime<Utc>) {
        close_window(
            &self.calendar,
            next.timers.window_mut(Stage::LegalIntake),
            now,
        );
        next.assigned_attorney = Some(attorney.clone());

        if next.audience.includes_legal() {
            next.legal_review
                .get_or_insert_with(LegalReview::new)
                .begin(attorney);
            next.timers
                .window_mut(Stage::LegalReview)
                .open(StageOwner::Reviewer, now);
        }
        if next.audience.includes_compliance() {
            next.compliance_review
                .get_or_insert_with(ComplianceReview::new)
                .begin();
            next.timers
                .window_mut(Stage::ComplianceReview)
                .open(StageOwner::Reviewer, now);
        }
        next.status = RequestStatus::InReview;
    }

    /// When the last active review completes, the request advances to
    /// closeout and its window opens for the submitter
    fn maybe_enter_closeout(&self, next: &mut ReviewRequest, now: DateTime<Utc>) {
        if next.status == RequestStatus::InReview && next.active_reviews_completed() {
            next.status = RequestStatus::Closeout;
            next.timers
                .window_mut(Stage::Closeout)
                .open(StageOwner::Submitter, now);
        }
    }
}

fn apply_draft_fields(next: &mut ReviewRequest, fields: &DraftFields) {
    next.title = fields.title.clone();
    next.purpose = fields.purpose.clone();
    next.distribution_method = fields.distribution_method.clone();
    next.target_return_date = fields.target_return_date;
    next.is_rush_request = fields.is_rush_request;
    next.rush_rationale = fields.rush_rationale.clone();
    next.requires_communications_approval = fields.requires_communications_approval;
    next.communications_only = fields.communications_only;
    next.attachments = fields.attachments.clone();
    if let Some(audience) = fields.audience {
        next.audience = audience;
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn note(principal: &Principal, text: &str, now: DateTime<Utc>) -> NoteEntry {
    NoteEntry {
        author: principal.id.clone(),
        recorded_at: now,
        text: text.to_string(),
    }
}
