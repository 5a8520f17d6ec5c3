//! Transition guards
//!
//! One guard per transition: a pure function of (record state, role flags,
//! current-user identity) returning allow/deny plus a human-readable reason.
//! A denied guard never mutates state. Guards are re-evaluated on every
//! invocation — role membership and record state can both change between
//! renders, so there is no cached can-do snapshot.

use review_types::{
    PrincipalId, RequestStatus, ReviewRequest, ReviewTarget, RoleFlags, TransitionKind,
};

/// The verdict of a guard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl GuardDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    /// The denial reason, or a generic fallback for malformed decisions
    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("not permitted")
    }
}

/// Evaluate the guard for `kind`. `target` narrows Resubmit to one review.
pub fn check(
    kind: TransitionKind,
    request: &ReviewRequest,
    roles: &RoleFlags,
    user: &PrincipalId,
    target: Option<ReviewTarget>,
) -> GuardDecision {
    match kind {
        TransitionKind::SaveDraft | TransitionKind::Submit => draft_guard(kind, request, roles),
        TransitionKind::AssignAttorney => intake_admin_guard(request, roles),
        TransitionKind::SendToCommittee => intake_admin_guard(request, roles),
        TransitionKind::CommitteeAssignAttorney => committee_guard(request, roles),
        TransitionKind::SubmitLegalReview => legal_review_guard(request, roles, user),
        TransitionKind::SubmitComplianceReview => compliance_review_guard(request, roles),
        TransitionKind::Resubmit => resubmit_guard(request, roles, target),
        TransitionKind::Closeout => closeout_guard(request, roles),
        TransitionKind::ConfirmForesideDocuments => foreside_guard(request, roles),
        TransitionKind::Cancel => cancel_guard(request, roles),
        TransitionKind::Hold => hold_guard(request, roles),
        TransitionKind::Resume => resume_guard(request, roles),
        TransitionKind::Edit => edit_guard(request, roles),
    }
}

fn draft_guard(kind: TransitionKind, request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::Draft {
        return GuardDecision::deny(format!(
            "{} requires a draft; the request is {}",
            kind,
            request.status.label()
        ));
    }
    if roles.is_submitter || roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only the request owner or a legal admin can act on a draft")
    }
}

fn intake_admin_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::LegalIntake {
        return GuardDecision::deny(format!(
            "the request is {}, not in Legal Intake",
            request.status.label()
        ));
    }
    if roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only a legal admin can act during Legal Intake")
    }
}

fn committee_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::AssignAttorney {
        return GuardDecision::deny(format!(
            "the request is {}, not awaiting committee assignment",
            request.status.label()
        ));
    }
    if roles.is_legal_admin || roles.is_committee || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only a legal admin or a committee member can assign the attorney")
    }
}

fn legal_review_guard(
    request: &ReviewRequest,
    roles: &RoleFlags,
    user: &PrincipalId,
) -> GuardDecision {
    if request.status != RequestStatus::InReview {
        return GuardDecision::deny(format!(
            "the request is {}, not in review",
            request.status.label()
        ));
    }
    let Some(review) = &request.legal_review else {
        return GuardDecision::deny("this request has no legal review");
    };
    if !review.status.attorney_actionable() {
        return GuardDecision::deny(format!(
            "the legal review is {}, not awaiting the attorney",
            review.status.label()
        ));
    }
    let is_assigned = request.assigned_attorney.as_ref() == Some(user);
    if is_assigned || roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only the assigned attorney or a legal admin can submit the legal review")
    }
}

fn compliance_review_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::InReview {
        return GuardDecision::deny(format!(
            "the request is {}, not in review",
            request.status.label()
        ));
    }
    let Some(review) = &request.compliance_review else {
        return GuardDecision::deny("this request has no compliance review");
    };
    if !review.status.reviewer_actionable() {
        return GuardDecision::deny(format!(
            "the compliance review is {}, not awaiting compliance",
            review.status.label()
        ));
    }
    if roles.is_compliance || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only a compliance reviewer can submit the compliance review")
    }
}

fn resubmit_guard(
    request: &ReviewRequest,
    roles: &RoleFlags,
    target: Option<ReviewTarget>,
) -> GuardDecision {
    if request.status != RequestStatus::InReview {
        return GuardDecision::deny(format!(
            "the request is {}, not in review",
            request.status.label()
        ));
    }
    let waiting = match target {
        Some(ReviewTarget::Legal) => request.legal_review.as_ref().is_some_and(|r| {
            r.status == review_types::LegalReviewStatus::WaitingOnSubmitter
        }),
        Some(ReviewTarget::Compliance) => request.compliance_review.as_ref().is_some_and(|r| {
            r.status == review_types::ComplianceReviewStatus::WaitingOnSubmitter
        }),
        None => false,
    };
    if !waiting {
        return GuardDecision::deny("the targeted review is not waiting on the submitter");
    }
    if roles.is_submitter || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only the request owner can resubmit for review")
    }
}

fn closeout_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::Closeout {
        return GuardDecision::deny(format!(
            "the request is {}, not in Closeout",
            request.status.label()
        ));
    }
    if !request.active_reviews_completed() {
        return GuardDecision::deny("closeout requires every selected review to be completed");
    }
    if roles.is_submitter || roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only the request owner or a legal admin can close out the request")
    }
}

fn foreside_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status != RequestStatus::AwaitingForesideDocuments {
        return GuardDecision::deny(format!(
            "the request is {}, not awaiting Foreside documents",
            request.status.label()
        ));
    }
    if roles.is_compliance || roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only compliance or a legal admin can confirm the Foreside documents")
    }
}

fn cancel_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status.is_closed() {
        return GuardDecision::deny(format!(
            "a {} request cannot be cancelled",
            request.status.label()
        ));
    }
    if roles.is_submitter || roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only the request owner, a legal admin, or an admin can cancel")
    }
}

fn hold_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if request.status.is_closed() {
        return GuardDecision::deny(format!(
            "a {} request cannot be placed on hold",
            request.status.label()
        ));
    }
    if request.status.is_on_hold() {
        return GuardDecision::deny("the request is already on hold");
    }
    if roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only a legal admin can place a request on hold")
    }
}

fn resume_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    if !request.status.is_on_hold() {
        return GuardDecision::deny("the request is not on hold");
    }
    if roles.is_legal_admin || roles.is_admin {
        GuardDecision::allow()
    } else {
        GuardDecision::deny("only a legal admin can resume a held request")
    }
}

fn edit_guard(request: &ReviewRequest, roles: &RoleFlags) -> GuardDecision {
    match &request.status {
        RequestStatus::Draft => {
            if roles.is_submitter || roles.is_legal_admin || roles.is_admin {
                GuardDecision::allow()
            } else {
                GuardDecision::deny("only the request owner or a legal admin can edit a draft")
            }
        }
        RequestStatus::LegalIntake | RequestStatus::AssignAttorney => {
            if roles.is_legal_admin || roles.is_admin {
                GuardDecision::allow()
            } else {
                GuardDecision::deny("only a legal admin can edit during intake")
            }
        }
        RequestStatus::InReview => {
            let submitter_window = roles.is_submitter
                && (request.legal_review.as_ref().is_some_and(|r| {
                    r.status == review_types::LegalReviewStatus::WaitingOnSubmitter
                }) || request.compliance_review.as_ref().is_some_and(|r| {
                    r.status == review_types::ComplianceReviewStatus::WaitingOnSubmitter
                }));
            if submitter_window || roles.is_legal_admin || roles.is_admin {
                GuardDecision::allow()
            } else {
                GuardDecision::deny(
                    "edits during review are limited to the stage's current owner",
                )
            }
        }
        RequestStatus::Closeout => {
            if roles.is_submitter || roles.is_legal_admin || roles.is_admin {
                GuardDecision::allow()
            } else {
                GuardDecision::deny("only the request owner or a legal admin can edit at closeout")
            }
        }
        other => GuardDecision::deny(format!("a {} request cannot be edited", other.label())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_types::{
        ComplianceReview, LegalReview, PrincipalId, RequestStatus, ReviewAudience, ReviewRequest,
    };

    fn make_request(status: RequestStatus) -> ReviewRequest {
        let mut req = ReviewRequest::new(PrincipalId::new("author-1"), ReviewAudience::Both);
        req.status = status;
        req
    }

    fn submitter() -> RoleFlags {
        RoleFlags {
            is_submitter: true,
            ..RoleFlags::none()
        }
    }

    fn legal_admin() -> RoleFlags {
        RoleFlags {
            is_legal_admin: true,
            ..RoleFlags::none()
        }
    }

    fn admin() -> RoleFlags {
        RoleFlags {
            is_admin: true,
            ..RoleFlags::none()
        }
    }

    fn user() -> PrincipalId {
        PrincipalId::new("author-1")
    }

    #[test]
    fn test_submit_requires_draft() {
        let req = make_request(RequestStatus::InReview);
        let decision = check(TransitionKind::Submit, &req, &submitter(), &user(), None);
        assert!(!decision.allowed);
        assert!(decision.reason().contains("InReview"));
    }

    #[test]
    fn test_submit_requires_ownership() {
        let req = make_request(RequestStatus::Draft);
        let stranger = RoleFlags::none();
        assert!(!check(TransitionKind::Submit, &req, &stranger, &user(), None).allowed);
        assert!(check(TransitionKind::Submit, &req, &submitter(), &user(), None).allowed);
        assert!(check(TransitionKind::Submit, &req, &admin(), &user(), None).allowed);
    }

    #[test]
    fn test_assign_attorney_is_legal_admin_only() {
        let req = make_request(RequestStatus::LegalIntake);
        assert!(!check(TransitionKind::AssignAttorney, &req, &submitter(), &user(), None).allowed);
        assert!(check(TransitionKind::AssignAttorney, &req, &legal_admin(), &user(), None).allowed);
    }

    #[test]
    fn test_committee_assignment_roles() {
        let req = make_request(RequestStatus::AssignAttorney);
        let committee = RoleFlags {
            is_committee: true,
            ..RoleFlags::none()
        };
        assert!(check(TransitionKind::CommitteeAssignAttorney, &req, &committee, &user(), None).allowed);
        assert!(!check(TransitionKind::CommitteeAssignAttorney, &req, &submitter(), &user(), None).allowed);
    }

    #[test]
    fn test_legal_review_requires_assigned_attorney() {
        let mut req = make_request(RequestStatus::InReview);
        let mut review = LegalReview::new();
        review.begin(PrincipalId::new("atty-1"));
        req.legal_review = Some(review);
        req.assigned_attorney = Some(PrincipalId::new("atty-1"));

        let attorney_roles = RoleFlags {
            is_attorney: true,
            ..RoleFlags::none()
        };

        // A different attorney is refused even with the attorney role
        let other = PrincipalId::new("atty-2");
        assert!(!check(TransitionKind::SubmitLegalReview, &req, &attorney_roles, &other, None).allowed);

        let assigned = PrincipalId::new("atty-1");
        assert!(check(TransitionKind::SubmitLegalReview, &req, &attorney_roles, &assigned, None).allowed);

        // A legal admin may act in the attorney's stead
        assert!(check(TransitionKind::SubmitLegalReview, &req, &legal_admin(), &other, None).allowed);
    }

    #[test]
    fn test_compliance_review_requires_compliance_role() {
        let mut req = make_request(RequestStatus::InReview);
        let mut review = ComplianceReview::new();
        review.begin();
        req.compliance_review = Some(review);

        let compliance = RoleFlags {
            is_compliance: true,
            ..RoleFlags::none()
        };
        assert!(check(TransitionKind::SubmitComplianceReview, &req, &compliance, &user(), None).allowed);
        assert!(!check(TransitionKind::SubmitComplianceReview, &req, &legal_admin(), &user(), None).allowed);
    }

    #[test]
    fn test_closeout_denied_while_compliance_incomplete() {
        let mut req = make_request(RequestStatus::Closeout);
        let mut legal = LegalReview::new();
        legal.begin(PrincipalId::new("atty-1"));
        legal.record_outcome(review_types::LegalReviewOutcome::Approved);
        req.legal_review = Some(legal);

        let mut compliance = ComplianceReview::new();
        compliance.begin();
        req.compliance_review = Some(compliance);

        let decision = check(TransitionKind::Closeout, &req, &submitter(), &user(), None);
        assert!(!decision.allowed);
        assert!(decision.reason().contains("review"));
    }

    #[test]
    fn test_cancel_denied_after_close() {
        let mut req = make_request(RequestStatus::InReview);
        req.cancel(user(), "dropped", chrono::Utc::now());
        assert!(!check(TransitionKind::Cancel, &req, &admin(), &user(), None).allowed);

        let completed = make_request(RequestStatus::Completed);
        assert!(!check(TransitionKind::Cancel, &completed, &admin(), &user(), None).allowed);
    }

    #[test]
    fn test_hold_and_resume_gating() {
        let mut req = make_request(RequestStatus::InReview);
        assert!(check(TransitionKind::Hold, &req, &legal_admin(), &user(), None).allowed);
        assert!(!check(TransitionKind::Hold, &req, &submitter(), &user(), None).allowed);
        assert!(!check(TransitionKind::Resume, &req, &legal_admin(), &user(), None).allowed);

        req.hold(user(), "paused for outside counsel", chrono::Utc::now());
        assert!(!check(TransitionKind::Hold, &req, &legal_admin(), &user(), None).allowed);
        assert!(check(TransitionKind::Resume, &req, &legal_admin(), &user(), None).allowed);
    }

    #[test]
    fn test_resubmit_requires_waiting_review() {
        let mut req = make_request(RequestStatus::InReview);
        let mut review = LegalReview::new();
        review.begin(PrincipalId::new("atty-1"));
        req.legal_review = Some(review);

        let denied = check(
            TransitionKind::Resubmit,
            &req,
            &submitter(),
            &user(),
            Some(ReviewTarget::Legal),
        );
        assert!(!denied.allowed);

        req.legal_review
            .as_mut()
            .unwrap()
            .record_outcome(review_types::LegalReviewOutcome::RespondToCommentsAndResubmit);
        let allowed = check(
            TransitionKind::Resubmit,
            &req,
            &submitter(),
            &user(),
            Some(ReviewTarget::Legal),
        );
        assert!(allowed.allowed);
    }

    #[test]
    fn test_edit_windows() {
        let draft = make_request(RequestStatus::Draft);
        assert!(check(TransitionKind::Edit, &draft, &submitter(), &user(), None).allowed);

        let intake = make_request(RequestStatus::LegalIntake);
        assert!(!check(TransitionKind::Edit, &intake, &submitter(), &user(), None).allowed);
        assert!(check(TransitionKind::Edit, &intake, &legal_admin(), &user(), None).allowed);

        let completed = make_request(RequestStatus::Completed);
        assert!(!check(TransitionKind::Edit, &completed, &admin(), &user(), None).allowed);
    }

    #[test]
    fn test_denied_guard_carries_reason() {
        let req = make_request(RequestStatus::Draft);
        let decision = check(TransitionKind::Resume, &req, &legal_admin(), &user(), None);
        assert!(!decision.allowed);
        assert_eq!(decision.reason(), "the request is not on hold");
    }
}
