//! Approval requirement evaluation
//!
//! Evaluated at submission time, not continuously. Each violated rule
//! produces its own message so the form layer can attach errors to
//! individual approval fields. Whether a document is attached to an approval
//! slot is answered by the document-attachment collaborator; upload
//! mechanics are opaque here.

use crate::errors::Violation;
use chrono::NaiveDate;
use review_types::{ApprovalId, ApprovalKind, ReviewRequest};
use std::collections::HashSet;

/// The document-attachment collaborator: per approval slot, whether at
/// least one document is currently attached
pub trait AttachmentLookup {
    fn has_document(&self, approval: &ApprovalId) -> bool;
}

/// In-memory attachment index used in tests and single-process deployments
#[derive(Debug, Default)]
pub struct MemoryAttachments {
    approvals: HashSet<ApprovalId>,
}

impl MemoryAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_to_approval(&mut self, approval: ApprovalId) {
        self.approvals.insert(approval);
    }
}

impl AttachmentLookup for MemoryAttachments {
    fn has_document(&self, approval: &ApprovalId) -> bool {
        self.approvals.contains(approval)
    }
}

/// Check the mandatory-approval invariant for `request`.
///
/// Rules, one message per violated rule:
/// 1. If Communications approval is required, exactly one must be present.
/// 2. Unless the request is communications-only, at least one
///    non-Communications approval must be present.
/// 3. Every present approval must name an approver, carry a date no later
///    than `today`, and have at least one attached document; an `Other`
///    approval must also have a non-empty title.
pub fn evaluate_approvals(
    request: &ReviewRequest,
    attachments: &dyn AttachmentLookup,
    today: NaiveDate,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if request.requires_communications_approval {
        match request.communications_approvals() {
            0 => violations.push(Violation::new(
                "approvals.communications",
                "A Communications approval is required before this request can be submitted",
            )),
            1 => {}
            _ => violations.push(Violation::new(
                "approvals.communications",
                "Only one Communications approval may be attached",
            )),
        }
    }

    if !request.communications_only && request.non_communications_approvals() == 0 {
        violations.push(Violation::new(
            "approvals",
            "At least one approval other than Communications is required",
        ));
    }

    for approval in &request.approvals {
        let slot = approval.kind.label();

        if approval.approver.trim().is_empty() {
            violations.push(Violation::new(
                format!("approvals.{}.approver", slot),
                format!("The {} approval must name its approver", slot),
            ));
        }

        match approval.approved_on {
            None => violations.push(Violation::new(
                format!("approvals.{}.date", slot),
                format!("The {} approval must carry an approval date", slot),
            )),
            Some(date) if date > today => violations.push(Violation::new(
                format!("approvals.{}.date", slot),
                format!("The {} approval date cannot be in the future", slot),
            )),
            Some(_) => {}
        }

        if !attachments.has_document(&approval.id) {
            violations.push(Violation::new(
                format!("approvals.{}.document", slot),
                format!("The {} approval must have at least one attached document", slot),
            ));
        }

        if let ApprovalKind::Other { title } = &approval.kind {
            if title.trim().is_empty() {
                violations.push(Violation::new(
                    "approvals.Other.title",
                    "An Other approval must be given a title",
                ));
            }
        }
    }

    violations
}
