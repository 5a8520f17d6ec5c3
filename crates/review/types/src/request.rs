//! The review request aggregate
//!
//! A `ReviewRequest` is the single shared mutable resource of the workflow.
//! It owns the status machine, the lazily created review sub-workflows, the
//! approvals collection, and the stage timers. Mutators stamp `updated_at`;
//! audit fields are append-only and are never cleared.

use crate::errors::{DomainError, DomainResult};
use crate::{
    Approval, ApprovalId, ComplianceReview, LegalReview, PrincipalId, StageTimers,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a review request
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Audience ─────────────────────────────────────────────────────────

/// Which review sub-workflows are active for this request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReviewAudience {
    Legal,
    Compliance,
    #[default]
    Both,
}

impl ReviewAudience {
    pub fn includes_legal(&self) -> bool {
        matches!(self, Self::Legal | Self::Both)
    }

    pub fn includes_compliance(&self) -> bool {
        matches!(self, Self::Compliance | Self::Both)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Legal => "Legal",
            Self::Compliance => "Compliance",
            Self::Both => "Both",
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// Primary lifecycle status.
///
/// `OnHold` and `Cancelled` carry the interrupted status as structured data,
/// so Resume can never observe a stale or unset previous status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Draft,
    LegalIntake,
    AssignAttorney,
    InReview,
    Closeout,
    AwaitingForesideDocuments,
    Completed,
    OnHold { previous: Box<RequestStatus> },
    Cancelled { previous: Box<RequestStatus> },
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl RequestStatus {
    /// Stable interchange label for the flat status name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::LegalIntake => "LegalIntake",
            Self::AssignAttorney => "AssignAttorney",
            Self::InReview => "InReview",
            Self::Closeout => "Closeout",
            Self::AwaitingForesideDocuments => "AwaitingForesideDocuments",
            Self::Completed => "Completed",
            Self::OnHold { .. } => "OnHold",
            Self::Cancelled { .. } => "Cancelled",
        }
    }

    /// Cancelled is terminal; Completed has no outbound transition either
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled { .. })
    }

    pub fn is_on_hold(&self) -> bool {
        matches!(self, Self::OnHold { .. })
    }

    /// The status interrupted by a hold or cancellation
    pub fn previous(&self) -> Option<&RequestStatus> {
        match self {
            Self::OnHold { previous } | Self::Cancelled { previous } => Some(previous),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Hold / cancel audit records ──────────────────────────────────────

/// Set when a hold begins; immutable history after resume
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRecord {
    pub by: PrincipalId,
    pub since: DateTime<Utc>,
    pub reason: String,
}

/// Set when a request is cancelled; the record is never deleted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRecord {
    pub by: PrincipalId,
    pub on: DateTime<Utc>,
    pub reason: String,
}

// ── Aggregate ────────────────────────────────────────────────────────

/// The legal review request aggregate root
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub id: RequestId,
    /// Human-readable request code
    pub code: String,
    /// Optimistic-concurrency token, bumped by the store on every save
    pub revision: u64,
    pub status: RequestStatus,
    pub audience: ReviewAudience,
    pub author: PrincipalId,
    /// Set on first submission; the owner for guard purposes is the author
    /// until then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter: Option<PrincipalId>,

    // Intake form fields
    pub title: String,
    pub purpose: String,
    pub distribution_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_return_date: Option<NaiveDate>,
    pub is_rush_request: bool,
    pub rush_rationale: String,
    pub requires_communications_approval: bool,
    pub communications_only: bool,
    /// References to staged documents; upload mechanics are external
    #[serde(default)]
    pub attachments: Vec<String>,

    #[serde(default)]
    pub approvals: Vec<Approval>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_review: Option<LegalReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_review: Option<ComplianceReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_attorney: Option<PrincipalId>,

    // Closeout and post-closeout fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreside_confirmation: Option<String>,

    pub timers: StageTimers,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<HoldRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel: Option<CancelRecord>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ReviewRequest {
    /// Create a new draft owned by its author
    pub fn new(author: PrincipalId, audience: ReviewAudience) -> Self {
        let now = Utc::now();
        let id = RequestId::generate();
        let code = format!("LRR-{}", id.short().to_uppercase());
        Self {
            id,
            code,
            revision: 0,
            status: RequestStatus::Draft,
            audience,
            author,
            submitter: None,
            title: String::new(),
            purpose: String::new(),
            distribution_method: String::new(),
            target_return_date: None,
            is_rush_request: false,
            rush_rationale: String::new(),
            requires_communications_approval: false,
            communications_only: false,
            attachments: Vec::new(),
            approvals: Vec::new(),
            legal_review: None,
            compliance_review: None,
            assigned_attorney: None,
            tracking_id: None,
            foreside_confirmation: None,
            timers: StageTimers::new(),
            hold: None,
            cancel: None,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            completed_at: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ── Ownership and queries ────────────────────────────────────────

    /// The author owns the draft; after submission the submitter does too
    pub fn is_owner(&self, principal: &PrincipalId) -> bool {
        &self.author == principal || self.submitter.as_ref() == Some(principal)
    }

    /// Every sub-workflow the audience selects has reached Completed
    pub fn active_reviews_completed(&self) -> bool {
        let legal_done = !self.audience.includes_legal()
            || self
                .legal_review
                .as_ref()
                .is_some_and(|r| r.status.is_completed());
        let compliance_done = !self.audience.includes_compliance()
            || self
                .compliance_review
                .as_ref()
                .is_some_and(|r| r.status.is_completed());
        legal_done && compliance_done
    }

    /// The post-closeout documents stage is gated on both compliance flags
    pub fn requires_foreside_documents(&self) -> bool {
        self.compliance_review.as_ref().is_some_and(|r| {
            r.is_foreside_review_required == Some(true) && r.is_retail_use == Some(true)
        })
    }

    // ── Approvals ────────────────────────────────────────────────────

    /// Attach an approval. At most one approval per slot: one Communications
    /// approval, and no duplicate non-Communications kind.
    pub fn add_approval(&mut self, approval: Approval) -> DomainResult<()> {
        if self
            .approvals
            .iter()
            .any(|a| a.kind.same_slot(&approval.kind))
        {
            return Err(DomainError::DuplicateApprovalKind(
                approval.kind.label().to_string(),
            ));
        }
        self.approvals.push(approval);
        self.touch();
        Ok(())
    }

    pub fn remove_approval(&mut self, id: &ApprovalId) -> DomainResult<Approval> {
        let idx = self
            .approvals
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| DomainError::ApprovalNotFound(id.clone()))?;
        self.touch();
        Ok(self.approvals.remove(idx))
    }

    pub fn communications_approvals(&self) -> usize {
        self.approvals
            .iter()
            .filter(|a| a.kind.is_communications())
            .count()
    }

    pub fn non_communications_approvals(&self) -> usize {
        self.approvals.len() - self.communications_approvals()
    }

    // ── Hold / resume / cancel ───────────────────────────────────────

    /// Interrupt the current status. The interrupted status travels inside
    /// `OnHold` so resume cannot read a stale sibling field. Stage windows
    /// are left untouched: held time accrues to whoever owned the stage when
    /// the hold began.
    pub fn hold(&mut self, by: PrincipalId, reason: impl Into<String>, at: DateTime<Utc>) {
        let previous = std::mem::replace(&mut self.status, RequestStatus::Draft);
        self.status = RequestStatus::OnHold {
            previous: Box::new(previous),
        };
        self.hold = Some(HoldRecord {
            by,
            since: at,
            reason: reason.into(),
        });
    }

    /// Restore the interrupted status. The hold record stays behind as
    /// immutable history.
    pub fn resume(&mut self) -> DomainResult<()> {
        match std::mem::replace(&mut self.status, RequestStatus::Draft) {
            RequestStatus::OnHold { previous } => {
                self.status = *previous;
                Ok(())
            }
            other => {
                self.status = other;
                Err(DomainError::NotOnHold)
            }
        }
    }

    /// Cancel the request. Cancelled is a terminal status, not a deletion.
    pub fn cancel(&mut self, by: PrincipalId, reason: impl Into<String>, at: DateTime<Utc>) {
        let previous = std::mem::replace(&mut self.status, RequestStatus::Draft);
        self.status = RequestStatus::Cancelled {
            previous: Box::new(previous),
        };
        self.cancel = Some(CancelRecord {
            by,
            on: at,
            reason: reason.into(),
        });
    }
}
