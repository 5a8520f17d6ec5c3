//! Transition actions and their payloads
//!
//! Every workflow transition is one `TransitionAction` variant. The engine
//! resolves roles, runs the guard for the action's kind, validates the
//! payload, then mutates and persists. Transitions, roles, and validation
//! rules are fixed and enumerated — nothing here is runtime-configurable.

use crate::{ComplianceReviewOutcome, LegalReviewOutcome, PrincipalId, ReviewAudience};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed set of workflow transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    SaveDraft,
    Submit,
    AssignAttorney,
    SendToCommittee,
    CommitteeAssignAttorney,
    SubmitLegalReview,
    SubmitComplianceReview,
    Resubmit,
    Closeout,
    ConfirmForesideDocuments,
    Cancel,
    Hold,
    Resume,
    Edit,
}

impl TransitionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SaveDraft => "SaveDraft",
            Self::Submit => "Submit",
            Self::AssignAttorney => "AssignAttorney",
            Self::SendToCommittee => "SendToCommittee",
            Self::CommitteeAssignAttorney => "CommitteeAssignAttorney",
            Self::SubmitLegalReview => "SubmitLegalReview",
            Self::SubmitComplianceReview => "SubmitComplianceReview",
            Self::Resubmit => "Resubmit",
            Self::Closeout => "Closeout",
            Self::ConfirmForesideDocuments => "ConfirmForesideDocuments",
            Self::Cancel => "Cancel",
            Self::Hold => "Hold",
            Self::Resume => "Resume",
            Self::Edit => "Edit",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which review sub-workflow a resubmission targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewTarget {
    Legal,
    Compliance,
}

impl ReviewTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Compliance => "compliance",
        }
    }
}

/// The full intake form snapshot carried by SaveDraft and Submit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftFields {
    pub title: String,
    pub purpose: String,
    pub distribution_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_return_date: Option<NaiveDate>,
    pub is_rush_request: bool,
    pub rush_rationale: String,
    pub requires_communications_approval: bool,
    pub communications_only: bool,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Changing the audience is only meaningful while drafting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<ReviewAudience>,
}

/// The attorney's decision for one legal review round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegalReviewPayload {
    pub outcome: LegalReviewOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The compliance reviewer's decision for one round.
///
/// The two gating flags must be answered explicitly — the validator rejects
/// a missing answer rather than defaulting it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReviewPayload {
    pub outcome: ComplianceReviewOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_foreside_review_required: Option<bool>,
    pub is_retail_use: Option<bool>,
}

/// Closeout payload; the tracking id is required only when the post-closeout
/// documents stage is gated on
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseoutPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Partial field edit; only provided fields are applied
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_return_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rush_rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

/// A transition invocation: the action plus its payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionAction {
    SaveDraft(DraftFields),
    Submit(DraftFields),
    AssignAttorney { attorney: PrincipalId },
    SendToCommittee,
    CommitteeAssignAttorney { attorney: PrincipalId },
    SubmitLegalReview(LegalReviewPayload),
    SubmitComplianceReview(ComplianceReviewPayload),
    Resubmit {
        target: ReviewTarget,
        notes: Option<String>,
    },
    Closeout(CloseoutPayload),
    ConfirmForesideDocuments { confirmation: String },
    Cancel { reason: String },
    Hold { reason: String },
    Resume,
    Edit(EditPayload),
}

impl TransitionAction {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::SaveDraft(_) => TransitionKind::SaveDraft,
            Self::Submit(_) => TransitionKind::Submit,
            Self::AssignAttorney { .. } => TransitionKind::AssignAttorney,
            Self::SendToCommittee => TransitionKind::SendToCommittee,
            Self::CommitteeAssignAttorney { .. } => TransitionKind::CommitteeAssignAttorney,
            Self::SubmitLegalReview(_) => TransitionKind::SubmitLegalReview,
            Self::SubmitComplianceReview(_) => TransitionKind::SubmitComplianceReview,
            Self::Resubmit { .. } => TransitionKind::Resubmit,
            Self::Closeout(_) => TransitionKind::Closeout,
            Self::ConfirmForesideDocuments { .. } => TransitionKind::ConfirmForesideDocuments,
            Self::Cancel { .. } => TransitionKind::Cancel,
            Self::Hold { .. } => TransitionKind::Hold,
            Self::Resume => TransitionKind::Resume,
            Self::Edit(_) => TransitionKind::Edit,
        }
    }
}
