//! Legal and compliance review sub-workflows
//!
//! Each review is its own small state machine nested inside the request's
//! `InReview` status. The attorney/compliance reviewer can bounce a request
//! back to the submitter an unbounded number of times; each round appends to
//! the review's note log. Notes are append-only: history is an ordered
//! sequence of entries, never a mutable string.

use crate::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Note log ─────────────────────────────────────────────────────────

/// One entry in an append-only review note log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub author: PrincipalId,
    pub recorded_at: DateTime<Utc>,
    pub text: String,
}

impl NoteEntry {
    pub fn new(author: PrincipalId, text: impl Into<String>) -> Self {
        Self {
            author,
            recorded_at: Utc::now(),
            text: text.into(),
        }
    }
}

// ── Legal review ─────────────────────────────────────────────────────

/// Sub-status of the legal review
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LegalReviewStatus {
    #[default]
    NotStarted,
    InProgress,
    WaitingOnAttorney,
    WaitingOnSubmitter,
    Completed,
}

impl LegalReviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::WaitingOnAttorney => "WaitingOnAttorney",
            Self::WaitingOnSubmitter => "WaitingOnSubmitter",
            Self::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// True while the attorney holds the ball
    pub fn attorney_actionable(&self) -> bool {
        matches!(self, Self::InProgress | Self::WaitingOnAttorney)
    }
}

/// Terminal decision of the legal review
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalReviewOutcome {
    Approved,
    ApprovedWithComments,
    RespondToCommentsAndResubmit,
    NotApproved,
}

impl LegalReviewOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::ApprovedWithComments => "ApprovedWithComments",
            Self::RespondToCommentsAndResubmit => "RespondToCommentsAndResubmit",
            Self::NotApproved => "NotApproved",
        }
    }

    /// Every outcome except the resubmission loop closes the review
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::RespondToCommentsAndResubmit)
    }
}

/// The legal review owned by a request, created lazily when the
/// review audience includes Legal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalReview {
    pub status: LegalReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<LegalReviewOutcome>,
    /// Append-only note log across all review rounds
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attorney: Option<PrincipalId>,
}

impl Default for LegalReview {
    fn default() -> Self {
        Self::new()
    }
}

impl LegalReview {
    pub fn new() -> Self {
        Self {
            status: LegalReviewStatus::NotStarted,
            outcome: None,
            notes: Vec::new(),
            attorney: None,
        }
    }

    /// Begin the review with an assigned attorney
    pub fn begin(&mut self, attorney: PrincipalId) {
        self.attorney = Some(attorney);
        self.status = LegalReviewStatus::InProgress;
    }

    pub fn append_note(&mut self, entry: NoteEntry) {
        self.notes.push(entry);
    }

    /// Record the attorney's decision for this round.
    ///
    /// `RespondToCommentsAndResubmit` hands the review to the submitter;
    /// every other outcome completes the review.
    pub fn record_outcome(&mut self, outcome: LegalReviewOutcome) {
        if outcome.is_terminal() {
            self.outcome = Some(outcome);
            self.status = LegalReviewStatus::Completed;
        } else {
            self.status = LegalReviewStatus::WaitingOnSubmitter;
        }
    }

    /// The submitter sends the request back to the attorney
    pub fn resubmit(&mut self) {
        self.status = LegalReviewStatus::WaitingOnAttorney;
    }
}

// ── Compliance review ────────────────────────────────────────────────

/// Sub-status of the compliance review; mirrors the legal review with
/// `WaitingOnCompliance` in place of `WaitingOnAttorney`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComplianceReviewStatus {
    #[default]
    NotStarted,
    InProgress,
    WaitingOnCompliance,
    WaitingOnSubmitter,
    Completed,
}

impl ComplianceReviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::WaitingOnCompliance => "WaitingOnCompliance",
            Self::WaitingOnSubmitter => "WaitingOnSubmitter",
            Self::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// True while a compliance reviewer holds the ball
    pub fn reviewer_actionable(&self) -> bool {
        matches!(self, Self::InProgress | Self::WaitingOnCompliance)
    }
}

/// Terminal decision of the compliance review
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceReviewOutcome {
    Approved,
    ApprovedWithConditions,
    RespondToCommentsAndResubmit,
    NotApproved,
}

impl ComplianceReviewOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::ApprovedWithConditions => "ApprovedWithConditions",
            Self::RespondToCommentsAndResubmit => "RespondToCommentsAndResubmit",
            Self::NotApproved => "NotApproved",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::RespondToCommentsAndResubmit)
    }
}

/// The compliance review owned by a request, created lazily when the
/// review audience includes Compliance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReview {
    pub status: ComplianceReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ComplianceReviewOutcome>,
    /// Append-only note log across all review rounds
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
    /// Whether a third-party (Foreside) review is required after closeout.
    /// Unknown until the compliance reviewer answers explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_foreside_review_required: Option<bool>,
    /// Whether the material is for retail use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_retail_use: Option<bool>,
}

impl Default for ComplianceReview {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceReview {
    pub fn new() -> Self {
        Self {
            status: ComplianceReviewStatus::NotStarted,
            outcome: None,
            notes: Vec::new(),
            is_foreside_review_required: None,
            is_retail_use: None,
        }
    }

    pub fn begin(&mut self) {
        self.status = ComplianceReviewStatus::InProgress;
    }

    pub fn append_note(&mut self, entry: NoteEntry) {
        self.notes.push(entry);
    }

    pub fn record_outcome(&mut self, outcome: ComplianceReviewOutcome) {
        if outcome.is_terminal() {
            self.outcome = Some(outcome);
            self.status = ComplianceReviewStatus::Completed;
        } else {
            self.status = ComplianceReviewStatus::WaitingOnSubmitter;
        }
    }

    pub fn resubmit(&mut self) {
        self.status = ComplianceReviewStatus::WaitingOnCompliance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_review_round_trip_loop() {
        let mut review = LegalReview::new();
        review.begin(PrincipalId::new("atty-1"));
        assert_eq!(review.status, LegalReviewStatus::InProgress);
        assert!(review.status.attorney_actionable());

        // Two full resubmission rounds
        for _ in 0..2 {
            review.record_outcome(LegalReviewOutcome::RespondToCommentsAndResubmit);
            assert_eq!(review.status, LegalReviewStatus::WaitingOnSubmitter);
            assert!(review.outcome.is_none());

            review.resubmit();
            assert_eq!(review.status, LegalReviewStatus::WaitingOnAttorney);
            assert!(review.status.attorney_actionable());
        }

        review.record_outcome(LegalReviewOutcome::ApprovedWithComments);
        assert!(review.status.is_completed());
        assert_eq!(review.outcome, Some(LegalReviewOutcome::ApprovedWithComments));
    }

    #[test]
    fn test_compliance_review_completion() {
        let mut review = ComplianceReview::new();
        review.begin();
        review.is_foreside_review_required = Some(true);
        review.is_retail_use = Some(false);
        review.record_outcome(ComplianceReviewOutcome::Approved);

        assert!(review.status.is_completed());
        assert_eq!(review.outcome, Some(ComplianceReviewOutcome::Approved));
    }

    #[test]
    fn test_notes_are_append_only() {
        let mut review = LegalReview::new();
        review.append_note(NoteEntry::new(PrincipalId::new("atty-1"), "round one"));
        review.append_note(NoteEntry::new(PrincipalId::new("sub-1"), "responded"));
        review.append_note(NoteEntry::new(PrincipalId::new("atty-1"), "round two"));

        assert_eq!(review.notes.len(), 3);
        assert_eq!(review.notes[0].text, "round one");
        assert_eq!(review.notes[2].text, "round two");
    }

    #[test]
    fn test_outcome_terminality() {
        assert!(LegalReviewOutcome::Approved.is_terminal());
        assert!(LegalReviewOutcome::NotApproved.is_terminal());
        assert!(!LegalReviewOutcome::RespondToCommentsAndResubmit.is_terminal());
        assert!(ComplianceReviewOutcome::ApprovedWithConditions.is_terminal());
        assert!(!ComplianceReviewOutcome::RespondToCommentsAndResubmit.is_terminal());
    }

    #[test]
    fn test_status_labels_are_stable() {
        assert_eq!(LegalReviewStatus::WaitingOnAttorney.label(), "WaitingOnAttorney");
        assert_eq!(
            ComplianceReviewStatus::WaitingOnCompliance.label(),
            "WaitingOnCompliance"
        );
        assert_eq!(
            LegalReviewOutcome::RespondToCommentsAndResubmit.label(),
            "RespondToCommentsAndResubmit"
        );
    }
}
