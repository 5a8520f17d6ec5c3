//! Approvals attached to a review request
//!
//! An approval is a tagged variant over six kinds. Every approval carries an
//! approver, an approval date, and optional notes; the `Other` kind
//! additionally carries a free-text title. Whether a document is attached to
//! an approval slot is answered by the document-attachment collaborator, not
//! stored here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for an approval slot
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalId(pub String);

impl ApprovalId {
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

impl std::fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an approval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalKind {
    Communications,
    PortfolioManager,
    ResearchAnalyst,
    SubjectMatterExpert,
    Performance,
    /// A free-form approval; the title names what was approved
    Other { title: String },
}

impl ApprovalKind {
    /// Stable interchange label, compared by exact string equality
    pub fn label(&self) -> &'static str {
        match self {
            Self::Communications => "Communications",
            Self::PortfolioManager => "Portfolio Manager",
            Self::ResearchAnalyst => "Research Analyst",
            Self::SubjectMatterExpert => "Subject-Matter-Expert",
            Self::Performance => "Performance",
            Self::Other { .. } => "Other",
        }
    }

    pub fn is_communications(&self) -> bool {
        matches!(self, Self::Communications)
    }

    /// True if both values occupy the same approval slot.
    /// The `Other` title does not create a distinct slot.
    pub fn same_slot(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One approval attached to a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub id: ApprovalId,
    pub kind: ApprovalKind,
    /// Name or email of the approver as entered on the form; may be blank
    /// until the form is completed, which submission validation rejects
    pub approver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Approval {
    pub fn new(kind: ApprovalKind) -> Self {
        Self {
            id: ApprovalId::generate(),
            kind,
            approver: String::new(),
            approved_on: None,
            notes: None,
        }
    }

    pub fn with_approver(mut self, approver: impl Into<String>) -> Self {
        self.approver = approver.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.approved_on = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ApprovalKind::Communications.label(), "Communications");
        assert_eq!(ApprovalKind::PortfolioManager.label(), "Portfolio Manager");
        assert_eq!(
            ApprovalKind::SubjectMatterExpert.label(),
            "Subject-Matter-Expert"
        );
        assert_eq!(
            ApprovalKind::Other {
                title: "Board sign-off".into()
            }
            .label(),
            "Other"
        );
    }

    #[test]
    fn test_same_slot_ignores_other_title() {
        let a = ApprovalKind::Other { title: "A".into() };
        let b = ApprovalKind::Other { title: "B".into() };
        assert!(a.same_slot(&b));
        assert!(!a.same_slot(&ApprovalKind::Performance));
    }

    #[test]
    fn test_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let approval = Approval::new(ApprovalKind::Performance)
            .with_approver("kim@example.com")
            .with_date(date)
            .with_notes("Q1 figures verified");

        assert_eq!(approval.approver, "kim@example.com");
        assert_eq!(approval.approved_on, Some(date));
        assert!(approval.notes.is_some());
        assert!(!approval.id.short().is_empty());
    }
}
