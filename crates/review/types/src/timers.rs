//! Stage-level elapsed-time bookkeeping
//!
//! Each of the four workflow stages carries a pair of business-minute
//! counters: one for the reviewing role, one for the submitter. Ownership of
//! an open stage flips when a review bounces between reviewer and submitter,
//! so a single stage can accumulate time into both counters across several
//! sub-intervals. The minute math itself lives in the engine's business-time
//! accumulator; this module only holds the mechanical state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four stages that accumulate elapsed time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    LegalIntake,
    LegalReview,
    ComplianceReview,
    Closeout,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LegalIntake => "Legal Intake",
            Self::LegalReview => "Legal Review",
            Self::ComplianceReview => "Compliance Review",
            Self::Closeout => "Closeout",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Who currently owns an open stage interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StageOwner {
    #[default]
    Reviewer,
    Submitter,
}

/// Counters and the open interval (if any) for one stage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StageWindow {
    /// Business minutes charged to the reviewing role
    pub reviewer_minutes: i64,
    /// Business minutes charged to the submitter
    pub submitter_minutes: i64,
    /// Start of the currently open interval, if the stage is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<DateTime<Utc>>,
    /// Owner of the currently open interval
    pub owner: StageOwner,
}

impl StageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    /// Open a new interval for `owner` starting at `at`
    pub fn open(&mut self, owner: StageOwner, at: DateTime<Utc>) {
        self.owner = owner;
        self.opened_at = Some(at);
    }

    /// Add minutes to the counter of the current owner
    pub fn charge(&mut self, minutes: i64) {
        match self.owner {
            StageOwner::Reviewer => self.reviewer_minutes += minutes,
            StageOwner::Submitter => self.submitter_minutes += minutes,
        }
    }

    /// Close the open interval, returning its start (the caller charges
    /// the computed minutes before or after closing)
    pub fn take_opened_at(&mut self) -> Option<DateTime<Utc>> {
        self.opened_at.take()
    }

    pub fn total_minutes(&self) -> i64 {
        self.reviewer_minutes + self.submitter_minutes
    }
}

/// Stage counters for one request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StageTimers {
    pub legal_intake: StageWindow,
    pub legal_review: StageWindow,
    pub compliance_review: StageWindow,
    pub closeout: StageWindow,
}

impl StageTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, stage: Stage) -> &StageWindow {
        match stage {
            Stage::LegalIntake => &self.legal_intake,
            Stage::LegalReview => &self.legal_review,
            Stage::ComplianceReview => &self.compliance_review,
            Stage::Closeout => &self.closeout,
        }
    }

    pub fn window_mut(&mut self, stage: Stage) -> &mut StageWindow {
        match stage {
            Stage::LegalIntake => &mut self.legal_intake,
            Stage::LegalReview => &mut self.legal_review,
            Stage::ComplianceReview => &mut self.compliance_review,
            Stage::Closeout => &mut self.closeout,
        }
    }

    /// Running total for the reviewing roles, recomputed from the per-stage
    /// counters (never incrementally patched, so it cannot drift)
    pub fn total_reviewer_minutes(&self) -> i64 {
        [
            &self.legal_intake,
            &self.legal_review,
            &self.compliance_review,
            &self.closeout,
        ]
        .iter()
        .map(|w| w.reviewer_minutes)
        .sum()
    }

    /// Running total for the submitter, recomputed from the per-stage counters
    pub fn total_submitter_minutes(&self) -> i64 {
        [
            &self.legal_intake,
            &self.legal_review,
            &self.compliance_review,
            &self.closeout,
        ]
        .iter()
        .map(|w| w.submitter_minutes)
        .sum()
    }

    pub fn total_reviewer_hours(&self) -> f64 {
        self.total_reviewer_minutes() as f64 / 60.0
    }

    pub fn total_submitter_hours(&self) -> f64 {
        self.total_submitter_minutes() as f64 / 60.0
    }

    /// Stages with an open interval
    pub fn open_stages(&self) -> Vec<Stage> {
        let mut open = Vec::new();
        for stage in [
            Stage::LegalIntake,
            Stage::LegalReview,
            Stage::ComplianceReview,
            Stage::Closeout,
        ] {
            if self.window(stage).is_open() {
                open.push(stage);
            }
        }
        open
    }
}
