//! Transition validators
//!
//! Conditional requirements (a field required only when a flag is set) are
//! expressed as composable per-field rules evaluated against the full
//! payload, not procedural if/else chains. Every rule runs — validation
//! never stops at the first violation — so the caller can render all field
//! errors at once.

use crate::errors::Violation;
use chrono::NaiveDate;
use review_types::{CloseoutPayload, ComplianceReviewPayload, DraftFields, EditPayload};

/// One validation rule: a field name and a predicate over the whole payload
/// returning a message when violated
pub struct Rule<P> {
    field: &'static str,
    check: Box<dyn Fn(&P) -> Option<String>>,
}

impl<P> Rule<P> {
    pub fn new(field: &'static str, check: impl Fn(&P) -> Option<String> + 'static) -> Self {
        Self {
            field,
            check: Box::new(check),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Run every rule against the payload and collect all violations
pub fn evaluate<P>(payload: &P, rules: &[Rule<P>]) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|rule| (rule.check)(payload).map(|message| Violation::new(rule.field, message)))
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Rules for the Submit transition's form fields. Approval requirements are
/// evaluated separately against the record's approvals collection.
pub fn submit_rules(today: NaiveDate) -> Vec<Rule<DraftFields>> {
    vec![
        Rule::new("title", |f: &DraftFields| {
            let len = char_len(f.title.trim());
            if (3..=255).contains(&len) {
                None
            } else {
                Some("The request title must be between 3 and 255 characters".into())
            }
        }),
        Rule::new("purpose", |f: &DraftFields| {
            if char_len(f.purpose.trim()) >= 10 {
                None
            } else {
                Some("The purpose must be at least 10 characters".into())
            }
        }),
        Rule::new("targetReturnDate", move |f: &DraftFields| match f.target_return_date {
            None => Some("A target return date is required".into()),
            Some(date) if date < today => {
                Some("The target return date cannot be in the past".into())
            }
            Some(_) => None,
        }),
        Rule::new("rushRationale", |f: &DraftFields| {
            if f.is_rush_request && f.rush_rationale.trim().is_empty() {
                Some("A rationale is required for rush requests".into())
            } else {
                None
            }
        }),
        Rule::new("distributionMethod", |f: &DraftFields| {
            if f.distribution_method.trim().is_empty() {
                Some("A distribution method is required".into())
            } else {
                None
            }
        }),
        Rule::new("attachments", |f: &DraftFields| {
            if f.attachments.is_empty() {
                Some("At least one document must be attached".into())
            } else {
                None
            }
        }),
    ]
}

pub fn validate_submit(fields: &DraftFields, today: NaiveDate) -> Vec<Violation> {
    evaluate(fields, &submit_rules(today))
}

/// Hold and Cancel both require a reason of 10-1000 characters
pub fn validate_reason(field: &'static str, reason: &str) -> Vec<Violation> {
    let len = char_len(reason.trim());
    if (10..=1000).contains(&len) {
        Vec::new()
    } else {
        vec![Violation::new(
            field,
            "A reason between 10 and 1000 characters is required",
        )]
    }
}

/// Closeout rules; the tracking id is required exactly when the
/// post-closeout documents stage is gated on
pub fn validate_closeout(payload: &CloseoutPayload, requires_foreside: bool) -> Vec<Violation> {
    let rules = vec![Rule::new("trackingId", move |p: &CloseoutPayload| {
        let blank = p.tracking_id.as_deref().map_or(true, |t| t.trim().is_empty());
        if requires_foreside && blank {
            Some("A tracking id is required when Foreside review applies".into())
        } else {
            None
        }
    })];
    evaluate(payload, &rules)
}

/// The compliance decision must answer both gating flags explicitly
pub fn validate_compliance_review(payload: &ComplianceReviewPayload) -> Vec<Violation> {
    let rules = vec![
        Rule::new("isForesideReviewRequired", |p: &ComplianceReviewPayload| {
            if p.is_foreside_review_required.is_none() {
                Some("Whether Foreside review is required must be answered".into())
            } else {
                None
            }
        }),
        Rule::new("isRetailUse", |p: &ComplianceReviewPayload| {
            if p.is_retail_use.is_none() {
                Some("Whether the material is for retail use must be answered".into())
            } else {
                None
            }
        }),
    ];
    evaluate(payload, &rules)
}

/// A Foreside documents confirmation cannot be blank
pub fn validate_confirmation(confirmation: &str) -> Vec<Violation> {
    if confirmation.trim().is_empty() {
        vec![Violation::new(
            "confirmation",
            "A confirmation of the documents submission is required",
        )]
    } else {
        Vec::new()
    }
}

/// Edits are partial: only provided fields are checked, against the same
/// bounds Submit enforces
pub fn validate_edit(payload: &EditPayload) -> Vec<Violation> {
    let rules = vec![
        Rule::new("title", |p: &EditPayload| match &p.title {
            Some(t) if !(3..=255).contains(&char_len(t.trim())) => {
                Some("The request title must be between 3 and 255 characters".into())
            }
            _ => None,
        }),
        Rule::new("purpose", |p: &EditPayload| match &p.purpose {
            Some(t) if char_len(t.trim()) < 10 => {
                Some("The purpose must be at least 10 characters".into())
            }
            _ => None,
        }),
        Rule::new("distributionMethod", |p: &EditPayload| {
            match &p.distribution_method {
                Some(t) if t.trim().is_empty() => Some("A distribution method is required".into()),
                _ => None,
            }
        }),
    ];
    evaluate(payload, &rules)
}
