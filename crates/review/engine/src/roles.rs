//! Role resolution
//!
//! A pure function of (principal, record): the submitter flag comes from the
//! record's author/submitter fields, the attorney flag from assignment plus
//! group membership, and the rest from directory groups. The resulting
//! capability object is computed once per transition attempt and passed by
//! parameter, so guards never read ambient session state.

use review_types::{groups, Principal, ReviewRequest, RoleFlags};

/// Resolve the role flags `principal` holds against `request`
pub fn resolve_roles(principal: &Principal, request: &ReviewRequest) -> RoleFlags {
    RoleFlags {
        is_submitter: request.is_owner(&principal.id),
        is_attorney: principal.in_group(groups::ATTORNEYS),
        is_legal_admin: principal.in_group(groups::LEGAL_ADMINS),
        is_compliance: principal.in_group(groups::COMPLIANCE_REVIEWERS),
        is_committee: principal.in_group(groups::ASSIGNMENT_COMMITTEE),
        is_admin: principal.in_group(groups::WORKFLOW_ADMINS),
    }
}
