//! Principals and role flags
//!
//! A principal is an identified user with resolvable group memberships.
//! Role flags are computed per (principal, request) pair and passed by
//! parameter to guards so they stay pure — nothing reads ambient session
//! state.

use serde::{Deserialize, Serialize};

/// Fixed directory group names that map to workflow roles
pub mod groups {
    pub const LEGAL_ADMINS: &str = "legal-admins";
    pub const ATTORNEYS: &str = "attorneys";
    pub const COMPLIANCE_REVIEWERS: &str = "compliance-reviewers";
    pub const ASSIGNMENT_COMMITTEE: &str = "assignment-committee";
    pub const WORKFLOW_ADMINS: &str = "workflow-admins";
}

/// Unique identifier for a principal
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identified user with resolvable group memberships
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub display_name: String,
    /// Directory groups this principal belongs to
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            id: PrincipalId::new(id),
            display_name: email.clone(),
            email,
            groups: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Role flags for one principal against one request.
///
/// Roles are non-exclusive; a legal admin may also be the submitter of
/// their own request. `is_admin` overrides every role requirement (but
/// never a state requirement).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    /// Author or submitter of the record
    pub is_submitter: bool,
    /// Member of the attorneys group
    pub is_attorney: bool,
    /// Member of the legal admins group
    pub is_legal_admin: bool,
    /// Member of the compliance reviewers group
    pub is_compliance: bool,
    /// Member of the assignment committee
    pub is_committee: bool,
    /// Workflow administrator
    pub is_admin: bool,
}

impl RoleFlags {
    pub fn none() -> Self {
        Self::default()
    }

    /// Any role that can act on a request at all
    pub fn any(&self) -> bool {
        self.is_submitter
            || self.is_attorney
            || self.is_legal_admin
            || self.is_compliance
            || self.is_committee
            || self.is_admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_groups() {
        let p = Principal::new("u-1", "pat@example.com")
            .with_display_name("Pat")
            .with_group(groups::LEGAL_ADMINS);

        assert!(p.in_group(groups::LEGAL_ADMINS));
        assert!(!p.in_group(groups::ATTORNEYS));
        assert_eq!(p.display_name, "Pat");
    }

    #[test]
    fn test_role_flags_default_is_empty() {
        let flags = RoleFlags::none();
        assert!(!flags.any());
    }

    #[test]
    fn test_role_flags_any() {
        let flags = RoleFlags {
            is_compliance: true,
            ..RoleFlags::none()
        };
        assert!(flags.any());
    }

    #[test]
    fn test_principal_id_display() {
        let id = PrincipalId::new("u-42");
        assert_eq!(format!("{}", id), "u-42");
    }
}
