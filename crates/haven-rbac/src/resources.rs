//! # Resource Kinds
//!
//! Defines the two kinds of resource a staff role can be responsible for,
//! and the mapping from role to kind. The mapping is total over [`Role`]:
//! every role resolves to a defined value, and only Supervisor/Coordinator
//! resolve to a kind at all.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// A kind of resource that can carry a contact person.
///
/// Organizations own sites; each can name at most one staff identity as its
/// contact person. Which kind a role binds to is fixed by convention:
/// Supervisor↔Organization, Coordinator↔Site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A tenant organization (a community of sites).
    Organization,
    /// A physical site belonging to one organization.
    Site,
}

impl ResourceKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "organization",
            ResourceKind::Site => "site",
        }
    }

    /// Parse a kind from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organization" => Some(ResourceKind::Organization),
            "site" => Some(ResourceKind::Site),
            _ => None,
        }
    }

    /// The role expected to hold this kind of resource as contact person.
    ///
    /// This is a convention enforced by the binding resolver, not a stored
    /// constraint.
    pub const fn expected_role(&self) -> Role {
        match self {
            ResourceKind::Organization => Role::Supervisor,
            ResourceKind::Site => Role::Coordinator,
        }
    }
}

impl Role {
    /// The kind of resource this role is responsible for, if any.
    ///
    /// Total over the role set: never panics, and only Supervisor and
    /// Coordinator map to a kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_rbac::{ResourceKind, Role};
    ///
    /// assert_eq!(Role::Supervisor.resource_kind(), Some(ResourceKind::Organization));
    /// assert_eq!(Role::Coordinator.resource_kind(), Some(ResourceKind::Site));
    /// assert_eq!(Role::Administrator.resource_kind(), None);
    /// ```
    pub const fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Role::Supervisor => Some(ResourceKind::Organization),
            Role::Coordinator => Some(ResourceKind::Site),
            Role::Administrator | Role::Observer | Role::Resident => None,
        }
    }
}
