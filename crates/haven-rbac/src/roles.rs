//! The fixed role hierarchy
//!
//! This module defines the closed set of staff roles and the rank ordering
//! used everywhere an actor's authority is compared against another role.

use serde::{Deserialize, Serialize};

/// Staff role within the platform.
///
/// The role set is fixed at five ordinal ranks and defined at compile time;
/// roles are never persisted as free text. The explicit discriminant is the
/// rank ordinal, and a *lower* ordinal means a *more senior* role:
///
/// ```text
/// Administrator (1) > Supervisor (2) > Coordinator (3) > Observer (4) > Resident (5)
/// ```
///
/// `Ord` is intentionally not derived: the numeric order runs opposite to
/// authority, and a bare `<` at a call site would read backwards. Use
/// [`Role::outranks`] and [`Role::rank_at_least`] instead.
///
/// # Examples
///
/// ```
/// use haven_rbac::Role;
///
/// assert!(Role::Administrator.outranks(Role::Supervisor));
/// assert!(!Role::Resident.outranks(Role::Observer));
/// assert_eq!(Role::Coordinator.ordinal(), 3);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform-wide administration
    Administrator = 1,

    /// Responsible for one organization
    Supervisor = 2,

    /// Responsible for one site
    Coordinator = 3,

    /// Read-only staff access
    Observer = 4,

    /// A resident of a site
    Resident = 5,
}

impl Role {
    /// All roles, most senior first.
    pub const fn all() -> [Role; 5] {
        [
            Role::Administrator,
            Role::Supervisor,
            Role::Coordinator,
            Role::Observer,
            Role::Resident,
        ]
    }

    /// The rank ordinal (1 = most senior, 5 = least senior).
    pub const fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Look up a role by its rank ordinal.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_rbac::Role;
    ///
    /// assert_eq!(Role::from_ordinal(2), Some(Role::Supervisor));
    /// assert_eq!(Role::from_ordinal(0), None);
    /// assert_eq!(Role::from_ordinal(6), None);
    /// ```
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Role::Administrator),
            2 => Some(Role::Supervisor),
            3 => Some(Role::Coordinator),
            4 => Some(Role::Observer),
            5 => Some(Role::Resident),
            _ => None,
        }
    }

    /// Parse a role from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_rbac::Role;
    ///
    /// assert_eq!(Role::parse("supervisor"), Some(Role::Supervisor));
    /// assert_eq!(Role::parse("OBSERVER"), Some(Role::Observer));
    /// assert_eq!(Role::parse("janitor"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "administrator" => Some(Self::Administrator),
            "supervisor" => Some(Self::Supervisor),
            "coordinator" => Some(Self::Coordinator),
            "observer" => Some(Self::Observer),
            "resident" => Some(Self::Resident),
            _ => None,
        }
    }

    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Supervisor => "supervisor",
            Self::Coordinator => "coordinator",
            Self::Observer => "observer",
            Self::Resident => "resident",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Supervisor => "Supervisor",
            Self::Coordinator => "Coordinator",
            Self::Observer => "Observer",
            Self::Resident => "Resident",
        }
    }

    /// Check whether this role is strictly more senior than `other`.
    ///
    /// This is the check gating subordinate management: an actor may only
    /// create or deactivate members whose role it outranks.
    pub const fn outranks(&self, other: Role) -> bool {
        self.ordinal() < other.ordinal()
    }

    /// Check whether this role is at least as senior as `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_rbac::Role;
    ///
    /// assert!(Role::Supervisor.rank_at_least(Role::Supervisor));
    /// assert!(Role::Administrator.rank_at_least(Role::Coordinator));
    /// assert!(!Role::Observer.rank_at_least(Role::Coordinator));
    /// ```
    pub const fn rank_at_least(&self, threshold: Role) -> bool {
        self.ordinal() <= threshold.ordinal()
    }

    /// All roles strictly below this one, ordered by descending seniority.
    ///
    /// This is the set of roles an actor with this role is permitted to
    /// assign to subordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_rbac::Role;
    ///
    /// let below = Role::Coordinator.roles_below();
    /// assert_eq!(below, vec![Role::Observer, Role::Resident]);
    /// assert!(Role::Resident.roles_below().is_empty());
    /// ```
    pub fn roles_below(&self) -> Vec<Role> {
        Role::all()
            .into_iter()
            .filter(|candidate| self.outranks(*candidate))
            .collect()
    }
}
