//! # Haven RBAC (Role-Based Access Control)
//!
//! This crate provides the fixed role registry for the Haven platform,
//! shared across every service that needs to reason about staff authority.
//!
//! ## Overview
//!
//! The haven-rbac crate handles:
//! - **Roles**: The closed five-rank hierarchy governing staff authority
//! - **Rank ordering**: Which roles sit strictly below a given actor
//! - **Resource kinds**: Which kind of resource a role is responsible for
//!
//! ## Rank Model
//!
//! ```text
//! Administrator (1) > Supervisor (2) > Coordinator (3) > Observer (4) > Resident (5)
//! ```
//!
//! Ordinals grow *downward* in authority: a smaller ordinal means a more
//! senior role. Because of that inversion the `Role` enum deliberately does
//! not implement `Ord`; comparisons go through named methods (`outranks`,
//! `rank_at_least`) so call sites read the way the hierarchy works.
//!
//! ## Usage
//!
//! ```rust
//! use haven_rbac::{ResourceKind, Role};
//!
//! // An administrator may act on all four subordinate roles.
//! let below = Role::Administrator.roles_below();
//! assert_eq!(below.len(), 4);
//!
//! // Supervisors are responsible for organizations, coordinators for sites.
//! assert_eq!(Role::Supervisor.resource_kind(), Some(ResourceKind::Organization));
//! assert_eq!(Role::Coordinator.resource_kind(), Some(ResourceKind::Site));
//! assert_eq!(Role::Resident.resource_kind(), None);
//! ```
//!
//! ## Integration
//!
//! This crate is the workspace leaf: `haven-org` selects bindable resources
//! through the role→kind mapping, and `haven-auth` evaluates role and rank
//! predicates against session claims.

pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use resources::ResourceKind;
pub use roles::Role;
