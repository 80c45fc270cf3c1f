//! # Haven Member Lifecycle
//!
//! This crate manages staff identities across their whole lifecycle:
//! invitation, activation, deactivation, and the resource bindings that
//! follow them around.
//!
//! ## Overview
//!
//! The haven-members crate handles:
//! - **Creation**: rank-checked member creation with invitation dispatch
//!   and contact-person binding
//! - **Bootstrap**: the administrative account created outside the
//!   invitation flow
//! - **Activation state**: idempotent activate/deactivate, with
//!   deactivation cascading through the binding resolver
//! - **Resource assignment**: listing unassigned resources per role and
//!   the safety/edit operations on organizations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use haven_members::{MemberService, NewMember};
//! use haven_rbac::Role;
//!
//! # async fn demo(service: MemberService, claims: haven_auth::SessionClaims,
//! #               site_id: uuid::Uuid) -> haven_auth::AuthResult<()> {
//! let created = service
//!     .create_member(
//!         &claims,
//!         NewMember::new("coord@example.com", Role::Coordinator).with_resource(site_id),
//!     )
//!     .await?;
//! assert!(!created.identity.is_active); // active once confirmed
//! # Ok(())
//! # }
//! ```
//!
//! ## Integration
//!
//! Built on `haven-rbac` (rank checks), `haven-org` (directory stores and
//! the binding resolver), and `haven-auth` (policy evaluation, invitation
//! tokens, credential hashing).

pub mod lifecycle;

// Re-export main types
pub use lifecycle::{
    CreatedMember, MemberService, MemberSummary, NewMember, OrganizationEdit, ProfileInfoEdit,
};
