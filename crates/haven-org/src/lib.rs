//! # Haven Organization Management
//!
//! This crate provides the tenant-side domain model for the Haven platform:
//! organizations, the sites they contain, and the staff directory of
//! identities and role profiles.
//!
//! ## Overview
//!
//! The haven-org crate handles:
//! - **Entities**: `Identity`, `Profile`, `Organization`, `Site`
//! - **Stores**: async persistence seams with an in-memory implementation
//! - **Contact binding**: resolving and updating which identity is the
//!   contact person responsible for an organization or a site
//!
//! ## Architecture
//!
//! ```text
//! Organization ── contact_person ──> Identity <── Profile (role)
//!   └─ Site ───── contact_person ──> Identity
//! ```
//!
//! Which resource kind a role binds to comes from `haven-rbac`
//! (Supervisor↔Organization, Coordinator↔Site). The [`BindingResolver`]
//! keeps that polymorphic binding consistent as staff are hired,
//! reassigned, or deactivated.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use haven_org::{BindingResolver, MemoryDirectory, Organization};
//! use haven_rbac::ResourceKind;
//!
//! # async fn demo() -> Result<(), haven_org::StoreError> {
//! let directory = Arc::new(MemoryDirectory::new());
//! let resolver = BindingResolver::new(directory.clone(), directory.clone());
//!
//! // Organizations with no contact person, ready to be assigned.
//! let open = resolver
//!     .unassigned_resources(ResourceKind::Organization, None)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Persistence
//!
//! All storage goes through the traits in [`store`]; the relational backend
//! lives outside this crate. [`MemoryDirectory`] implements every trait for
//! tests and single-process use.

pub mod identity;
pub mod memory;
pub mod organization;
pub mod resolver;
pub mod resource;
pub mod site;
pub mod store;

// Re-export main types for convenience
pub use identity::{Identity, Profile};
pub use memory::MemoryDirectory;
pub use organization::Organization;
pub use resolver::BindingResolver;
pub use resource::ContactResource;
pub use site::Site;
pub use store::{
    IdentityStore, OrganizationStore, ProfileStore, ResourceSummary, SiteStore, StoreError,
    StoreResult,
};
