//! Persistence seams
//!
//! This module defines the async store traits the rest of the workspace
//! depends on. The relational backend lives outside this subsystem; these
//! traits state exactly the CRUD and filtered reads it must provide, plus
//! the atomicity contracts the binding resolver relies on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use haven_rbac::Role;

use crate::identity::{Identity, Profile};
use crate::organization::Organization;
use crate::site::Site;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An identity with this email already exists
    #[error("an identity with email {0} already exists")]
    DuplicateEmail(String),

    /// The identity already holds a profile with this role
    #[error("identity {identity_id} already holds a {role:?} profile")]
    DuplicateProfile {
        /// The identity in question
        identity_id: Uuid,
        /// The role already held
        role: Role,
    },

    /// No record with the given ID
    #[error("no such record: {0}")]
    Missing(Uuid),

    /// Backend failure (connection, constraint, serialization)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A minimal (id, name) projection of a bindable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Resource ID
    pub id: Uuid,
    /// Resource display name
    pub name: String,
}

/// Persistence seam for identities.
///
/// Email is a unique indexed field: inserts with a duplicate email fail
/// with [`StoreError::DuplicateEmail`].
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity.
    async fn insert_identity(&self, identity: Identity) -> StoreResult<Identity>;

    /// Fetch an identity by ID.
    async fn identity_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>>;

    /// Fetch an identity by its unique email.
    async fn identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;

    /// Persist changes to an existing identity.
    ///
    /// Writes are read-modify-write atomic per identity: security-code
    /// rotation and later comparison are strictly ordered.
    async fn update_identity(&self, identity: &Identity) -> StoreResult<()>;
}

/// Persistence seam for role profiles.
///
/// The (identity, role) pair is unique: inserts violating that fail with
/// [`StoreError::DuplicateProfile`].
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a new profile.
    async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile>;

    /// Fetch a profile by ID.
    async fn profile_by_id(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    /// All profiles held by an identity, oldest first.
    async fn profiles_for_identity(&self, identity_id: Uuid) -> StoreResult<Vec<Profile>>;

    /// All profiles granting a given role.
    async fn profiles_for_role(&self, role: Role) -> StoreResult<Vec<Profile>>;
}

/// Persistence seam for organizations.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Insert a new organization.
    async fn insert_organization(&self, organization: Organization) -> StoreResult<Organization>;

    /// Fetch an organization by ID.
    async fn organization_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    /// Persist changes to an existing organization.
    async fn update_organization(&self, organization: &Organization) -> StoreResult<()>;

    /// Organizations with no contact person, ordered by name.
    ///
    /// The listing is exhaustive; no pagination.
    async fn unassigned_organizations(&self) -> StoreResult<Vec<ResourceSummary>>;

    /// Set (or clear) the contact person on one organization.
    ///
    /// Row-atomic. A missing ID is a silent no-op so that member creation
    /// stays idempotent under races.
    async fn set_organization_contact(
        &self,
        organization_id: Uuid,
        contact: Option<Uuid>,
    ) -> StoreResult<()>;

    /// Clear the contact person on every organization referencing the
    /// identity. One logical operation: no partially-cleared state is
    /// observable.
    async fn clear_organization_contacts(&self, identity_id: Uuid) -> StoreResult<()>;
}

/// Persistence seam for sites.
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Insert a new site.
    async fn insert_site(&self, site: Site) -> StoreResult<Site>;

    /// Fetch a site by ID.
    async fn site_by_id(&self, id: Uuid) -> StoreResult<Option<Site>>;

    /// Persist changes to an existing site.
    async fn update_site(&self, site: &Site) -> StoreResult<()>;

    /// Sites with no contact person, ordered by name, optionally narrowed
    /// to one parent organization.
    async fn unassigned_sites(
        &self,
        within_organization: Option<Uuid>,
    ) -> StoreResult<Vec<ResourceSummary>>;

    /// Set (or clear) the contact person on one site.
    ///
    /// Row-atomic; missing ID is a silent no-op.
    async fn set_site_contact(&self, site_id: Uuid, contact: Option<Uuid>) -> StoreResult<()>;

    /// Clear the contact person on every site referencing the identity.
    async fn clear_site_contacts(&self, identity_id: Uuid) -> StoreResult<()>;
}
