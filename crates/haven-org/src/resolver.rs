//! Contact-person binding resolver
//!
//! This module keeps the polymorphic "resource a role is responsible for"
//! binding consistent. It resolves a resource kind to the right store,
//! lists resources still waiting for a contact person, and performs the
//! bind/unbind updates driven by the member lifecycle.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use haven_rbac::ResourceKind;

use crate::store::{OrganizationStore, ResourceSummary, SiteStore, StoreResult};

/// Resolves and updates contact-person bindings for both resource kinds.
///
/// The resolver holds the two resource stores and dispatches on
/// [`ResourceKind`] rather than on concrete entity types, so callers never
/// branch per kind themselves.
///
/// # Binding semantics
///
/// - Binding to a missing resource is a silent no-op, which keeps member
///   creation idempotent under races.
/// - Binding to a resource that already has a contact person silently
///   overwrites the previous assignment (last writer wins).
/// - Unbinding clears every reference to the identity across both kinds as
///   one logical operation.
pub struct BindingResolver {
    organizations: Arc<dyn OrganizationStore>,
    sites: Arc<dyn SiteStore>,
}

impl std::fmt::Debug for BindingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingResolver").finish()
    }
}

impl BindingResolver {
    /// Create a resolver over the two resource stores.
    pub fn new(organizations: Arc<dyn OrganizationStore>, sites: Arc<dyn SiteStore>) -> Self {
        Self {
            organizations,
            sites,
        }
    }

    /// Resources of the given kind whose contact person is unset.
    ///
    /// `within_organization` narrows a site listing to one parent
    /// organization; it has no effect on organization listings. The result
    /// is stable (name-ordered) and exhaustive.
    pub async fn unassigned_resources(
        &self,
        kind: ResourceKind,
        within_organization: Option<Uuid>,
    ) -> StoreResult<Vec<ResourceSummary>> {
        match kind {
            ResourceKind::Organization => self.organizations.unassigned_organizations().await,
            ResourceKind::Site => self.sites.unassigned_sites(within_organization).await,
        }
    }

    /// Set the contact person on exactly one resource.
    ///
    /// A missing resource ID is a no-op; an occupied resource is
    /// overwritten. The underlying store performs the update row-atomically.
    pub async fn bind_contact_person(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        identity_id: Uuid,
    ) -> StoreResult<()> {
        debug!(%resource_id, %identity_id, kind = kind.as_str(), "binding contact person");
        match kind {
            ResourceKind::Organization => {
                self.organizations
                    .set_organization_contact(resource_id, Some(identity_id))
                    .await
            }
            ResourceKind::Site => {
                self.sites
                    .set_site_contact(resource_id, Some(identity_id))
                    .await
            }
        }
    }

    /// Clear the contact person on every organization and site referencing
    /// the identity.
    pub async fn unbind_all(&self, identity_id: Uuid) -> StoreResult<()> {
        debug!(%identity_id, "clearing contact-person bindings");
        self.organizations
            .clear_organization_contacts(identity_id)
            .await?;
        self.sites.clear_site_contacts(identity_id).await
    }
}
