//! In-memory directory
//!
//! This module provides an in-memory implementation of every store trait.
//! It is suitable for tests and single-process use; production deployments
//! back the traits with a relational store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;
use haven_rbac::Role;

use crate::identity::{Identity, Profile};
use crate::organization::Organization;
use crate::site::Site;
use crate::store::{
    IdentityStore, OrganizationStore, ProfileStore, ResourceSummary, SiteStore, StoreError,
    StoreResult,
};

/// In-memory implementation of the directory stores.
///
/// Every trait method takes a single write or read lock on the table it
/// touches, which gives the row-atomicity the store contracts ask for.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use haven_org::MemoryDirectory;
///
/// let directory = Arc::new(MemoryDirectory::new());
/// ```
pub struct MemoryDirectory {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
    organizations: Arc<RwLock<HashMap<Uuid, Organization>>>,
    sites: Arc<RwLock<HashMap<Uuid, Site>>>,
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory").finish()
    }
}

impl MemoryDirectory {
    /// Create a new, empty directory.
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            organizations: Arc::new(RwLock::new(HashMap::new())),
            sites: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn summarize(mut entries: Vec<ResourceSummary>) -> Vec<ResourceSummary> {
        entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        entries
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MemoryDirectory {
    async fn insert_identity(&self, identity: Identity) -> StoreResult<Identity> {
        let mut identities = self.identities.write().await;
        if identities
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&identity.email))
        {
            return Err(StoreError::DuplicateEmail(identity.email));
        }
        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn identity_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        Ok(self.identities.read().await.get(&id).cloned())
    }

    async fn identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_identity(&self, identity: &Identity) -> StoreResult<()> {
        let mut identities = self.identities.write().await;
        match identities.get_mut(&identity.id) {
            Some(stored) => {
                *stored = identity.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(identity.id)),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryDirectory {
    async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile> {
        let mut profiles = self.profiles.write().await;
        if profiles
            .values()
            .any(|existing| existing.identity_id == profile.identity_id && existing.role == profile.role)
        {
            return Err(StoreError::DuplicateProfile {
                identity_id: profile.identity_id,
                role: profile.role,
            });
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn profile_by_id(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn profiles_for_identity(&self, identity_id: Uuid) -> StoreResult<Vec<Profile>> {
        let mut matching: Vec<Profile> = self
            .profiles
            .read()
            .await
            .values()
            .filter(|profile| profile.identity_id == identity_id)
            .cloned()
            .collect();
        matching.sort_by_key(|profile| profile.created_at);
        Ok(matching)
    }

    async fn profiles_for_role(&self, role: Role) -> StoreResult<Vec<Profile>> {
        let mut matching: Vec<Profile> = self
            .profiles
            .read()
            .await
            .values()
            .filter(|profile| profile.role == role)
            .cloned()
            .collect();
        matching.sort_by_key(|profile| profile.created_at);
        Ok(matching)
    }
}

#[async_trait]
impl OrganizationStore for MemoryDirectory {
    async fn insert_organization(&self, organization: Organization) -> StoreResult<Organization> {
        self.organizations
            .write()
            .await
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn organization_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn update_organization(&self, organization: &Organization) -> StoreResult<()> {
        let mut organizations = self.organizations.write().await;
        match organizations.get_mut(&organization.id) {
            Some(stored) => {
                *stored = organization.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(organization.id)),
        }
    }

    async fn unassigned_organizations(&self) -> StoreResult<Vec<ResourceSummary>> {
        let entries = self
            .organizations
            .read()
            .await
            .values()
            .filter(|org| org.contact_person.is_none())
            .map(|org| ResourceSummary {
                id: org.id,
                name: org.name.clone(),
            })
            .collect();
        Ok(Self::summarize(entries))
    }

    async fn set_organization_contact(
        &self,
        organization_id: Uuid,
        contact: Option<Uuid>,
    ) -> StoreResult<()> {
        let mut organizations = self.organizations.write().await;
        if let Some(org) = organizations.get_mut(&organization_id) {
            org.contact_person = contact;
            org.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn clear_organization_contacts(&self, identity_id: Uuid) -> StoreResult<()> {
        let mut organizations = self.organizations.write().await;
        for org in organizations.values_mut() {
            if org.contact_person == Some(identity_id) {
                org.contact_person = None;
                org.updated_at = chrono::Utc::now();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SiteStore for MemoryDirectory {
    async fn insert_site(&self, site: Site) -> StoreResult<Site> {
        self.sites.write().await.insert(site.id, site.clone());
        Ok(site)
    }

    async fn site_by_id(&self, id: Uuid) -> StoreResult<Option<Site>> {
        Ok(self.sites.read().await.get(&id).cloned())
    }

    async fn update_site(&self, site: &Site) -> StoreResult<()> {
        let mut sites = self.sites.write().await;
        match sites.get_mut(&site.id) {
            Some(stored) => {
                *stored = site.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(site.id)),
        }
    }

    async fn unassigned_sites(
        &self,
        within_organization: Option<Uuid>,
    ) -> StoreResult<Vec<ResourceSummary>> {
        let entries = self
            .sites
            .read()
            .await
            .values()
            .filter(|site| site.contact_person.is_none())
            .filter(|site| within_organization.map_or(true, |org| site.organization_id == org))
            .map(|site| ResourceSummary {
                id: site.id,
                name: site.name.clone(),
            })
            .collect();
        Ok(Self::summarize(entries))
    }

    async fn set_site_contact(&self, site_id: Uuid, contact: Option<Uuid>) -> StoreResult<()> {
        let mut sites = self.sites.write().await;
        if let Some(site) = sites.get_mut(&site_id) {
            site.contact_person = contact;
            site.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn clear_site_contacts(&self, identity_id: Uuid) -> StoreResult<()> {
        let mut sites = self.sites.write().await;
        for site in sites.values_mut() {
            if site.contact_person == Some(identity_id) {
                site.contact_person = None;
                site.updated_at = chrono::Utc::now();
            }
        }
        Ok(())
    }
}
