//! Contact-person capability
//!
//! Both resource kinds can carry a contact person. The `ContactResource`
//! trait is the single seam through which authorization and binding code
//! reason about "the resource a role is responsible for", replacing
//! per-kind conditional dispatch.

use uuid::Uuid;

use haven_rbac::ResourceKind;

use crate::organization::Organization;
use crate::site::Site;

/// A resource that can name one identity as its contact person.
///
/// Implemented by [`Organization`] and [`Site`]. The evaluator uses
/// [`ContactResource::contact_person`] for ownership checks; the binding
/// resolver uses the mutators and keeps the role↔kind convention.
pub trait ContactResource {
    /// The kind of this resource.
    fn kind(&self) -> ResourceKind;

    /// The resource's unique ID.
    fn resource_id(&self) -> Uuid;

    /// The resource's display name.
    fn name(&self) -> &str;

    /// The currently assigned contact person, if any.
    fn contact_person(&self) -> Option<Uuid>;

    /// Assign a contact person, replacing any previous assignment.
    fn assign_contact(&mut self, identity_id: Uuid);

    /// Clear the contact person.
    fn clear_contact(&mut self);
}

impl ContactResource for Organization {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Organization
    }

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn contact_person(&self) -> Option<Uuid> {
        self.contact_person
    }

    fn assign_contact(&mut self, identity_id: Uuid) {
        self.contact_person = Some(identity_id);
        self.updated_at = chrono::Utc::now();
    }

    fn clear_contact(&mut self) {
        self.contact_person = None;
        self.updated_at = chrono::Utc::now();
    }
}

impl ContactResource for Site {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Site
    }

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn contact_person(&self) -> Option<Uuid> {
        self.contact_person
    }

    fn assign_contact(&mut self, identity_id: Uuid) {
        self.contact_person = Some(identity_id);
        self.updated_at = chrono::Utc::now();
    }

    fn clear_contact(&mut self) {
        self.contact_person = None;
        self.updated_at = chrono::Utc::now();
    }
}
