//! Site domain model
//!
//! A site is a physical building belonging to exactly one organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical site under one parent organization.
///
/// Like an organization, a site can name at most one identity as its
/// contact person, by convention one holding a Coordinator profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier
    pub id: Uuid,

    /// Parent organization
    pub organization_id: Uuid,

    /// Human-readable name
    pub name: String,

    /// Two-letter state code
    pub state: String,

    /// Street address
    pub address: String,

    /// Contact person (an identity), if assigned
    pub contact_person: Option<Uuid>,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Whether the safety lock is engaged
    pub safety_status: bool,

    /// When the site was created
    pub created_at: DateTime<Utc>,

    /// When the site was last updated
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// Creates a new site under the given organization, with no contact
    /// person and the safety lock engaged.
    pub fn new(
        organization_id: Uuid,
        name: impl Into<String>,
        state: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            name: name.into(),
            state: state.into(),
            address: address.into(),
            contact_person: None,
            phone_number: None,
            safety_status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the contact phone number.
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Flip the safety lock and return the new state.
    pub fn toggle_safety(&mut self) -> bool {
        self.safety_status = !self.safety_status;
        self.updated_at = Utc::now();
        self.safety_status
    }
}
