//! Organization domain model
//!
//! This module provides the Organization entity: the top-level tenant unit
//! holding sites and a nullable contact person.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant organization.
///
/// Each organization can name at most one identity as its contact person,
/// by convention an identity holding a Supervisor profile. The binding is
/// maintained by the resolver, not stored as a constraint.
///
/// # Examples
///
/// ```
/// use haven_org::Organization;
///
/// let org = Organization::new("Maple Commons", "VT", "12 Orchard Way");
/// assert!(org.safety_status);
/// assert!(org.contact_person.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// Two-letter state code
    pub state: String,

    /// Postal code
    pub zip_code: Option<String>,

    /// Street address
    pub address: String,

    /// Contact person (an identity), if assigned
    pub contact_person: Option<Uuid>,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Reference to the logo image in external storage
    pub logo_url: Option<String>,

    /// Crop coordinates for the logo image
    pub logo_crop: Option<serde_json::Value>,

    /// Whether the safety lock is engaged
    pub safety_status: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization with no contact person.
    ///
    /// The organization is created with:
    /// - A newly generated UUID v7 ID
    /// - Safety lock engaged
    /// - Current timestamp for created_at and updated_at
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `state` - Two-letter state code
    /// * `address` - Street address
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            state: state.into(),
            zip_code: None,
            address: address.into(),
            contact_person: None,
            phone_number: None,
            description: None,
            logo_url: None,
            logo_crop: None,
            safety_status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the postal code.
    pub fn with_zip_code(mut self, zip: impl Into<String>) -> Self {
        self.zip_code = Some(zip.into());
        self
    }

    /// Set the contact phone number.
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Flip the safety lock and return the new state.
    pub fn toggle_safety(&mut self) -> bool {
        self.safety_status = !self.safety_status;
        self.updated_at = Utc::now();
        self.safety_status
    }
}
