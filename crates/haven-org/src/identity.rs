//! Staff identity and role profiles
//!
//! This module provides the person-level entities: an `Identity` is one
//! account (credential plus contact info), and a `Profile` grants that
//! identity one role. An identity may hold several profiles, but at most
//! one per role; the session credential pins a single profile for the
//! lifetime of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haven_rbac::Role;

/// A person account.
///
/// Identities are created unconfirmed by the member lifecycle (invited
/// staff) or active immediately by administrative bootstrap. They are never
/// hard-deleted: deactivation is the terminal state reachable from active.
///
/// # Examples
///
/// ```
/// use haven_org::Identity;
///
/// let identity = Identity::new("sup@example.com").with_name("Ada", "Quinn");
/// assert!(!identity.is_active);
/// assert_eq!(identity.full_name(), "Ada Quinn");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier
    pub id: Uuid,

    /// Unique email address (the sign-in name)
    pub email: String,

    /// Argon2 credential hash; `None` until the invitation is redeemed
    pub credential_hash: Option<String>,

    /// First name
    pub first_name: Option<String>,

    /// Last name
    pub last_name: Option<String>,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Reference to the profile image in external storage
    pub avatar_url: Option<String>,

    /// Crop coordinates for the profile image
    pub avatar_crop: Option<serde_json::Value>,

    /// Whether the account may sign in
    pub is_active: bool,

    /// Latest one-time security code; regeneration invalidates prior codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_code: Option<String>,

    /// When the identity was created
    pub created_at: DateTime<Utc>,

    /// When the identity was last updated
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Creates a new, unconfirmed identity.
    ///
    /// The identity is created with:
    /// - A newly generated UUID v7 ID
    /// - No credential hash (set when an invitation or reset is redeemed)
    /// - Inactive status; activation is an explicit lifecycle action
    ///
    /// # Arguments
    ///
    /// * `email` - The unique sign-in email address
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            credential_hash: None,
            first_name: None,
            last_name: None,
            phone_number: None,
            avatar_url: None,
            avatar_crop: None,
            is_active: false,
            security_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Set the contact phone number.
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Set the credential hash.
    pub fn with_credential_hash(mut self, hash: impl Into<String>) -> Self {
        self.credential_hash = Some(hash.into());
        self
    }

    /// Mark the identity active.
    pub fn activated(mut self) -> Self {
        self.is_active = true;
        self
    }

    /// Full display name, falling back to the email when names are unset.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }

    /// Replace the stored security code, invalidating any previous one.
    pub fn rotate_security_code(&mut self, code: impl Into<String>) {
        self.security_code = Some(code.into());
        self.updated_at = Utc::now();
    }
}

/// The (identity, role) binding granting a rank.
///
/// An identity may hold more than one profile, one per distinct role,
/// and the profile store enforces uniqueness on the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile ID
    pub id: Uuid,

    /// The identity holding this profile
    pub identity_id: Uuid,

    /// The granted role
    pub role: Role,

    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Creates a new profile binding an identity to a role.
    pub fn new(identity_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            identity_id,
            role,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_identity_is_unconfirmed() {
        let identity = Identity::new("new@example.com");
        assert!(!identity.is_active);
        assert!(identity.credential_hash.is_none());
        assert!(identity.security_code.is_none());
    }

    #[test]
    fn test_full_name_fallbacks() {
        let identity = Identity::new("solo@example.com");
        assert_eq!(identity.full_name(), "solo@example.com");

        let named = Identity::new("n@example.com").with_name("Ada", "Quinn");
        assert_eq!(named.full_name(), "Ada Quinn");
    }

    #[test]
    fn test_rotate_security_code_replaces_previous() {
        let mut identity = Identity::new("code@example.com");
        identity.rotate_security_code("111111");
        identity.rotate_security_code("222222");
        assert_eq!(identity.security_code.as_deref(), Some("222222"));
    }

    #[test]
    fn test_profile_creation() {
        let identity_id = Uuid::now_v7();
        let profile = Profile::new(identity_id, Role::Coordinator);
        assert_eq!(profile.identity_id, identity_id);
        assert_eq!(profile.role, Role::Coordinator);
    }
}
