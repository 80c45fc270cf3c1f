//! Session claims
//!
//! This module defines the signed session credential carried by every
//! inbound request. The credential pins one profile, and therefore one
//! role, for the lifetime of a session; protected operations read the
//! role from these claims rather than re-fetching it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haven_rbac::Role;

/// Claims carried in a signed session token.
///
/// The claim set is the minimum the platform needs (identity, pinned
/// profile, role) plus the standard JWT fields. The token is opaque to
/// everything outside the codec; consumers only read these three values.
///
/// # Example
///
/// ```rust
/// use haven_auth::SessionClaims;
/// use haven_rbac::Role;
/// use uuid::Uuid;
///
/// let claims = SessionClaims::new(
///     Uuid::now_v7(),
///     Uuid::now_v7(),
///     Role::Supervisor,
///     chrono::Duration::hours(8),
/// );
/// assert!(!claims.is_expired());
/// assert_eq!(claims.role, Role::Supervisor);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    // Standard JWT claims (RFC 7519)
    /// Subject (identity ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    // Platform-specific claims
    /// The profile pinned for this session
    pub profile_id: Uuid,

    /// The pinned profile's role
    pub role: Role,
}

impl SessionClaims {
    /// Create new session claims pinning one profile.
    ///
    /// # Arguments
    ///
    /// * `identity_id` - The identity signing in
    /// * `profile_id` - The profile pinned for this session
    /// * `role` - The pinned profile's role
    /// * `duration` - Session validity duration
    pub fn new(identity_id: Uuid, profile_id: Uuid, role: Role, duration: chrono::Duration) -> Self {
        let now = Utc::now();
        let exp = now + duration;

        Self {
            sub: identity_id.to_string(),
            iss: "haven-platform".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            profile_id,
            role,
        }
    }

    /// Get the identity ID as a UUID.
    pub fn identity_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get the expiration as a DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
