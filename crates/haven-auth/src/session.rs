//! Sign-in and session issuance
//!
//! Exchanges email + password for a signed session token pinning one
//! profile. Unknown accounts, inactive accounts, and bad passwords all
//! produce the same generic denial.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use haven_org::{IdentityStore, ProfileStore};

use crate::claims::SessionClaims;
use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;
use crate::password::verify_credential;

/// A freshly issued session: the signed token plus the claims inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedSession {
    /// The signed session token
    pub token: String,
    /// The claims the token carries
    pub claims: SessionClaims,
}

/// Sign-in service.
pub struct Sessions {
    jwt: JwtService,
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl std::fmt::Debug for Sessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sessions").finish()
    }
}

impl Sessions {
    /// Create a sign-in service over the codec and directory stores.
    pub fn new(
        jwt: JwtService,
        identities: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            jwt,
            identities,
            profiles,
        }
    }

    /// Exchange credentials for a signed session.
    ///
    /// When `profile_id` is given it must belong to the identity;
    /// otherwise the identity's oldest profile is pinned.
    ///
    /// # Errors
    ///
    /// [`AuthError::Denied`] for unknown email, inactive account, or
    /// wrong password: one generic message for all three.
    /// [`AuthError::Validation`] when the requested profile does not
    /// belong to the identity.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        profile_id: Option<Uuid>,
    ) -> AuthResult<SignedSession> {
        let identity = self
            .identities
            .identity_by_email(email)
            .await?
            .ok_or(AuthError::Denied)?;

        if !identity.is_active {
            debug!(identity = %identity.id, "sign-in refused: inactive account");
            return Err(AuthError::Denied);
        }

        let hash = identity.credential_hash.as_deref().ok_or(AuthError::Denied)?;
        if !verify_credential(password, hash) {
            return Err(AuthError::Denied);
        }

        let profiles = self.profiles.profiles_for_identity(identity.id).await?;
        let profile = match profile_id {
            Some(requested) => profiles
                .iter()
                .find(|profile| profile.id == requested)
                .ok_or_else(|| AuthError::validation("there is no such profile"))?,
            None => profiles
                .first()
                .ok_or_else(|| AuthError::validation("identity holds no profiles"))?,
        };

        let claims = SessionClaims::new(
            identity.id,
            profile.id,
            profile.role,
            self.jwt.config().session_duration,
        );
        let token = self.jwt.issue(&claims)?;

        Ok(SignedSession { token, claims })
    }

    /// Verify a bearer token and return the authenticated claims.
    ///
    /// This is the Unauthenticated → Authenticated transition; policy
    /// evaluation takes the claims from here.
    pub fn authenticate(&self, token: &str) -> AuthResult<SessionClaims> {
        self.jwt.verify(token)
    }
}
