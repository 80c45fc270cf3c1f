//! Credential lifecycle flows
//!
//! Two flows share the single-use token primitive:
//!
//! - **Password reset**: `Requested → CodeIssued → CodeVerified(Token) →
//!   Consumed`. A request rotates the identity's security code and mails
//!   it out-of-band; verifying the code yields a reset token; redeeming
//!   the token writes the new credential and consumes every token bound
//!   to the identity.
//! - **Invitation**: a token issued at member creation; redemption is the
//!   same path as reset redemption.

use std::sync::Arc;

use rand::Rng;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use haven_org::{Identity, IdentityStore};

use crate::dispatch::{Dispatcher, TEMPLATE_INVITATION, TEMPLATE_SECURITY_CODE};
use crate::error::{AuthError, AuthResult};
use crate::password::{hash_credential, validate_strength};
use crate::tokens::{CredentialToken, TokenKind, TokenStore};

/// Number of digits in a security code.
pub const SECURITY_CODE_LENGTH: u32 = 6;

/// Generate a fresh security code: six decimal digits, uniformly random.
///
/// Codes are not unique across identities; unguessability over the
/// lifetime of one reset attempt is all that is required.
pub fn generate_security_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..10u32.pow(SECURITY_CODE_LENGTH));
    format!("{:0width$}", code, width = SECURITY_CODE_LENGTH as usize)
}

/// Issues, verifies, and redeems credential tokens and security codes.
pub struct CredentialService {
    identities: Arc<dyn IdentityStore>,
    tokens: Arc<dyn TokenStore>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService").finish()
    }
}

impl CredentialService {
    /// Create a service over the identity store, token store, and
    /// outbound dispatcher.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        tokens: Arc<dyn TokenStore>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            identities,
            tokens,
            dispatcher,
        }
    }

    /// Start a password reset for the given email.
    ///
    /// Rotates the identity's security code (only the latest code
    /// verifies) and dispatches it out-of-band. The success response
    /// carries no code; dispatch is best-effort and cannot fail the
    /// request.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotFound`] when no identity matches the email.
    pub async fn request_reset(&self, email: &str) -> AuthResult<()> {
        let mut identity = self
            .identities
            .identity_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("there is no account with that email".into()))?;

        let code = generate_security_code();
        identity.rotate_security_code(code.clone());
        self.identities.update_identity(&identity).await?;

        debug!(identity = %identity.id, "security code rotated");
        self.dispatcher
            .send_message(
                &identity.email,
                TEMPLATE_SECURITY_CODE,
                json!({
                    "first_name": identity.first_name,
                    "last_name": identity.last_name,
                    "security_code": code,
                }),
            )
            .await;

        Ok(())
    }

    /// Verify a security code and return the reset token.
    ///
    /// Get-or-create semantics: verifying twice before redemption returns
    /// the same token rather than invalidating the first.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotFound`] when no identity matches the email;
    /// [`AuthError::Denied`] when the code does not match the latest one
    /// issued (the message does not say which).
    pub async fn verify_code(&self, email: &str, code: &str) -> AuthResult<CredentialToken> {
        let identity = self
            .identities
            .identity_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("there is no account with that email".into()))?;

        if identity.security_code.as_deref() != Some(code) {
            return Err(AuthError::Denied);
        }

        self.tokens
            .get_or_create(identity.id, TokenKind::PasswordReset)
            .await
            .map_err(AuthError::from)
    }

    /// Redeem a credential token, writing a new credential.
    ///
    /// Invitation and reset tokens are treated identically here. On
    /// success the redeemed token, and every other token bound to the
    /// identity, is deleted, so a second redemption fails.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] when the confirmation does not match,
    /// the token is unknown, or the credential fails the strength chain
    /// (all violated rules are reported together).
    pub async fn redeem(
        &self,
        token_value: &str,
        new_credential: &str,
        confirm_credential: &str,
    ) -> AuthResult<()> {
        if new_credential != confirm_credential {
            return Err(AuthError::validation("passwords do not match"));
        }

        let token = self
            .tokens
            .by_value(token_value)
            .await?
            .ok_or_else(|| AuthError::validation("invalid token"))?;

        let mut identity = self
            .identities
            .identity_by_id(token.identity_id)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "token {} bound to unknown identity {}",
                    token.value, token.identity_id
                ))
            })?;

        validate_strength(new_credential)?;

        identity.credential_hash = Some(hash_credential(new_credential)?);
        identity.updated_at = chrono::Utc::now();
        self.identities.update_identity(&identity).await?;

        let removed = self.tokens.delete_for_identity(identity.id).await?;
        info!(identity = %identity.id, removed, kind = token.kind.as_str(), "credential token redeemed");

        Ok(())
    }

    /// Issue the invitation token for a newly created member and dispatch
    /// it out-of-band.
    pub async fn send_invitation(&self, identity: &Identity) -> AuthResult<CredentialToken> {
        let token = self
            .tokens
            .get_or_create(identity.id, TokenKind::Invitation)
            .await?;

        self.dispatcher
            .send_message(
                &identity.email,
                TEMPLATE_INVITATION,
                json!({
                    "first_name": identity.first_name,
                    "last_name": identity.last_name,
                    "token": token.value,
                }),
            )
            .await;

        Ok(token)
    }

    /// Issue (or fetch) the invitation token without dispatching it.
    ///
    /// Bootstrap creation uses this: the account needs a redeemable token
    /// but no outbound mail.
    pub async fn issue_invitation_quietly(
        &self,
        identity: &Identity,
    ) -> AuthResult<CredentialToken> {
        self.tokens
            .get_or_create(identity.id, TokenKind::Invitation)
            .await
            .map_err(AuthError::from)
    }

    /// The identity a token is bound to, if the token exists.
    pub async fn token_holder(&self, token_value: &str) -> AuthResult<Option<Uuid>> {
        Ok(self
            .tokens
            .by_value(token_value)
            .await?
            .map(|token| token.identity_id))
    }
}
