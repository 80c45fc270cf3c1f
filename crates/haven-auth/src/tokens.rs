//! Single-use credential tokens
//!
//! An opaque token bound to one identity enables exactly one credential
//! write: redeeming an invitation or completing a password reset. Tokens
//! are invalidated only by consumption: redemption deletes every token
//! bound to the identity. There is no time-based expiry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use haven_org::StoreResult;

/// What a credential token was issued for.
///
/// Redemption treats both kinds identically; the kind records intent and
/// selects the outbound template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Issued when a member is invited
    Invitation,
    /// Issued after a verified password-reset code
    PasswordReset,
}

impl TokenKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Invitation => "invitation",
            TokenKind::PasswordReset => "password_reset",
        }
    }
}

/// A single-use opaque token bound to one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialToken {
    /// The opaque token value (URL-safe, unguessable)
    pub value: String,

    /// The identity this token is bound to
    pub identity_id: Uuid,

    /// What the token was issued for
    pub kind: TokenKind,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,
}

impl CredentialToken {
    /// Issue a fresh token for an identity.
    ///
    /// The value is 32 random bytes, URL-safe base64 encoded, unguessable
    /// for the lifetime of the token.
    pub fn issue(identity_id: Uuid, kind: TokenKind) -> Self {
        let bytes: [u8; 32] = rand::random();
        Self {
            value: URL_SAFE_NO_PAD.encode(bytes),
            identity_id,
            kind,
            issued_at: Utc::now(),
        }
    }
}

/// Persistence seam for credential tokens.
///
/// Lookup is keyed by the opaque value (a unique indexed column in a
/// relational backend).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Return the existing token for (identity, kind), or issue and store
    /// a fresh one.
    ///
    /// Get-or-create semantics make repeated verification idempotent: a
    /// second verify before redemption returns the same token rather than
    /// invalidating the first.
    async fn get_or_create(&self, identity_id: Uuid, kind: TokenKind)
        -> StoreResult<CredentialToken>;

    /// Look up a token by its opaque value.
    async fn by_value(&self, value: &str) -> StoreResult<Option<CredentialToken>>;

    /// Delete every token bound to an identity, returning how many were
    /// removed.
    async fn delete_for_identity(&self, identity_id: Uuid) -> StoreResult<usize>;
}

/// In-memory token store for tests and single-process use.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, CredentialToken>>>,
}

impl MemoryTokenStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_or_create(
        &self,
        identity_id: Uuid,
        kind: TokenKind,
    ) -> StoreResult<CredentialToken> {
        let mut tokens = self.tokens.write().await;
        if let Some(existing) = tokens
            .values()
            .find(|token| token.identity_id == identity_id && token.kind == kind)
        {
            return Ok(existing.clone());
        }

        let token = CredentialToken::issue(identity_id, kind);
        tokens.insert(token.value.clone(), token.clone());
        Ok(token)
    }

    async fn by_value(&self, value: &str) -> StoreResult<Option<CredentialToken>> {
        Ok(self.tokens.read().await.get(value).cloned())
    }

    async fn delete_for_identity(&self, identity_id: Uuid) -> StoreResult<usize> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, token| token.identity_id != identity_id);
        Ok(before - tokens.len())
    }
}
