//! Session token codec
//!
//! This module signs and verifies the session credential using the
//! jsonwebtoken crate (HS256). The claims are tamper-evident: role and
//! profile come out of a verified signature, never out of mutable state.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};

use crate::claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

/// Codec configuration for session tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,

    /// Token issuer
    pub issuer: String,

    /// Session validity duration
    pub session_duration: chrono::Duration,
}

impl JwtConfig {
    /// Create a configuration with the default issuer and an 8-hour
    /// session.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "haven-platform".to_string(),
            session_duration: chrono::Duration::hours(8),
        }
    }
}

/// Service signing and verifying session tokens.
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtService {
    /// Create a new codec with the given configuration.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::Config("secret required for HMAC".to_string()));
        }
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Create with a simple secret and default configuration.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(JwtConfig::new(secret))
    }

    /// Get the configuration.
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Sign claims into a session token.
    pub fn issue(&self, claims: &SessionClaims) -> AuthResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Expiry and issuer are validated here; an expired session maps to a
    /// dedicated error so callers can distinguish it from tampering.
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        let token_data: TokenData<SessionClaims> = decode(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AuthError::InvalidToken("malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AuthError::InvalidToken("invalid issuer".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_rbac::Role;
    use uuid::Uuid;

    fn test_secret() -> String {
        "test-secret-key-for-jwt-signing-minimum-32-chars".to_string()
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = JwtService::with_secret(test_secret()).unwrap();
        let identity_id = Uuid::now_v7();
        let profile_id = Uuid::now_v7();

        let claims = SessionClaims::new(
            identity_id,
            profile_id,
            Role::Supervisor,
            chrono::Duration::hours(1),
        );
        let token = service.issue(&claims).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified.identity_id(), Some(identity_id));
        assert_eq!(verified.profile_id, profile_id);
        assert_eq!(verified.role, Role::Supervisor);
    }

    #[test]
    fn test_empty_secret_is_a_config_error() {
        assert!(matches!(
            JwtService::with_secret(""),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::with_secret(test_secret()).unwrap();
        let result = service.verify("not-a-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::with_secret(test_secret()).unwrap();
        let mut claims = SessionClaims::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            Role::Observer,
            chrono::Duration::hours(1),
        );
        claims.exp = chrono::Utc::now().timestamp() - 3600;

        let token = service.issue(&claims).unwrap();
        assert!(matches!(service.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = JwtService::with_secret(test_secret()).unwrap();
        let other = JwtService::with_secret("a-different-secret-of-sufficient-len").unwrap();

        let claims = SessionClaims::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            Role::Resident,
            chrono::Duration::hours(1),
        );
        let token = other.issue(&claims).unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
