//! # Haven Authentication
//!
//! This crate provides authentication, authorization, and the credential
//! lifecycle for the Haven platform. It is consumed as a library by the
//! HTTP layer; request parsing and response shaping live elsewhere.
//!
//! ## Overview
//!
//! The haven-auth crate handles:
//! - **Sessions**: sign-in and the signed claims codec (JWT, HS256)
//! - **Authorization**: the policy evaluator every protected operation
//!   calls before mutating anything
//! - **Credential tokens**: single-use invitation and password-reset
//!   tokens, plus short-lived one-time security codes
//! - **Password rules**: argon2 hashing and the independent strength
//!   rules, evaluated together
//! - **Dispatch**: the best-effort out-of-band message seam
//!
//! ## Request flow
//!
//! ```text
//! Unauthenticated ──authenticate()──> Authenticated(SessionClaims)
//!                                          │ authorize(policy)
//!                                          ▼
//!                                 Authorized | Denied   (terminal)
//! ```
//!
//! Authorization is evaluated in full before any mutation begins; a
//! denial carries no partial effects.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use haven_auth::{JwtService, PolicyEvaluator, OperationPolicy, Sessions};
//! use haven_org::MemoryDirectory;
//!
//! # async fn demo() -> Result<(), haven_auth::AuthError> {
//! let directory = Arc::new(MemoryDirectory::new());
//! let sessions = Sessions::new(
//!     JwtService::with_secret("change-me-please-32-bytes-minimum!!")?,
//!     directory.clone(),
//!     directory.clone(),
//! );
//!
//! let session = sessions.sign_in("sup@example.com", "secret", None).await?;
//! let claims = sessions.authenticate(&session.token)?;
//!
//! let evaluator = PolicyEvaluator::new(directory.clone());
//! evaluator
//!     .authorize(&claims, OperationPolicy::GlobalDirectory)
//!     .await?
//!     .require()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Integration
//!
//! This crate integrates with:
//! - `haven-rbac`: roles and rank predicates inside the evaluator
//! - `haven-org`: identities, profiles, and contact-person ownership

pub mod claims;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod jwt;
pub mod password;
pub mod reset;
pub mod session;
pub mod tokens;

// Re-export main types
pub use claims::SessionClaims;
pub use dispatch::{
    Dispatcher, MemoryDispatcher, NullDispatcher, OutboundMessage, TEMPLATE_INVITATION,
    TEMPLATE_SECURITY_CODE,
};
pub use error::{AuthError, AuthResult};
pub use evaluator::{Decision, OperationPolicy, PolicyEvaluator};
pub use jwt::{JwtConfig, JwtService};
pub use password::{hash_credential, validate_strength, verify_credential};
pub use reset::{generate_security_code, CredentialService};
pub use session::{Sessions, SignedSession};
pub use tokens::{CredentialToken, MemoryTokenStore, TokenKind, TokenStore};
