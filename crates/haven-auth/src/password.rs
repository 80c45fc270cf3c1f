//! Credential hashing and strength rules
//!
//! Hashing uses Argon2id with generated salts. Strength checking runs a
//! chain of independent rules, each with its own failure reason, and
//! evaluates every rule so the caller can report all violations at once.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AuthError, AuthResult};

/// Minimum credential length.
pub const MIN_LENGTH: usize = 8;

/// Maximum credential length.
pub const MAX_LENGTH: usize = 128;

/// The accepted special characters.
pub const SYMBOLS: &str = r#"()[]{}|\`~!@#$%^&*_-+=;:'",<>./?"#;

/// Hash a plaintext credential with Argon2id.
///
/// The salt is generated per call and embedded in the returned PHC string,
/// so hashing the same input twice yields different hashes.
pub fn hash_credential(plain: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("credential hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plaintext credential against a stored hash.
///
/// Any parse or mismatch failure verifies as `false`; callers translate
/// that into a generic denial.
pub fn verify_credential(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Run every strength rule and collect the violations.
///
/// Rules are independent; a candidate violating several reports all of
/// them, one reason per rule.
pub fn strength_violations(candidate: &str) -> Vec<String> {
    let mut reasons = Vec::new();

    if candidate.chars().count() < MIN_LENGTH {
        reasons.push(format!(
            "the password must contain at least {} characters",
            MIN_LENGTH
        ));
    }
    if candidate.chars().count() > MAX_LENGTH {
        reasons.push(format!(
            "the password must contain at most {} characters",
            MAX_LENGTH
        ));
    }
    if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
        reasons.push("the password must contain at least 1 uppercase letter, A-Z".to_string());
    }
    if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
        reasons.push("the password must contain at least 1 lowercase letter, a-z".to_string());
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        reasons.push("the password must contain at least 1 digit, 0-9".to_string());
    }
    if !candidate.chars().any(|c| SYMBOLS.contains(c)) {
        reasons.push(format!(
            "the password must contain at least 1 special character: {}",
            SYMBOLS
        ));
    }

    reasons
}

/// Validate a candidate credential against the full rule chain.
///
/// # Errors
///
/// Returns [`AuthError::Validation`] carrying one reason per violated
/// rule.
pub fn validate_strength(candidate: &str) -> AuthResult<()> {
    let reasons = strength_violations(candidate);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation { reasons })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_credential("Sturdy#Pass1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_credential("Sturdy#Pass1", &hash));
        assert!(!verify_credential("Sturdy#Pass2", &hash));
    }

    #[test]
    fn test_same_input_hashes_differently() {
        let first = hash_credential("Sturdy#Pass1").unwrap();
        let second = hash_credential("Sturdy#Pass1").unwrap();
        assert_ne!(first, second);
        assert!(verify_credential("Sturdy#Pass1", &first));
        assert!(verify_credential("Sturdy#Pass1", &second));
    }

    #[test]
    fn test_garbage_hash_verifies_false() {
        assert!(!verify_credential("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_strong_candidate_passes() {
        assert!(validate_strength("NewPass1!").is_ok());
    }

    #[test]
    fn test_violations_accumulate() {
        // Too short, no uppercase, no digit, no symbol: four rules at once.
        let reasons = strength_violations("abc");
        assert_eq!(reasons.len(), 4);
    }

    #[test]
    fn test_each_rule_fires_independently() {
        assert_eq!(strength_violations("lowercase1!").len(), 1); // no uppercase
        assert_eq!(strength_violations("UPPERCASE1!").len(), 1); // no lowercase
        assert_eq!(strength_violations("NoDigits!!").len(), 1); // no digit
        assert_eq!(strength_violations("NoSymbol11").len(), 1); // no symbol
    }

    #[test]
    fn test_maximum_length_rule() {
        let long = format!("Aa1!{}", "x".repeat(130));
        let reasons = strength_violations(&long);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("at most"));
    }
}
