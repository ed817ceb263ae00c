//! Credential digest scheme for `users.password_hash`.
//!
//! # Responsibility
//! - Derive salted Argon2id digests for new credentials.
//! - Verify secrets against stored digests, including legacy unsalted
//!   SHA-256 hex digests.
//!
//! # Invariants
//! - Plaintext secrets never leave this module.
//! - Unrecognized digest formats never verify.

use argon2::password_hash::{Output, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LEGACY_SHA256_HEX_LEN: usize = 64;

/// Storage format of a credential digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestScheme {
    /// PHC string produced by Argon2 (`$argon2id$...`).
    Argon2,
    /// 64 lowercase hex chars of an unsalted SHA-256.
    LegacySha256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    EmptySecret,
    Hashing(String),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "secret must not be empty"),
            Self::Hashing(message) => write!(f, "credential hashing failed: {message}"),
        }
    }
}

impl Error for CredentialError {}

/// Derives an Argon2id PHC digest with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::EmptySecret);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|err| CredentialError::Hashing(err.to_string()))
}

/// Returns the storage format of `digest`, if recognized.
pub fn digest_scheme(digest: &str) -> Option<DigestScheme> {
    if digest.starts_with("$argon2") && PasswordHash::new(digest).is_ok() {
        return Some(DigestScheme::Argon2);
    }
    if digest.len() == LEGACY_SHA256_HEX_LEN
        && digest
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Some(DigestScheme::LegacySha256);
    }
    None
}

/// Checks `password` against a stored digest.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match digest_scheme(digest) {
        Some(DigestScheme::Argon2) => match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        },
        Some(DigestScheme::LegacySha256) => legacy_sha256_matches(password, digest),
        None => false,
    }
}

// `Output` equality is constant-time.
fn legacy_sha256_matches(password: &str, digest: &str) -> bool {
    let Ok(stored) = hex::decode(digest) else {
        return false;
    };
    let computed = Sha256::digest(password.as_bytes());
    match (Output::new(&stored), Output::new(&computed)) {
        (Ok(stored), Ok(computed)) => stored == computed,
        _ => false,
    }
}
