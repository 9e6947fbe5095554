//! Password policy and password hash value object.
//!
//! `PasswordPolicy` decides which plain-text passwords are acceptable;
//! `Password` owns the Argon2id hash and its verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use once_cell::sync::Lazy;

use crate::constants::{
    ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_PARALLELISM, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARACTERS,
};
use crate::error::{DomainError, DomainResult};

/// Shown for every policy violation so callers learn the full rule at once.
const POLICY_MESSAGE: &str =
    "Password must be 8-16 characters, include at least one uppercase letter and one special character.";

/// Real hash of a throwaway secret, verified against when a login names an
/// unknown account so both paths pay for one full Argon2 verification.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    Password::hash("timing-equalizer-Secret!")
        .unwrap_or_default()
});

/// Acceptance rules for plain-text passwords.
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Accepts iff the password has 8-16 characters, at least one uppercase
    /// letter and at least one character from [`PASSWORD_SPECIAL_CHARACTERS`].
    pub fn validate(plain_text: &str) -> DomainResult<()> {
        let length = plain_text.chars().count();
        let has_uppercase = plain_text.chars().any(char::is_uppercase);
        let has_special = plain_text
            .chars()
            .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c));

        if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length)
            && has_uppercase
            && has_special
        {
            Ok(())
        } else {
            Err(DomainError::password(POLICY_MESSAGE))
        }
    }
}

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Validate the plain text against [`PasswordPolicy`] and hash it.
    ///
    /// This is CPU-bound; async callers should run it on a blocking thread.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        PasswordPolicy::validate(plain_text)?;

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Hash used to equalize timing when no account matches.
    pub fn dummy() -> Self {
        Self::from_hash(DUMMY_HASH.as_str())
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// Comparison is done by the Argon2 verifier, which is constant-time over
    /// the digest. A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()?
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    /// Argon2id with the fixed work factors from the constants module.
    fn argon2() -> DomainResult<Argon2<'static>> {
        let params = Params::new(
            ARGON2_MEMORY_KIB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            None,
        )
        .map_err(|e| DomainError::internal(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_accepts_valid_passwords() {
        assert!(PasswordPolicy::validate("Secret!1").is_ok());
        assert!(PasswordPolicy::validate("ABCDEFGHIJKLMNO{").is_ok());
        assert!(PasswordPolicy::validate("lower|Upper").is_ok());
    }

    #[test]
    fn test_policy_length_bounds() {
        // 7 characters
        assert!(PasswordPolicy::validate("Secre!1").is_err());
        // 17 characters
        assert!(PasswordPolicy::validate("Secret!1234567890").is_err());
        // exactly 16
        assert!(PasswordPolicy::validate("Secret!123456789").is_ok());
    }

    #[test]
    fn test_policy_requires_uppercase() {
        let err = PasswordPolicy::validate("secret!12").unwrap_err();
        assert_eq!(err, DomainError::password(POLICY_MESSAGE));
    }

    #[test]
    fn test_policy_requires_special_character() {
        assert!(PasswordPolicy::validate("Secret123").is_err());
        // underscore and dash are not in the special set
        assert!(PasswordPolicy::validate("Secret_-123").is_err());
    }

    #[test]
    fn test_policy_counts_characters_not_bytes() {
        // 8 characters, 10 bytes
        assert!(PasswordPolicy::validate("Sécrét!1").is_ok());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePass1!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("SecurePass2!"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPass{99}";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePass!123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_new_rejects_policy_violation() {
        assert!(Password::new("short").is_err());
    }

    #[test]
    fn test_dummy_hash_is_well_formed_and_never_matches_input() {
        let dummy = Password::dummy();
        assert!(dummy.as_str().starts_with("$argon2id$"));
        assert!(!dummy.verify("SecurePass1!"));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!Password::from_hash("not-a-hash").verify("anything"));
    }
}
