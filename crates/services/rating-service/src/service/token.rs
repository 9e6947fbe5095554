//! Signed, time-limited bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{Role, User, TOKEN_TTL_SECONDS};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// The verified caller, as carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Issues and verifies HS256 tokens with a fixed one-hour lifetime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is absolute: no grace period past `exp`
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            ttl: Duration::seconds(TOKEN_TTL_SECONDS),
        }
    }

    /// Issue a token for the identity, expiring one hour from now.
    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if at `issued_at`.
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token encoding failed: {}", e)))
    }

    /// Check signature and expiry.
    ///
    /// Expired tokens fail with `TokenExpired`; any other defect (bad
    /// signature, malformed structure, wrong algorithm, unknown role) fails
    /// with `InvalidToken`.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(Identity::from(data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&JwtConfig::new("unit-test-secret-that-is-long-enough!").unwrap())
    }

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "caller@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let who = identity(Role::StoreOwner);

        let token = tokens.issue(&who).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), who);
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let tokens = service();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS - 30);

        let token = tokens.issue_at(&identity(Role::NormalUser), issued_at).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn test_token_rejected_after_expiry() {
        let tokens = service();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS + 5);

        let token = tokens.issue_at(&identity(Role::NormalUser), issued_at).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let tokens = service();
        let token = tokens.issue(&identity(Role::NormalUser)).unwrap();

        // Splice an admin payload onto the original signature
        let forged = tokens.issue(&identity(Role::SystemAdmin)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(tokens.verify(&tampered), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_flipped_signature_byte_is_invalid() {
        let tokens = service();
        let token = tokens.issue(&identity(Role::NormalUser)).unwrap();
        let mut bytes = token.into_bytes();
        let at = bytes.len() - 10;
        bytes[at] = if bytes[at] == b'A' { b'B' } else { b'A' };
        let token = String::from_utf8(bytes).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = service().issue(&identity(Role::NormalUser)).unwrap();
        let other = TokenService::new(&JwtConfig::new("a-completely-different-secret-value!!").unwrap());

        assert!(matches!(other.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(service().verify("not.a.token"), Err(AppError::InvalidToken)));
        assert!(matches!(service().verify(""), Err(AppError::InvalidToken)));
    }
}
