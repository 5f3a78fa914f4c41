//! Session token minting and verification.
//!
//! # Purpose
//! Issues the bearer tokens handed out by `/auth/register` and `/auth/login`
//! and validates them on protected routes.
//!
//! # Key invariants
//! - Tokens are always EdDSA (Ed25519); no other algorithm is accepted.
//! - `iss` and `aud` are fixed and checked on every verification.
//! - `sub` is the user id; `role` and `department` mirror the user record at
//!   the time the token was minted.
use crate::auth::keys::SigningKey;
use crate::model::User;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lodge_core::{Department, Role};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const TOKEN_ISSUER: &str = "lodge-frontdesk";
pub const TOKEN_AUDIENCE: &str = "lodge-api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("key error: {0}")]
    Key(String),
}

/// Encoding and decoding keys built once from a [`SigningKey`].
#[derive(Clone)]
pub struct TokenKeys {
    kid: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(key: &SigningKey) -> Result<Self, TokenError> {
        let signing_key = Ed25519SigningKey::from_bytes(&key.private_key);
        if signing_key.verifying_key().to_bytes() != key.public_key {
            return Err(TokenError::Key(
                "Ed25519 public key does not match private seed".to_string(),
            ));
        }
        // jsonwebtoken wants PKCS8 DER for EdDSA signing and the JWK `x`
        // component for verification.
        let der = signing_key
            .to_pkcs8_der()
            .map_err(|err| TokenError::Key(format!("encode Ed25519 key: {err}")))?;
        let encoding = EncodingKey::from_ed_der(der.as_bytes());
        let decoding = DecodingKey::from_ed_components(&URL_SAFE_NO_PAD.encode(key.public_key))?;
        Ok(Self {
            kid: key.kid.clone(),
            encoding,
            decoding,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn mint(&self, user: &User, ttl: Duration) -> Result<String, TokenError> {
        let now = now_epoch_seconds();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            sub: user.id.to_string(),
            role: user.role,
            department: user.department,
            exp: now + ttl.as_secs() as i64,
            iat: now,
        };
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.kid.clone());
        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding)?)
    }

    /// Check signature, algorithm, issuer, audience and expiry.
    ///
    /// # Errors
    /// - [`TokenError::Jwt`] for any malformed, forged or expired token.
    pub fn verify(&self, token: &str, leeway: u64) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.leeway = leeway;
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::generate_signing_key;
    use crate::model::{ContactInfo, Preferences};
    use chrono::Utc;
    use lodge_core::UserStatus;
    use lodge_core::ids::UserId;

    fn staff_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: "Sam".to_string(),
            email: "sam@lodge.test".to_string(),
            password_hash: String::new(),
            role: Role::Staff,
            department: Some(Department::FrontOffice),
            status: UserStatus::Approved,
            preferences: Preferences::default(),
            contact: ContactInfo::default(),
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn minted_token_verifies_and_carries_role() {
        let keys = TokenKeys::new(&generate_signing_key()).expect("keys");
        let user = staff_user();
        let token = keys.mint(&user, Duration::from_secs(60)).expect("mint");

        let header = jsonwebtoken::decode_header(&token).expect("header");
        assert_eq!(header.alg, Algorithm::EdDSA);
        assert_eq!(header.kid.as_deref(), Some(keys.kid()));

        let claims = keys.verify(&token, 0).expect("verify");
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.department, Some(Department::FrontOffice));
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.aud, TOKEN_AUDIENCE);
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let issuer = TokenKeys::new(&generate_signing_key()).expect("keys");
        let other = TokenKeys::new(&generate_signing_key()).expect("keys");
        let token = issuer
            .mint(&staff_user(), Duration::from_secs(60))
            .expect("mint");
        assert!(matches!(other.verify(&token, 0), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new(&generate_signing_key()).expect("keys");
        let now = now_epoch_seconds();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            sub: UserId::new().to_string(),
            role: Role::Guest,
            department: None,
            exp: now - 600,
            iat: now - 1200,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), &claims, &keys.encoding)
            .expect("encode");
        assert!(keys.verify(&token, 5).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let keys = TokenKeys::new(&generate_signing_key()).expect("keys");
        let now = now_epoch_seconds();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            aud: "someone-else".to_string(),
            sub: UserId::new().to_string(),
            role: Role::Guest,
            department: None,
            exp: now + 600,
            iat: now,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), &claims, &keys.encoding)
            .expect("encode");
        assert!(keys.verify(&token, 0).is_err());
    }

    #[test]
    fn mismatched_key_material_is_refused() {
        let mut key = generate_signing_key();
        key.public_key = [0u8; 32];
        assert!(matches!(TokenKeys::new(&key), Err(TokenError::Key(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = TokenKeys::new(&generate_signing_key()).expect("keys");
        assert!(keys.verify("not-a-jwt", 0).is_err());
    }
}
