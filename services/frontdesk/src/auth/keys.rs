//! Ed25519 signing key material for session tokens.
//!
//! # Key invariants
//! - The private key is a raw 32-byte seed; the public key is always derived
//!   from it, never loaded separately.
//! - The `kid` is public. It is derived from the public key so that every
//!   replica configured with the same seed stamps the same `kid`.
use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use rand::RngCore;

pub const ED25519_SEED_LEN: usize = 32;

#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    pub private_key: [u8; ED25519_SEED_LEN],
    pub public_key: [u8; ED25519_SEED_LEN],
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn from_seed(seed: [u8; ED25519_SEED_LEN]) -> Self {
        let public_key = Ed25519SigningKey::from_bytes(&seed)
            .verifying_key()
            .to_bytes();
        Self {
            kid: hex::encode(&public_key[..8]),
            private_key: seed,
            public_key,
        }
    }
}

/// Generate a fresh signing key from the thread RNG.
///
/// Tokens signed with it stop verifying once the process exits, so this is
/// only suitable for development and tests.
pub fn generate_signing_key() -> SigningKey {
    let mut seed = [0u8; ED25519_SEED_LEN];
    rand::thread_rng().fill_bytes(&mut seed);
    SigningKey::from_seed(seed)
}

/// Decode a standard-base64 32-byte seed, as set in `FRONTDESK_TOKEN_SEED`.
///
/// # Errors
/// - The value is not base64.
/// - The decoded value is not exactly 32 bytes.
pub fn signing_key_from_seed_b64(encoded: &str) -> Result<SigningKey> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .context("decode token seed as base64")?;
    if bytes.len() != ED25519_SEED_LEN {
        bail!(
            "token seed must be {ED25519_SEED_LEN} bytes, got {}",
            bytes.len()
        );
    }
    let mut seed = [0u8; ED25519_SEED_LEN];
    seed.copy_from_slice(&bytes);
    Ok(SigningKey::from_seed(seed))
}
