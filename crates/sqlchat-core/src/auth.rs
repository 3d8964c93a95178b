//! Password digests and signed bearer tokens.
//!
//! Tokens are RS256 JWTs binding a user id and role, with a fixed lifetime and
//! no refresh flow. Verification is stateless.

use crate::{Result, SqlChatError};
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlchat_types::{Identity, Role};
use std::path::Path;
use uuid::Uuid;

/// Hash a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SqlChatError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string. Malformed digests never match.
pub fn verify_password(password: &str, phc: &str) -> bool {
    PasswordHash::new(phc)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies RS256 tokens.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl TokenSigner {
    /// Build a signer from PEM-encoded RSA keys.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8], ttl: TimeDelta) -> Result<Self> {
        Ok(Self {
            encoding: EncodingKey::from_rsa_pem(private_pem)?,
            decoding: DecodingKey::from_rsa_pem(public_pem)?,
            ttl,
        })
    }

    /// Load both keys from disk.
    pub fn from_files(private_key: &Path, public_key: &Path, ttl: TimeDelta) -> Result<Self> {
        let private_pem = std::fs::read(private_key)?;
        let public_pem = std::fs::read(public_key)?;
        Self::from_pem(&private_pem, &public_pem, ttl)
    }

    /// Mint a token for the given identity.
    pub fn issue(&self, identity: Identity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: identity.user_id,
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the bound identity.
    pub fn verify(&self, token: &str) -> Result<Identity> {
        let validation = Validation::new(Algorithm::RS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| SqlChatError::InvalidToken)?;
        Ok(Identity {
            user_id: data.claims.user_id,
            role: data.claims.role,
        })
    }
}
