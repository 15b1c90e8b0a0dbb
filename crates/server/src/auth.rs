//! JWT issuance/verification and password hashing.
//!
//! Tokens come in an access/refresh pair: short-lived access tokens are
//! the only ones the bearer extractor accepts, and refresh tokens are only
//! good for minting a new access token. Passwords are stored as salted
//! PBKDF2-HMAC-SHA256 digests.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;
use linkvault_core::Error;

const ISSUER: &str = "linkvault";
const ACCESS_TTL_SECS: i64 = 3600; // 1 hour
const REFRESH_TTL_SECS: i64 = 7 * 24 * 3600; // 7 days

/// PBKDF2 iteration count for password digests.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
const SALT_LENGTH: usize = 16;

/// Digest length in bytes (SHA-256 output).
const DIGEST_LENGTH: usize = 32;

/// JWT claims stored in both token kinds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    /// "access" or "refresh"
    pub kind: String,
}

/// An access/refresh token pair as returned by login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT service for creating and verifying tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue an access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            access: self.issue(user_id, "access", ACCESS_TTL_SECS)?,
            refresh: self.issue(user_id, "refresh", REFRESH_TTL_SECS)?,
        })
    }

    /// Issue a fresh access token (the refresh flow).
    pub fn issue_access(&self, user_id: i64) -> Result<String, Error> {
        self.issue(user_id, "access", ACCESS_TTL_SECS)
    }

    fn issue(&self, user_id: i64, kind: &str, ttl_secs: i64) -> Result<String, Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + chrono::Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            kind: kind.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a token of the expected kind. Returns the user id.
    ///
    /// An access token presented to the refresh endpoint (or vice versa)
    /// is rejected just like an invalid signature.
    pub fn verify(&self, token: &str, expected_kind: &str) -> Result<i64, Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| Error::Unauthorized("invalid or expired token".into()))?;

        if claims.kind != expected_kind {
            return Err(Error::Unauthorized("invalid or expired token".into()));
        }

        claims
            .sub
            .parse()
            .map_err(|_| Error::Unauthorized("invalid or expired token".into()))
    }
}

/// Authenticated caller. Extract this in handlers that require auth.
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("missing bearer token".into()))?;

        let user_id = state.jwt.verify(token, "access")?;
        Ok(AuthUser { user_id })
    }
}

/// Hash a password for storage: `pbkdf2_sha256$iterations$salt$digest`.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LENGTH];
    rng.fill(&mut salt)
        .map_err(|_| Error::Internal("system RNG failure".into()))?;

    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS).expect("iteration count must be non-zero");
    let mut digest = [0u8; DIGEST_LENGTH];
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, &salt, password.as_bytes(), &mut digest);

    Ok(format!(
        "pbkdf2_sha256${PBKDF2_ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(digest)
    ))
}

/// Check a password against a stored hash in constant time.
///
/// Malformed stored hashes verify as false rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some("pbkdf2_sha256"), Some(iterations), Some(salt), Some(digest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(iterations) = iterations.parse::<u32>() else { return false };
    let Some(iterations) = NonZeroU32::new(iterations) else { return false };
    let (Ok(salt), Ok(digest)) = (hex::decode(salt), hex::decode(digest)) else {
        return false;
    };

    pbkdf2::verify(pbkdf2::PBKDF2_HMAC_SHA256, iterations, &salt, password.as_bytes(), &digest).is_ok()
}
