//! HS256 session token signing.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use relay_core::constants::WORKER_IDENTITY;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AuthError;

/// Seconds subtracted from the current time for `iat`.
pub const CLOCK_SKEW_SECS: i64 = 30;

/// Token validity window (2 hours).
pub const TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Payload schema version expected by the platform.
pub const TOKEN_VERSION: u32 = 1;

/// JWT claims for the signaling handshake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureClaims {
    /// Application client id.
    pub app_key: String,
    /// Payload schema version.
    pub version: u32,
    /// Identity the worker joins as.
    pub user_identity: String,
    /// Issued at (Unix seconds), skewed into the past.
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Topic: the meeting/session identifier.
    pub tpc: String,
}

impl SignatureClaims {
    /// Claims for `client_id` joining `session_id`, issued relative to `now`.
    pub fn new(client_id: &str, session_id: &str, now: i64) -> Self {
        let iat = now - CLOCK_SKEW_SECS;
        Self {
            app_key: client_id.to_owned(),
            version: TOKEN_VERSION,
            user_identity: WORKER_IDENTITY.to_owned(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
            tpc: session_id.to_owned(),
        }
    }
}

/// Sign a session token using the current clock.
pub fn generate(client_id: &str, client_secret: &str, session_id: &str) -> Result<String, AuthError> {
    generate_at(client_id, client_secret, session_id, Utc::now().timestamp())
}

/// Sign a session token as if the current Unix time were `now`.
pub fn generate_at(
    client_id: &str,
    client_secret: &str,
    session_id: &str,
    now: i64,
) -> Result<String, AuthError> {
    if client_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let claims = SignatureClaims::new(client_id, session_id, now);
    let key = EncodingKey::from_secret(client_secret.as_bytes());
    let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)?;

    debug!(iat = claims.iat, exp = claims.exp, "session token signed");
    Ok(token)
}
