//! # relay-auth
//!
//! Session token generation for the signaling handshake.
//!
//! The token is an HS256 JWT keyed by the client secret. Its payload names the
//! application (`app_key`), the worker identity and the meeting topic (`tpc`),
//! and is valid for two hours starting 30 seconds in the past to absorb clock
//! skew between the worker and the platform.

#![deny(unsafe_code)]

pub mod errors;
pub mod signature;

pub use errors::AuthError;
pub use signature::{
    CLOCK_SKEW_SECS, SignatureClaims, TOKEN_LIFETIME_SECS, TOKEN_VERSION, generate, generate_at,
};
