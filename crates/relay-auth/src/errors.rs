//! Token generation errors.

use thiserror::Error;

/// Errors from [`generate`](crate::generate).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The client secret was empty. This is a startup precondition.
    #[error("client secret is required to sign the session token")]
    MissingSecret,

    /// The JWT encoder rejected the claims or key.
    #[error("failed to encode session token: {reason}")]
    Encode {
        /// Encoder error text.
        reason: String,
    },
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Encode {
            reason: err.to_string(),
        }
    }
}
