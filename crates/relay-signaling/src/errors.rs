//! Signaling error types.

use relay_auth::AuthError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// An inbound frame could not be interpreted. Always recovered locally.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The frame was not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A binary frame did not contain UTF-8 text.
    #[error("binary frame is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Fatal channel failures. Any of these ends the session with a failure exit.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The WebSocket could not be opened.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// Signaling URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: tungstenite::Error,
    },

    /// The handshake token could not be produced.
    #[error("failed to sign handshake: {0}")]
    Auth(#[from] AuthError),

    /// Reading from or writing to the open channel failed.
    #[error("signaling transport error: {0}")]
    Transport(#[from] tungstenite::Error),
}
