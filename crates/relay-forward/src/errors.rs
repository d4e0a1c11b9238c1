//! Delivery error types.

use thiserror::Error;

/// A transcript could not be delivered. Logged and dropped, never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The callback answered with something other than 200.
    #[error("callback returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The request never completed (refused, timed out, TLS failure).
    #[error("callback request failed: {reason}")]
    Transport {
        /// Underlying error message.
        reason: String,
    },

    /// The delivery queue was full and the transcript was dropped.
    #[error("forward queue full (capacity {capacity})")]
    QueueFull {
        /// Configured queue capacity.
        capacity: usize,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Underlying error message.
        reason: String,
    },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport {
            reason: e.to_string(),
        }
    }
}
