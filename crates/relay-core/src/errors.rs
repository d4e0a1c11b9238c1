//! Startup configuration errors.

use thiserror::Error;

/// Errors raised while assembling the worker configuration.
///
/// All of these are fatal: the worker never opens the signaling channel
/// with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was absent or empty.
    #[error("missing required value: {field}")]
    Missing {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A URL was malformed or used an unsupported scheme.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl {
        /// Name of the offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_display() {
        let err = ConfigError::Missing {
            field: "client_secret",
        };
        assert_eq!(err.to_string(), "missing required value: client_secret");
    }

    #[test]
    fn invalid_url_display() {
        let err = ConfigError::InvalidUrl {
            field: "signaling_url",
            value: "http://example.com".into(),
            reason: "expected ws or wss scheme".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("signaling_url"));
        assert!(msg.contains("http://example.com"));
        assert!(msg.contains("ws or wss"));
    }
}
