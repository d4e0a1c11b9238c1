//! Worker configuration.
//!
//! [`RelayConfig`] is assembled once from the command line, validated, and
//! then shared read-only (usually behind an `Arc`) by every component.
//! [`ForwardSettings`] carries delivery tuning and can be overridden from the
//! environment:
//!
//! | variable | range |
//! |---|---|
//! | `RELAY_FORWARD_TIMEOUT_MS` | 100 – 300 000 |
//! | `RELAY_FORWARD_MAX_IN_FLIGHT` | 1 – 1 024 |
//! | `RELAY_FORWARD_QUEUE_CAPACITY` | 1 – 1 000 000 |
//!
//! Invalid values are logged and ignored.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;

/// Immutable settings for one relay session.
#[derive(Clone)]
pub struct RelayConfig {
    /// Meeting identifier. Also the token topic and callback `meeting_uuid`.
    pub meeting_id: String,
    /// Media stream identifier.
    pub stream_id: String,
    /// WebSocket URL of the signaling endpoint (`ws://` or `wss://`).
    pub signaling_url: String,
    /// Application client id (`app_key`).
    pub client_id: String,
    /// Application client secret used to sign the token.
    pub client_secret: String,
    /// API key echoed in every callback body.
    pub api_key: String,
    /// HTTP(S) endpoint receiving transcripts.
    pub callback_url: String,
    /// Delivery tuning.
    pub forward: ForwardSettings,
}

impl RelayConfig {
    /// Check that every required value is present and URLs are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("meeting_id", &self.meeting_id),
            ("stream_id", &self.stream_id),
            ("signaling_url", &self.signaling_url),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("api_key", &self.api_key),
            ("callback_url", &self.callback_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { field });
            }
        }
        check_url("signaling_url", &self.signaling_url, &["ws", "wss"])?;
        check_url("callback_url", &self.callback_url, &["http", "https"])?;
        Ok(())
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("meeting_id", &self.meeting_id)
            .field("stream_id", &self.stream_id)
            .field("signaling_url", &self.signaling_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("forward", &self.forward)
            .finish()
    }
}

fn check_url(field: &'static str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_owned(),
        reason,
    };
    let parsed = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(invalid(format!("expected {} scheme", schemes.join(" or "))));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("no host in URL".into()));
    }
    Ok(())
}

/// Tuning for the transcript delivery path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardSettings {
    /// Per-request timeout for callback POSTs, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum concurrent callback requests.
    pub max_in_flight: usize,
    /// Transcripts buffered ahead of delivery before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_in_flight: 8,
            queue_capacity: 256,
        }
    }
}

impl ForwardSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|name| std::env::var(name).ok());
        settings
    }

    /// Apply overrides from `lookup` (an env-var reader in production, a map
    /// in tests).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = read_u64(&lookup, "RELAY_FORWARD_TIMEOUT_MS", 100, 300_000) {
            self.timeout_ms = v;
        }
        if let Some(v) = read_usize(&lookup, "RELAY_FORWARD_MAX_IN_FLIGHT", 1, 1_024) {
            self.max_in_flight = v;
        }
        if let Some(v) = read_usize(&lookup, "RELAY_FORWARD_QUEUE_CAPACITY", 1, 1_000_000) {
            self.queue_capacity = v;
        }
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, min: u64, max: u64) -> Option<u64> {
    let val = lookup(name)?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    min: usize,
    max: usize,
) -> Option<usize> {
    let val = lookup(name)?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn valid_config() -> RelayConfig {
        RelayConfig {
            meeting_id: "meeting-1".into(),
            stream_id: "stream-1".into(),
            signaling_url: "wss://signal.example.com/ws".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            api_key: "api-key".into(),
            callback_url: "https://sink.example.com/transcripts".into(),
            forward: ForwardSettings::default(),
        }
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn empty_secret_is_missing() {
        let mut config = valid_config();
        config.client_secret = String::new();
        assert_matches!(
            config.validate(),
            Err(ConfigError::Missing {
                field: "client_secret"
            })
        );
    }

    #[test]
    fn blank_meeting_id_is_missing() {
        let mut config = valid_config();
        config.meeting_id = "   ".into();
        assert_matches!(
            config.validate(),
            Err(ConfigError::Missing { field: "meeting_id" })
        );
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut config = valid_config();
        config.client_id = String::new();
        config.api_key = String::new();
        assert_matches!(
            config.validate(),
            Err(ConfigError::Missing { field: "client_id" })
        );
    }

    #[test]
    fn http_signaling_url_rejected() {
        let mut config = valid_config();
        config.signaling_url = "https://signal.example.com".into();
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "signaling_url",
                ..
            })
        );
    }

    #[test]
    fn ws_callback_url_rejected() {
        let mut config = valid_config();
        config.callback_url = "ws://sink.example.com".into();
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "callback_url",
                ..
            })
        );
    }

    #[test]
    fn url_without_scheme_rejected() {
        let mut config = valid_config();
        config.callback_url = "sink.example.com/path".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("relative URL without a base"));
    }

    #[test]
    fn url_without_host_rejected() {
        let mut config = valid_config();
        config.signaling_url = "ws://".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("empty host"));
    }

    #[test]
    fn host_with_space_rejected() {
        let mut config = valid_config();
        config.callback_url = "http://bad host/cb".into();
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "callback_url",
                ..
            })
        );
    }

    #[test]
    fn out_of_range_port_rejected() {
        let mut config = valid_config();
        config.callback_url = "http://127.0.0.1:99999/cb".into();
        let err = config.validate().unwrap_err();
        assert_matches!(
            err,
            ConfigError::InvalidUrl {
                field: "callback_url",
                ..
            }
        );
        assert!(err.to_string().contains("invalid port number"));
    }

    #[test]
    fn plain_ws_and_http_accepted() {
        let mut config = valid_config();
        config.signaling_url = "ws://127.0.0.1:9000".into();
        config.callback_url = "http://127.0.0.1:8080/cb?x=1".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        let mut config = valid_config();
        config.signaling_url = "WSS://signal.example.com".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("meeting-1"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"secret\""));
        assert!(!rendered.contains("api-key"));
    }

    // ── ForwardSettings ─────────────────────────────────────────────

    #[test]
    fn forward_defaults() {
        let settings = ForwardSettings::default();
        assert_eq!(settings.timeout_ms, 10_000);
        assert_eq!(settings.max_in_flight, 8);
        assert_eq!(settings.queue_capacity, 256);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn overrides_applied() {
        let mut settings = ForwardSettings::default();
        settings.apply_overrides(lookup_from(&[
            ("RELAY_FORWARD_TIMEOUT_MS", "2500"),
            ("RELAY_FORWARD_MAX_IN_FLIGHT", "2"),
            ("RELAY_FORWARD_QUEUE_CAPACITY", "16"),
        ]));
        assert_eq!(settings.timeout_ms, 2500);
        assert_eq!(settings.max_in_flight, 2);
        assert_eq!(settings.queue_capacity, 16);
    }

    #[test]
    fn out_of_range_overrides_ignored() {
        let mut settings = ForwardSettings::default();
        settings.apply_overrides(lookup_from(&[
            ("RELAY_FORWARD_TIMEOUT_MS", "5"),
            ("RELAY_FORWARD_MAX_IN_FLIGHT", "0"),
            ("RELAY_FORWARD_QUEUE_CAPACITY", "lots"),
        ]));
        assert_eq!(settings, ForwardSettings::default());
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let mut settings = ForwardSettings::default();
        settings.apply_overrides(|_| None);
        assert_eq!(settings, ForwardSettings::default());
    }

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u64_range("100", 1, 200), Some(100));
        assert_eq!(parse_u64_range(" 7 ", 1, 200), Some(7));
        assert_eq!(parse_u64_range("0", 1, 200), None);
        assert_eq!(parse_u64_range("-1", 1, 200), None);
        assert_eq!(parse_usize_range("1024", 1, 1024), Some(1024));
        assert_eq!(parse_usize_range("1025", 1, 1024), None);
    }
}
