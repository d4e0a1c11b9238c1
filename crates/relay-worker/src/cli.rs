//! Command-line interface.

use clap::Parser;
use relay_core::{ConfigError, ForwardSettings, RelayConfig};

/// Relay live meeting transcripts to an HTTP callback.
#[derive(Parser)]
#[command(
    name = "relay-worker",
    version,
    about = "Relay live meeting transcripts to an HTTP callback"
)]
pub struct Cli {
    /// Meeting identifier.
    pub meeting_id: String,

    /// Media stream identifier.
    pub stream_id: String,

    /// Signaling WebSocket URL (ws:// or wss://).
    pub signaling_url: String,

    /// Application client id.
    pub client_id: String,

    /// Application client secret.
    pub client_secret: String,

    /// API key sent with every callback.
    pub api_key: String,

    /// Callback URL receiving transcripts (http:// or https://).
    pub callback_url: String,

    /// Log level when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Validated config with forward settings taken from the environment.
    pub fn into_config(self) -> Result<RelayConfig, ConfigError> {
        self.into_config_with(ForwardSettings::from_env())
    }

    /// Validated config with explicit forward settings.
    pub fn into_config_with(self, forward: ForwardSettings) -> Result<RelayConfig, ConfigError> {
        let config = RelayConfig {
            meeting_id: self.meeting_id,
            stream_id: self.stream_id,
            signaling_url: self.signaling_url,
            client_id: self.client_id,
            client_secret: self.client_secret,
            api_key: self.api_key,
            callback_url: self.callback_url,
            forward,
        };
        config.validate()?;
        Ok(config)
    }
}
