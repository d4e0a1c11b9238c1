//! One-shot transcript delivery over HTTP.

use std::fmt;

use chrono::Utc;
use relay_core::{RelayConfig, TranscriptEvent};
use reqwest::StatusCode;
use tracing::debug;

use crate::errors::DeliveryError;
use crate::request::ForwardRequest;

/// Longest response body kept in a [`DeliveryError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 256;

/// POSTs transcript events to the callback URL.
#[derive(Clone)]
pub struct TranscriptForwarder {
    client: reqwest::Client,
    callback_url: String,
    meeting_id: String,
    api_key: String,
}

impl fmt::Debug for TranscriptForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptForwarder")
            .field("callback_url", &self.callback_url)
            .field("meeting_id", &self.meeting_id)
            .finish_non_exhaustive()
    }
}

impl TranscriptForwarder {
    /// Forwarder for `config`'s meeting and callback, with the configured
    /// request timeout.
    pub fn new(config: &RelayConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.forward.timeout())
            .build()
            .map_err(|e| DeliveryError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            callback_url: config.callback_url.clone(),
            meeting_id: config.meeting_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Deliver one event. Succeeds only on HTTP 200.
    pub async fn deliver(&self, event: &TranscriptEvent) -> Result<(), DeliveryError> {
        let body = ForwardRequest::new(&self.meeting_id, &self.api_key, event, Utc::now());

        let response = self
            .client
            .post(&self.callback_url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        debug!(speaker = %event.speaker, "transcript forwarded");
        Ok(())
    }
}
