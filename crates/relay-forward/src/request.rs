//! Callback request body.

use chrono::{DateTime, SecondsFormat, Utc};
use relay_core::TranscriptEvent;
use serde::{Deserialize, Serialize};

/// JSON body POSTed to the callback URL for each transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    /// Meeting identifier.
    pub meeting_uuid: String,
    /// Speaker, or `"Unknown"`.
    pub speaker_name: String,
    /// Transcript text.
    pub transcript_text: String,
    /// Forwarding time, ISO-8601 UTC with milliseconds.
    pub timestamp: String,
    /// Always `true`: only final transcripts are forwarded.
    pub is_final: bool,
    /// Callback API key.
    pub api_key: String,
}

impl ForwardRequest {
    /// Body for `event` in `meeting_uuid`, stamped `at`.
    pub fn new(
        meeting_uuid: &str,
        api_key: &str,
        event: &TranscriptEvent,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            meeting_uuid: meeting_uuid.to_owned(),
            speaker_name: event.speaker.clone(),
            transcript_text: event.text.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            is_final: true,
            api_key: api_key.to_owned(),
        }
    }
}
