//! Signaling wire protocol.
//!
//! Every frame is a JSON object with an integer `type` and an optional
//! `payload` object:
//!
//! | type | direction | meaning |
//! |---|---|---|
//! | 1 | out | handshake request |
//! | 2 | in | handshake accepted |
//! | 12 | in | keep-alive request |
//! | 13 | out | keep-alive reply |
//! | 17 | in | transcript delivery |
//!
//! Unknown types are expected (protocol extensions) and ignored.

use chrono::Utc;
use relay_core::constants::{DEVICE_NAME, WORKER_IDENTITY, device_id};
use relay_core::{RelayConfig, TranscriptEvent};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use crate::errors::ParseError;

/// Outbound handshake request.
pub const HANDSHAKE_REQUEST: i64 = 1;
/// Inbound handshake acknowledgment.
pub const HANDSHAKE_ACCEPTED: i64 = 2;
/// Inbound keep-alive request.
pub const KEEP_ALIVE_REQUEST: i64 = 12;
/// Outbound keep-alive reply.
pub const KEEP_ALIVE_REPLY: i64 = 13;
/// Inbound transcript delivery.
pub const TRANSCRIPT: i64 = 17;

// 2^53: beyond this an f64 no longer holds every integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// A parsed inbound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundMessage {
    /// Type 2.
    HandshakeAccepted,
    /// Type 12.
    KeepAlive,
    /// Type 17. `None` when the frame carries no usable text.
    Transcript(Option<TranscriptEvent>),
    /// Any other (or missing) type.
    Unrecognized(Option<i64>),
}

impl InboundMessage {
    /// Parse a raw text frame.
    ///
    /// Only malformed JSON is an error. Valid JSON without a recognised
    /// integer `type` (including non-object values) is [`Self::Unrecognized`].
    /// A whole-number float such as `12.0` counts as that integer.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(&value))
    }

    fn from_value(value: &Value) -> Self {
        match value.get("type").and_then(wire_type) {
            Some(HANDSHAKE_ACCEPTED) => Self::HandshakeAccepted,
            Some(KEEP_ALIVE_REQUEST) => Self::KeepAlive,
            Some(TRANSCRIPT) => Self::Transcript(transcript_from_payload(value.get("payload"))),
            other => Self::Unrecognized(other),
        }
    }
}

fn wire_type(kind: &Value) -> Option<i64> {
    kind.as_i64().or_else(|| {
        let f = kind
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT)?;
        #[allow(clippy::cast_possible_truncation)]
        let n = f as i64;
        Some(n)
    })
}

/// Extract `payload.object.{participant_name, content}`.
fn transcript_from_payload(payload: Option<&Value>) -> Option<TranscriptEvent> {
    let object = payload?.get("object")?;
    TranscriptEvent::from_parts(
        object.get("participant_name").and_then(Value::as_str),
        object.get("content").and_then(Value::as_str),
    )
}

/// Payload of the type-1 handshake request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeRequest {
    /// Application client id.
    pub app_key: String,
    /// Signed session token.
    pub signature: String,
    /// Per-meeting device id.
    pub device_id: String,
    /// Fixed device name.
    pub device_name: String,
    /// Identity the worker joins as.
    pub user_identity: String,
}

impl HandshakeRequest {
    /// Handshake for `config`'s meeting, carrying `signature`.
    pub fn new(config: &RelayConfig, signature: String) -> Self {
        Self {
            app_key: config.client_id.clone(),
            signature,
            device_id: device_id(&config.meeting_id),
            device_name: DEVICE_NAME.to_owned(),
            user_identity: WORKER_IDENTITY.to_owned(),
        }
    }
}

/// A frame the worker writes to the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Type 1.
    Handshake(HandshakeRequest),
    /// Type 13, `timestamp` in milliseconds since the Unix epoch.
    KeepAliveReply {
        /// Reply time.
        timestamp: i64,
    },
}

impl OutboundFrame {
    /// A keep-alive reply stamped with the current time.
    pub fn keep_alive_reply() -> Self {
        Self::KeepAliveReply {
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Wire `type` of this frame.
    pub fn message_type(&self) -> i64 {
        match self {
            Self::Handshake(_) => HANDSHAKE_REQUEST,
            Self::KeepAliveReply { .. } => KEEP_ALIVE_REPLY,
        }
    }

    /// JSON envelope `{"type": .., "payload": {..}}`.
    pub fn to_value(&self) -> Value {
        let payload = match self {
            Self::Handshake(h) => json!({
                "app_key": h.app_key,
                "signature": h.signature,
                "device_id": h.device_id,
                "device_name": h.device_name,
                "user_identity": h.user_identity,
            }),
            Self::KeepAliveReply { timestamp } => json!({ "timestamp": timestamp }),
        };
        json!({ "type": self.message_type(), "payload": payload })
    }
}

impl From<&OutboundFrame> for Message {
    fn from(frame: &OutboundFrame) -> Self {
        Message::Text(frame.to_value().to_string().into())
    }
}
