//! Per-frame routing.
//!
//! The dispatcher never writes to the socket. It returns a [`Directive`]
//! and leaves the write to [`crate::ConnectionManager`], which keeps a
//! single writer per channel.

use std::sync::Arc;

use relay_core::TranscriptSink;
use tracing::{info, instrument, trace, warn};

use crate::protocol::{InboundMessage, OutboundFrame};

/// What the connection owner should do after a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// The handshake was accepted.
    MarkLive,
    /// Write this frame to the channel.
    Send(OutboundFrame),
}

/// Routes inbound frames to replies and the transcript sink.
#[derive(Clone)]
pub struct ProtocolDispatcher {
    sink: Arc<dyn TranscriptSink>,
}

impl ProtocolDispatcher {
    /// Dispatcher submitting transcripts to `sink`.
    pub fn new(sink: Arc<dyn TranscriptSink>) -> Self {
        Self { sink }
    }

    /// Handle one raw text frame.
    ///
    /// Malformed frames are logged and dropped. Transcript submission is
    /// fire-and-forget so a slow sink never stalls keep-alive replies.
    #[instrument(skip_all)]
    pub fn handle(&self, raw: &str) -> Option<Directive> {
        let message = match InboundMessage::parse(raw) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, len = raw.len(), "ignoring malformed signaling frame");
                return None;
            }
        };

        match message {
            InboundMessage::HandshakeAccepted => {
                info!("handshake accepted");
                Some(Directive::MarkLive)
            }
            InboundMessage::KeepAlive => {
                trace!("keep-alive request");
                Some(Directive::Send(OutboundFrame::keep_alive_reply()))
            }
            InboundMessage::Transcript(Some(event)) => {
                info!(speaker = %event.speaker, text = %event.text, "transcript received");
                self.sink.submit(event);
                None
            }
            InboundMessage::Transcript(None) => {
                trace!("transcript frame without text");
                None
            }
            InboundMessage::Unrecognized(kind) => {
                trace!(?kind, "ignoring unrecognized frame");
                None
            }
        }
    }
}
