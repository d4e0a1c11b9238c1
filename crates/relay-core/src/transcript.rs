//! Transcript events and the hand-off seam to the forwarder.

/// Speaker name used when the platform omits the participant name.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// A finalized unit of speech-to-text attributed to a speaker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Participant name, or [`UNKNOWN_SPEAKER`].
    pub speaker: String,
    /// Transcript text. Never empty.
    pub text: String,
}

impl TranscriptEvent {
    /// Build an event from optional wire fields.
    ///
    /// Returns `None` when the text is absent or empty. An absent or empty
    /// speaker falls back to [`UNKNOWN_SPEAKER`].
    pub fn from_parts(speaker: Option<&str>, text: Option<&str>) -> Option<Self> {
        let text = text.filter(|t| !t.is_empty())?;
        let speaker = speaker
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SPEAKER);
        Some(Self {
            speaker: speaker.to_owned(),
            text: text.to_owned(),
        })
    }
}

/// Destination for transcript events leaving the signaling client.
///
/// `submit` must not block or fail: delivery problems are the sink's to log.
pub trait TranscriptSink: Send + Sync {
    /// Hand off one event for delivery.
    fn submit(&self, event: TranscriptEvent);
}
