//! Connection finite state machine.

use std::fmt;
use std::process::ExitCode;

/// Lifecycle of a single signaling session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Not yet started.
    Disconnected,
    /// Opening the WebSocket.
    Connecting,
    /// Handshake sent, waiting for type 2.
    AwaitingAck,
    /// Handshake accepted.
    Live,
    /// Remote or local close. Terminal.
    Closed,
    /// Transport or setup failure. Terminal.
    Failed,
}

/// Inputs to [`ConnectionState::on_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A connection attempt began.
    ConnectAttempt,
    /// The socket opened.
    Opened,
    /// The platform acknowledged the handshake.
    HandshakeAccepted,
    /// The channel closed.
    Closed,
    /// The channel errored.
    Error,
}

impl ConnectionState {
    /// True for [`Self::Closed`] and [`Self::Failed`].
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    /// Next state after `event`.
    ///
    /// Terminal states absorb every event. Close and error win from any
    /// live state. Events that don't apply leave the state unchanged.
    #[must_use]
    pub fn on_event(self, event: ChannelEvent) -> Self {
        if self.is_terminal() {
            return self;
        }
        match (self, event) {
            (_, ChannelEvent::Closed) => Self::Closed,
            (_, ChannelEvent::Error) => Self::Failed,
            (Self::Disconnected, ChannelEvent::ConnectAttempt) => Self::Connecting,
            (Self::Connecting, ChannelEvent::Opened) => Self::AwaitingAck,
            (Self::AwaitingAck, ChannelEvent::HandshakeAccepted) => Self::Live,
            (state, _) => state,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingAck => "awaiting_ack",
            Self::Live => "live",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The channel closed normally.
    Closed,
    /// The channel or its setup failed.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

impl SessionOutcome {
    /// Process exit status: 0 for a close, 1 for a failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Failed { .. } => 1,
        }
    }

    /// Terminal connection state matching this outcome.
    pub fn state(&self) -> ConnectionState {
        match self {
            Self::Closed => ConnectionState::Closed,
            Self::Failed { .. } => ConnectionState::Failed,
        }
    }
}

impl From<&SessionOutcome> for ExitCode {
    fn from(outcome: &SessionOutcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}
