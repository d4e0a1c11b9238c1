//! Signaling connection owner.
//!
//! [`ConnectionManager`] opens the channel, signs and sends the handshake,
//! then reads frames until the channel closes or fails. It is the only
//! writer on the socket: dispatcher replies come back as [`Directive`]s and
//! are written here, in frame order.

use std::sync::Arc;

use futures::{Sink, SinkExt, Stream, StreamExt};
use relay_core::{RelayConfig, TranscriptSink};
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, instrument, warn};

use crate::dispatcher::{Directive, ProtocolDispatcher};
use crate::errors::{ConnectionError, ParseError};
use crate::protocol::{HandshakeRequest, OutboundFrame};
use crate::state::{ChannelEvent, ConnectionState, SessionOutcome};

/// Drives one signaling session from connect to close.
pub struct ConnectionManager {
    config: Arc<RelayConfig>,
    dispatcher: ProtocolDispatcher,
    state: watch::Sender<ConnectionState>,
}

impl ConnectionManager {
    /// Manager for `config`'s meeting, submitting transcripts to `sink`.
    pub fn new(config: Arc<RelayConfig>, sink: Arc<dyn TranscriptSink>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            dispatcher: ProtocolDispatcher::new(sink),
            state,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Connect to the configured signaling URL and run the session.
    #[instrument(skip_all, fields(meeting_id = %self.config.meeting_id))]
    pub async fn run(&self) -> SessionOutcome {
        self.apply(ChannelEvent::ConnectAttempt);
        info!(url = %self.config.signaling_url, "connecting to signaling channel");

        match connect_async(self.config.signaling_url.as_str()).await {
            Ok((ws, _response)) => self.run_on(ws).await,
            Err(source) => self.fail(&ConnectionError::Connect {
                url: self.config.signaling_url.clone(),
                source,
            }),
        }
    }

    /// Run the session over an already-open channel.
    pub async fn run_on<S>(&self, mut ws: S) -> SessionOutcome
    where
        S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    {
        if self.state() == ConnectionState::Disconnected {
            self.apply(ChannelEvent::ConnectAttempt);
        }
        self.apply(ChannelEvent::Opened);

        let outcome = match self.session(&mut ws).await {
            Ok(()) => {
                self.apply(ChannelEvent::Closed);
                info!("signaling channel closed");
                SessionOutcome::Closed
            }
            Err(e) => self.fail(&e),
        };

        let _ = ws.close().await;
        outcome
    }

    async fn session<S>(&self, ws: &mut S) -> Result<(), ConnectionError>
    where
        S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    {
        let signature = relay_auth::generate(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.meeting_id,
        )?;
        let handshake = OutboundFrame::Handshake(HandshakeRequest::new(&self.config, signature));
        ws.send(Message::from(&handshake)).await?;
        info!("handshake sent");

        while let Some(item) = ws.next().await {
            let message = match item {
                Ok(m) => m,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return Ok(()),
                Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)) => {
                    warn!("signaling channel reset without close handshake");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let directive = match message {
                Message::Text(text) => self.dispatcher.handle(text.as_str()),
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => self.dispatcher.handle(text),
                    Err(e) => {
                        warn!(error = %ParseError::from(e), "ignoring binary frame");
                        None
                    }
                },
                Message::Close(frame) => {
                    debug!(?frame, "close frame received");
                    return Ok(());
                }
                // ping/pong is answered by tungstenite
                _ => None,
            };

            match directive {
                Some(Directive::MarkLive) => self.apply(ChannelEvent::HandshakeAccepted),
                Some(Directive::Send(frame)) => ws.send(Message::from(&frame)).await?,
                None => {}
            }
        }

        Ok(())
    }

    fn apply(&self, event: ChannelEvent) {
        let _ = self.state.send_if_modified(|state| {
            let next = state.on_event(event);
            if next == *state {
                return false;
            }
            debug!(from = %state, to = %next, ?event, "connection state changed");
            *state = next;
            true
        });
    }

    fn fail(&self, err: &ConnectionError) -> SessionOutcome {
        self.apply(ChannelEvent::Error);
        error!(error = %err, "signaling session failed");
        SessionOutcome::Failed {
            reason: err.to_string(),
        }
    }
}
