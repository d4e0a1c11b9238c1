//! # relay-signaling
//!
//! Client side of the meeting platform's signaling channel.
//!
//! - [`protocol`]: inbound/outbound JSON frame types keyed by the integer `type`
//! - [`state`]: the connection finite state machine and session outcome
//! - [`dispatcher`]: per-frame routing (handshake ack, keep-alive, transcripts)
//! - [`connection`]: [`ConnectionManager`], owner of the socket and its only writer

#![deny(unsafe_code)]

pub mod connection;
pub mod dispatcher;
pub mod errors;
pub mod protocol;
pub mod state;

pub use connection::ConnectionManager;
pub use dispatcher::{Directive, ProtocolDispatcher};
pub use errors::{ConnectionError, ParseError};
pub use protocol::{HandshakeRequest, InboundMessage, OutboundFrame};
pub use state::{ChannelEvent, ConnectionState, SessionOutcome};
