//! # relay-forward
//!
//! Delivers transcript events to the downstream callback endpoint.
//!
//! - [`request`]: the JSON callback body
//! - [`forwarder`]: [`TranscriptForwarder`], one POST per event
//! - [`handle`]: [`ForwardHandle`], the non-blocking [`relay_core::TranscriptSink`]
//!   backed by a bounded queue and a capped pool of in-flight requests

#![deny(unsafe_code)]

pub mod errors;
pub mod forwarder;
pub mod handle;
pub mod request;

pub use errors::DeliveryError;
pub use forwarder::TranscriptForwarder;
pub use handle::ForwardHandle;
pub use request::ForwardRequest;
