//! # relay-core
//!
//! Shared vocabulary for the transcript relay worker:
//!
//! - **Config**: [`RelayConfig`] built once at startup and passed explicitly to
//!   every component, plus [`ForwardSettings`] tuning with env overrides
//! - **Errors**: [`ConfigError`] for startup validation
//! - **Transcripts**: [`TranscriptEvent`] and the [`TranscriptSink`] seam between
//!   the signaling client and the HTTP forwarder
//! - **Logging**: `tracing` subscriber setup and in-memory capture for tests

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod transcript;

pub use config::{ForwardSettings, RelayConfig};
pub use errors::ConfigError;
pub use transcript::{TranscriptEvent, TranscriptSink, UNKNOWN_SPEAKER};
