//! # relay-worker
//!
//! Wires the signaling client to the HTTP forwarder for one meeting.
//!
//! - [`cli`]: command-line parsing into a validated [`relay_core::RelayConfig`]
//! - [`app`]: [`app::run`], one relay session from connect to drain

#![deny(unsafe_code)]

pub mod app;
pub mod cli;
