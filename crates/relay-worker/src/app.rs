//! One relay session: signaling client feeding the HTTP forwarder.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use relay_core::RelayConfig;
use relay_forward::{ForwardHandle, TranscriptForwarder};
use relay_signaling::{ConnectionManager, SessionOutcome};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Minimum time allowed for in-flight deliveries after the channel ends.
pub const DRAIN_GRACE: Duration = Duration::from_secs(15);

/// Run the relay until the signaling channel closes or fails.
///
/// Returns the session outcome once queued deliveries have drained (or the
/// drain grace expired). Only setup failures are `Err`.
pub async fn run(config: RelayConfig) -> Result<SessionOutcome> {
    let config = Arc::new(config);
    info!(
        meeting_id = %config.meeting_id,
        stream_id = %config.stream_id,
        callback_url = %config.callback_url,
        "starting transcript relay"
    );

    let forwarder =
        TranscriptForwarder::new(&config).context("failed to create transcript forwarder")?;
    let (handle, pump) = ForwardHandle::spawn(forwarder, &config.forward);
    let sink = Arc::new(handle);

    let manager = ConnectionManager::new(config.clone(), sink.clone());
    let outcome = manager.run().await;

    let dropped = sink.dropped_count();
    // closes the queue so the pump can finish
    drop(manager);
    drop(sink);

    let grace = config.forward.timeout().max(DRAIN_GRACE);
    match timeout(grace, pump).await {
        Ok(Ok(())) => debug!("in-flight deliveries drained"),
        Ok(Err(e)) => warn!(error = %e, "forward pump aborted"),
        Err(_) => warn!(grace_ms = grace.as_millis(), "gave up waiting for in-flight deliveries"),
    }
    if dropped > 0 {
        warn!(dropped, "transcripts dropped under backpressure");
    }

    info!(exit_code = outcome.exit_code(), ?outcome, "transcript relay finished");
    Ok(outcome)
}
