//! Non-blocking transcript sink.
//!
//! [`ForwardHandle::submit`] only enqueues. A pump task drains the bounded
//! queue and spawns one delivery per event, capped at `max_in_flight`
//! concurrent requests. Delivery order across events is not guaranteed.
//!
//! The pump exits once every handle is dropped and in-flight deliveries
//! have finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use relay_core::{ForwardSettings, TranscriptEvent, TranscriptSink};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, trace, warn};

use crate::errors::DeliveryError;
use crate::forwarder::TranscriptForwarder;

/// Cloneable sender side of the delivery queue.
#[derive(Clone, Debug)]
pub struct ForwardHandle {
    tx: mpsc::Sender<TranscriptEvent>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl ForwardHandle {
    /// Start the delivery pump for `forwarder`.
    ///
    /// Await the returned [`JoinHandle`] after dropping every handle to wait
    /// for outstanding deliveries.
    pub fn spawn(
        forwarder: TranscriptForwarder,
        settings: &ForwardSettings,
    ) -> (Self, JoinHandle<()>) {
        let capacity = settings.queue_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let pump = tokio::spawn(pump(
            Arc::new(forwarder),
            rx,
            settings.max_in_flight.max(1),
        ));
        let handle = Self {
            tx,
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (handle, pump)
    }

    /// Queue `text` spoken by `speaker`. Empty text is ignored.
    pub fn forward(&self, speaker: &str, text: &str) {
        match TranscriptEvent::from_parts(Some(speaker), Some(text)) {
            Some(event) => self.submit(event),
            None => trace!("skipping empty transcript"),
        }
    }

    /// Transcripts dropped because the queue was full or closed.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl TranscriptSink for ForwardHandle {
    fn submit(&self, event: TranscriptEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                let err = DeliveryError::QueueFull {
                    capacity: self.capacity,
                };
                warn!(error = %err, speaker = %event.speaker, dropped = total, "dropping transcript");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                let _ = self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(speaker = %event.speaker, "forward queue closed, dropping transcript");
            }
        }
    }
}

async fn pump(
    forwarder: Arc<TranscriptForwarder>,
    mut rx: mpsc::Receiver<TranscriptEvent>,
    max_in_flight: usize,
) {
    let permits = Arc::new(Semaphore::new(max_in_flight));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let forwarder = forwarder.clone();
        let _ = in_flight.spawn(async move {
            let _permit = permit;
            if let Err(e) = forwarder.deliver(&event).await {
                error!(error = %e, speaker = %event.speaker, "failed to forward transcript");
            }
        });

        // reap finished deliveries so the set stays small
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    debug!("forward pump drained");
}

#[cfg(test)]
mod tests {
    use relay_core::RelayConfig;
    use relay_core::logging::capture_logs;
    use tracing::Level;

    use super::*;

    fn event(text: &str) -> TranscriptEvent {
        TranscriptEvent {
            speaker: "Alice".into(),
            text: text.into(),
        }
    }

    fn unconsumed_handle(capacity: usize) -> (ForwardHandle, mpsc::Receiver<TranscriptEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = ForwardHandle {
            tx,
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (handle, rx)
    }

    #[tokio::test]
    async fn full_queue_drops_and_counts() {
        let (logs, _guard) = capture_logs();
        let (handle, mut rx) = unconsumed_handle(2);

        handle.submit(event("one"));
        handle.submit(event("two"));
        handle.submit(event("three"));
        handle.submit(event("four"));

        assert_eq!(handle.dropped_count(), 2);
        assert!(logs.has_event(Level::WARN, "dropping transcript"));
        assert_eq!(rx.recv().await.unwrap().text, "one");
        assert_eq!(rx.recv().await.unwrap().text, "two");
    }

    #[tokio::test]
    async fn closed_queue_drops() {
        let (handle, rx) = unconsumed_handle(4);
        drop(rx);
        handle.submit(event("late"));
        assert_eq!(handle.dropped_count(), 1);
    }

    #[tokio::test]
    async fn forward_skips_empty_text() {
        let (handle, mut rx) = unconsumed_handle(4);
        handle.forward("Alice", "");
        handle.forward("", "hello");
        drop(handle);

        let queued = rx.recv().await.unwrap();
        assert_eq!(queued.speaker, "Unknown");
        assert_eq!(queued.text, "hello");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_drop_counter() {
        let (handle, _rx) = unconsumed_handle(1);
        let other = handle.clone();
        handle.submit(event("one"));
        other.submit(event("two"));
        assert_eq!(handle.dropped_count(), 1);
        assert_eq!(other.dropped_count(), 1);
    }

    #[tokio::test]
    async fn pump_exits_when_handles_dropped() {
        let config = RelayConfig {
            meeting_id: "m".into(),
            stream_id: "s".into(),
            signaling_url: "ws://127.0.0.1:1".into(),
            client_id: "c".into(),
            client_secret: "x".into(),
            api_key: "k".into(),
            callback_url: "http://127.0.0.1:1/cb".into(),
            forward: ForwardSettings::default(),
        };
        let forwarder = TranscriptForwarder::new(&config).unwrap();
        let (handle, pump) = ForwardHandle::spawn(forwarder, &config.forward);
        drop(handle);
        tokio::time::timeout(std::time::Duration::from_secs(5), pump)
            .await
            .unwrap()
            .unwrap();
    }
}
