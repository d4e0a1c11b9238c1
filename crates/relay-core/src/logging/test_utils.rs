//! In-memory capture of tracing events for test assertions.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One recorded event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Emitting module path.
    pub target: String,
    /// The `message` field.
    pub message: String,
    /// Remaining fields as `(name, rendered value)`, in recording order.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Rendered value of field `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }
}

/// Shared handle to the events recorded by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs {
    inner: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.inner.lock().clone()
    }

    /// First event whose message equals `message`.
    pub fn find(&self, message: &str) -> Option<CapturedEvent> {
        self.inner
            .lock()
            .iter()
            .find(|e| e.message == message)
            .cloned()
    }

    /// Whether some message contains `needle`.
    pub fn has_message(&self, needle: &str) -> bool {
        self.inner.lock().iter().any(|e| e.message.contains(needle))
    }

    /// Whether some event at `level` has a message containing `needle`.
    pub fn has_event(&self, level: Level, needle: &str) -> bool {
        self.inner
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// How many events were recorded at `level`.
    pub fn count_at_level(&self, level: Level) -> usize {
        self.inner.lock().iter().filter(|e| e.level == level).count()
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

struct MemoryLayer {
    sink: CapturedLogs,
}

#[derive(Default)]
struct EventFields {
    message: String,
    fields: Vec<(String, String)>,
}

impl EventFields {
    fn push(&mut self, field: &Field, rendered: String) {
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.push((field.name().to_owned(), rendered));
        }
    }
}

// Numbers and `%` values reach `record_debug` and render unquoted. Plain
// `&str` gets its own arm so it is not quoted either.
impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for MemoryLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorded = EventFields::default();
        event.record(&mut recorded);

        let meta = event.metadata();
        self.sink.inner.lock().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: recorded.message,
            fields: recorded.fields,
        });
    }
}

/// Record every event emitted on the current thread until the guard drops.
///
/// Only the current thread is captured: async tests should stay on the
/// default current-thread runtime so spawned tasks are recorded too.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(MemoryLayer { sink: logs.clone() })
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}
