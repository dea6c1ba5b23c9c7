//! Tracing setup and a layer that forwards writer events to a UI channel.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "inkwell=info";

/// Target prefix of events forwarded by [`ActivityLayer`].
const ACTIVITY_TARGET_PREFIX: &str = "inkwell";

/// One forwarded tracing event, suitable for a status line.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    /// Module path that emitted the event (e.g. `inkwell_application::reviewer`)
    pub target: String,
    /// INFO, DEBUG, WARN, ...
    pub level: String,
    pub message: String,
    /// Structured fields other than `message`
    pub fields: HashMap<String, Value>,
    /// RFC 3339
    pub timestamp: String,
}

/// Sends `inkwell*` events to a channel.
pub struct ActivityLayer {
    sender: mpsc::UnboundedSender<ActivityEvent>,
}

impl ActivityLayer {
    pub fn new(sender: mpsc::UnboundedSender<ActivityEvent>) -> Self {
        Self { sender }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ActivityEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl<S: Subscriber> Layer<S> for ActivityLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(ACTIVITY_TARGET_PREFIX) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        // A closed receiver just means nobody is watching.
        let _ = self.sender.send(ActivityEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(format!("{value:?}")));
    }
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs a global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Like [`init_tracing`], additionally forwarding events to the returned
/// receiver.
pub fn init_tracing_with_activity(
    default_filter: &str,
) -> anyhow::Result<mpsc::UnboundedReceiver<ActivityEvent>> {
    let (layer, rx) = ActivityLayer::channel();
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn test_forwards_inkwell_events_with_fields() {
        let (layer, mut rx) = ActivityLayer::channel();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "inkwell_application::reviewer", generation = 3u64, "Suggestion ready");
            tracing::info!(target: "hyper::client", "connected");
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.target, "inkwell_application::reviewer");
        assert_eq!(event.level, "INFO");
        assert_eq!(event.message, "Suggestion ready");
        assert_eq!(event.fields["generation"], serde_json::json!(3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (layer, rx) = ActivityLayer::channel();
        drop(rx);
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "inkwell", "nobody listening");
        });
    }
}
