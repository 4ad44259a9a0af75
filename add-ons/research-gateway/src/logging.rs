//! Tracing setup for the gateway: env filter, fmt output, and a broadcast layer that feeds
//! the `/api/v1/logs` SSE stream.

use tokio::sync::broadcast;
use tracing::field::Visit;
use tracing_subscriber::layer::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Captures the "message" field from a tracing event.
struct MessageCollector<'a>(&'a mut String);

impl Visit for MessageCollector<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = value.to_string();
        }
    }
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{:?}", value);
        }
    }
}

/// Sends each tracing event as a line to a broadcast channel for SSE log streaming.
#[derive(Clone)]
pub(crate) struct LogBroadcastLayer {
    tx: broadcast::Sender<String>,
}

impl LogBroadcastLayer {
    pub(crate) fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl<S> tracing_subscriber::Layer<S> for LogBroadcastLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageCollector(&mut message));
        let line = format!(
            "{} [{}] {}",
            event.metadata().level(),
            event.metadata().target(),
            message
        );
        // No subscribers is the normal case; the line is simply dropped.
        let _ = self.tx.send(line);
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
pub(crate) fn init(default_filter: &str, log_tx: broadcast::Sender<String>) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(LogBroadcastLayer::new(log_tx))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_layer_forwards_level_target_and_message() {
        let (tx, mut rx) = broadcast::channel(8);
        let subscriber = tracing_subscriber::registry().with(LogBroadcastLayer::new(tx));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "research::test", "hello logs");
        });
        let line = rx.try_recv().unwrap();
        assert_eq!(line, "INFO [research::test] hello logs");
    }
}
