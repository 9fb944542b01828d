use crate::fields::Fields;
use crate::level::Level;
use crate::logger::Logger;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns `tracing` events into records of
/// a wrapped [`Logger`].
///
/// The event's `message` becomes the record message; all other event
/// fields become record fields, merged over the logger's context. The
/// logger's level decides which events are written.
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = Level::from(*event.metadata().level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        self.logger.log(level, message.unwrap_or_default(), fields);
    }
}

/// Collects `tracing` event fields, keeping primitive kinds intact.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `message` arrives here as `format_args!` output.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name(), format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sink::MemorySink;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[test]
    fn events_become_records() {
        let sink = MemorySink::new();
        let logger = Config::default()
            .with_sink(sink.clone())
            .with_fallback(MemorySink::new())
            .build()
            .with_field("appname", "foo-app");
        let subscriber = Registry::default().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(string = "foo", int = 1, float = 1.1, big = u64::MAX, ok = true, "My first event");
            tracing::debug!("filtered out");
            tracing::warn!(reason = ?Some(3), "formatted {}", 42);
        });

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["level"], "info");
        assert_eq!(first["msg"], "My first event");
        assert_eq!(first["appname"], "foo-app");
        assert_eq!(first["string"], "foo");
        assert_eq!(first["int"], 1);
        assert_eq!(first["float"], 1.1);
        assert_eq!(first["big"], u64::MAX.to_string());
        assert_eq!(first["ok"], true);

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["level"], "warn");
        assert_eq!(second["msg"], "formatted 42");
        assert_eq!(second["reason"], "Some(3)");
    }
}
