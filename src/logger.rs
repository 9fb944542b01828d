use crate::config::Config;
use crate::fields::Fields;
use crate::formatter::Formatter;
use crate::level::Level;
use crate::record::Record;
use crate::sink::LogSink;
use crate::value::Value;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// State shared by a root logger and every logger derived from it.
struct Shared {
    formatter: RwLock<Arc<dyn Formatter>>,
    level: AtomicU8,
    sink: Arc<dyn LogSink>,
    fallback: Arc<dyn LogSink>,
}

/// Structured logger with a context of fields merged into every record.
///
/// Loggers are cheap values. [`Logger::with`] derives a child with more
/// context; parent and child share the formatter, level and sink of their
/// root but own their fields independently.
///
/// Logging never fails from the caller's point of view: records that can't
/// be encoded are reported on the fallback sink and then written in a
/// degraded form, and write errors are reported on the fallback sink.
#[derive(Clone)]
pub struct Logger {
    context: Fields,
    shared: Arc<Shared>,
}

impl Logger {
    /// Create a root logger with an empty context.
    pub fn new(config: Config) -> Self {
        Logger {
            context: Fields::new(),
            shared: Arc::new(Shared {
                formatter: RwLock::new(config.formatter),
                level: AtomicU8::new(config.level.to_index()),
                sink: config.sink,
                fallback: config.fallback,
            }),
        }
    }

    /// Derive a logger whose context has `fields` merged in; `fields` win
    /// on key collision.
    pub fn with(&self, fields: Fields) -> Logger {
        let mut context = self.context.clone();
        context.merge(fields);
        Logger {
            context,
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Logger {
        let mut fields = Fields::with_capacity(1);
        fields.insert(key, value);
        self.with(fields)
    }

    pub fn context(&self) -> &Fields {
        &self.context
    }

    pub fn level(&self) -> Level {
        Level::from_index(self.shared.level.load(Ordering::Relaxed))
    }

    /// Change the minimum level for this logger and all loggers sharing its root.
    pub fn set_level(&self, level: Level) {
        self.shared.level.store(level.to_index(), Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Replace the formatter of this logger and all loggers sharing its root.
    ///
    /// Applies to records logged afterwards; lines already written are
    /// left alone.
    pub fn set_formatter(&self, formatter: impl Formatter + 'static) {
        let formatter: Arc<dyn Formatter> = Arc::new(formatter);
        *self
            .shared
            .formatter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = formatter;
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        let guard = self
            .shared
            .formatter
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Log `message` at `level` with the context plus `fields`; `fields`
    /// win on key collision.
    pub fn log(&self, level: Level, message: impl Into<String>, fields: Fields) {
        if !self.enabled(level) {
            return;
        }
        let mut merged = self.context.clone();
        merged.merge(fields);
        self.emit(&Record::new(level, message, merged));
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace, message, Fields::new());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message, Fields::new());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message, Fields::new());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message, Fields::new());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message, Fields::new());
    }

    pub fn trace_with(&self, message: impl Into<String>, fields: Fields) {
        self.log(Level::Trace, message, fields);
    }

    pub fn debug_with(&self, message: impl Into<String>, fields: Fields) {
        self.log(Level::Debug, message, fields);
    }

    pub fn info_with(&self, message: impl Into<String>, fields: Fields) {
        self.log(Level::Info, message, fields);
    }

    pub fn warn_with(&self, message: impl Into<String>, fields: Fields) {
        self.log(Level::Warn, message, fields);
    }

    pub fn error_with(&self, message: impl Into<String>, fields: Fields) {
        self.log(Level::Error, message, fields);
    }

    /// Flush the sink; failures are reported on the fallback sink.
    pub fn flush(&self) {
        if let Err(err) = self.shared.sink.flush() {
            self.report(format_args!("error flushing log sink: {}", err));
        }
    }

    fn emit(&self, record: &Record) {
        let formatter = self.formatter();
        let mut line = match formatter.format(record) {
            Ok(line) => line,
            Err(err) => {
                self.report(format_args!(
                    "error encoding log record {:?}: {}",
                    record.message(),
                    err
                ));
                match formatter.format(&record.degraded(&formatter.reserved_keys())) {
                    Ok(line) => line,
                    Err(err) => {
                        self.report(format_args!(
                            "dropping log record {:?}: {}",
                            record.message(),
                            err
                        ));
                        return;
                    }
                }
            }
        };
        line.push(b'\n');
        if let Err(err) = self.shared.sink.write_line(&line) {
            self.report(format_args!("error writing log line: {}", err));
        }
    }

    /// Write a diagnostic to the fallback sink, ignoring any failure there.
    fn report(&self, message: fmt::Arguments<'_>) {
        let line = format!("fieldlog: {}\n", message);
        let _ = self.shared.fallback.write_line(line.as_bytes());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(Config::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}
