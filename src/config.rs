use crate::error::ConfigError;
use crate::formatter::Formatter;
use crate::json::JsonFormatter;
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::{LogSink, WriterSink};
use crate::text::TextFormatter;
use std::str::FromStr;
use std::sync::Arc;

/// Built-in output formats that can be selected by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatKind {
    #[default]
    Json,
    Text,
}

impl FormatKind {
    /// Default-configured formatter for this kind.
    pub fn into_formatter(self) -> Arc<dyn Formatter> {
        match self {
            FormatKind::Json => Arc::new(JsonFormatter::new()),
            FormatKind::Text => Arc::new(TextFormatter::new()),
        }
    }
}

impl FromStr for FormatKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(FormatKind::Json),
            "text" | "logfmt" => Ok(FormatKind::Text),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Configuration of a root [`Logger`].
///
/// **Fields**
/// - `level`: records below this level are discarded before formatting.
/// - `formatter`: initial formatter, shared by every logger derived from
///   the root; see [`Logger::set_formatter`].
/// - `sink`: receives the formatted lines.
/// - `fallback`: receives the logger's own diagnostics, e.g. encode and
///   write failures.
#[derive(Clone)]
pub struct Config {
    pub level: Level,
    pub formatter: Arc<dyn Formatter>,
    pub sink: Arc<dyn LogSink>,
    pub fallback: Arc<dyn LogSink>,
}

impl Default for Config {
    /// JSON lines at `info` and above on standard output, diagnostics on
    /// standard error.
    fn default() -> Self {
        Self {
            level: Level::Info,
            formatter: FormatKind::Json.into_formatter(),
            sink: Arc::new(WriterSink::stdout()),
            fallback: Arc::new(WriterSink::stderr()),
        }
    }
}

impl Config {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: FormatKind) -> Self {
        self.formatter = format.into_formatter();
        self
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_fallback(mut self, fallback: impl LogSink + 'static) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Create the root logger for this configuration.
    pub fn build(self) -> Logger {
        Logger::new(self)
    }
}
