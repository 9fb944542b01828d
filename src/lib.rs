//! Structured logging with typed context fields.
//!
//! A [`Logger`] carries a set of context [`Fields`] and writes one line per
//! record through a shared [`Formatter`] to a [`LogSink`]:
//!
//! ```
//! use fieldlog::{fields, Config, MemorySink};
//!
//! let sink = MemorySink::new();
//! let log = Config::default().with_sink(sink.clone()).build();
//!
//! log.info_with(
//!     "My first event",
//!     fields! { "string" => "foo", "int" => 1, "float" => 1.1 },
//! );
//!
//! let contextual = log.with(fields! {
//!     "hostname" => "staging-1",
//!     "appname" => "foo-app",
//!     "session" => "1ce3f6v",
//! });
//! contextual.info("Simple event with global metadata");
//!
//! assert_eq!(sink.lines().len(), 2);
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod fields;
pub mod formatter;
pub mod json;
pub mod level;
pub mod logger;
pub mod noop_sink;
pub mod record;
pub mod sink;
pub mod text;
pub mod value;

#[cfg(feature = "channel")]
pub mod channel;

#[cfg(feature = "bridge")]
pub mod init;
#[cfg(feature = "bridge")]
pub mod layer;

pub use config::{Config, FormatKind};
pub use error::{ConfigError, EncodeError};
pub use fields::Fields;
pub use formatter::Formatter;
pub use json::{FieldNames, JsonFormatter};
pub use level::Level;
pub use logger::Logger;
pub use noop_sink::NoopSink;
pub use record::Record;
pub use sink::{LogSink, MemorySink, WriterSink};
pub use text::TextFormatter;
pub use value::{Unsupported, Value};
