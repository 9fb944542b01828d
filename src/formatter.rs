use crate::error::EncodeError;
use crate::record::Record;
use crate::value::Value;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Turns a [`Record`] into one serialized log line.
///
/// Implementations only produce bytes; the logger appends the line
/// terminator and hands the result to the sink. A formatter must not
/// panic on any record. Records it cannot represent are refused with an
/// [`EncodeError`], after which the logger retries once with a degraded
/// copy of the record: unencodable values stringified and fields named in
/// [`Formatter::reserved_keys`] moved to `fields.<name>`.
pub trait Formatter: Send + Sync {
    /// Serialize `record`, without a trailing newline.
    fn format(&self, record: &Record) -> Result<Vec<u8>, EncodeError>;

    /// Keys the formatter writes itself and which fields therefore must
    /// not use.
    fn reserved_keys(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Check every field of `record` against `reserved` and for encodable values.
pub(crate) fn check_fields(record: &Record, reserved: &[&str]) -> Result<(), EncodeError> {
    for (key, value) in record.fields().iter() {
        if reserved.contains(&key) {
            return Err(EncodeError::ReservedKey { key: key.to_string() });
        }
        if !value.is_encodable() {
            let key = key.to_string();
            return Err(match value {
                Value::Unsupported(u) => EncodeError::UnsupportedValue { key, kind: u.kind() },
                _ => EncodeError::NonFiniteFloat { key },
            });
        }
    }
    Ok(())
}

/// Render `time` with a strftime-style `format`, or as RFC 3339 in UTC
/// with second precision when no format is given.
///
/// A format string chrono cannot interpret also yields RFC 3339.
pub(crate) fn render_time(time: DateTime<Utc>, format: Option<&str>) -> String {
    if let Some(format) = format {
        let mut rendered = String::new();
        if write!(rendered, "{}", time.format(format)).is_ok() {
            return rendered;
        }
    }
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
