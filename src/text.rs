use crate::error::EncodeError;
use crate::formatter::{check_fields, render_time, Formatter};
use crate::record::Record;
use crate::value::Value;
use std::borrow::Cow;

/// Formats records as logfmt-style `key=value` lines:
///
/// ```text
/// time=2026-10-19T08:15:00Z level=info msg=ready hostname=staging-1
/// ```
///
/// String values that are empty or contain whitespace, `=` or `"` are
/// written as quoted, escaped strings. Field names are never quoted; see
/// [`escape_text_key`].
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    timestamp_format: Option<String>,
    disable_timestamp: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        check_fields(record, &self.reserved_keys())?;

        let mut line = String::new();
        if !self.disable_timestamp {
            let time = render_time(record.time(), self.timestamp_format.as_deref());
            push_pair(&mut line, "time", &time)?;
        }
        push_pair(&mut line, "level", record.level().as_str())?;
        push_pair(&mut line, "msg", record.message())?;
        for (key, value) in record.fields().iter() {
            match value {
                Value::String(s) => push_pair(&mut line, key, s)?,
                other => push_pair(&mut line, key, &other.to_string())?,
            }
        }
        Ok(line.into_bytes())
    }

    fn reserved_keys(&self) -> Vec<&str> {
        if self.disable_timestamp {
            vec!["level", "msg"]
        } else {
            vec!["time", "level", "msg"]
        }
    }
}

/// Whether `c` may not appear unquoted in a logfmt key or value.
fn is_special_char(c: char) -> bool {
    c.is_whitespace() || c.is_control() || c == '=' || c == '"'
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(is_special_char)
}

/// Escape a field name for use as a logfmt key.
///
/// Replace whitespace, control characters, `=` and `"` with an underscore,
/// so a key can neither end the line nor fake another pair. The empty key
/// becomes `"EMPTY"`.
pub fn escape_text_key(key: &str) -> Cow<'_, str> {
    if key.is_empty() {
        Cow::Borrowed("EMPTY")
    } else if key.chars().any(is_special_char) {
        Cow::Owned(key.replace(is_special_char, "_"))
    } else {
        Cow::Borrowed(key)
    }
}

fn push_pair(line: &mut String, key: &str, value: &str) -> Result<(), EncodeError> {
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(&escape_text_key(key));
    line.push('=');
    if needs_quoting(value) {
        line.push_str(&serde_json::to_string(value)?);
    } else {
        line.push_str(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::level::Level;
    use chrono::{TimeZone, Utc};
    use similar_asserts::assert_eq;

    fn record(message: &str, fields: crate::Fields) -> Record {
        Record::new(Level::Warn, message, fields)
            .with_time(Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 0).unwrap())
    }

    #[test]
    fn plain_line() {
        let bytes = TextFormatter::new()
            .format(&record("ready", fields! { "hostname" => "staging-1", "n" => 3, "f" => 1.5 }))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "time=2026-10-19T08:15:00Z level=warn msg=ready hostname=staging-1 n=3 f=1.5"
        );
    }

    #[test]
    fn quotes_when_needed() {
        let bytes = TextFormatter::new()
            .with_disable_timestamp(true)
            .format(&record("two words", fields! { "empty" => "", "eq" => "a=b", "q" => "say \"hi\"" }))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"level=warn msg="two words" empty="" eq="a=b" q="say \"hi\"""#
        );
    }

    #[test]
    fn escape_text_key() {
        for case in &["hostname", "fields.msg", "a-b_c"] {
            assert_eq!(super::escape_text_key(case), *case);
            assert!(matches!(super::escape_text_key(case), Cow::Borrowed(_)));
        }

        let cases = vec![
            ("", "EMPTY"),
            ("evil\nlevel", "evil_level"),
            ("a b=c", "a_b_c"),
            ("say\"hi", "say_hi"),
            ("tab\there", "tab_here"),
        ];
        for (key, expected) in cases {
            assert_eq!(super::escape_text_key(key), expected);
        }
    }

    #[test]
    fn odd_keys_stay_on_one_line() {
        let bytes = TextFormatter::new()
            .with_disable_timestamp(true)
            .format(&record("ready", fields! { "evil\nlevel" => "error", "a b=c" => 1 }))
            .unwrap();
        let line = String::from_utf8(bytes).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(line, "level=warn msg=ready evil_level=error a_b_c=1");
    }

    #[test]
    fn rejects_reserved_keys() {
        assert!(matches!(
            TextFormatter::new().format(&record("m", fields! { "level" => "x" })),
            Err(EncodeError::ReservedKey { .. })
        ));
    }
}
