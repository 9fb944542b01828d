use crate::error::{ConfigError, EncodeError};
use crate::formatter::{check_fields, render_time, Formatter};
use crate::record::Record;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Names of the keys the JSON formatter writes for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub level: String,
    pub time: String,
    pub message: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            level: "level".to_string(),
            time: "time".to_string(),
            message: "msg".to_string(),
        }
    }
}

/// Formats records as single-line JSON objects:
///
/// ```text
/// {"level":"info","time":"2026-10-19T08:15:00Z","msg":"ready","hostname":"staging-1"}
/// ```
///
/// The level, time and message keys come first, followed by the record's
/// fields in order. Fields named like one of these keys are refused with
/// [`EncodeError::ReservedKey`] unless [`JsonFormatter::with_data_key`] nests
/// the fields in their own object.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    field_names: FieldNames,
    timestamp_format: Option<String>,
    disable_timestamp: bool,
    data_key: Option<String>,
    pretty_print: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render timestamps with a strftime-style format instead of RFC 3339.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    /// Rename the level, time and message keys.
    ///
    /// Fails if two of the names, or a name and the data key, are equal.
    pub fn with_field_names(mut self, names: FieldNames) -> Result<Self, ConfigError> {
        self.field_names = names;
        self.check_layout()?;
        Ok(self)
    }

    /// Put all fields in a nested object under `key`.
    ///
    /// Fails if `key` equals the level, time or message key.
    pub fn with_data_key(mut self, key: impl Into<String>) -> Result<Self, ConfigError> {
        self.data_key = Some(key.into());
        self.check_layout()?;
        Ok(self)
    }

    /// Make sure the keys written for every record are distinct.
    fn check_layout(&self) -> Result<(), ConfigError> {
        let names = &self.field_names;
        let mut keys = vec![names.level.as_str(), names.time.as_str(), names.message.as_str()];
        keys.extend(self.data_key.as_deref());
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(ConfigError::DuplicateKey(key.to_string()));
            }
        }
        Ok(())
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        check_fields(record, &self.reserved_keys())?;
        let line = JsonLine {
            formatter: self,
            record,
        };
        let bytes = if self.pretty_print {
            serde_json::to_vec_pretty(&line)?
        } else {
            serde_json::to_vec(&line)?
        };
        Ok(bytes)
    }

    fn reserved_keys(&self) -> Vec<&str> {
        if self.data_key.is_some() {
            return Vec::new();
        }
        let mut keys = vec![self.field_names.level.as_str(), self.field_names.message.as_str()];
        if !self.disable_timestamp {
            keys.push(self.field_names.time.as_str());
        }
        keys
    }
}

struct JsonLine<'a> {
    formatter: &'a JsonFormatter,
    record: &'a Record,
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = &self.formatter.field_names;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(&names.level, self.record.level().as_str())?;
        if !self.formatter.disable_timestamp {
            let time = render_time(
                self.record.time(),
                self.formatter.timestamp_format.as_deref(),
            );
            map.serialize_entry(&names.time, &time)?;
        }
        map.serialize_entry(&names.message, self.record.message())?;
        match &self.formatter.data_key {
            Some(key) => map.serialize_entry(key, self.record.fields())?,
            None => {
                for (key, value) in self.record.fields().iter() {
                    map.serialize_entry(key, value)?;
                }
            }
        }
        map.end()
    }
}
