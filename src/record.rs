use crate::fields::Fields;
use crate::level::Level;
use chrono::{DateTime, Utc};

/// One structured log event, prior to serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    level: Level,
    time: DateTime<Utc>,
    message: String,
    fields: Fields,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>, fields: Fields) -> Self {
        Record {
            level,
            time: Utc::now(),
            message: message.into(),
            fields,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// A copy of this record that every formatter can encode.
    ///
    /// Unencodable values are replaced by their string rendering, and fields
    /// named like one of `reserved` are moved to `fields.<name>`. If that
    /// name is taken the prefix is repeated until it is free, so no value is
    /// lost.
    pub(crate) fn degraded(&self, reserved: &[&str]) -> Record {
        let mut fields = Fields::with_capacity(self.fields.len());
        for (key, value) in self.fields.iter() {
            let value = value.to_lossy();
            if reserved.contains(&key) {
                let mut renamed = format!("fields.{}", key);
                while self.fields.contains_key(&renamed)
                    || fields.contains_key(&renamed)
                    || reserved.contains(&renamed.as_str())
                {
                    renamed.insert_str(0, "fields.");
                }
                fields.insert(renamed, value);
            } else {
                fields.insert(key, value);
            }
        }
        Record {
            level: self.level,
            time: self.time,
            message: self.message.clone(),
            fields,
        }
    }
}
