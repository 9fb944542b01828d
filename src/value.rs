use serde::{Serialize, Serializer};
use std::fmt;

/// Value of a single log field.
///
/// Only the four primitive kinds can be encoded by the formatters. Values
/// coming from dynamic sources (arbitrary JSON, opaque caller data) that
/// do not fit one of them are kept as [`Value::Unsupported`] together with
/// a string rendering, so a degraded line can still carry them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Unsupported(Unsupported),
}

/// A field value of a kind no formatter can encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    kind: &'static str,
    repr: String,
}

impl Unsupported {
    pub fn new(kind: &'static str, repr: impl Into<String>) -> Self {
        Unsupported {
            kind,
            repr: repr.into(),
        }
    }

    /// Short name of the value kind, e.g. `"object"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Best-effort string rendering of the value.
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl Value {
    pub fn unsupported(kind: &'static str, repr: impl Into<String>) -> Self {
        Value::Unsupported(Unsupported::new(kind, repr))
    }

    /// Short name of the kind of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Unsupported(u) => u.kind(),
        }
    }

    /// Whether a formatter can encode this value as is.
    ///
    /// Non-finite floats have no JSON representation.
    pub fn is_encodable(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::Unsupported(_) => false,
            _ => true,
        }
    }

    /// The encodable form of this value: unencodable values become their
    /// string rendering, everything else is returned unchanged.
    pub fn to_lossy(&self) -> Value {
        match self {
            Value::Float(f) if !f.is_finite() => Value::String(f.to_string()),
            Value::Unsupported(u) => Value::String(u.repr.clone()),
            other => other.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Unsupported(u) => f.write_str(&u.repr),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Unsupported(u) => serializer.serialize_str(&u.repr),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

macro_rules! int_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

// Values past i64::MAX keep their digits as a string.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(value.to_string()))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::unsupported("null", "null"),
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(_) => Value::unsupported("array", value.to_string()),
            Json::Object(_) => Value::unsupported("object", value.to_string()),
        }
    }
}
