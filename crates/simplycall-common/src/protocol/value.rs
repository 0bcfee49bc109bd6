//! Wire values
//!
//! Every positional argument and every result is one [`Value`]: either an
//! opaque binary blob or a structured JSON value. The [`ArgType`] of a value
//! is what travels in the tag string of the HTTP binding.

use hyper::body::Bytes;
use serde_json::Value as JsonValue;
use std::fmt;

/// Encoding of one positional wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    /// Opaque byte blob, passed through untouched
    Binary,
    /// Structured value serialized as JSON text
    Json,
}

impl ArgType {
    /// Tag character used on the wire for binary values
    pub const BINARY_TAG: char = 'b';
    /// Tag character used on the wire for JSON values
    pub const JSON_TAG: char = 'j';

    /// Returns the single-character wire tag.
    pub const fn tag(self) -> char {
        match self {
            ArgType::Binary => Self::BINARY_TAG,
            ArgType::Json => Self::JSON_TAG,
        }
    }

    /// Parses a wire tag, returning `None` for anything but `b` or `j`.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            Self::BINARY_TAG => Some(ArgType::Binary),
            Self::JSON_TAG => Some(ArgType::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One call argument or call result.
///
/// # Example
///
/// ```
/// use simplycall_common::{ArgType, Value};
/// use serde_json::json;
///
/// let structured = Value::json(json!({"n": 3}));
/// assert_eq!(structured.arg_type(), ArgType::Json);
///
/// let blob = Value::from(vec![0u8, 1, 2]);
/// assert_eq!(blob.arg_type(), ArgType::Binary);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Binary(Bytes),
    Json(JsonValue),
}

impl Value {
    /// Builds a structured value from anything convertible into JSON.
    pub fn json(value: impl Into<JsonValue>) -> Self {
        Value::Json(value.into())
    }

    pub fn arg_type(&self) -> ArgType {
        match self {
            Value::Binary(_) => ArgType::Binary,
            Value::Json(_) => ArgType::Json,
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Value::Json(value) => Some(value),
            Value::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            Value::Json(_) => None,
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::Json(value)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Binary(bytes)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(Bytes::from(bytes))
    }
}
