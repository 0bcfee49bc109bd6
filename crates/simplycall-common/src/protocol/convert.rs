//! Typed conversions in and out of [`Value`]
//!
//! Generated route interfaces accept and return ordinary Rust types. The
//! [`IntoValue`] and [`FromValue`] traits decide which wire encoding a type
//! uses: byte buffers travel as binary, everything else as JSON. Arbitrary
//! serde types go through the [`Json`] wrapper.

use hyper::body::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::error::{Result, SimplycallError};
use super::value::Value;

/// Converts a typed argument into a wire value.
pub trait IntoValue {
    fn into_value(self) -> Result<Value>;
}

/// Converts a wire value back into a typed result.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Marks a serde type that travels as a structured (JSON) value.
///
/// # Example
///
/// ```
/// use simplycall_common::{FromValue, IntoValue, Json};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = Json(Point { x: 1, y: 2 }).into_value().unwrap();
/// let Json(point) = Json::<Point>::from_value(value).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

fn expect_json(value: Value) -> Result<JsonValue> {
    match value {
        Value::Json(json) => Ok(json),
        Value::Binary(bytes) => Err(SimplycallError::ValueType(format!(
            "expected a JSON value, got {} bytes of binary data",
            bytes.len()
        ))),
    }
}

fn expect_binary(value: Value) -> Result<Bytes> {
    match value {
        Value::Binary(bytes) => Ok(bytes),
        Value::Json(json) => Err(SimplycallError::ValueType(format!(
            "expected binary data, got JSON value {}",
            json
        ))),
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl IntoValue for Bytes {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Binary(self))
    }
}

impl FromValue for Bytes {
    fn from_value(value: Value) -> Result<Self> {
        expect_binary(value)
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Binary(Bytes::from(self)))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        expect_binary(value).map(|bytes| bytes.to_vec())
    }
}

impl IntoValue for JsonValue {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Json(self))
    }
}

impl FromValue for JsonValue {
    fn from_value(value: Value) -> Result<Self> {
        expect_json(value)
    }
}

impl<T: Serialize> IntoValue for Json<T> {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Json(serde_json::to_value(self.0)?))
    }
}

impl<T: DeserializeOwned> FromValue for Json<T> {
    fn from_value(value: Value) -> Result<Self> {
        Ok(Json(serde_json::from_value(expect_json(value)?)?))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Json(JsonValue::String(self.to_string())))
    }
}

impl IntoValue for () {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Json(JsonValue::Null))
    }
}

/// Unit results accept any structured value and discard it.
impl FromValue for () {
    fn from_value(value: Value) -> Result<Self> {
        expect_json(value).map(|_| ())
    }
}

/// Implements both conversions for types that are plain JSON scalars.
macro_rules! impl_json_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value> {
                    Ok(Value::Json(serde_json::to_value(self)?))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    Ok(serde_json::from_value(expect_json(value)?)?)
                }
            }
        )*
    };
}

impl_json_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value> {
        match self {
            Some(inner) => inner.into_value(),
            None => Ok(Value::Json(JsonValue::Null)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Json(JsonValue::Null) => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
