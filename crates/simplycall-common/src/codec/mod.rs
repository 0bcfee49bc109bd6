//! Argument Codec
//!
//! Converts positional call arguments into a type-tagged wire representation
//! and back.
//!
//! # Encoding Rules
//!
//! - [`Value::Binary`] is written as-is and tagged `b`
//! - [`Value::Json`] is serialized to JSON text and tagged `j`
//! - Part `i` of the body holds argument `i`; the tag string has exactly one
//!   character per argument, in order
//!
//! Decoding is driven by the tag alone: a `b` part is handed back untouched,
//! a `j` part must parse as JSON. There is no fallback between the two.
//!
//! # Example
//!
//! ```
//! use simplycall_common::codec::encode_args;
//! use simplycall_common::Value;
//! use serde_json::json;
//!
//! let encoded = encode_args(vec![Value::json(json!({"n": 1})), Value::from(vec![7u8])]).unwrap();
//! assert_eq!(encoded.arg_types, "jb");
//! assert!(encoded.content_type.starts_with("multipart/form-data; boundary="));
//! ```

pub mod form;

pub use form::{FormData, FormParts};

use hyper::body::Bytes;

use crate::protocol::{ArgType, Result, Value};

/// A finished multipart body together with the headers describing it.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    /// Tag string, one character per part
    pub arg_types: String,
    /// `multipart/form-data` content type including the boundary
    pub content_type: String,
    /// Encoded body bytes
    pub body: Bytes,
}

/// Encodes one value into its tag and its part payload.
pub fn encode_value(value: Value) -> Result<(ArgType, Bytes)> {
    match value {
        Value::Binary(bytes) => Ok((ArgType::Binary, bytes)),
        Value::Json(json) => Ok((ArgType::Json, Bytes::from(serde_json::to_vec(&json)?))),
    }
}

/// Decodes one part payload according to its tag.
///
/// # Errors
///
/// Returns the JSON error if a `j` part does not hold valid JSON text.
pub fn decode_value(arg_type: ArgType, data: Bytes) -> serde_json::Result<Value> {
    match arg_type {
        ArgType::Binary => Ok(Value::Binary(data)),
        ArgType::Json => Ok(Value::Json(serde_json::from_slice(&data)?)),
    }
}

/// Encodes positional arguments into a multipart body keyed `"0"`, `"1"`, ...
pub fn encode_args(args: Vec<Value>) -> Result<EncodedBody> {
    let mut form = FormData::new();
    let mut arg_types = String::with_capacity(args.len());

    for (position, arg) in args.into_iter().enumerate() {
        let (arg_type, data) = encode_value(arg)?;
        arg_types.push(arg_type.tag());
        form.append(&position.to_string(), arg_type, &data);
    }

    let content_type = form.content_type();
    Ok(EncodedBody {
        arg_types,
        content_type,
        body: form.finish(),
    })
}

/// Encodes a call result: a single part keyed `"0"` and a one-character tag.
pub fn encode_result(value: Value) -> Result<EncodedBody> {
    encode_args(vec![value])
}
