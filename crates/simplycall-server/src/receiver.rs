//! HTTP Receive Side
//!
//! Turns an incoming request (headers and body) into an [`Envelope`],
//! dispatches it and encodes the outcome. This module never chooses a status
//! code; see [`HttpServer`](crate::HttpServer) for the glue that does.
//!
//! # Steps
//!
//! 1. Read `x-simplycall-id` and `x-simplycall-argtype`
//! 2. Parse the `multipart/form-data` body
//! 3. Walk the tag string by position: check tag `i`, find part `i`, then
//!    decode it. The first bad position decides the failure.
//! 4. Dispatch and wrap a successful value as a one-part [`Reply`]
//!
//! Parts beyond the length of the tag string are ignored.

use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::HeaderMap;
use simplycall_common::codec::{decode_value, encode_result, FormParts};
use simplycall_common::transport::http::{HttpWire, ARGTYPE_HEADER, ID_HEADER};
use simplycall_common::{ArgType, Envelope, Failure, RouteId, Value};

use crate::router::Router;

/// Successful outcome of [`receive`]: the encoded result and its tag.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Tag of the single result part
    pub arg_type: ArgType,
    /// `multipart/form-data` content type including the boundary
    pub content_type: String,
    /// Body with exactly one part, keyed `"0"`
    pub body: Bytes,
}

impl Reply {
    /// Encodes a handler's value.
    pub fn encode(value: Value) -> Result<Self, Failure> {
        let arg_type = value.arg_type();
        let encoded = encode_result(value)
            .map_err(|e| Failure::HandlerErrored(serde_json::Value::String(format!("Failed to encode result: {}", e))))?;

        Ok(Self {
            arg_type,
            content_type: encoded.content_type,
            body: encoded.body,
        })
    }
}

/// Handles one request against `router`.
///
/// # Arguments
///
/// * `router` - Registry to dispatch into
/// * `headers` - Request headers
/// * `body` - Complete request body
/// * `ctx` - Context for this call, built by the caller from the request
///
/// # Returns
///
/// The encoded result, or a [`Failure`] from either this module or the
/// dispatcher. Never panics on malformed input.
pub async fn receive<C: Send + 'static>(
    router: &Router<C>,
    headers: &HeaderMap,
    body: Bytes,
    ctx: C,
) -> Result<Reply, Failure> {
    let id = match HttpWire::header_str(headers, ID_HEADER) {
        Some(id) => RouteId::from(id),
        None => {
            return Err(Failure::IdNotProvided(format!(
                "Request has no [{}] header",
                ID_HEADER
            )))
        }
    };

    let Some(arg_types) = HttpWire::header_str(headers, ARGTYPE_HEADER) else {
        return Err(Failure::ArgumentsUntyped(format!(
            "Route [{}] was called without an [{}] header",
            id, ARGTYPE_HEADER
        )));
    };

    let args = decode_args(&id, arg_types, headers, body).await?;

    let value = router.dispatch(Envelope::new(ctx, id, args)).await?;
    Reply::encode(value)
}

async fn decode_args(id: &RouteId, arg_types: &str, headers: &HeaderMap, body: Bytes) -> Result<Vec<Value>, Failure> {
    let content_type = HttpWire::header_str(headers, CONTENT_TYPE.as_str()).unwrap_or_default();
    let mut parts = FormParts::parse(content_type, body)
        .await
        .map_err(|e| Failure::BodyParsingFailed(e.to_string()))?;

    let expected = arg_types.chars().count();
    if parts.len() > expected {
        tracing::debug!(
            route = %id,
            "Ignoring {} form parts beyond the argument types",
            parts.len() - expected
        );
    }

    let mut args = Vec::with_capacity(expected);
    for (position, tag) in arg_types.chars().enumerate() {
        let Some(arg_type) = ArgType::from_tag(tag) else {
            return Err(Failure::UnknownArgumentType(format!(
                "Route [{}] received unknown argument type [{}] in [{}]",
                id, tag, arg_types
            )));
        };

        let Some(data) = parts.take(&position.to_string()) else {
            return Err(Failure::MissingArgument(format!(
                "Route [{}] with argument types [{}] is missing argument {}",
                id, arg_types, position
            )));
        };

        let value = decode_value(arg_type, data).map_err(|e| {
            Failure::ArgumentDecodingFailed(format!(
                "Route [{}] could not decode argument {}: {}",
                id, position, e
            ))
        })?;
        args.push(value);
    }

    Ok(args)
}
