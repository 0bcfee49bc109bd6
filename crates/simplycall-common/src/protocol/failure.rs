//! Call failures
//!
//! Everything that can go wrong after a call has been handed to a router is
//! reported as a [`Failure`] value, never raised. The dispatcher produces the
//! first three kinds; transports layer their own kinds onto the same enum so a
//! single response path can serialize any of them.
//!
//! # Wire Shape
//!
//! A failure serializes as a one-key object naming its kind:
//!
//! ```text
//! {"non existent route": "Route [s missing] does not exist!"}
//! {"handler errored": {"reason": "quota exceeded"}}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identifier::RouteId;
use super::value::Value;

/// Error value raised by a parser or a handler, carried through unmodified.
pub type Fault = serde_json::Value;

/// Outcome of one dispatched call.
pub type CallResult = std::result::Result<Value, Failure>;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Failure {
    /// No route is registered under the requested identifier
    #[serde(rename = "non existent route")]
    #[error("non existent route: {0}")]
    NonExistentRoute(String),

    /// The route's parser rejected the arguments
    #[serde(rename = "argument parsing failed")]
    #[error("argument parsing failed: {0}")]
    ArgumentParsingFailed(Fault),

    /// The route's handler failed
    #[serde(rename = "handler errored")]
    #[error("handler errored: {0}")]
    HandlerErrored(Fault),

    #[serde(rename = "id not provided")]
    #[error("id not provided: {0}")]
    IdNotProvided(String),

    #[serde(rename = "arguments untyped")]
    #[error("arguments untyped: {0}")]
    ArgumentsUntyped(String),

    #[serde(rename = "unknown argument type")]
    #[error("unknown argument type: {0}")]
    UnknownArgumentType(String),

    #[serde(rename = "missing argument")]
    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[serde(rename = "argument decoding failed")]
    #[error("argument decoding failed: {0}")]
    ArgumentDecodingFailed(String),

    #[serde(rename = "body parsing failed")]
    #[error("body parsing failed: {0}")]
    BodyParsingFailed(String),
}

impl Failure {
    /// Failure for a call to an identifier nothing is registered under.
    ///
    /// # Example
    ///
    /// ```
    /// use simplycall_common::{Failure, RouteId};
    ///
    /// let failure = Failure::non_existent_route(&RouteId::new("s", "missing"));
    /// assert_eq!(
    ///     failure,
    ///     Failure::NonExistentRoute("Route [s missing] does not exist!".into())
    /// );
    /// ```
    pub fn non_existent_route(id: &RouteId) -> Self {
        Failure::NonExistentRoute(format!("Route [{}] does not exist!", id))
    }

    /// Wire name of this failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::NonExistentRoute(_) => "non existent route",
            Failure::ArgumentParsingFailed(_) => "argument parsing failed",
            Failure::HandlerErrored(_) => "handler errored",
            Failure::IdNotProvided(_) => "id not provided",
            Failure::ArgumentsUntyped(_) => "arguments untyped",
            Failure::UnknownArgumentType(_) => "unknown argument type",
            Failure::MissingArgument(_) => "missing argument",
            Failure::ArgumentDecodingFailed(_) => "argument decoding failed",
            Failure::BodyParsingFailed(_) => "body parsing failed",
        }
    }

    /// Whether the failure was produced by the dispatcher rather than a transport.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(
            self,
            Failure::NonExistentRoute(_)
                | Failure::ArgumentParsingFailed(_)
                | Failure::HandlerErrored(_)
        )
    }
}
