//! Call envelopes
//!
//! An [`Envelope`] is one invocation attempt. It is built by the caller (or by
//! the receive side of a transport), moved into the dispatcher and consumed
//! there; nothing keeps it afterwards.

use super::identifier::RouteId;
use super::value::Value;

/// One call: the caller's context, the target route and its positional arguments.
///
/// The context is owned by the envelope, so a context value is never shared
/// between two calls.
#[derive(Debug, Clone)]
pub struct Envelope<C> {
    /// Caller-supplied context, handed to the parser and the handler
    pub ctx: C,
    /// Identifier of the route to invoke
    pub id: RouteId,
    /// Positional arguments in call order
    pub args: Vec<Value>,
}

impl<C> Envelope<C> {
    pub fn new(ctx: C, id: impl Into<RouteId>, args: Vec<Value>) -> Self {
        Envelope {
            ctx,
            id: id.into(),
            args,
        }
    }
}
