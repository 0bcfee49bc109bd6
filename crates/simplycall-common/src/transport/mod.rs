//! simplycall Transport Layer
//!
//! A transport carries an [`Envelope`] across a process boundary and brings
//! back the call's value. The core never looks inside a transport; it only
//! requires the [`Transport`] trait.
//!
//! # Components
//!
//! - **[`Transport`]**: the send-side seam the client's call proxy talks to
//! - **[`http`]**: header names and helpers shared by both halves of the HTTP binding
//!
//! Failures reported by the far side arrive as
//! [`SimplycallError::Remote`](crate::SimplycallError::Remote); everything
//! else (connection, decoding, timeouts) as the other error variants.

pub mod http;

use async_trait::async_trait;

use crate::protocol::{Envelope, Result, Value};

/// Sends one call and waits for its value.
///
/// Implementations must not retry, batch or reorder calls: each `send` is one
/// self-contained round trip. The context inside the envelope belongs to the
/// caller; a transport may use it locally but is not required to transmit it.
#[async_trait]
pub trait Transport<C: Send + 'static>: Send + Sync + 'static {
    async fn send(&self, call: Envelope<C>) -> Result<Value>;
}
