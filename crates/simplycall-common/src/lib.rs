//! simplycall Common Types and Wire Codec
//!
//! This crate provides the protocol definitions, the argument codec and the
//! transport seam shared by the simplycall server and client crates.
//!
//! # Overview
//!
//! simplycall is a typed RPC layer. Functions are registered under an
//! identifier made of a *scope* and a *route name*, called through an
//! [`Envelope`] and answered with a [`CallResult`]:
//!
//! - **Protocol Layer**: identifiers, values, envelopes, failures and errors
//! - **Codec Layer**: positional, type-tagged argument encoding and the
//!   `multipart/form-data` body format used by the HTTP binding
//! - **Transport Layer**: the [`Transport`] trait and the HTTP wire contract
//!
//! # Wire Format
//!
//! - **Request headers**: `x-simplycall-id: <scope> <route>` and
//!   `x-simplycall-argtype: <tags>` where each tag is `j` (JSON) or `b` (binary)
//! - **Request body**: `multipart/form-data`, one part per argument keyed `"0"`, `"1"`, ...
//! - **Response**: a single-character tag header and a one-part body keyed `"0"`
//!
//! # Example
//!
//! ```
//! use simplycall_common::{Envelope, RouteId, Value};
//! use serde_json::json;
//!
//! let call = Envelope::new((), RouteId::new("math", "add"), vec![
//!     Value::Json(json!(1)),
//!     Value::Json(json!(2)),
//! ]);
//! assert_eq!(call.id.as_str(), "math add");
//! ```

pub mod codec;
pub mod protocol;
pub mod transport;

pub use protocol::*;
pub use transport::Transport;
