//! simplycall Client
//!
//! This crate provides the calling half of simplycall:
//!
//! - **[`Client`] / [`Scope`]**: build envelopes addressed to `<scope> <route>`
//!   and hand them to a [`Transport`]
//! - **[`routes!`]**: generates typed async methods for the routes of a scope
//! - **[`HttpTransport`]**: the HTTP send side

pub mod client;
pub mod http;
mod macros;

pub use client::{Client, Scope};
pub use http::{HttpClientConfig, HttpTransport};
pub use simplycall_common::{FromValue, IntoValue, Json, Result, SimplycallError, Transport, Value};
