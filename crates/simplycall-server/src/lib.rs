//! simplycall Server
//!
//! This crate provides the receiving half of simplycall: the route registry,
//! the dispatcher and the HTTP receive side.
//!
//! # Components
//!
//! - **[`Router`]**: registry of `(parser, handler)` pairs keyed by `<scope> <route>`
//! - **Dispatcher**: [`Router::dispatch`] resolves an [`Envelope`](simplycall_common::Envelope)
//!   into a [`CallResult`](simplycall_common::CallResult)
//! - **[`receive`]**: decodes an HTTP request and dispatches it
//! - **[`HttpServer`]**: hyper glue that maps outcomes to status codes
//! - **[`LocalTransport`]**: in-process [`Transport`](simplycall_common::Transport)

pub mod config;
pub mod dispatcher;
pub mod http_server;
pub mod local;
pub mod receiver;
pub mod router;

pub use config::ServerConfig;
pub use http_server::{ContextFn, HttpServer};
pub use local::LocalTransport;
pub use receiver::{receive, Reply};
pub use router::{Handler, ParseFn, Parser, Route, Router, ScopeBuilder};
