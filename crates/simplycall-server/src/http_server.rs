//! HTTP Server for simplycall
//!
//! Bundled hyper glue around [`receive`]. The server accepts calls over
//! HTTP/1.1 and answers them from a shared [`Router`].
//!
//! # Architecture
//!
//! The HTTP server:
//! - Listens on a TCP socket for incoming HTTP connections
//! - Spawns a tokio task for each connection
//! - Accepts only `POST` (405 otherwise)
//! - Reads the body up to [`ServerConfig::max_body_bytes`] (413 beyond it)
//! - Builds the call's context from the request head
//! - Maps a reply to 200 and a [`Failure`] to 500 with a JSON body
//!
//! # Example
//!
//! ```no_run
//! use simplycall_server::{HttpServer, Parser, Router};
//! use simplycall_common::Value;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> simplycall_common::Result<()> {
//!     let mut router: Router<()> = Router::new();
//!     router.register("math", "zero", Parser::AssumeTypesafe, |_ctx, _args| async {
//!         Ok(Value::json(0))
//!     })?;
//!
//!     let server = HttpServer::new(Arc::new(router));
//!     server.run("127.0.0.1:8080".parse().unwrap()).await
//! }
//! ```

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{ALLOW, CONTENT_TYPE};
use hyper::http::request::Parts;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use simplycall_common::protocol::error::{Result, SimplycallError};
use simplycall_common::transport::http::{HttpWire, ARGTYPE_HEADER, FAILURE_CONTENT_TYPE};
use simplycall_common::Failure;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::receiver::{receive, Reply};
use crate::router::Router;

/// Builds the per-call context from the request head.
pub type ContextFn<C> = Arc<dyn Fn(&Parts) -> C + Send + Sync>;

type HttpResponse = Response<Full<Bytes>>;

/// HTTP server for a [`Router`].
pub struct HttpServer<C> {
    router: Arc<Router<C>>,
    context: ContextFn<C>,
    config: ServerConfig,
}

impl<C: Default + Send + 'static> HttpServer<C> {
    /// Creates a server that hands every call `C::default()`.
    ///
    /// # Arguments
    ///
    /// * `router` - The fully registered router to serve
    pub fn new(router: Arc<Router<C>>) -> Self {
        Self::with_context(router, |_parts: &Parts| C::default())
    }
}

impl<C: Send + 'static> HttpServer<C> {
    /// Creates a server that derives each call's context from its request.
    ///
    /// # Arguments
    ///
    /// * `router` - The fully registered router to serve
    /// * `context` - Called once per request with the request head
    ///
    /// # Example
    ///
    /// ```
    /// use simplycall_server::{HttpServer, Router};
    /// use std::sync::Arc;
    ///
    /// let router: Router<Option<String>> = Router::new();
    /// let server = HttpServer::with_context(Arc::new(router), |parts| {
    ///     parts
    ///         .headers
    ///         .get("authorization")
    ///         .and_then(|value| value.to_str().ok())
    ///         .map(str::to_owned)
    /// });
    /// ```
    pub fn with_context<F>(router: Arc<Router<C>>, context: F) -> Self
    where
        F: Fn(&Parts) -> C + Send + Sync + 'static,
    {
        Self {
            router,
            context: Arc::new(context),
            config: ServerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds `addr` and serves until an accept error occurs.
    ///
    /// # Errors
    ///
    /// Returns [`SimplycallError::Transport`] if binding or accepting fails.
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SimplycallError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;

        self.serve(listener).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| SimplycallError::InvalidRequest(format!("Invalid server config: {}", e)))?;

        tracing::info!(
            "HTTP server listening on {} ({} routes)",
            listener
                .local_addr()
                .map_err(|e| SimplycallError::Transport(format!("Failed to get local address: {}", e)))?,
            self.router.len()
        );

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .map_err(|e| SimplycallError::Transport(format!("Failed to accept connection: {}", e)))?;

            tracing::debug!("Accepted connection from {}", peer);

            let io = TokioIo::new(stream);
            let router = self.router.clone();
            let context = self.context.clone();
            let max_body_bytes = self.config.max_body_bytes;

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let router = router.clone();
                    let context = context.clone();
                    async move { Self::handle_request(router, context, max_body_bytes, req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!("Error serving connection: {}", err);
                }
            });
        }
    }

    /// Handles an HTTP request.
    async fn handle_request(
        router: Arc<Router<C>>,
        context: ContextFn<C>,
        max_body_bytes: usize,
        req: Request<Incoming>,
    ) -> Result<HttpResponse> {
        if req.method() != Method::POST {
            return Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header(ALLOW, "POST")
                .body(Full::new(Bytes::from_static(b"Only POST requests are supported")))
                .map_err(|e| SimplycallError::Transport(format!("Failed to build response: {}", e)));
        }

        let (parts, body) = req.into_parts();

        let body = match Limited::new(body, max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::warn!("Rejecting request body over {} bytes", max_body_bytes);
                let failure = Failure::BodyParsingFailed(format!(
                    "Request body exceeds {} bytes",
                    max_body_bytes
                ));
                return failure_response(StatusCode::PAYLOAD_TOO_LARGE, &failure);
            }
            Err(e) => {
                return Err(SimplycallError::Transport(format!("Failed to read request body: {}", e)));
            }
        };

        let ctx = context(&parts);

        match receive(&router, &parts.headers, body, ctx).await {
            Ok(reply) => reply_response(reply),
            Err(failure) => {
                if failure.is_dispatch_failure() {
                    tracing::debug!("Call failed: {}", failure);
                } else {
                    tracing::warn!("Malformed call rejected: {}", failure);
                }
                failure_response(StatusCode::INTERNAL_SERVER_ERROR, &failure)
            }
        }
    }
}

fn reply_response(reply: Reply) -> Result<HttpResponse> {
    Response::builder()
        .status(StatusCode::OK)
        .header(ARGTYPE_HEADER, reply.arg_type.tag().to_string())
        .header(CONTENT_TYPE, reply.content_type)
        .body(Full::new(reply.body))
        .map_err(|e| SimplycallError::Transport(format!("Failed to build response: {}", e)))
}

fn failure_response(status: StatusCode, failure: &Failure) -> Result<HttpResponse> {
    let body = HttpWire::failure_body(failure)?;

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, FAILURE_CONTENT_TYPE)
        .body(Full::new(body))
        .map_err(|e| SimplycallError::Transport(format!("Failed to build response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use simplycall_common::ArgType;

    #[test]
    fn test_failure_response_shape() {
        let failure = Failure::non_existent_route(&"s missing".into());
        let response = failure_response(StatusCode::INTERNAL_SERVER_ERROR, &failure).unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], FAILURE_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_failure_response_body_is_kind_object() {
        let failure = Failure::HandlerErrored(json!({"code": 7}));
        let response = failure_response(StatusCode::INTERNAL_SERVER_ERROR, &failure).unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            json!({"handler errored": {"code": 7}})
        );
    }

    #[test]
    fn test_reply_response_carries_tag() {
        let reply = Reply::encode(simplycall_common::Value::from(vec![1u8, 2, 3])).unwrap();
        let response = reply_response(reply).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ARGTYPE_HEADER], ArgType::Binary.tag().to_string().as_str());
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_default_config() {
        let server: HttpServer<()> = HttpServer::new(Arc::new(Router::new()));
        assert_eq!(server.config(), &ServerConfig::default());

        let server = server.with_config(ServerConfig::new().with_max_body_bytes(16));
        assert_eq!(server.config().max_body_bytes, 16);
    }
}
