//! HTTP Transport (send side)
//!
//! Sends each call as one `POST` with a `multipart/form-data` body and decodes
//! the single-part reply.
//!
//! # Failure Mapping
//!
//! - Non-success status: the body is a JSON [`Failure`], raised as
//!   [`SimplycallError::Remote`]
//! - Result tag missing or not `b`/`j`: [`SimplycallError::UndecodableResponse`]
//! - Result part missing: [`SimplycallError::NoResponse`]
//! - Result part that does not decode: [`SimplycallError::InvalidResponse`]
//! - Connection problems: [`SimplycallError::Transport`]
//! - Request timeout: [`SimplycallError::Timeout`]

use async_trait::async_trait;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use simplycall_common::codec::{decode_value, encode_args, FormParts};
use simplycall_common::protocol::error::{Result, SimplycallError};
use simplycall_common::transport::http::{HttpWire, ARGTYPE_HEADER, ID_HEADER, RESULT_PART};
use simplycall_common::{ArgType, Envelope, Failure, Transport, Value};
use std::time::Duration;

/// Default cap on response bodies: 64 MiB
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for [`HttpTransport`].
///
/// # Example
///
/// ```
/// use simplycall_client::HttpClientConfig;
///
/// let config = HttpClientConfig::new("http://127.0.0.1:8080").with_timeout_ms(5_000);
/// assert_eq!(config.timeout_ms, Some(5_000));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Endpoint every call is posted to
    pub url: String,
    /// Deadline for the whole exchange, from sending the request until the
    /// response body is read; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
    /// Largest accepted response body
    pub max_response_bytes: usize,
}

impl HttpClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_max_response_bytes(mut self, max_response_bytes: usize) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimplycallError::InvalidRequest`] if the URL is not a plain
    /// `http://` URL or a limit is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.url.starts_with("http://") {
            return Err(SimplycallError::InvalidRequest(format!(
                "Invalid URL '{}': must start with http://",
                self.url
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(SimplycallError::InvalidRequest(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_response_bytes == 0 {
            return Err(SimplycallError::InvalidRequest(
                "max response size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// [`Transport`] that posts calls to a simplycall HTTP endpoint.
///
/// The context is not transmitted; whatever the server needs must travel in
/// the arguments or be derived server-side from the request.
///
/// # Example
///
/// ```no_run
/// use simplycall_client::{Client, HttpClientConfig, HttpTransport};
/// use simplycall_common::Value;
///
/// # #[tokio::main]
/// # async fn main() -> simplycall_common::Result<()> {
/// let transport = HttpTransport::new(HttpClientConfig::new("http://127.0.0.1:8080"))?;
/// let client: Client<()> = Client::new(transport);
/// let _sum = client.scope("math").call("add", vec![Value::json(1), Value::json(2)]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    client: HyperClient<HttpConnector, Full<Bytes>>,
    config: HttpClientConfig,
}

impl HttpTransport {
    /// Creates a transport for `config.url`.
    ///
    /// # Errors
    ///
    /// Returns [`SimplycallError::InvalidRequest`] if the configuration is invalid.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        config.validate()?;
        let client = HyperClient::builder(TokioExecutor::new()).build_http();
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Sends one call and returns the decoded result.
    async fn post(&self, id: &str, args: Vec<Value>) -> Result<Value> {
        let encoded = encode_args(args)?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(&self.config.url)
            .header(ID_HEADER, id)
            .header(ARGTYPE_HEADER, encoded.arg_types)
            .header(CONTENT_TYPE, encoded.content_type)
            .body(Full::new(encoded.body))
            .map_err(|e| SimplycallError::Transport(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| SimplycallError::Transport(format!("HTTP request failed: {}", e)))?;

        let (parts, body) = response.into_parts();
        let body = Limited::new(body, self.config.max_response_bytes)
            .collect()
            .await
            .map_err(|e| SimplycallError::Transport(format!("Failed to read response: {}", e)))?
            .to_bytes();

        if !parts.status.is_success() {
            let failure: Failure = HttpWire::parse_failure(&body).map_err(|_| {
                SimplycallError::InvalidResponse(format!(
                    "Route [{}] answered {} with body: {}",
                    id,
                    parts.status,
                    String::from_utf8_lossy(&body)
                ))
            })?;
            tracing::debug!(route = %id, status = %parts.status, "Call failed: {}", failure);
            return Err(SimplycallError::Remote(failure));
        }

        let arg_type = HttpWire::header_str(&parts.headers, ARGTYPE_HEADER)
            .and_then(|tag| {
                let mut chars = tag.chars();
                match (chars.next(), chars.next()) {
                    (Some(tag), None) => ArgType::from_tag(tag),
                    _ => None,
                }
            })
            .ok_or_else(|| SimplycallError::UndecodableResponse(id.to_string()))?;

        let content_type = HttpWire::header_str(&parts.headers, CONTENT_TYPE.as_str()).unwrap_or_default();
        let mut form = FormParts::parse(content_type, body).await?;

        let data = form
            .take(RESULT_PART)
            .ok_or_else(|| SimplycallError::NoResponse(id.to_string()))?;

        decode_value(arg_type, data).map_err(|e| {
            SimplycallError::InvalidResponse(format!("Route [{}] returned an undecodable result: {}", id, e))
        })
    }
}

#[async_trait]
impl<C: Send + 'static> Transport<C> for HttpTransport {
    async fn send(&self, call: Envelope<C>) -> Result<Value> {
        tracing::debug!(route = %call.id, url = %self.config.url, "Posting call");
        let exchange = self.post(call.id.as_str(), call.args);
        match self.config.timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), exchange)
                .await
                .map_err(|_| SimplycallError::Timeout(timeout_ms))?,
            None => exchange.await,
        }
    }
}
