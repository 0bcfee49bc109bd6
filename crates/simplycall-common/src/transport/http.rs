//! HTTP wire contract
//!
//! Names and small helpers shared by the send side (client crate) and the
//! receive side (server crate) of the HTTP binding.
//!
//! # Request
//!
//! ```text
//! POST <url>
//! x-simplycall-id: math add
//! x-simplycall-argtype: jj
//! content-type: multipart/form-data; boundary=...
//!
//! part "0": 1
//! part "1": 2
//! ```
//!
//! # Response
//!
//! ```text
//! x-simplycall-argtype: j
//! content-type: multipart/form-data; boundary=...
//!
//! part "0": 3
//! ```
//!
//! The receive side itself never chooses a status code. The bundled server
//! glue answers failures with a non-success status and a JSON [`Failure`]
//! body, which the send side turns back into a raised error.

use hyper::body::Bytes;
use hyper::HeaderMap;

use crate::protocol::{Failure, Result};

/// Header carrying the route identifier (`<scope> <route>`)
pub const ID_HEADER: &str = "x-simplycall-id";

/// Header carrying the tag string of the arguments or of the result
pub const ARGTYPE_HEADER: &str = "x-simplycall-argtype";

/// Name of the single part holding a call result
pub const RESULT_PART: &str = "0";

/// Content type of failure bodies written by the server glue
pub const FAILURE_CONTENT_TYPE: &str = "application/json";

/// HTTP wire helper functions
pub struct HttpWire;

impl HttpWire {
    /// Reads a header as UTF-8 text.
    ///
    /// Returns `None` when the header is absent or not valid UTF-8.
    ///
    /// # Example
    ///
    /// ```
    /// use hyper::HeaderMap;
    /// use hyper::header::HeaderValue;
    /// use simplycall_common::transport::http::{HttpWire, ID_HEADER};
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert(ID_HEADER, HeaderValue::from_static("math add"));
    /// assert_eq!(HttpWire::header_str(&headers, ID_HEADER), Some("math add"));
    /// ```
    pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get(name)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
    }

    /// Serializes a failure into the JSON body used for failed calls.
    pub fn failure_body(failure: &Failure) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(failure)?))
    }

    /// Parses a failure body written by [`failure_body`](Self::failure_body).
    pub fn parse_failure(body: &[u8]) -> Result<Failure> {
        Ok(serde_json::from_slice(body)?)
    }
}
