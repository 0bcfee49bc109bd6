//! `multipart/form-data` bodies
//!
//! [`FormData`] writes a body with one named part per value; [`FormParts`]
//! reads one back with `multer`. Part payloads are never transformed here:
//! what a part means is decided by the tag string that travels beside it.

use futures_util::stream;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::protocol::ArgType;

static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

fn generate_boundary() -> String {
    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    // counter keeps boundaries distinct within the same clock tick
    let counter = BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("simplycall-{:016x}-{:08x}", timestamp, counter & 0xFFFF_FFFF)
}

fn escape_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Builder for a `multipart/form-data` body.
///
/// # Example
///
/// ```
/// use simplycall_common::codec::FormData;
/// use simplycall_common::ArgType;
///
/// let mut form = FormData::with_boundary("XYZ");
/// form.append("0", ArgType::Json, b"42");
/// assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");
///
/// let body = form.finish();
/// assert!(body.ends_with(b"--XYZ--\r\n"));
/// ```
#[derive(Debug, Clone)]
pub struct FormData {
    boundary: String,
    body: Vec<u8>,
    parts: usize,
}

impl FormData {
    /// Creates an empty form with a freshly generated boundary.
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
            parts: 0,
        }
    }

    /// Appends one part.
    ///
    /// Binary parts are written as an `application/octet-stream` file part,
    /// JSON parts as a plain text field.
    pub fn append(&mut self, name: &str, arg_type: ArgType, data: &[u8]) {
        let name = escape_name(name);

        self.body.extend_from_slice(b"--");
        self.body.extend_from_slice(self.boundary.as_bytes());
        self.body.extend_from_slice(b"\r\n");

        let headers = match arg_type {
            ArgType::Binary => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"blob\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                name
            ),
            ArgType::Json => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
        };
        self.body.extend_from_slice(headers.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");

        self.parts += 1;
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the `Content-Type` header of a request or response carrying this form.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Number of parts appended so far.
    pub fn len(&self) -> usize {
        self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts == 0
    }

    /// Writes the closing delimiter and returns the finished body.
    pub fn finish(mut self) -> Bytes {
        self.body.extend_from_slice(b"--");
        self.body.extend_from_slice(self.boundary.as_bytes());
        self.body.extend_from_slice(b"--\r\n");
        Bytes::from(self.body)
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

/// Parts of a parsed `multipart/form-data` body, keyed by part name.
///
/// When a name occurs more than once the first part wins. Unnamed parts are
/// skipped.
#[derive(Debug, Default)]
pub struct FormParts {
    parts: HashMap<String, Bytes>,
}

impl FormParts {
    /// Parses `body` using the boundary announced in `content_type`.
    ///
    /// # Errors
    ///
    /// Returns the `multer` error if the content type carries no boundary or
    /// the body is not well-formed multipart data.
    pub async fn parse(content_type: &str, body: Bytes) -> Result<Self, multer::Error> {
        let boundary = multer::parse_boundary(content_type)?;
        let body = stream::iter([Ok::<Bytes, Infallible>(body)]);
        let mut multipart = multer::Multipart::new(body, boundary);

        let mut parts = HashMap::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            let data = field.bytes().await?;

            match name {
                Some(name) => {
                    parts.entry(name).or_insert(data);
                }
                None => tracing::debug!("Skipping unnamed form part ({} bytes)", data.len()),
            }
        }

        Ok(Self { parts })
    }

    pub fn get(&self, name: &str) -> Option<&Bytes> {
        self.parts.get(name)
    }

    /// Removes and returns the part called `name`.
    pub fn take(&mut self, name: &str) -> Option<Bytes> {
        self.parts.remove(name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_boundaries_are_distinct() {
        let a = FormData::new();
        let b = FormData::new();
        assert_ne!(a.boundary(), b.boundary());
        assert!(a.boundary().starts_with("simplycall-"));
    }

    #[test]
    fn test_body_layout() {
        let mut form = FormData::with_boundary("B");
        form.append("0", ArgType::Json, b"{\"a\":1}");
        form.append("1", ArgType::Binary, &[0xff, 0x00]);
        assert_eq!(form.len(), 2);

        let body = form.finish();
        let mut expected = Vec::new();
        expected.extend_from_slice(b"--B\r\nContent-Disposition: form-data; name=\"0\"\r\n\r\n{\"a\":1}\r\n");
        expected.extend_from_slice(
            b"--B\r\nContent-Disposition: form-data; name=\"1\"; filename=\"blob\"\r\n\
              Content-Type: application/octet-stream\r\n\r\n",
        );
        expected.extend_from_slice(&[0xff, 0x00]);
        expected.extend_from_slice(b"\r\n--B--\r\n");
        assert_eq!(body.as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_parse_reads_back_every_part() {
        let mut form = FormData::new();
        form.append("0", ArgType::Json, b"[1,2,3]");
        form.append("1", ArgType::Binary, b"\r\n--not-a-boundary\r\n");
        let content_type = form.content_type();

        let parts = FormParts::parse(&content_type, form.finish()).await.unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.get("0").unwrap().as_ref(), b"[1,2,3]");
        assert_eq!(parts.get("1").unwrap().as_ref(), b"\r\n--not-a-boundary\r\n");
    }

    #[tokio::test]
    async fn test_parse_keeps_first_duplicate() {
        let mut form = FormData::new();
        form.append("0", ArgType::Json, b"1");
        form.append("0", ArgType::Json, b"2");
        let content_type = form.content_type();

        let parts = FormParts::parse(&content_type, form.finish()).await.unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts.get("0").unwrap().as_ref(), b"1");
    }

    #[tokio::test]
    async fn test_parse_empty_part() {
        let mut form = FormData::new();
        form.append("0", ArgType::Binary, b"");
        let content_type = form.content_type();

        let mut parts = FormParts::parse(&content_type, form.finish()).await.unwrap();
        assert_eq!(parts.take("0").unwrap().len(), 0);
        assert!(parts.is_empty());
    }

    #[tokio::test]
    async fn test_parse_rejects_missing_boundary() {
        let result = FormParts::parse("application/json", Bytes::from_static(b"{}")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_parse_rejects_garbage_body() {
        let result = FormParts::parse(
            "multipart/form-data; boundary=B",
            Bytes::from_static(b"--B\r\nthis is not a header block"),
        )
        .await;
        assert!(result.is_err());
    }
}
