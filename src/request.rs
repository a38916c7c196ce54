//! In-process request execution against the system under test.
//!
//! A request is described by a typed [`RequestContext`] and handed to a
//! [`RequestHandler`] directly, so no interpreter or generated source is
//! involved.

use crate::error::RequestError;
use std::collections::BTreeMap;
use std::path::Path;

/// Path, query parameters and headers of a simulated image request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// File path relative to the host, e.g. `photo.jpg`.
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    /// Extra bytes the handler should append to its output.
    pub appended_bytes: usize,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn append_bytes(mut self, count: usize) -> Self {
        self.appended_bytes = count;
        self
    }

    /// Request URI as seen by the handler.
    pub fn request_uri(&self) -> String {
        format!("/example.com/{}", self.path)
    }

    /// Headers as server variables: the name is upper-cased and prefixed with
    /// `HTTP_`, so `accept` becomes `HTTP_ACCEPT`. Hyphens are kept as is.
    pub fn server_vars(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| (format!("HTTP_{}", name.to_ascii_uppercase()), value.clone()))
            .collect()
    }
}

/// Raw output of a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Exit indicator; zero means the handler completed normally.
    pub status: i32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 0, body }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Entry point of the system under test.
pub trait RequestHandler {
    fn handle(&self, ctx: &RequestContext) -> Response;
}

impl<F> RequestHandler for F
where
    F: Fn(&RequestContext) -> Response,
{
    fn handle(&self, ctx: &RequestContext) -> Response {
        self(ctx)
    }
}

/// Obtain the image bytes for `ctx`.
///
/// With no query parameters there is nothing to transform, so the original
/// fixture `fixtures_dir/<path>` is returned as is. Otherwise the handler is
/// invoked and must report success.
pub fn fetch<H: RequestHandler + ?Sized>(
    handler: &H,
    ctx: &RequestContext,
    fixtures_dir: &Path,
) -> Result<Vec<u8>, RequestError> {
    if ctx.query.is_empty() {
        let path = fixtures_dir.join(&ctx.path);
        tracing::debug!(path = %path.display(), "Serving original fixture");
        return std::fs::read(&path).map_err(|source| RequestError::Fixture { path, source });
    }

    let response = handler.handle(ctx);
    tracing::debug!(
        uri = %ctx.request_uri(),
        params = ctx.query.len(),
        status = response.status,
        bytes = response.body.len(),
        "Request handled"
    );

    if !response.is_success() {
        return Err(RequestError::Status { status: response.status });
    }
    Ok(response.body)
}

/// True when the body is an error message rather than image data.
pub fn is_error_body(body: &[u8]) -> bool {
    body.starts_with(b"Error")
}
