//! HTTP response handling with PROFFIX-specific header helpers.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::Result;

/// A successful (2xx) response. The body is read by consuming the response;
/// dropping it releases the connection.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get all response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(self.headers(), name)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the Location header.
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Identifier of the resource named by the Location header.
    pub fn location_id(&self) -> Option<String> {
        self.location().map(path_base)
    }

    /// Total record count reported in the `PxMetadata` header.
    pub fn filtered_count(&self) -> usize {
        filtered_count(self.headers())
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<bytes::Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.inner.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Get access to the inner reqwest::Response, e.g. to stream the body.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

/// Header value as text; non-UTF-8 values are treated as absent.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

/// Extract the trailing identifier from the Location header.
///
/// `.../ADR/Adresse/42` yields `"42"`. A missing header yields `"."`, the
/// base of an empty path.
pub fn location_to_id(headers: &HeaderMap) -> String {
    path_base(header_value(headers, "location").unwrap_or_default())
}

/// Last element of a slash-separated path, ignoring trailing slashes.
/// Empty input yields `"."`, a path of only slashes yields `"/"`.
pub fn path_base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
struct PxMetadata {
    #[serde(rename = "FilteredCount", default)]
    filtered_count: usize,
}

/// Number of records matching a listing query, from the `PxMetadata` header.
/// Missing or malformed metadata counts as zero.
pub fn filtered_count(headers: &HeaderMap) -> usize {
    header_value(headers, crate::METADATA_HEADER)
        .and_then(|raw| serde_json::from_str::<PxMetadata>(raw).ok())
        .map(|meta| meta.filtered_count)
        .unwrap_or(0)
}
