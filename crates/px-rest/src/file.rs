//! Downloaded files.

use std::sync::LazyLock;

use bytes::Bytes;
use reqwest::header::HeaderMap;

use proffix_rest_client::{header_value, Response, Result};

static EXTENDED_FILENAME: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"(?i)filename\*\s*=\s*[^']*'[^']*'([^;\s]+)").unwrap()
});

static FILENAME: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#).unwrap()
});

/// A file fetched from `PRO/Datei`, with its metadata.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Original file name from `Content-Disposition`.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl DownloadedFile {
    /// Read a download response completely.
    pub async fn from_response(response: Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let content_type = response.content_type().map(str::to_string);
        let content_length = header_value(&headers, "content-length").and_then(|v| v.parse().ok());
        let file_name = header_value(&headers, "content-disposition").and_then(content_disposition_filename);
        let body = response.bytes().await?;

        Ok(Self {
            file_name,
            content_type,
            content_length,
            status,
            headers,
            body,
        })
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// File name from a `Content-Disposition` value. The RFC 5987 `filename*`
/// form wins over the plain one.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    if let Some(caps) = EXTENDED_FILENAME.captures(value) {
        if let Ok(decoded) = urlencoding::decode(&caps[1]) {
            if !decoded.is_empty() {
                return Some(decoded.into_owned());
            }
        }
    }

    let caps = FILENAME.captures(value)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
