//! Error types for proffix-rest-client.

use std::sync::LazyLock;

use serde::Deserialize;

/// Result type alias for proffix-rest-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for proffix-rest-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns the API error if the server answered with a non-2xx status.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    /// Returns true for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    /// Returns true for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }

    /// Returns true if no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Transport(_)
        )
    }

    /// Returns true for errors that should end the session when auto-logout
    /// is enabled. 404 is a soft error.
    pub fn is_hard_api_error(&self) -> bool {
        self.api_error().is_some_and(|e| !e.is_not_found())
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Non-2xx response from the REST-API.
    #[error("{0}")]
    Api(ApiError),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport failure without a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Login handshake failed without an API error body.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input could not be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A paginated listing stopped yielding records before reaching the
    /// reported total.
    #[error("Inconsistent listing: server reported {expected} records, received {collected}")]
    InconsistentTotal { expected: usize, collected: usize },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::new(ErrorKind::Api(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Json(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

/// Structured error returned by the REST-API for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Endpoint the request was sent to (relative to the base URL).
    pub endpoint: String,
    /// Machine-readable error type, e.g. `NOT_FOUND` or `INVALID_FIELDS`.
    pub error_type: String,
    /// Human-readable message. Never empty.
    pub message: String,
    /// Offending fields for validation failures.
    pub fields: Vec<InvalidField>,
}

/// A field rejected by server-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvalidField {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Reason", default)]
    pub reason: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// Error body as sent by the REST-API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Type", default)]
    error_type: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Fields", default)]
    fields: Option<Vec<InvalidField>>,
}

impl ApiError {
    /// Translate a response body into an API error.
    ///
    /// An empty or unparsable body still produces a message naming the status
    /// and endpoint; the text of a body that is not JSON is appended to it.
    pub fn from_body(status: u16, endpoint: impl Into<String>, body: &[u8]) -> Self {
        let endpoint = endpoint.into();
        let parsed = serde_json::from_slice::<ErrorBody>(body).ok();

        let (error_type, message, fields) = match parsed {
            Some(body) => (
                body.error_type,
                sanitize_error_message(body.message.trim()),
                body.fields.unwrap_or_default(),
            ),
            None => {
                let text = sanitize_error_message(String::from_utf8_lossy(body).trim());
                let message = if text.is_empty() {
                    String::new()
                } else {
                    format!("{}: {text}", status_prefix(status, &endpoint))
                };
                (String::new(), message, Vec::new())
            }
        };

        let message = if message.is_empty() {
            synthetic_message(status, &endpoint)
        } else {
            message
        };

        Self {
            status,
            endpoint,
            error_type,
            message,
            fields,
        }
    }

    /// Returns true for `NOT_FOUND` errors and 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.error_type == "NOT_FOUND"
    }

    /// Returns true for `INVALID_FIELDS` errors.
    pub fn is_invalid_fields(&self) -> bool {
        self.error_type == "INVALID_FIELDS"
    }

    /// Returns true for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Names of the offending fields.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fields.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.field_names().join(","))
        }
    }
}

impl std::error::Error for ApiError {}

fn status_prefix(status: u16, endpoint: &str) -> String {
    if endpoint.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status} on endpoint '{endpoint}'")
    }
}

fn synthetic_message(status: u16, endpoint: &str) -> String {
    format!("{} without error details", status_prefix(status, endpoint))
}

static SESSION_ID_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"(?i)(pxsessionid[\s:=]+)[A-Za-z0-9\-]{8,}").unwrap()
});

/// Sanitize an error message before it is stored in an error.
///
/// Session ids are redacted and messages longer than 500 characters are
/// truncated.
pub fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = SESSION_ID_PATTERN
        .replace_all(message, "${1}[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
