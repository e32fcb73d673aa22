//! Client configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::error::{Error, ErrorKind, Result};

/// Sink for request/response log lines.
///
/// When configured, every line that would otherwise go to `tracing` is handed
/// to the logger instead, regardless of `enable_request_logging`.
pub trait RequestLogger: Send + Sync {
    /// Record one log line.
    fn log(&self, message: &str);
}

/// Full configuration of a [`ProffixClient`](crate::ProffixClient).
///
/// Produced by the caller (env vars, config file, flags); the client never
/// sources configuration itself.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL, e.g. `https://myserver:11011`. Any path is replaced by
    /// the API prefix and version.
    pub url: String,
    /// Login credentials.
    pub credentials: Credentials,
    /// Client options.
    pub options: Options,
}

impl ClientConfig {
    /// Create a configuration with default options.
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            options: Options::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Resolve the REST base URL (`<origin><api_prefix><api_version>/`).
    pub fn base_url(&self) -> Result<url::Url> {
        let mut base = url::Url::parse(&self.url)?;
        if base.cannot_be_a_base() {
            return Err(Error::new(ErrorKind::Config(format!(
                "URL cannot be used as a base: {}",
                self.url
            ))));
        }

        let prefix = self.options.api_prefix.trim_matches('/');
        let version = self.options.api_version.trim_matches('/');
        let path = match (prefix.is_empty(), version.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{version}/"),
            (false, true) => format!("/{prefix}/"),
            (false, false) => format!("/{prefix}/{version}/"),
        };
        base.set_path(&path);
        base.set_query(None);
        base.set_fragment(None);
        Ok(base)
    }
}

/// Options recognized by the client.
#[derive(Clone)]
pub struct Options {
    /// API version path segment.
    pub api_version: String,
    /// API path prefix.
    pub api_prefix: String,
    /// Login/logout endpoint, relative to the base URL.
    pub login_endpoint: String,
    /// Web-service key for the info and database endpoints.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Verify the server's TLS certificate.
    pub verify_ssl: bool,
    /// User-Agent header value.
    pub user_agent: String,
    /// Default page size for batch retrieval.
    pub batch_size: usize,
    /// Emit request/response log lines.
    pub enable_request_logging: bool,
    /// Log out after any non-404 error response.
    pub auto_logout: bool,
    /// Log in with the volume licence module instead of the module list.
    pub volume_licence: bool,
    /// Clear the session and retry once when a request comes back 401.
    pub reauthenticate_on_unauthorized: bool,
    /// Pre-built HTTP client used instead of building one from these options.
    pub http_client: Option<reqwest::Client>,
    /// Custom log sink.
    pub logger: Option<Arc<dyn RequestLogger>>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("api_version", &self.api_version)
            .field("api_prefix", &self.api_prefix)
            .field("login_endpoint", &self.login_endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("user_agent", &self.user_agent)
            .field("batch_size", &self.batch_size)
            .field("enable_request_logging", &self.enable_request_logging)
            .field("auto_logout", &self.auto_logout)
            .field("volume_licence", &self.volume_licence)
            .field(
                "reauthenticate_on_unauthorized",
                &self.reauthenticate_on_unauthorized,
            )
            .field("http_client", &self.http_client.is_some())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            api_prefix: crate::DEFAULT_API_PREFIX.to_string(),
            login_endpoint: crate::DEFAULT_LOGIN_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            verify_ssl: true,
            user_agent: crate::USER_AGENT.to_string(),
            batch_size: crate::DEFAULT_BATCH_SIZE,
            enable_request_logging: false,
            auto_logout: false,
            volume_licence: false,
            reauthenticate_on_unauthorized: true,
            http_client: None,
            logger: None,
        }
    }
}

impl Options {
    /// Create a new options builder.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

/// Builder for Options.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the API version segment (e.g. "v4").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.options.api_version = version.into();
        self
    }

    /// Set the API path prefix (e.g. "/pxapi/").
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.api_prefix = prefix.into();
        self
    }

    /// Set the login endpoint.
    pub fn with_login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options.login_endpoint = endpoint.into();
        self
    }

    /// Set the web-service key used by the info and database endpoints.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.options.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.options.verify_ssl = verify;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Set the default batch size. Zero keeps the current value.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            self.options.batch_size = batch_size;
        }
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.options.enable_request_logging = enabled;
        self
    }

    /// Log out automatically after hard (non-404) errors.
    pub fn with_auto_logout(mut self, enabled: bool) -> Self {
        self.options.auto_logout = enabled;
        self
    }

    /// Use volume licensing.
    pub fn with_volume_licence(mut self, enabled: bool) -> Self {
        self.options.volume_licence = enabled;
        self
    }

    /// Enable or disable the single re-authentication retry on 401.
    pub fn with_reauthentication(mut self, enabled: bool) -> Self {
        self.options.reauthenticate_on_unauthorized = enabled;
        self
    }

    /// Use a pre-built HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.options.http_client = Some(client);
        self
    }

    /// Route log lines to a custom logger.
    pub fn with_logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
        self.options.logger = Some(logger);
        self
    }

    /// Build the options.
    pub fn build(self) -> Options {
        self.options
    }
}
