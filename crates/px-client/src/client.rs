//! HTTP transport: builds the reqwest client and sends one request.

use tracing::debug;

use crate::config::Options;
use crate::error::{Error, ErrorKind, Result};
use crate::request::ApiRequest;

/// Thin HTTP layer over reqwest. Knows nothing about sessions; the caller
/// supplies the session token for each request.
#[derive(Debug, Clone)]
pub struct PxHttpClient {
    inner: reqwest::Client,
    base_url: url::Url,
    user_agent: String,
}

impl PxHttpClient {
    /// Create a transport for the given base URL. A client supplied through
    /// `Options::http_client` is used as-is.
    pub fn new(base_url: url::Url, options: &Options) -> Result<Self> {
        let inner = match &options.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .timeout(options.timeout)
                .connect_timeout(options.connect_timeout)
                .user_agent(&options.user_agent)
                .danger_accept_invalid_certs(!options.verify_ssl)
                .build()
                .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?,
        };

        Ok(Self {
            inner,
            base_url,
            user_agent: options.user_agent.clone(),
        })
    }

    /// The REST base URL, always ending in `/`.
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Full URL for an endpoint, including query parameters.
    pub fn endpoint_url(&self, request: &ApiRequest) -> Result<url::Url> {
        let endpoint = request.endpoint.trim_start_matches('/');
        let mut url = url::Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.query.iter() {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Send one request. Every request carries a payload (JSON requests get
    /// `{}` when empty) and, when given, the session header; only binary
    /// uploads go without a JSON content type.
    ///
    /// Returns the raw response whatever its status. Fails only when no
    /// response was received.
    pub async fn send(
        &self,
        request: &ApiRequest,
        session_token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint_url(request)?;

        let body = match &request.body {
            Some(body) => body.to_wire()?,
            None => bytes::Bytes::from_static(b"{}"),
        };

        let mut req = self
            .inner
            .request(request.method.to_reqwest(), url.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str());

        if let Some(token) = session_token {
            req = req.header(crate::SESSION_HEADER, token);
        }

        if !request.is_binary() {
            req = req.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        debug!(method = %request.method, url = %url, "Sending request");

        let response = req.body(body).send().await?;

        debug!(
            status = response.status().as_u16(),
            content_length = response.content_length(),
            "Response received"
        );

        Ok(response)
    }
}
