//! High-level PROFFIX client with session handling.
//!
//! This module provides `ProffixClient`, which combines credentials, options
//! and a shared session with the HTTP transport.
//!
//! ## Security
//!
//! - The session token and password are redacted in Debug output
//! - Session tokens are never written to log lines
//! - Sensitive parameters are skipped in tracing spans

use std::sync::Arc;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use crate::client::PxHttpClient;
use crate::config::{ClientConfig, Options};
use crate::credentials::Credentials;
use crate::error::{ApiError, Error, ErrorKind, Result};
use crate::request::{ApiRequest, Query, RequestBody, RequestMethod};
use crate::response::{header_value, Response};
use crate::session::{Session, SessionState};

/// PROFFIX REST-API client.
///
/// Cloning is cheap; clones share the session. Constructing a client never
/// performs I/O: the first request logs in.
///
/// # Example
///
/// ```rust,ignore
/// use proffix_rest_client::{ClientConfig, Credentials, ProffixClient, Query};
///
/// let creds = Credentials::new("Gast", "gast123", "DEMODB").with_modules(["ADR"]);
/// let client = ProffixClient::new(ClientConfig::new("https://myserver:11011", creds))?;
///
/// let response = client.get("ADR/Adresse/1", Query::new()).await?;
/// let address: serde_json::Value = response.json().await?;
///
/// client.logout().await?;
/// ```
#[derive(Clone)]
pub struct ProffixClient {
    http: PxHttpClient,
    credentials: Arc<Credentials>,
    options: Arc<Options>,
    session: Arc<Session>,
}

impl std::fmt::Debug for ProffixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProffixClient")
            .field("base_url", &self.http.base_url().as_str())
            .field("credentials", &self.credentials)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Completes the logout of `token` when logout finishes, including when the
/// logout future is dropped mid-flight.
struct LogoutGuard<'a> {
    session: &'a Session,
    token: String,
}

impl Drop for LogoutGuard<'_> {
    fn drop(&mut self) {
        self.session.finish_logout(&self.token);
    }
}

impl ProffixClient {
    /// Create a client. Fails only for an unusable URL or HTTP setup.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let http = PxHttpClient::new(base_url, &config.options)?;
        Ok(Self {
            http,
            credentials: Arc::new(config.credentials),
            options: Arc::new(config.options),
            session: Arc::new(Session::new()),
        })
    }

    /// The REST base URL, e.g. `https://myserver:11011/pxapi/v4/`.
    pub fn base_url(&self) -> &url::Url {
        self.http.base_url()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current session token; empty when logged out.
    pub fn session_id(&self) -> String {
        self.session.token()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Hand a request/response line to the configured logger, or to
    /// `tracing` when request logging is enabled. The message is only built
    /// when it will be written.
    pub fn log_request(&self, message: impl FnOnce() -> String) {
        if let Some(logger) = &self.options.logger {
            logger.log(&message());
        } else if self.options.enable_request_logging {
            debug!(target: "proffix_rest::request", "{}", message());
        }
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Make sure a session exists, logging in if necessary.
    ///
    /// A logged-in session is trusted as-is; a stale token is handled when
    /// the server rejects it.
    pub async fn ensure_session(&self) -> Result<()> {
        if self.session.is_logged_in() {
            return Ok(());
        }
        self.login().await
    }

    #[instrument(skip(self), fields(database = %self.credentials.database()))]
    async fn login(&self) -> Result<()> {
        let payload = self.credentials.login_payload(self.options.volume_licence);
        let request = ApiRequest::new(RequestMethod::Post, self.options.login_endpoint.as_str())
            .with_body(RequestBody::json(&payload)?);

        let response = self.http.send(&request, None).await?;
        let status = response.status().as_u16();
        self.log_request(|| format!("Login: HTTP {status}"));

        if status != 201 {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_body(status, &request.endpoint, &body);
            warn!(status, error = %err, "Login rejected");
            return Err(err.into());
        }

        let token = header_value(response.headers(), crate::SESSION_HEADER)
            .unwrap_or_default()
            .to_string();
        if token.is_empty() {
            return Err(Error::new(ErrorKind::Authentication(format!(
                "login response did not contain a {} header",
                crate::SESSION_HEADER
            ))));
        }

        self.session.establish(token);
        debug!(user = self.credentials.username(), "Logged in");
        Ok(())
    }

    /// Adopt a session token obtained elsewhere, e.g. shared by another
    /// client. No request is sent.
    pub fn service_login(&self, token: impl Into<String>) {
        self.session.establish(token);
    }

    /// End the session.
    ///
    /// Returns the status of the logout request, or `None` when there was no
    /// session to end. The local token is cleared whatever the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Option<u16>> {
        let Some(token) = self.session.begin_logout() else {
            debug!("No active session, logout skipped");
            return Ok(None);
        };
        let guard = LogoutGuard {
            session: &self.session,
            token,
        };

        let request = ApiRequest::new(RequestMethod::Delete, self.options.login_endpoint.as_str());
        let response = self.http.send(&request, Some(guard.token.as_str())).await?;
        let status = response.status().as_u16();
        self.log_request(|| format!("Logout: HTTP {status}"));

        if response.status().is_success() {
            debug!(status, "Logged out");
            Ok(Some(status))
        } else {
            let body = response.bytes().await.unwrap_or_default();
            Err(ApiError::from_body(status, &request.endpoint, &body).into())
        }
    }

    // =========================================================================
    // Request dispatch
    // =========================================================================

    /// Send with the current token and classify the response. Successful
    /// responses refresh the session token.
    async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let token = self.session.token();
        let token = Some(token.as_str()).filter(|t| !t.is_empty());

        let response = self.http.send(request, token).await?;
        let status = response.status().as_u16();
        self.log_request(|| format!("{} {}: HTTP {status}", request.method, request.endpoint));

        if !response.status().is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_body(status, &request.endpoint, &body);
            debug!(status, error_type = %err.error_type, "Request failed");
            return Err(err.into());
        }

        if let Some(refreshed) = header_value(response.headers(), crate::SESSION_HEADER) {
            self.session.refresh(refreshed);
        }

        Ok(Response::new(response))
    }

    /// Send one request with the current session, without logging in.
    ///
    /// Any non-2xx status becomes an [`ApiError`]. When no response arrives
    /// at all the session is ended before the error is returned.
    pub async fn dispatch(&self, request: &ApiRequest) -> Result<Response> {
        match self.execute(request).await {
            Err(err) if err.is_transport() => {
                warn!(error = %err, "No response from server, ending session");
                if let Err(logout_err) = self.logout().await {
                    debug!(error = %logout_err, "Logout after transport failure failed");
                }
                Err(err)
            }
            result => result,
        }
    }

    /// Send one request, logging in first if needed.
    ///
    /// A 401 clears the session and the request is sent once more with a
    /// fresh login (unless disabled in the options). With auto-logout
    /// enabled, any error response other than 404 ends the session.
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn request(&self, request: ApiRequest) -> Result<Response> {
        self.ensure_session().await?;

        if let Some(RequestBody::Json(data)) = &request.body {
            self.log_request(|| format!("{} {} data: {data}", request.method, request.endpoint));
        }

        let result = match self.dispatch(&request).await {
            Err(err) if err.is_unauthorized() && self.options.reauthenticate_on_unauthorized => {
                warn!("Session rejected by server, logging in again");
                self.session.clear();
                self.ensure_session().await?;
                self.dispatch(&request).await
            }
            result => result,
        };

        if let Err(err) = &result {
            if self.options.auto_logout && err.is_hard_api_error() {
                debug!(status = err.status(), "Ending session after error response");
                if let Err(logout_err) = self.logout().await {
                    debug!(error = %logout_err, "Auto-logout failed");
                }
            }
        }

        result
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET an endpoint.
    #[instrument(skip(self, query))]
    pub async fn get(&self, endpoint: &str, query: Query) -> Result<Response> {
        self.request(ApiRequest::new(RequestMethod::Get, endpoint).with_query(query))
            .await
    }

    /// GET an endpoint and deserialize the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: Query) -> Result<T> {
        self.get(endpoint, query).await?.json().await
    }

    /// POST a JSON body.
    #[instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.request(ApiRequest::new(RequestMethod::Post, endpoint).with_body(RequestBody::json(body)?))
            .await
    }

    /// PUT a JSON body.
    #[instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.request(ApiRequest::new(RequestMethod::Put, endpoint).with_body(RequestBody::json(body)?))
            .await
    }

    /// PATCH a JSON body.
    #[instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.request(ApiRequest::new(RequestMethod::Patch, endpoint).with_body(RequestBody::json(body)?))
            .await
    }

    /// DELETE an endpoint.
    #[instrument(skip(self))]
    pub async fn delete(&self, endpoint: &str) -> Result<Response> {
        self.request(ApiRequest::new(RequestMethod::Delete, endpoint))
            .await
    }

    /// POST raw bytes, e.g. a file upload.
    #[instrument(skip(self, query, content), fields(size = content.len()))]
    pub async fn post_bytes(&self, endpoint: &str, query: Query, content: Bytes) -> Result<Response> {
        let request = ApiRequest::new(RequestMethod::Post, endpoint)
            .with_query(query)
            .with_body(RequestBody::Bytes(content));
        self.request(request).await
    }
}
