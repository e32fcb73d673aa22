//! # proffix-rest-client
//!
//! Session-aware HTTP client core for the PROFFIX REST-API.
//!
//! This crate provides the foundational client with:
//! - Lazy login and a single shared session per client
//! - Session token refresh from every response
//! - One transparent re-login when the server rejects the session (401)
//! - Optional logout after hard API errors
//! - Structured API errors with sanitized messages
//! - Request/response tracing, or a custom [`RequestLogger`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (proffix-rest-api: batches, lists, files, sync)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ProffixClient                           │
//! │  - Holds credentials, options and the session               │
//! │  - Login / logout, session refresh, re-authentication       │
//! │  - Verb helpers (get, post, put, patch, delete)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PxHttpClient                            │
//! │  - Raw HTTP, URL building, payload encoding                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use proffix_rest_client::{ClientConfig, Credentials, ProffixClient, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), proffix_rest_client::Error> {
//!     let creds = Credentials::new("Gast", "gast123", "DEMODB").with_modules(["ADR"]);
//!     let client = ProffixClient::new(ClientConfig::new("https://myserver:11011", creds))?;
//!
//!     let addresses: serde_json::Value = client
//!         .get("ADR/Adresse", Query::new().with("Limit", 5))
//!         .await?
//!         .json()
//!         .await?;
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod info;
mod proffix_client;
mod request;
mod response;
mod session;

pub use client::PxHttpClient;
pub use config::{ClientConfig, Options, OptionsBuilder, RequestLogger};
pub use credentials::Credentials;
pub use error::{sanitize_error_message, ApiError, Error, ErrorKind, InvalidField, Result};
pub use info::{ApiInfo, Instance, Licence};
pub use proffix_client::ProffixClient;
pub use request::{ApiRequest, Query, RequestBody, RequestMethod};
pub use response::{filtered_count, header_value, location_to_id, path_base, Response};
pub use session::{Session, SessionState};

/// Default REST-API version segment.
pub const DEFAULT_API_VERSION: &str = "v4";

/// Default REST-API path prefix.
pub const DEFAULT_API_PREFIX: &str = "/pxapi/";

/// Default login/logout endpoint.
pub const DEFAULT_LOGIN_ENDPOINT: &str = "PRO/Login";

/// Default page size for batch retrieval.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Header carrying the session token, in both directions.
pub const SESSION_HEADER: &str = "PxSessionId";

/// Header carrying listing metadata such as `FilteredCount`.
pub const METADATA_HEADER: &str = "PxMetadata";

/// Module requested at login when volume licensing is enabled.
pub const VOLUME_LICENCE_MODULE: &str = "VOL";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("proffix-rest/", env!("CARGO_PKG_VERSION"));
