//! # proffix-rest
//!
//! A PROFFIX REST-API client library for Rust.
//!
//! This library provides session-managed access to the PROFFIX REST-API with
//! lazy login, transparent re-authentication and structured errors.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Session tokens and passwords are redacted in Debug output
//! - Tracing/logging never writes session tokens
//! - Error messages sanitize session ids
//!
//! ## Crates
//!
//! - **proffix-rest-client** - Core client: configuration, session lifecycle, request dispatch, errors
//! - **proffix-rest-api** - Workflows: batch retrieval, list generation, files, upsert sync
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use proffix_rest::{ClientConfig, Credentials, ProffixRestClient};
//! use proffix_rest::client::Query;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::new("Gast", "gast123", "DEMODB").with_modules(["ADR"]);
//!     let client = ProffixRestClient::new(ClientConfig::new("https://myserver:11011", creds))?;
//!
//!     let batch = client
//!         .get_batch("ADR/Adresse", Query::new().with("Fields", "AdressNr,Name"), None)
//!         .await?;
//!
//!     for address in &batch.items {
//!         println!("{}", address["Name"]);
//!     }
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "api")]
pub use proffix_rest_api as api;
#[cfg(feature = "client")]
pub use proffix_rest_client as client;

// Re-export commonly used types at the top level
#[cfg(feature = "api")]
pub use proffix_rest_api::ProffixRestClient;
#[cfg(feature = "client")]
pub use proffix_rest_client::{ClientConfig, Credentials, Error, Options, ProffixClient, Result};
