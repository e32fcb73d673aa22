//! # proffix-rest-api
//!
//! Multi-request workflows for the PROFFIX REST-API, built on
//! `proffix-rest-client`.
//!
//! ## Features
//!
//! - **Batch retrieval** - Fetch complete listings page by page
//! - **Lists** - Generate a list (report) and download the file
//! - **Files** - Upload and download files
//! - **Sync** - Create-or-update single records or whole batches
//!
//! ## Example
//!
//! ```rust,ignore
//! use proffix_rest_api::{ClientConfig, Credentials, ProffixRestClient, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), proffix_rest_api::Error> {
//!     let creds = Credentials::new("Gast", "gast123", "DEMODB").with_modules(["ADR"]);
//!     let client = ProffixRestClient::new(ClientConfig::new("https://myserver:11011", creds))?;
//!
//!     // Every address, 200 per request
//!     let batch = client.get_batch("ADR/Adresse", Query::new(), None).await?;
//!     println!("{} addresses", batch.total);
//!
//!     // Upsert from a JSON array
//!     let report = client
//!         .sync_batch_json("ADR/Adresse", "AdressNr", true, br#"[{"AdressNr": 1, "Name": "Muster AG"}]"#)
//!         .await?;
//!     println!("{} failed", report.failed.len());
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

mod batch;
mod client;
mod file;
mod sync;


// Main client
pub use client::ProffixRestClient;

// Workflow results
pub use batch::BatchResult;
pub use file::{content_disposition_filename, DownloadedFile};
pub use sync::{SyncBatchReport, SyncOutcome, SyncRecord};

// Re-export client types that users might need
pub use proffix_rest_client::{
    location_to_id, ApiError, ClientConfig, Credentials, Error, ErrorKind, InvalidField, Options,
    ProffixClient, Query, Result,
};
