//! PROFFIX REST-API client.
//!
//! This client wraps `ProffixClient` from `proffix-rest-client` and layers
//! the multi-request workflows on top of the plain verbs: batch retrieval,
//! list generation, file transfer and upsert synchronization.

use proffix_rest_client::{ClientConfig, ProffixClient, Result};

mod batch;
mod file;
mod list;
mod sync;

/// PROFFIX REST-API client.
///
/// Provides the multi-request workflows:
/// - Paginated retrieval of complete listings
/// - List generation and download
/// - File upload and download
/// - Upsert of single records and of whole batches
///
/// Plain requests go through [`inner`](Self::inner).
///
/// # Example
///
/// ```rust,ignore
/// use proffix_rest_api::ProffixRestClient;
///
/// let client = ProffixRestClient::new(config)?;
///
/// // All addresses in Bern, 200 per request
/// let batch = client
///     .get_batch("ADR/Adresse", Query::new().with("Filter", "Ort=='Bern'"), None)
///     .await?;
///
/// // Create or update by key
/// let outcome = client
///     .sync("ADR/Adresse", "ADR/Adresse", "42", &json!({"AdressNr": 42, "Name": "Muster AG"}))
///     .await?;
///
/// client.logout().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProffixRestClient {
    client: ProffixClient,
}

impl ProffixRestClient {
    /// Create a client. No request is sent until the first call.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ProffixClient::new(config)?,
        })
    }

    /// Create a REST client from an existing ProffixClient. The session is
    /// shared with it.
    pub fn from_client(client: ProffixClient) -> Self {
        Self { client }
    }

    /// Get the underlying ProffixClient.
    pub fn inner(&self) -> &ProffixClient {
        &self.client
    }

    /// End the session; see [`ProffixClient::logout`].
    pub async fn logout(&self) -> Result<Option<u16>> {
        self.client.logout().await
    }
}
