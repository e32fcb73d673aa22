//! Server information endpoints.
//!
//! `PRO/Info` and `PRO/Datenbank` are authorized by the web-service key
//! instead of a session.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::proffix_client::ProffixClient;
use crate::request::{ApiRequest, Query, RequestMethod};

const INFO_ENDPOINT: &str = "PRO/Info";
const DATABASE_ENDPOINT: &str = "PRO/Datenbank";

/// Server and licence information from `PRO/Info`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiInfo {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "ServerZeit", default)]
    pub server_time: String,
    #[serde(rename = "NeuesteVersion", default)]
    pub latest_version: String,
    #[serde(rename = "Instanz", default)]
    pub instance: Instance,
}

/// PROFFIX installation the REST-API serves.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Instance {
    #[serde(rename = "InstanzNr", default)]
    pub number: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Lizenzen", default)]
    pub licences: Vec<Licence>,
}

/// One licensed module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Licence {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Bezeichnung", default)]
    pub description: String,
    #[serde(rename = "Anzahl", default)]
    pub count: i64,
    #[serde(rename = "Demo", default)]
    pub demo: bool,
    #[serde(rename = "Ablaufdatum", default)]
    pub expires: String,
}

impl ProffixClient {
    fn key_query(&self, key: Option<&str>) -> Query {
        let key = key
            .filter(|k| !k.is_empty())
            .or(self.options().api_key.as_deref())
            .unwrap_or_default();
        Query::new().with("key", key)
    }

    /// Server version, time and licences. Uses `Options::api_key` when no
    /// key is given.
    #[instrument(skip(self, key))]
    pub async fn info(&self, key: Option<&str>) -> Result<ApiInfo> {
        let request =
            ApiRequest::new(RequestMethod::Get, INFO_ENDPOINT).with_query(self.key_query(key));
        self.dispatch(&request).await?.json().await
    }

    /// Databases available on the server.
    #[instrument(skip(self, key))]
    pub async fn database(&self, key: Option<&str>) -> Result<serde_json::Value> {
        let request =
            ApiRequest::new(RequestMethod::Get, DATABASE_ENDPOINT).with_query(self.key_query(key));
        self.dispatch(&request).await?.json().await
    }

    /// Verify that login works and the info endpoint answers.
    #[instrument(skip(self, key))]
    pub async fn check_api(&self, key: Option<&str>) -> Result<ApiInfo> {
        self.ensure_session().await?;
        if self.session_id().is_empty() {
            return Err(Error::new(ErrorKind::Authentication(
                "no session id after login".to_string(),
            )));
        }
        self.info(key).await
    }
}
