//! Result of a paginated listing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use proffix_rest_client::Result;

/// All records of a listing, merged from every page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BatchResult {
    /// Records in server order.
    pub items: Vec<serde_json::Value>,
    /// Number of records collected.
    pub total: usize,
}

impl BatchResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The records as one JSON array.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.items)?)
    }

    /// Deserialize every record into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| T::deserialize(item).map_err(Into::into))
            .collect()
    }
}
