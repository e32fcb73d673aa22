use serde_json::Value;
use tracing::{debug, instrument};

use proffix_rest_client::{Error, ErrorKind, Query, Result};

use crate::batch::BatchResult;

impl super::ProffixRestClient {
    /// Fetch every record of a listing, page by page.
    ///
    /// The caller's `Limit` and `Offset` are replaced. The total is taken
    /// once from the first response's `PxMetadata` header; pages are
    /// requested until that many records have been collected. `batch_size`
    /// of `None` or `0` uses `Options::batch_size`.
    ///
    /// A page without records before the total is reached fails with
    /// [`ErrorKind::InconsistentTotal`].
    #[instrument(skip(self, query))]
    pub async fn get_batch(
        &self,
        endpoint: &str,
        query: Query,
        batch_size: Option<usize>,
    ) -> Result<BatchResult> {
        let batch_size = batch_size
            .filter(|size| *size > 0)
            .unwrap_or(self.client.options().batch_size)
            .max(1);

        let mut first = query.clone();
        first.remove("Offset");
        first.set("Limit", batch_size);

        let response = self.client.get(endpoint, first).await?;
        let total_reported = response.filtered_count();
        let mut items: Vec<Value> = response.json().await?;
        debug!(total_reported, received = items.len(), "First page received");

        while items.len() < total_reported {
            let mut page_query = query.clone();
            page_query.remove("Offset");
            page_query.set("Limit", batch_size);
            page_query.add("Offset", items.len());

            let page: Vec<Value> = self.client.get_json(endpoint, page_query).await?;
            if page.is_empty() {
                return Err(Error::new(ErrorKind::InconsistentTotal {
                    expected: total_reported,
                    collected: items.len(),
                }));
            }

            items.extend(page);
            debug!(collected = items.len(), total_reported, "Page received");
        }

        Ok(BatchResult {
            total: items.len(),
            items,
        })
    }
}
