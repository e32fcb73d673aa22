use serde::Serialize;
use tracing::{debug, instrument, warn};

use proffix_rest_client::{ApiError, Query, Response, Result};

use crate::sync::{SyncBatchReport, SyncOutcome, SyncRecord};

fn key_endpoint(endpoint: &str, key: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), urlencoding::encode(key))
}

/// Map a write response to an outcome. A create succeeds with 201 or 200, an
/// update with 204 or 200. Any other status is an error.
async fn write_outcome(response: Response, endpoint: &str, key: &str, create: bool) -> Result<SyncOutcome> {
    match response.status() {
        200 | 201 if create => Ok(SyncOutcome::Created(
            response.location_id().unwrap_or_else(|| key.to_string()),
        )),
        200 | 204 if !create => Ok(SyncOutcome::Updated(key.to_string())),
        status => {
            let body = response.bytes().await.unwrap_or_default();
            Err(ApiError::from_body(status, endpoint, &body).into())
        }
    }
}

impl super::ProffixRestClient {
    /// Probe `endpoint`. `Ok(true)` for 200, `Ok(false)` for any other
    /// answer; errors only when no answer arrived.
    async fn probe(&self, endpoint: &str) -> Result<bool> {
        match self.client.get(endpoint, Query::new()).await {
            Ok(response) => Ok(response.status() == 200),
            Err(err) if err.is_transport() => Err(err),
            Err(err) => {
                debug!(error = %err, "Probe found no record");
                Ok(false)
            }
        }
    }

    /// Create or update one record.
    ///
    /// `GET {check_endpoint}/{key}`; on 200 the record is updated with
    /// `PUT {write_endpoint}/{key}`, otherwise created with
    /// `POST {write_endpoint}`. There is no transaction: a record created by
    /// someone else between probe and write makes the write fail.
    #[instrument(skip(self, payload))]
    pub async fn sync<B: Serialize + ?Sized>(
        &self,
        check_endpoint: &str,
        write_endpoint: &str,
        key: &str,
        payload: &B,
    ) -> Result<SyncOutcome> {
        let exists = self.probe(&key_endpoint(check_endpoint, key)).await?;

        let outcome = if exists {
            let endpoint = key_endpoint(write_endpoint, key);
            let response = self.client.put(&endpoint, payload).await?;
            write_outcome(response, &endpoint, key, false).await?
        } else {
            let response = self.client.post(write_endpoint, payload).await?;
            write_outcome(response, write_endpoint, key, true).await?
        };

        debug!(?outcome, "Record synchronized");
        Ok(outcome)
    }

    /// Create or update every record, one after the other.
    ///
    /// Records without a key are created without probing. With
    /// `remove_key_on_create` the key field is left out of create requests,
    /// for endpoints that assign keys themselves. A failing record is
    /// reported and does not stop the others.
    #[instrument(skip(self, records))]
    pub async fn sync_batch(
        &self,
        endpoint: &str,
        remove_key_on_create: bool,
        records: impl IntoIterator<Item = SyncRecord>,
    ) -> SyncBatchReport {
        let mut report = SyncBatchReport::default();

        for record in records {
            let outcome = self.sync_record(endpoint, remove_key_on_create, &record).await;
            if let SyncOutcome::Failed { key, message } = &outcome {
                warn!(key = %key, error = %message, "Record failed");
            }
            report.record(outcome);
        }

        debug!(
            total = report.total,
            created = report.created.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Batch synchronized"
        );
        report
    }

    /// Parse a JSON array of objects and synchronize it with
    /// [`sync_batch`](Self::sync_batch). Input that is not an array of
    /// objects fails the whole call before any request is sent.
    pub async fn sync_batch_json(
        &self,
        endpoint: &str,
        key_field: &str,
        remove_key_on_create: bool,
        data: &[u8],
    ) -> Result<SyncBatchReport> {
        let records = SyncRecord::parse_array(key_field, data)?;
        Ok(self.sync_batch(endpoint, remove_key_on_create, records).await)
    }

    async fn sync_record(&self, endpoint: &str, remove_key_on_create: bool, record: &SyncRecord) -> SyncOutcome {
        let key = record.key();
        let failed = |message: String| SyncOutcome::Failed {
            key: key.clone().unwrap_or_default(),
            message,
        };

        let exists = match &key {
            Some(key) => match self.client.get(&key_endpoint(endpoint, key), Query::new()).await {
                Ok(response) if response.status() == 200 => true,
                Ok(response) => {
                    return failed(format!("unexpected probe status {}", response.status()));
                }
                Err(err) if err.is_not_found() => false,
                Err(err) => return failed(err.to_string()),
            },
            None => false,
        };

        if exists {
            let key = key.clone().unwrap_or_default();
            let target = key_endpoint(endpoint, &key);
            match self.client.put(&target, record.fields()).await {
                Ok(response) if matches!(response.status(), 200 | 204) => SyncOutcome::Updated(key),
                Ok(response) => failed(format!("unexpected update status {}", response.status())),
                Err(err) => failed(err.to_string()),
            }
        } else {
            let result = if remove_key_on_create {
                self.client.post(endpoint, &record.without_key()).await
            } else {
                self.client.post(endpoint, record.fields()).await
            };

            match result {
                Ok(response) if matches!(response.status(), 200 | 201) => {
                    SyncOutcome::Created(response.location_id().unwrap_or_else(|| key.clone().unwrap_or_default()))
                }
                Ok(response) => failed(format!("unexpected create status {}", response.status())),
                Err(err) => failed(err.to_string()),
            }
        }
    }
}
