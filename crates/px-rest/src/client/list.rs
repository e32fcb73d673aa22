use serde::Serialize;
use tracing::{debug, instrument};

use proffix_rest_client::{ApiError, Query, Result};

use crate::file::DownloadedFile;

impl super::ProffixRestClient {
    /// Generate a list (report) and download the resulting file.
    ///
    /// The server answers the generation request with 201 and a `Location`
    /// pointing at the file. Only the trailing id of that location is used;
    /// the file is then fetched from `PRO/Datei/{id}`, which stays valid
    /// across server versions whose location format differs.
    #[instrument(skip(self, body))]
    pub async fn generate_list<B: Serialize + ?Sized>(
        &self,
        list_id: &str,
        body: &B,
    ) -> Result<DownloadedFile> {
        let endpoint = format!("PRO/Liste/{}/generieren", urlencoding::encode(list_id));
        let response = self.client.post(&endpoint, body).await?;
        let status = response.status();

        let file_id = match response.location_id() {
            Some(id) if status == 201 => id,
            _ => {
                let body = response.bytes().await.unwrap_or_default();
                return Err(ApiError::from_body(status, endpoint, &body).into());
            }
        };

        debug!(file_id = %file_id, "List generated");
        self.get_file(&file_id, Query::new()).await
    }
}
