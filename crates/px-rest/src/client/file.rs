use bytes::Bytes;
use tracing::{debug, instrument};

use proffix_rest_client::{Error, ErrorKind, Query, Result};

use crate::file::DownloadedFile;

pub(crate) const FILE_ENDPOINT: &str = "PRO/Datei";

impl super::ProffixRestClient {
    /// Upload a file and return the id the server assigned to it.
    #[instrument(skip(self, content))]
    pub async fn upload_file(&self, file_name: &str, content: impl Into<Bytes>) -> Result<String> {
        let mut query = Query::new();
        if !file_name.is_empty() {
            query.add("filename", file_name);
        }

        let response = self.client.post_bytes(FILE_ENDPOINT, query, content.into()).await?;
        let id = response.location_id().ok_or_else(|| {
            Error::new(ErrorKind::Other(format!(
                "upload to {FILE_ENDPOINT} returned HTTP {} without a Location header",
                response.status()
            )))
        })?;

        debug!(file_id = %id, "File uploaded");
        Ok(id)
    }

    /// Download a file by id.
    #[instrument(skip(self, query))]
    pub async fn get_file(&self, file_id: &str, query: Query) -> Result<DownloadedFile> {
        let endpoint = format!("{FILE_ENDPOINT}/{}", urlencoding::encode(file_id));
        let response = self.client.get(&endpoint, query).await?;
        let file = DownloadedFile::from_response(response).await?;

        self.client.log_request(|| {
            format!(
                "Downloaded file {file_id} with Content-Length: {:?}",
                file.content_length
            )
        });
        Ok(file)
    }
}
