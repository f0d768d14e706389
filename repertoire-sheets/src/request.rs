use serde::de::DeserializeOwned;

use crate::{Client, ClientResult};

/// Making requests against the site.
impl Client {
    /// Make a `GET` request to `path` on the site and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not valid JSON for `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<T> {
        let bytes = self.request_raw(path, parameters).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make a `GET` request to `path` on the site and return the body as-is,
    /// regardless of the status code. The proxy reports its errors in the body.
    pub(crate) async fn request_raw(
        &self,
        path: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<Vec<u8>> {
        let request = self
            .client
            .get(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(parameters);

        Ok(request.send().await?.bytes().await?.into())
    }

    /// Fetch an absolute URL and return the body as text.
    pub(crate) async fn request_text(
        &self,
        url: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<String> {
        Ok(self
            .client
            .get(url)
            .query(parameters)
            .send()
            .await?
            .text()
            .await?)
    }
}
