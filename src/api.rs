use crate::models::PlaceDetailsResponse;
use color_eyre::Result;
use reqwest::Client;
use std::time::Duration;

/// Client for the place-data service.
///
/// The base URL is injectable so tests can point at a mock server; the
/// production default lives in [`ApiConfig`](crate::config::ApiConfig).
pub struct PlaceProvider {
    client: Client,
    base_url: String,
}

impl PlaceProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches place details by the service's integer key.
    ///
    /// Any transport error, non-success status, or malformed payload comes
    /// back as an error; the caller decides what to fall back to.
    pub async fn fetch_details(&self, id: u64) -> Result<PlaceDetailsResponse> {
        let url = format!("{}/places/{}", self.base_url, id);

        let details = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<PlaceDetailsResponse>()
            .await?;

        Ok(details)
    }
}
