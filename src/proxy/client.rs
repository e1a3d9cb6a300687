use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;

use crate::{Error, Result};

/// HTTP client for fetching upstream playlists.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
}

impl ProxyClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the raw body of a URL.
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response.bytes().await?)
    }

    /// Fetch a playlist document as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            reason: format!("Invalid UTF-8: {}", e),
        })
    }
}
