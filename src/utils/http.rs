// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::HttpConfig;

/// Source of remote text bodies.
///
/// The fetcher only ever needs "GET this URL with these query parameters and
/// give me the body", so tests can stand in for the network with a map.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// GET `url` and return the body. Non-success statuses are errors.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(&config.user_agent);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// [`HttpSource`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?))
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let text = request.send().await?.error_for_status()?.text().await?;
        Ok(text)
    }
}
