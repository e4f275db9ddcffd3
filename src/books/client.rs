use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::dto::{Book, SearchResponse};
use crate::config::CatalogConfig;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, subject: &str, limit: u32) -> anyhow::Result<Vec<Book>>;
}

/// Open Library search endpoint. One request per call, no retries.
pub struct OpenLibraryClient {
    http: Client,
    books_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build catalog http client")?;
        Ok(Self {
            http,
            books_url: config.books_url.clone(),
        })
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn search(&self, subject: &str, limit: u32) -> anyhow::Result<Vec<Book>> {
        let resp = self
            .http
            .get(&self.books_url)
            .query(&[("subject", subject.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .context("catalog request")?
            .error_for_status()
            .context("catalog status")?
            .json::<SearchResponse>()
            .await
            .context("decode catalog response")?;

        debug!(subject, limit, docs = resp.docs.len(), "catalog search done");
        Ok(resp.docs)
    }
}
