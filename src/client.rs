use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Article, ArticleQuery, Feed, NewFeed, Paginated};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP boundary to the aggregator backend.
///
/// Only four endpoints are used: listing, creating and deleting feeds, and
/// listing articles. GETs are retried `fetch_retries` times; mutations go out
/// exactly once.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    fetch_retries: u32,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, fetch_retries: u32) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("BitPulseReader/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_feeds(&self) -> Result<Vec<Feed>, ApiError> {
        let url = self.url("/feeds");
        self.get_json(&url, |c| c.get(&url)).await
    }

    /// Any 2xx reply means the feed exists. The created feed is returned when
    /// the body describes one; an unexpected body is logged, not an error.
    pub async fn create_feed(&self, feed: &NewFeed) -> Result<Option<Feed>, ApiError> {
        let url = self.url("/feeds");
        let response = send(&url, self.client.post(&url).json(feed)).await?;
        match response.json::<Feed>().await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                warn!("POST {} succeeded but returned an unexpected body: {}", url, e);
                Ok(None)
            }
        }
    }

    pub async fn delete_feed(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/feeds/{}", id));
        send(&url, self.client.delete(&url)).await?;
        Ok(())
    }

    pub async fn list_articles(&self, query: &ArticleQuery) -> Result<Paginated<Article>, ApiError> {
        let url = self.url("/articles");
        self.get_json(&url, |c| c.get(&url).query(query)).await
    }

    async fn get_json<T, F>(&self, url: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let result = match send(url, build(&self.client)).await {
                Ok(response) => response.json::<T>().await.map_err(|source| ApiError::Decode {
                    url: url.to_string(),
                    source,
                }),
                Err(e) => Err(e),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.fetch_retries => {
                    attempt += 1;
                    warn!("GET {} failed, retrying ({}/{}): {}", url, attempt, self.fetch_retries, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn send(url: &str, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = request.send().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    debug!("{} -> {}", url, status);
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }

    Ok(response)
}
