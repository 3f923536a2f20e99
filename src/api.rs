use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::stats::ArticleStat;

pub const DEFAULT_API_URL: &str = "https://dev.to/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything able to list the most recent articles of the key's owner.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    async fn last_articles_stats(&self, api_key: &str, count: u32) -> Result<Vec<ArticleStat>>;
}

#[derive(Clone)]
pub struct DevtoClient {
    base_url: Arc<String>,
    http: Arc<Client>,
}

#[derive(Deserialize)]
struct PublishedArticle {
    title: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    page_views_count: u64,
    #[serde(default)]
    public_reactions_count: u64,
    #[serde(default)]
    comments_count: u64,
}

impl From<PublishedArticle> for ArticleStat {
    fn from(a: PublishedArticle) -> Self {
        ArticleStat {
            // published listings always carry a date
            date: a.published_at.unwrap_or_default(),
            title: a.title,
            views: a.page_views_count,
            reactions: a.public_reactions_count,
            comments: a.comments_count,
        }
    }
}

impl DevtoClient {
    /// Create a dev.to REST client talking to `base_url` (usually [`DEFAULT_API_URL`]).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("devto-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url: Arc::new(base_url),
            http: Arc::new(http),
        })
    }

    /// Single-shot authenticated GET; non-2xx responses are errors carrying the body.
    async fn get(&self, api_key: &str, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url} {query:?}");

        let resp = self
            .http
            .get(&url)
            .header("api-key", api_key)
            .header("Accept", "application/vnd.forem.api-v1+json")
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Network error contacting dev.to: {e}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read response from dev.to: {e}"))?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "dev.to API returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            ));
        }

        Ok(body)
    }
}

impl ArticleSource for DevtoClient {
    /// Fetch the `count` most recently published articles of the key's owner.
    async fn last_articles_stats(&self, api_key: &str, count: u32) -> Result<Vec<ArticleStat>> {
        let query = [("page", "1".to_string()), ("per_page", count.to_string())];
        let body = self.get(api_key, "/articles/me/published", &query).await?;

        let articles: Vec<PublishedArticle> = serde_json::from_str(&body)
            .context("Failed to deserialize published articles response")?;

        log::debug!("dev.to returned {} articles", articles.len());
        Ok(articles.into_iter().map(ArticleStat::from).collect())
    }
}
