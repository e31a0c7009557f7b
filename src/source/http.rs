//! HTTP blog source.
//!
//! Talks to the blog REST API:
//!
//! * `GET {base}/blogs?category=<c>&page=<p>&limit=<l>`
//! * `GET {base}/blogs/recommended/<user>?page=<p>&limit=<l>`
//!
//! Both endpoints answer with `{"blogs": [ ... ]}`.  Request timeouts are
//! configured on the underlying client; the feed loader has none of its own.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Request, Url};
use serde::Deserialize;

use super::{BlogSource, BlogSummary, FetchError, UserId};

/// Wire shape of a list response.
#[derive(Debug, Deserialize)]
struct BlogPage {
    blogs: Vec<BlogSummary>,
}

/// A [`BlogSource`] backed by the blog REST API.
pub struct HttpBlogSource {
    client: Client,
    base_url: Url,
}

impl HttpBlogSource {
    /// Create a source rooted at `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid API base URL {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL {base_url} cannot carry a path");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Parse a response body into summaries.
    ///
    /// Pure (no I/O) so the decoding rules can be tested without a server.
    pub fn parse_page(body: &[u8]) -> Result<Vec<BlogSummary>, FetchError> {
        let page: BlogPage = serde_json::from_slice(body)?;
        Ok(page.blogs)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn blogs_request(&self, category: &str, page: u32, limit: u32) -> Result<Request, FetchError> {
        let url = self.endpoint(&["blogs"])?;
        Ok(self
            .client
            .get(url)
            .query(&[("category", category)])
            .query(&[("page", page), ("limit", limit)])
            .build()?)
    }

    fn recommended_request(&self, user: &UserId, page: u32, limit: u32) -> Result<Request, FetchError> {
        let url = self.endpoint(&["blogs", "recommended", user.as_str()])?;
        Ok(self
            .client
            .get(url)
            .query(&[("page", page), ("limit", limit)])
            .build()?)
    }

    async fn execute(&self, request: Request) -> Result<Vec<BlogSummary>, FetchError> {
        tracing::debug!(url = %request.url(), "requesting blog page");
        let response = self.client.execute(request).await?.error_for_status()?;
        let body = response.bytes().await?;
        Self::parse_page(&body)
    }
}

#[async_trait]
impl BlogSource for HttpBlogSource {
    async fn get_blogs(
        &self,
        category: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<BlogSummary>, FetchError> {
        let request = self.blogs_request(category, page, limit)?;
        self.execute(request).await
    }

    async fn get_recommended_blogs(
        &self,
        user: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<BlogSummary>, FetchError> {
        let request = self.recommended_request(user, page, limit)?;
        self.execute(request).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
