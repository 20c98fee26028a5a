//! Posting description retrieval.
//!
//! Every failure here degrades to an empty description: an empty description
//! matches no skills, so the posting is dropped instead of failing the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScraperError;
use crate::normalize::normalize_description;
use crate::rate_limit::retry_with_backoff;
use crate::render::Renderer;

/// Something that can produce the markup of a posting page.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Retrieves the raw markup (or text) of the posting at `url`.
    async fn fetch_markup(&self, url: &str) -> Result<String, ScraperError>;

    /// Returns the normalized description for `url`, or an empty string if it
    /// could not be retrieved.
    async fn fetch_description(&self, url: &str) -> String {
        match self.fetch_markup(url).await {
            Ok(markup) => normalize_description(&markup),
            Err(e) => {
                tracing::warn!(url, error = %e, "detail fetch failed; treating description as empty");
                String::new()
            }
        }
    }
}

/// Loads postings in the shared rendering session.
pub struct RenderedDetailFetcher<'a> {
    renderer: &'a dyn Renderer,
    settle: Duration,
}

impl<'a> RenderedDetailFetcher<'a> {
    #[must_use]
    pub fn new(renderer: &'a dyn Renderer, settle: Duration) -> Self {
        Self { renderer, settle }
    }
}

#[async_trait]
impl DescriptionSource for RenderedDetailFetcher<'_> {
    async fn fetch_markup(&self, url: &str) -> Result<String, ScraperError> {
        self.renderer.open(url).await?;
        self.renderer.wait(self.settle).await;
        Ok(self.renderer.rendered_markup().await?)
    }
}

/// Fetches postings with plain HTTP GET requests.
///
/// Transient errors (429, network failures, 5xx) are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct HttpDetailFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpDetailFetcher {
    /// Creates a fetcher with the given timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }
}

#[async_trait]
impl DescriptionSource for HttpDetailFetcher {
    async fn fetch_markup(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScraperError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}
