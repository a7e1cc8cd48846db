use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use vocwatch_core::Candidate;

use crate::error::ScraperError;
use crate::extract::extract_candidates;
use crate::retry::retry_with_backoff;

const SEARCH_BASE: &str = "https://search.naver.com/search.naver";

/// HTTP client for the community search-result pages.
///
/// One request per topic: the date-sorted cafe tab for the query. Transient
/// failures (429, network errors) are retried with exponential backoff;
/// anything else surfaces as a typed error so the run can skip the topic and
/// move on.
pub struct ForumClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ForumClient {
    /// Creates a `ForumClient` with the configured timeout, `User-Agent`, and
    /// retry policy. The user agent matters here: the search host serves the
    /// full result markup only to browser-like agents.
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
            base_url: SEARCH_BASE.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Replaces the search endpoint. Test hook for pointing at a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the search-result page for `topic` and extract forum candidates.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network failure after all retries.
    pub async fn search(&self, topic: &str) -> Result<Vec<Candidate>, ScraperError> {
        let html = self.fetch_search_page(topic).await?;
        Ok(extract_candidates(&html))
    }

    async fn fetch_search_page(&self, topic: &str) -> Result<String, ScraperError> {
        let url = self.search_url(topic);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Builds the date-sorted cafe-tab search URL for `topic`.
    fn search_url(&self, topic: &str) -> String {
        let query = utf8_percent_encode(topic, NON_ALPHANUMERIC);
        format!(
            "{}?ssc=tab.cafe.all&st=date&nso=so%3Add%2Cp%3Aall&query={query}",
            self.base_url
        )
    }
}
