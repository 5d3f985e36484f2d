use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::fetch::{FetchError, Page, PageFetcher};
use crate::providers::USER_AGENT;

/// Plain GET transport with a bounded wait per request. No retries.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    fn fetch_error(&self, url: &str, err: reqwest::Error) -> FetchError {
        let reason = if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs_f32())
        } else {
            err.to_string()
        };
        FetchError {
            url: url.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(name = "PageFetch", skip(self))]
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.fetch_error(url, e))?;

        let status = response.status().as_u16();
        debug!(status, "Received page response");

        let body = response
            .text()
            .await
            .map_err(|e| self.fetch_error(url, e))?;

        Ok(Page {
            url: url.to_string(),
            status,
            body,
        })
    }
}
