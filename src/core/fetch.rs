//! Page fetching abstractions

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::{RecommendError, Result, Stage};

/// Raw page as returned by the transport.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not complete (connect failure, timeout, broken body).
#[derive(Debug, Error)]
#[error("request to {url} failed: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError>;
}

/// Fetches `url` and rejects transport failures and non-success statuses.
pub(crate) async fn fetch_page(
    fetcher: &(dyn PageFetcher + Send + Sync),
    url: &str,
    stage: Stage,
) -> Result<Page> {
    let page = fetcher
        .fetch(url)
        .await
        .map_err(|source| RecommendError::Transport { stage, source })?;

    if !page.is_success() {
        return Err(RecommendError::UpstreamStatus {
            stage,
            url: url.to_string(),
            status: page.status,
        });
    }

    Ok(page)
}
