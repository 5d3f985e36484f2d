//! Error types surfaced by the recommendation pipeline

use std::fmt::Display;
use thiserror::Error;

use crate::core::fetch::FetchError;

/// Pipeline stage an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    Holdings,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Stage::Listing => "listing",
                Stage::Holdings => "holdings",
            }
        )
    }
}

/// Fatal failures of a recommendation run.
///
/// Transport and status errors point at network or availability problems,
/// `StructureNotFound` means the page was fetched but its layout no longer
/// matches what the extractors look for.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{stage} page could not be fetched: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: FetchError,
    },

    #[error("{stage} page {url} returned HTTP {status}")]
    UpstreamStatus {
        stage: Stage,
        url: String,
        status: u16,
    },

    #[error("{stage} page is missing expected element: {what}")]
    StructureNotFound { stage: Stage, what: &'static str },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RecommendError {
    /// Stable identifier for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendError::Transport { .. } => "transport",
            RecommendError::UpstreamStatus { .. } => "upstream-status",
            RecommendError::StructureNotFound { .. } => "structure-not-found",
            RecommendError::InvalidRequest(_) => "invalid-request",
        }
    }

    /// Stage the error was raised from, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RecommendError::Transport { stage, .. }
            | RecommendError::UpstreamStatus { stage, .. }
            | RecommendError::StructureNotFound { stage, .. } => Some(*stage),
            RecommendError::InvalidRequest(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
