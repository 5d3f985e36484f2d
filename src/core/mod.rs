//! Core business logic abstractions

pub mod allocation;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod holdings;
pub mod listing;
pub mod log;
pub mod price;
pub mod recommend;
pub mod request;
pub mod table;

// Re-export main types for cleaner imports
pub use allocation::{AllocationRecord, UnitPrice};
pub use error::{RecommendError, Stage};
pub use fetch::{FetchError, Page, PageFetcher};
pub use holdings::HoldingRow;
pub use listing::ListingResolver;
pub use price::{PriceProvider, PriceResult};
pub use recommend::{Recommendation, Recommender};
pub use request::{InvestmentRequest, RiskTier, Tenure};
