//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceResult {
    pub price: Decimal,
    pub currency: String,
}

/// Latest traded price of a security. Any error is read by callers as
/// "price unavailable".
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult>;
}
