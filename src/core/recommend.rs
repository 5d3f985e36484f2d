//! Listing -> holdings -> allocation pipeline

use rust_decimal::Decimal;
use tracing::info;
use url::Url;

use crate::core::allocation::{AllocationRecord, allocate};
use crate::core::error::Result;
use crate::core::fetch::PageFetcher;
use crate::core::holdings::extract_holdings;
use crate::core::listing::ListingResolver;
use crate::core::price::PriceProvider;
use crate::core::request::InvestmentRequest;

/// Outcome of one recommendation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub request: InvestmentRequest,
    /// Detail page of the fund the holdings were read from.
    pub fund_url: Url,
    /// Buy instructions in the fund's disclosed holdings order.
    pub allocations: Vec<AllocationRecord>,
}

impl Recommendation {
    pub fn total_spent(&self) -> Decimal {
        self.allocations.iter().map(AllocationRecord::spent).sum()
    }

    pub fn unpriced_count(&self) -> usize {
        self.allocations
            .iter()
            .filter(|r| r.unit_price.value().is_none())
            .count()
    }
}

pub struct Recommender<'a> {
    listing: &'a ListingResolver,
    fetcher: &'a (dyn PageFetcher + Send + Sync),
    price_provider: &'a (dyn PriceProvider + Send + Sync),
}

impl<'a> Recommender<'a> {
    pub fn new(
        listing: &'a ListingResolver,
        fetcher: &'a (dyn PageFetcher + Send + Sync),
        price_provider: &'a (dyn PriceProvider + Send + Sync),
    ) -> Self {
        Self {
            listing,
            fetcher,
            price_provider,
        }
    }

    pub async fn recommend(&self, request: &InvestmentRequest) -> Result<Recommendation> {
        self.recommend_with_progress(request, &|| {}).await
    }

    /// Runs the pipeline, calling `on_priced` after each price lookup.
    ///
    /// Listing and holdings failures abort the run. Price failures only mark
    /// the affected records as unpriced.
    pub async fn recommend_with_progress(
        &self,
        request: &InvestmentRequest,
        on_priced: &(dyn Fn() + Sync),
    ) -> Result<Recommendation> {
        info!(
            tier = %request.risk_tier,
            amount = %request.investable_amount,
            "Building recommendation"
        );

        let fund_url = self
            .listing
            .resolve_top_fund_url(self.fetcher, request.risk_tier)
            .await?;
        let holdings = extract_holdings(self.fetcher, fund_url.as_str()).await?;
        let allocations = allocate(
            &holdings,
            request.investable_amount,
            self.price_provider,
            on_priced,
        )
        .await;

        info!(
            fund = %fund_url,
            holdings = holdings.len(),
            allocations = allocations.len(),
            "Recommendation ready"
        );

        Ok(Recommendation {
            request: request.clone(),
            fund_url,
            allocations,
        })
    }
}
