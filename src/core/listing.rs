//! Locates the top ranked fund on a risk tier's listing page

use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use crate::core::error::{RecommendError, Result, Stage};
use crate::core::fetch::{PageFetcher, fetch_page};
use crate::core::request::RiskTier;
use crate::core::table::{self, cells};

pub const DEFAULT_LISTING_BASE_URL: &str = "https://groww.in";

const FUND_NAME_HEADER: &str = "Fund Name";

impl RiskTier {
    /// Path of the ranked fund listing for this tier.
    pub fn listing_path(&self) -> &'static str {
        match self {
            RiskTier::Low => "/mutual-funds/top/best-low-risk-mutual-funds",
            RiskTier::Medium => "/mutual-funds/top/best-moderate-risk-mutual-funds",
            RiskTier::High => "/mutual-funds/top/best-high-risk-mutual-funds",
        }
    }
}

pub struct ListingResolver {
    base_url: Url,
}

impl ListingResolver {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid listing base URL '{}': {}", base_url, e))?;
        Ok(Self { base_url })
    }

    pub fn listing_url(&self, tier: RiskTier) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(tier.listing_path());
        url
    }

    /// Resolves the detail page URL of the first ranked fund for `tier`.
    #[instrument(name = "ResolveTopFund", skip(self, fetcher), fields(tier = %tier))]
    pub async fn resolve_top_fund_url(
        &self,
        fetcher: &(dyn PageFetcher + Send + Sync),
        tier: RiskTier,
    ) -> Result<Url> {
        let listing_url = self.listing_url(tier);
        debug!("Requesting fund listing from {}", listing_url);

        let page = fetch_page(fetcher, listing_url.as_str(), Stage::Listing).await?;
        let href = top_fund_link(&page.body)?;

        let fund_url = self.base_url.join(&href).map_err(|e| {
            debug!("Could not resolve fund link '{}': {}", href, e);
            structure_error("no-link")
        })?;
        debug!("Top ranked fund for {} risk: {}", tier, fund_url);
        Ok(fund_url)
    }
}

impl Default for ListingResolver {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_LISTING_BASE_URL).expect("static URL"),
        }
    }
}

/// Link target in the "Fund Name" cell of the first data row of the first
/// table carrying a "Fund Name" header.
pub fn top_fund_link(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let ranking = table::tables(&document)
        .find(|t| t.has_column(FUND_NAME_HEADER))
        .ok_or_else(|| structure_error("fund-name-table"))?;

    let column = ranking
        .column(FUND_NAME_HEADER)
        .ok_or_else(|| structure_error("fund-name-table"))?;

    let first_row = ranking
        .data_rows()
        .first()
        .ok_or_else(|| structure_error("no-data-rows"))?;

    let row_cells = cells(first_row);
    row_cells
        .get(column)
        .and_then(table::first_link)
        .map(str::to_string)
        .ok_or_else(|| structure_error("no-link"))
}

fn structure_error(what: &'static str) -> RecommendError {
    RecommendError::StructureNotFound {
        stage: Stage::Listing,
        what,
    }
}
