pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::listing::ListingResolver;
use crate::core::recommend::Recommender;
use crate::core::request::{InvestmentRequest, RiskTier, Tenure};
use crate::core::{PriceResult, cache::Cache};
use crate::providers::{http_fetcher::HttpPageFetcher, yahoo_finance::YahooFinanceProvider};
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Inputs of the `recommend` command.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    /// Total funds available.
    pub amount: Decimal,
    /// Share of `amount` to invest, in percent.
    pub percent: Decimal,
    pub risk: RiskTier,
    pub tenure: Tenure,
}

pub enum AppCommand {
    Recommend(RecommendOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Fund picker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Recommend(options) => {
            let request =
                InvestmentRequest::from_total(options.amount, options.percent, options.risk)?
                    .with_tenure(options.tenure);

            let timeout = Duration::from_secs(config.fetch_timeout_secs);
            let price_cache = Arc::new(Cache::<String, PriceResult>::new());
            let price_provider =
                YahooFinanceProvider::new(config.yahoo_base_url(), price_cache, timeout)?
                    .with_symbols(config.symbols.clone());
            let fetcher = HttpPageFetcher::new(timeout)?;
            let listing = ListingResolver::new(config.listing_base_url())?;

            let recommender = Recommender::new(&listing, &fetcher, &price_provider);
            cli::recommend::run(&recommender, &request).await
        }
    }
}
