use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::core::cache::Cache;
use crate::core::price::{PriceProvider, PriceResult};
use crate::providers::USER_AGENT;

// YahooFinanceProvider implementation for PriceProvider
pub struct YahooFinanceProvider {
    base_url: Url,
    client: reqwest::Client,
    cache: Arc<Cache<String, PriceResult>>,
    symbols: HashMap<String, String>,
}

impl YahooFinanceProvider {
    pub fn new(
        base_url: &str,
        cache: Arc<Cache<String, PriceResult>>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid Yahoo Finance base URL: {base_url}"))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(YahooFinanceProvider {
            base_url,
            client,
            cache,
            symbols: HashMap::new(),
        })
    }

    /// Maps security names, as printed on holdings tables, to tickers.
    pub fn with_symbols(mut self, symbols: HashMap<String, String>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Ticker for `name`, or `name` itself when there is no override.
    pub fn symbol_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.symbols.get(name).map_or(name, String::as_str)
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        Ok(url)
    }
}

#[derive(Deserialize, Debug)]
struct YahooPriceResponse {
    chart: PriceChartResult,
}

#[derive(Deserialize, Debug)]
struct PriceChartResult {
    result: Option<Vec<PriceChartItem>>,
}

#[derive(Deserialize, Debug)]
struct PriceChartItem {
    meta: PriceChartMeta,
}

#[derive(Deserialize, Debug)]
struct PriceChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    currency: Option<String>,
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooPriceFetch",
        skip(self),
        fields(symbol = %name)
    )]
    async fn fetch_price(&self, name: &str) -> Result<PriceResult> {
        let symbol = self.symbol_for(name).to_string();
        if let Some(cached) = self.cache.get(&symbol).await {
            return Ok(cached);
        }

        let url = self.chart_url(&symbol)?;
        debug!("Requesting price data from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooPriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let meta = data
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|item| item.meta)
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let price = meta
            .regular_market_price
            .and_then(Decimal::from_f64)
            .ok_or_else(|| anyhow!("No market price for symbol: {}", symbol))?;

        let result = PriceResult {
            price,
            currency: meta.currency.unwrap_or_default(),
        };

        self.cache.put(symbol, result.clone()).await;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(symbol: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(base_url: &str) -> YahooFinanceProvider {
        YahooFinanceProvider::new(base_url, Arc::new(Cache::new()), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "regularMarketPrice": 1650.45,
                        "currency": "INR"
                    }
                }]
            }
        }"#;

        let mock_server = create_mock_server("HDFCBANK.NS", mock_response).await;
        let result = provider(&mock_server.uri())
            .fetch_price("HDFCBANK.NS")
            .await
            .unwrap();
        assert_eq!(result.price, Decimal::from_str("1650.45").unwrap());
        assert_eq!(result.currency, "INR");
    }

    #[tokio::test]
    async fn test_symbol_override_used_for_lookup() {
        let mock_response =
            r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 250, "currency": "INR"}}]}}"#;
        let mock_server = create_mock_server("ACME.NS", mock_response).await;

        let provider = provider(&mock_server.uri()).with_symbols(HashMap::from([(
            "Acme Corp".to_string(),
            "ACME.NS".to_string(),
        )]));
        assert_eq!(provider.symbol_for("Acme Corp"), "ACME.NS");
        assert_eq!(provider.symbol_for("Globex"), "Globex");

        let result = provider.fetch_price("Acme Corp").await.unwrap();
        assert_eq!(result.price, Decimal::new(250, 0));
    }

    #[tokio::test]
    async fn test_names_are_path_encoded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/Acme%20Corp"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 12.5}}]}}"#,
            ))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri())
            .fetch_price("Acme Corp")
            .await
            .unwrap();
        assert_eq!(result.price, Decimal::from_str("12.5").unwrap());
        assert_eq!(result.currency, "");
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/INFY.NS"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 1500, "currency": "INR"}}]}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider =
            YahooFinanceProvider::new(&mock_server.uri(), Arc::clone(&cache), Duration::from_secs(5))
                .unwrap();
        provider.fetch_price("INFY.NS").await.unwrap();
        let again = provider.fetch_price("INFY.NS").await.unwrap();

        assert_eq!(again.price, Decimal::new(1500, 0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_no_price_result_data() {
        let mock_response = r#"{"chart": {"result": []}}"#;
        let mock_server = create_mock_server("INVALID", mock_response).await;

        let result = provider(&mock_server.uri()).fetch_price("INVALID").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for symbol: INVALID"
        );
    }

    #[tokio::test]
    async fn test_null_result_from_unknown_symbol() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#,
            ))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri()).fetch_price("NOPE").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for symbol: NOPE"
        );
    }

    #[tokio::test]
    async fn test_missing_market_price() {
        let mock_response = r#"{"chart": {"result": [{"meta": {"currency": "INR"}}]}}"#;
        let mock_server = create_mock_server("HALTED", mock_response).await;

        let result = provider(&mock_server.uri()).fetch_price("HALTED").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No market price for symbol: HALTED"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri()).fetch_price("AAPL").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for symbol: AAPL"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"charts": {}}"#;
        let mock_server = create_mock_server("AAPL", mock_response).await;

        let result = provider(&mock_server.uri()).fetch_price("AAPL").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for AAPL")
        );
    }
}
