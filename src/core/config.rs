use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::listing::DEFAULT_LISTING_BASE_URL;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub listing: Option<ListingProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            listing: Some(ListingProviderConfig {
                base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            }),
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Upper bound for a single page or price request.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Ticker symbols keyed by the security name printed on holdings tables.
    #[serde(default)]
    pub symbols: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            symbols: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "mfpick", "mfpick")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn listing_base_url(&self) -> &str {
        self.providers
            .listing
            .as_ref()
            .map_or(DEFAULT_LISTING_BASE_URL, |p| &p.base_url)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  listing:
    base_url: "http://example.com/listing"
  yahoo:
    base_url: "http://example.com/yahoo"
fetch_timeout_secs: 5
symbols:
  "HDFC Bank Ltd.": "HDFCBANK.NS"
  "Infosys Ltd.": "INFY.NS"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.listing_base_url(), "http://example.com/listing");
        assert_eq!(config.yahoo_base_url(), "http://example.com/yahoo");
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.symbols.len(), 2);
        assert_eq!(
            config.symbols.get("HDFC Bank Ltd."),
            Some(&"HDFCBANK.NS".to_string())
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.listing_base_url(), "https://groww.in");
        assert_eq!(config.yahoo_base_url(), "https://query1.finance.yahoo.com");
        assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        assert!(config.symbols.is_empty());
    }

    #[test]
    fn test_partial_providers_fall_back() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://localhost:9000"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert!(config.providers.listing.is_none());
        assert_eq!(config.listing_base_url(), "https://groww.in");
        assert_eq!(config.yahoo_base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
