//! Extracts disclosed holdings from a fund detail page

use rust_decimal::Decimal;
use scraper::Html;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use crate::core::error::{RecommendError, Result, Stage};
use crate::core::fetch::{PageFetcher, fetch_page};
use crate::core::table::{self, cell_text, cells};

const NAME_HEADER: &str = "Name";
const ASSETS_HEADER: &str = "Assets";

/// One row of a fund's holdings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    pub security_name: String,
    /// Share of fund assets in percent, `None` when the cell was not a
    /// readable percentage.
    pub weight_percent: Option<Decimal>,
}

/// Fetches `fund_url` and returns its holdings in table order.
#[instrument(name = "ExtractHoldings", skip(fetcher))]
pub async fn extract_holdings(
    fetcher: &(dyn PageFetcher + Send + Sync),
    fund_url: &str,
) -> Result<Vec<HoldingRow>> {
    debug!("Requesting fund details from {}", fund_url);
    let page = fetch_page(fetcher, fund_url, Stage::Holdings).await?;
    let holdings = parse_holdings(&page.body)?;
    debug!("Extracted {} holdings from {}", holdings.len(), fund_url);
    Ok(holdings)
}

/// Reads the first table whose header row has both "Name" and "Assets".
pub fn parse_holdings(html: &str) -> Result<Vec<HoldingRow>> {
    let document = Html::parse_document(html);

    let holdings_table = table::tables(&document)
        .find(|t| t.has_column(NAME_HEADER) && t.has_column(ASSETS_HEADER))
        .ok_or(RecommendError::StructureNotFound {
            stage: Stage::Holdings,
            what: "holdings-table",
        })?;
    let assets_column = holdings_table
        .column(ASSETS_HEADER)
        .ok_or(RecommendError::StructureNotFound {
            stage: Stage::Holdings,
            what: "holdings-table",
        })?;

    let mut holdings = Vec::new();
    for (index, row) in holdings_table.data_rows().iter().enumerate() {
        let row_cells = cells(row);
        if row_cells.len() < 2 {
            warn!(row = index + 1, "Skipping holdings row with fewer than two cells");
            continue;
        }

        let security_name = cell_text(row_cells[0]);
        let weight_text = row_cells
            .get(assets_column)
            .map(|cell| cell_text(*cell))
            .unwrap_or_default();
        let weight_percent = parse_percentage(&weight_text);
        if weight_percent.is_none() {
            warn!(
                security = %security_name,
                assets = %weight_text,
                "Could not read holding weight, excluding it from allocation"
            );
        }

        holdings.push(HoldingRow {
            security_name,
            weight_percent,
        });
    }

    Ok(holdings)
}

/// Parses strings such as "12.5%" into `12.5`. Values outside 0..=100 are
/// not percentages of fund assets and yield `None`.
pub fn parse_percentage(text: &str) -> Option<Decimal> {
    let number = text.trim().trim_end_matches('%').trim();
    let value = Decimal::from_str(number).ok()?;
    (Decimal::ZERO..=Decimal::ONE_HUNDRED)
        .contains(&value)
        .then_some(value)
}
