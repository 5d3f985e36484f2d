//! Turns fund weights into share quantities

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::core::holdings::HoldingRow;
use crate::core::price::PriceProvider;

/// Price of one unit of a security at allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPrice {
    Priced(Decimal),
    Unavailable,
}

impl UnitPrice {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            UnitPrice::Priced(price) => Some(*price),
            UnitPrice::Unavailable => None,
        }
    }
}

impl Display for UnitPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitPrice::Priced(price) => write!(f, "{price}"),
            UnitPrice::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Buy instruction for a single security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    pub security_name: String,
    pub weight_percent: Decimal,
    pub investment_amount: Decimal,
    pub unit_price: UnitPrice,
    pub share_count: u64,
}

impl AllocationRecord {
    /// Amount spent when buying `share_count` units, zero without a price.
    pub fn spent(&self) -> Decimal {
        self.unit_price
            .value()
            .map_or(Decimal::ZERO, |price| price * Decimal::from(self.share_count))
    }
}

/// `weight_percent`% of `investable_amount`, without intermediate rounding.
pub fn investment_amount(weight_percent: Decimal, investable_amount: Decimal) -> Decimal {
    weight_percent * Decimal::new(1, 2) * investable_amount
}

/// Whole units of `unit_price` affordable with `amount`. Non-positive prices
/// buy nothing.
///
/// Returns `None` when the quotient does not fit a `Decimal` or a `u64`.
pub fn share_count(amount: Decimal, unit_price: Decimal) -> Option<u64> {
    if unit_price <= Decimal::ZERO || amount <= Decimal::ZERO {
        return Some(0);
    }
    let mut shares = amount.checked_div(unit_price)?.floor();
    // Division rounds at the last representable digit, never overspend.
    while shares > Decimal::ZERO && shares.checked_mul(unit_price)? > amount {
        shares -= Decimal::ONE;
    }
    shares.to_u64()
}

/// Builds one record per holding with a known weight, in input order.
///
/// Prices are requested concurrently. A failed or non-positive price leaves
/// the record in place with `UnitPrice::Unavailable` and no shares. So does a
/// price too small to count the affordable shares of.
pub async fn allocate(
    holdings: &[HoldingRow],
    investable_amount: Decimal,
    price_provider: &(dyn PriceProvider + Send + Sync),
    on_priced: &(dyn Fn() + Sync),
) -> Vec<AllocationRecord> {
    let weighted: Vec<(&str, Decimal)> = holdings
        .iter()
        .filter_map(|h| h.weight_percent.map(|w| (h.security_name.as_str(), w)))
        .collect();

    let lookups = weighted.iter().map(|(name, _)| async move {
        let price = match price_provider.fetch_price(name).await {
            Ok(result) if result.price > Decimal::ZERO => UnitPrice::Priced(result.price),
            Ok(result) => {
                warn!(security = %name, price = %result.price, "Ignoring non-positive price");
                UnitPrice::Unavailable
            }
            Err(e) => {
                warn!(security = %name, error = %e, "Price lookup failed");
                UnitPrice::Unavailable
            }
        };
        on_priced();
        price
    });
    let prices = join_all(lookups).await;

    weighted
        .into_iter()
        .zip(prices)
        .map(|((name, weight_percent), price)| {
            let investment_amount = investment_amount(weight_percent, investable_amount);
            let (unit_price, share_count) = match price.value() {
                None => (UnitPrice::Unavailable, 0),
                Some(value) => match share_count(investment_amount, value) {
                    Some(count) => (price, count),
                    None => {
                        warn!(
                            security = %name,
                            price = %value,
                            %investment_amount,
                            "Share count out of range, treating price as unavailable"
                        );
                        (UnitPrice::Unavailable, 0)
                    }
                },
            };
            debug!(
                security = %name,
                %investment_amount,
                %unit_price,
                share_count,
                "Allocated holding"
            );
            AllocationRecord {
                security_name: name.to_string(),
                weight_percent,
                investment_amount,
                unit_price,
                share_count,
            }
        })
        .collect()
}
