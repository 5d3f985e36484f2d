//! Inputs of a recommendation run

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::core::error::{RecommendError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskTier::Low => "Low",
                RiskTier::Medium => "Medium",
                RiskTier::High => "High",
            }
        )
    }
}

/// Intended holding horizon. Informational only, it does not change which
/// fund is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tenure {
    #[default]
    Short,
    Long,
}

impl Display for Tenure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tenure::Short => "Short",
                Tenure::Long => "Long",
            }
        )
    }
}

/// A single immutable request passed through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentRequest {
    pub investable_amount: Decimal,
    pub risk_tier: RiskTier,
    pub tenure: Tenure,
}

impl InvestmentRequest {
    pub fn new(investable_amount: Decimal, risk_tier: RiskTier) -> Result<Self> {
        if investable_amount < Decimal::ZERO {
            return Err(RecommendError::InvalidRequest(format!(
                "investable amount must not be negative, got {investable_amount}"
            )));
        }
        Ok(Self {
            investable_amount,
            risk_tier,
            tenure: Tenure::default(),
        })
    }

    /// Builds a request investing `percent` of `total_funds`.
    pub fn from_total(total_funds: Decimal, percent: Decimal, risk_tier: RiskTier) -> Result<Self> {
        if total_funds < Decimal::ZERO {
            return Err(RecommendError::InvalidRequest(format!(
                "total funds must not be negative, got {total_funds}"
            )));
        }
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(RecommendError::InvalidRequest(format!(
                "percentage of funds must be within 0..=100, got {percent}"
            )));
        }
        let amount = total_funds
            .checked_mul(percent)
            .and_then(|scaled| scaled.checked_mul(Decimal::new(1, 2)))
            .ok_or_else(|| {
                RecommendError::InvalidRequest(format!(
                    "{percent}% of {total_funds} is too large to invest"
                ))
            })?;
        Self::new(amount, risk_tier)
    }

    pub fn with_tenure(self, tenure: Tenure) -> Self {
        Self { tenure, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_negative_amount_rejected() {
        let result = InvestmentRequest::new(Decimal::new(-1, 0), RiskTier::Low);
        assert!(matches!(result, Err(RecommendError::InvalidRequest(_))));
    }

    #[test]
    fn test_zero_amount_allowed() {
        let request = InvestmentRequest::new(Decimal::ZERO, RiskTier::High).unwrap();
        assert_eq!(request.investable_amount, Decimal::ZERO);
        assert_eq!(request.tenure, Tenure::Short);
    }

    #[test]
    fn test_from_total_applies_percentage() {
        let request =
            InvestmentRequest::from_total(Decimal::new(200000, 0), Decimal::new(50, 0), RiskTier::Medium)
                .unwrap()
                .with_tenure(Tenure::Long);
        assert_eq!(request.investable_amount, Decimal::new(100000, 0));
        assert_eq!(request.risk_tier, RiskTier::Medium);
        assert_eq!(request.tenure, Tenure::Long);
    }

    #[test]
    fn test_from_total_rejects_out_of_range_percentage() {
        let result =
            InvestmentRequest::from_total(Decimal::new(1000, 0), Decimal::new(101, 0), RiskTier::Low);
        assert!(matches!(result, Err(RecommendError::InvalidRequest(_))));
    }

    #[test]
    fn test_from_total_rejects_negative_total() {
        let result = InvestmentRequest::from_total(Decimal::new(-5000, 0), Decimal::ZERO, RiskTier::Low);
        assert!(matches!(result, Err(RecommendError::InvalidRequest(_))));
    }

    #[test]
    fn test_from_total_rejects_overflowing_amount() {
        let total = Decimal::from_str("1000000000000000000000000000").unwrap();
        let result = InvestmentRequest::from_total(total, Decimal::ONE_HUNDRED, RiskTier::Low);
        match result {
            Err(RecommendError::InvalidRequest(message)) => {
                assert!(message.contains("too large"), "{message}")
            }
            other => panic!("Expected invalid request, got {other:?}"),
        }

        // The same total at a small percentage still fits
        let request = InvestmentRequest::from_total(total, Decimal::ONE, RiskTier::Low).unwrap();
        assert_eq!(
            request.investable_amount,
            Decimal::from_str("10000000000000000000000000").unwrap()
        );
    }
}
