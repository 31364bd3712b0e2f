//! Portfolio-level gain projections.
//!
//! Per-ETF long-run returns are adjusted for the macro backdrop, weighted by
//! allocation, reduced by expense ratios and then fed through the DCA model
//! for three horizons: one month, one year and retirement.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::dca::{project_dca, DcaInput, DcaProjection, PaymentFrequency};
use super::market_conditions::MarketConditions;
use crate::constants::RETIREMENT_AGE;
use crate::errors::{Result, ValidationError};
use crate::etf::EtfReferenceData;

/// One allocation line. `weight` is in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub weight: f64,
}

/// Measured statistics of one ETF. Volatility is annualised, as a fraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfStats {
    pub volatility: f64,
    pub beta: f64,
    pub dividend_yield: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    pub holdings: Vec<Holding>,
    pub age: u32,
    pub payment: f64,
    #[serde(default)]
    pub frequency: PaymentFrequency,
}

/// Allocation-weighted portfolio figures. Return and expense ratio are
/// annual fractions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    pub beta: f64,
    pub expense_ratio: f64,
    pub dividend_yield: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonPrediction {
    pub expected_return: f64,
    pub low_estimate: f64,
    pub high_estimate: f64,
    pub confidence: f64,
    pub total_value: f64,
    pub total_contributions: f64,
}

impl HorizonPrediction {
    fn from_projection(projection: &DcaProjection, confidence: f64) -> Self {
        Self {
            expected_return: projection.gains,
            low_estimate: projection.low_estimate,
            high_estimate: projection.high_estimate,
            confidence,
            total_value: projection.total_value,
            total_contributions: projection.total_contributions,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPrediction {
    pub expected_return: f64,
    pub low_estimate: f64,
    pub high_estimate: f64,
    pub confidence: f64,
    pub years_to_retirement: u32,
    pub compounded_value: f64,
    pub total_contributions: f64,
    /// Annual return after inflation, percent
    pub real_return: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPredictions {
    pub one_month: HorizonPrediction,
    pub one_year: HorizonPrediction,
    pub to_retirement: RetirementPrediction,
    pub portfolio: PortfolioMetrics,
    pub conditions: MarketConditions,
    /// Holdings that had no statistics and were left out of the weighting
    pub skipped: Vec<String>,
}

/// Coefficients of the portfolio model.
#[derive(Clone, Debug)]
pub struct PortfolioModel {
    pub reference: EtfReferenceData,
    /// Return drag per point of inflation
    pub inflation_drag: f64,
    pub neutral_fed_rate: f64,
    /// Return drag per point of fed rate above neutral
    pub rate_drag: f64,
    pub sentiment_weight: f64,
    pub base_correlation: f64,
    pub correlation_step: f64,
    /// Haircut on the return used for the retirement horizon
    pub long_term_haircut: f64,
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for PortfolioModel {
    fn default() -> Self {
        Self {
            reference: EtfReferenceData::default(),
            inflation_drag: 0.003,
            neutral_fed_rate: 2.0,
            rate_drag: 0.002,
            sentiment_weight: 0.01,
            base_correlation: 0.75,
            correlation_step: 0.05,
            long_term_haircut: 0.92,
            min_age: 18,
            max_age: 80,
        }
    }
}

impl PortfolioModel {
    /// Long-run return of `symbol` under `conditions`.
    pub fn adjusted_return(&self, symbol: &str, conditions: &MarketConditions) -> f64 {
        self.reference.historical_return(symbol)
            - conditions.inflation_rate * self.inflation_drag
            - (conditions.fed_rate - self.neutral_fed_rate) * self.rate_drag
            + conditions.market_sentiment * self.sentiment_weight
    }

    /// Volatility multiplier for a portfolio of `holdings` lines.
    pub fn diversification_factor(&self, holdings: usize) -> f64 {
        if holdings > 1 {
            (self.base_correlation + (holdings - 1) as f64 * self.correlation_step).sqrt()
        } else {
            1.0
        }
    }

    /// Weighted metrics over the holdings that have statistics. Returns the
    /// metrics and the symbols that were skipped.
    pub fn portfolio_metrics(
        &self,
        holdings: &[Holding],
        stats: &HashMap<String, EtfStats>,
        conditions: &MarketConditions,
    ) -> (PortfolioMetrics, Vec<String>) {
        let mut metrics = PortfolioMetrics {
            expected_return: 0.0,
            volatility: 0.0,
            beta: 0.0,
            expense_ratio: 0.0,
            dividend_yield: 0.0,
        };
        let mut skipped = Vec::new();

        for holding in holdings {
            let Some(etf) = stats.get(&holding.symbol) else {
                skipped.push(holding.symbol.clone());
                continue;
            };
            let weight = holding.weight / 100.0;
            metrics.expected_return += self.adjusted_return(&holding.symbol, conditions) * weight;
            metrics.volatility += etf.volatility * weight;
            metrics.beta += etf.beta * weight;
            metrics.expense_ratio += self.reference.expense_ratio(&holding.symbol) * weight;
            metrics.dividend_yield += etf.dividend_yield * weight;
        }

        metrics.volatility *= self.diversification_factor(holdings.len());
        metrics.expected_return -= metrics.expense_ratio;
        (metrics, skipped)
    }

    pub fn predict(
        &self,
        request: &PortfolioRequest,
        stats: &HashMap<String, EtfStats>,
        conditions: &MarketConditions,
    ) -> Result<PortfolioPredictions> {
        validate(request)?;

        let (portfolio, skipped) = self.portfolio_metrics(&request.holdings, stats, conditions);
        let age = request.age.clamp(self.min_age, self.max_age);
        let years_to_retirement = RETIREMENT_AGE.saturating_sub(age).max(1);

        let monthly_return = portfolio.expected_return / 12.0;
        let monthly_volatility = portfolio.volatility / 12f64.sqrt();
        let dca = |months: u32, monthly_return: f64| {
            project_dca(&DcaInput {
                payment: request.payment,
                frequency: request.frequency,
                months,
                monthly_return,
                monthly_volatility,
            })
        };

        let one_month = dca(1, monthly_return)?;
        let one_year = dca(12, monthly_return)?;

        let long_term_return = portfolio.expected_return * self.long_term_haircut;
        let retirement = dca(years_to_retirement * 12, long_term_return / 12.0)?;
        let real_return = (long_term_return - conditions.inflation_rate / 100.0) * 100.0;

        let volatility = conditions.market_volatility;
        Ok(PortfolioPredictions {
            one_month: HorizonPrediction::from_projection(
                &one_month,
                (70.0 - volatility * 100.0).clamp(60.0, 75.0),
            ),
            one_year: HorizonPrediction::from_projection(
                &one_year,
                (80.0 - volatility * 80.0).clamp(70.0, 85.0),
            ),
            to_retirement: RetirementPrediction {
                expected_return: retirement.gains,
                low_estimate: retirement.low_estimate,
                high_estimate: retirement.high_estimate,
                confidence: (75.0 + f64::from(years_to_retirement).ln() * 8.0).min(90.0),
                years_to_retirement,
                compounded_value: retirement.total_value,
                total_contributions: retirement.total_contributions,
                real_return,
            },
            portfolio,
            conditions: *conditions,
            skipped,
        })
    }
}

fn validate(request: &PortfolioRequest) -> Result<()> {
    if request.holdings.is_empty() {
        return Err(ValidationError::MissingField("holdings".to_string()).into());
    }
    if let Some(bad) = request
        .holdings
        .iter()
        .find(|h| !h.weight.is_finite() || h.weight < 0.0)
    {
        return Err(ValidationError::InvalidInput(format!(
            "weight of {} must be a non-negative percentage",
            bad.symbol
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(entries: &[(&str, f64, f64)]) -> HashMap<String, EtfStats> {
        entries
            .iter()
            .map(|(s, vol, beta)| {
                (
                    s.to_string(),
                    EtfStats {
                        volatility: *vol,
                        beta: *beta,
                        dividend_yield: 1.5,
                    },
                )
            })
            .collect()
    }

    fn request(holdings: &[(&str, f64)], age: u32) -> PortfolioRequest {
        PortfolioRequest {
            holdings: holdings
                .iter()
                .map(|(s, w)| Holding {
                    symbol: s.to_string(),
                    weight: *w,
                })
                .collect(),
            age,
            payment: 500.0,
            frequency: PaymentFrequency::Monthly,
        }
    }

    #[test]
    fn test_adjusted_return() {
        let model = PortfolioModel::default();
        let conditions = MarketConditions::default();
        // 0.105 - 2.8 × 0.003 - 2.5 × 0.002 + 0.1 × 0.01
        let expected = 0.105 - 0.0084 - 0.005 + 0.001;
        assert!((model.adjusted_return("VTI", &conditions) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_diversification_factor() {
        let model = PortfolioModel::default();
        assert_eq!(model.diversification_factor(1), 1.0);
        assert!((model.diversification_factor(2) - 0.8f64.sqrt()).abs() < 1e-12);
        assert!((model.diversification_factor(5) - 0.95f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_holding_metrics() {
        let model = PortfolioModel::default();
        let conditions = MarketConditions::default();
        let (metrics, skipped) = model.portfolio_metrics(
            &request(&[("VTI", 100.0)], 30).holdings,
            &stats(&[("VTI", 0.16, 1.0)]),
            &conditions,
        );
        assert!(skipped.is_empty());
        assert_eq!(metrics.volatility, 0.16);
        assert_eq!(metrics.beta, 1.0);
        let expected = model.adjusted_return("VTI", &conditions) - 0.0003;
        assert!((metrics.expected_return - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_stats_are_skipped() {
        let model = PortfolioModel::default();
        let (metrics, skipped) = model.portfolio_metrics(
            &request(&[("VTI", 50.0), ("QQQ", 50.0)], 30).holdings,
            &stats(&[("VTI", 0.16, 1.0)]),
            &MarketConditions::default(),
        );
        assert_eq!(skipped, vec!["QQQ".to_string()]);
        assert!((metrics.beta - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predictions() {
        let model = PortfolioModel::default();
        let conditions = MarketConditions::default();
        let predictions = model
            .predict(
                &request(&[("VTI", 60.0), ("BND", 40.0)], 35),
                &stats(&[("VTI", 0.16, 1.0), ("BND", 0.05, 0.1)]),
                &conditions,
            )
            .unwrap();

        assert_eq!(predictions.one_month.total_contributions, 500.0);
        assert_eq!(predictions.one_year.total_contributions, 6000.0);
        assert!(predictions.one_year.expected_return > 0.0);
        assert!(predictions.one_year.low_estimate < predictions.one_year.expected_return);
        assert!(predictions.one_year.high_estimate > predictions.one_year.expected_return);

        // market volatility 0.18 puts both short horizons at their floor
        assert_eq!(predictions.one_month.confidence, 60.0);
        assert!((predictions.one_year.confidence - 70.0).abs() < 1e-9);

        let retirement = &predictions.to_retirement;
        assert_eq!(retirement.years_to_retirement, 30);
        assert_eq!(retirement.total_contributions, 500.0 * 360.0);
        assert!((retirement.confidence - 90.0).abs() < 1e-9);
        let long_term = predictions.portfolio.expected_return * 0.92;
        assert!((retirement.real_return - (long_term - 0.028) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_is_clamped() {
        let model = PortfolioModel::default();
        let stats = stats(&[("VTI", 0.16, 1.0)]);
        let conditions = MarketConditions::default();

        let young = model.predict(&request(&[("VTI", 100.0)], 5), &stats, &conditions).unwrap();
        assert_eq!(young.to_retirement.years_to_retirement, 47);

        let old = model.predict(&request(&[("VTI", 100.0)], 90), &stats, &conditions).unwrap();
        assert_eq!(old.to_retirement.years_to_retirement, 1);
        assert_eq!(old.to_retirement.confidence, 75.0);
    }

    #[test]
    fn test_empty_holdings_rejected() {
        let model = PortfolioModel::default();
        let result = model.predict(&request(&[], 30), &HashMap::new(), &MarketConditions::default());
        assert!(result.is_err());
    }
}
