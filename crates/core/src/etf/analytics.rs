//! ETF statistics and the multi-factor health model.

use livetools_market_data::{round2, PricePoint, Quote};
use serde::{Deserialize, Serialize};

use crate::constants::TRADING_DAYS_PER_YEAR;

/// Daily simple returns of consecutive closes. Non-positive closes break
/// the series and are skipped.
pub fn daily_returns(history: &[PricePoint]) -> Vec<f64> {
    history
        .windows(2)
        .filter(|w| w[0].close > 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// Annualised volatility of daily returns (population σ × √252), as a
/// fraction. `None` with fewer than two closes.
pub fn annualized_volatility(history: &[PricePoint]) -> Option<f64> {
    let returns = daily_returns(history);
    if returns.is_empty() {
        return None;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `volatility_pct` is annualised volatility in percent.
    pub fn classify(volatility_pct: f64, beta: f64) -> Self {
        if volatility_pct < 15.0 && beta < 1.2 {
            RiskLevel::Low
        } else if volatility_pct < 25.0 && beta < 1.5 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }
}

/// Outlook for one ETF.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPrediction {
    pub symbol: String,
    pub risk_level: RiskLevel,
    /// Annualised, percent
    pub volatility: f64,
    /// Expected return over the horizon, percent
    pub predicted_return: f64,
    pub confidence_level: f64,
    pub recommendation: Recommendation,
    pub target_price: f64,
    pub time_horizon: String,
}

/// Weights of the health model.
#[derive(Clone, Debug)]
pub struct HealthModel {
    pub momentum_weight: f64,
    /// Applied to `(0.5 - position in 52-week range) × mean_reversion_scale`
    pub mean_reversion_weight: f64,
    pub mean_reversion_scale: f64,
    pub beta_pivot: f64,
    pub beta_scale: f64,
    pub beta_weight: f64,
    pub high_volume_ratio: f64,
    pub high_volume_bonus: f64,
    pub low_volume_ratio: f64,
    pub low_volume_penalty: f64,
    pub dividend_pivot: f64,
    pub dividend_weight: f64,
    /// Scale of the market regime input, which lies in [-0.5, 0.5]
    pub regime_scale: f64,
    pub min_return: f64,
    pub max_return: f64,
    /// Volatility (percent) at which confidence peaks
    pub ideal_volatility: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Volatility assumed when the history is too short to measure
    pub default_volatility: f64,
    pub time_horizon: String,
}

impl Default for HealthModel {
    fn default() -> Self {
        Self {
            momentum_weight: 0.3,
            mean_reversion_weight: 0.25,
            mean_reversion_scale: 15.0,
            beta_pivot: 1.2,
            beta_scale: 3.0,
            beta_weight: 0.2,
            high_volume_ratio: 1.5,
            high_volume_bonus: 2.0 * 0.15,
            low_volume_ratio: 0.7,
            low_volume_penalty: 0.15,
            dividend_pivot: 1.5,
            dividend_weight: 0.5 * 0.1,
            regime_scale: 2.0,
            min_return: -20.0,
            max_return: 25.0,
            ideal_volatility: 20.0,
            min_confidence: 65.0,
            max_confidence: 95.0,
            default_volatility: 0.15,
            time_horizon: "12 months".to_string(),
        }
    }
}

impl HealthModel {
    /// Score one ETF.
    ///
    /// `market_regime` is the caller's read of the market, in [-0.5, 0.5];
    /// see [`weekly_market_regime`] for the usual source.
    pub fn predict(&self, quote: &Quote, history: &[PricePoint], market_regime: f64) -> HealthPrediction {
        let volatility = annualized_volatility(history).unwrap_or(self.default_volatility) * 100.0;
        let risk_level = RiskLevel::classify(volatility, quote.beta);

        let volume_ratio = if quote.avg_volume > 0 {
            quote.volume as f64 / quote.avg_volume as f64
        } else {
            1.0
        };

        let mut predicted = quote.change_percent * self.momentum_weight;
        predicted += (0.5 - quote.range_position()) * self.mean_reversion_scale * self.mean_reversion_weight;
        predicted += (self.beta_pivot - quote.beta) * self.beta_scale * self.beta_weight;
        if volume_ratio > self.high_volume_ratio {
            predicted += self.high_volume_bonus;
        } else if volume_ratio < self.low_volume_ratio {
            predicted -= self.low_volume_penalty;
        }
        predicted += (quote.dividend_yield - self.dividend_pivot) * self.dividend_weight;
        predicted += market_regime.clamp(-0.5, 0.5) * self.regime_scale;
        let predicted = predicted.clamp(self.min_return, self.max_return);

        let confidence = (100.0 - (volatility - self.ideal_volatility).abs())
            .clamp(self.min_confidence, self.max_confidence);

        let recommendation = recommend(predicted, risk_level, volume_ratio);
        let anchor = if quote.price.is_finite() && quote.price > 0.0 {
            quote.price
        } else {
            100.0
        };

        HealthPrediction {
            symbol: quote.symbol.clone(),
            risk_level,
            volatility: round2(volatility),
            predicted_return: round2(predicted),
            confidence_level: (confidence * 10.0).round() / 10.0,
            recommendation,
            target_price: round2(anchor * (1.0 + predicted / 100.0)),
            time_horizon: self.time_horizon.clone(),
        }
    }
}

fn recommend(predicted: f64, risk: RiskLevel, volume_ratio: f64) -> Recommendation {
    if predicted > 10.0 && risk != RiskLevel::High && volume_ratio > 1.2 {
        Recommendation::StrongBuy
    } else if predicted > 5.0 && risk != RiskLevel::High {
        Recommendation::Buy
    } else if predicted > -2.0 && predicted < 5.0 {
        Recommendation::Hold
    } else if predicted > -8.0 {
        Recommendation::Sell
    } else {
        Recommendation::StrongSell
    }
}

/// Weekly market cycle in [-0.5, 0.5] for a Unix timestamp in milliseconds.
pub fn weekly_market_regime(unix_millis: i64) -> f64 {
    (unix_millis as f64 / 86_400_000.0 * 7.0).sin() * 0.5
}
