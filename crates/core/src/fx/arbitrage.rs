//! Currency arbitrage paths.
//!
//! A path is either a two-leg round trip (A -> B -> A) or a three-leg cycle
//! (A -> B, B -> C, C -> D). Both are evaluated against live cross rates or
//! against user-specified target rates ("thresholds").

use livetools_market_data::normalize_currency;
use serde::{Deserialize, Serialize};

use super::currency_converter::CurrencyConverter;
use crate::errors::{Result, ValidationError};

/// Currency code a UI sends for an unused third leg.
pub const NONE_SENTINEL: &str = "None";

/// One conversion step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
}

impl Leg {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The conversion path being evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConversionChain {
    /// `from -> to -> from`
    TwoLeg { leg: Leg },
    ThreeLeg { first: Leg, second: Leg, third: Leg },
}

/// Raw currency picks as a form submits them.
///
/// `from2` and `from3` follow `to1` and `to2` when omitted. A third leg
/// containing [`NONE_SENTINEL`], or no third leg at all, selects the two-leg
/// round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySelection {
    pub from1: String,
    pub to1: String,
    #[serde(default)]
    pub from2: Option<String>,
    #[serde(default)]
    pub to2: Option<String>,
    #[serde(default)]
    pub from3: Option<String>,
    #[serde(default)]
    pub to3: Option<String>,
}

fn is_sentinel(code: Option<&str>) -> bool {
    code.is_some_and(|c| c.trim().is_empty() || c.trim().eq_ignore_ascii_case(NONE_SENTINEL))
}

fn currency(field: &str, code: &str) -> Result<String> {
    normalize_currency(code).ok_or_else(|| {
        ValidationError::InvalidInput(format!("{} is not a currency code: '{}'", field, code)).into()
    })
}

impl CurrencySelection {
    pub fn two_leg(from: &str, to: &str) -> Self {
        Self {
            from1: from.to_string(),
            to1: to.to_string(),
            to3: Some(NONE_SENTINEL.to_string()),
            ..Default::default()
        }
    }

    pub fn into_chain(self) -> Result<ConversionChain> {
        let from1 = currency("from1", &self.from1)?;
        let to1 = currency("to1", &self.to1)?;

        let third_absent = self.from3.is_none() && self.to3.is_none();
        if third_absent || is_sentinel(self.from3.as_deref()) || is_sentinel(self.to3.as_deref()) {
            return Ok(ConversionChain::TwoLeg {
                leg: Leg::new(from1, to1),
            });
        }

        let from2 = currency("from2", self.from2.as_deref().unwrap_or(&to1))?;
        let to2 = self
            .to2
            .as_deref()
            .ok_or_else(|| ValidationError::MissingField("to2".to_string()))?;
        let to2 = currency("to2", to2)?;
        let from3 = currency("from3", self.from3.as_deref().unwrap_or(&to2))?;
        let to3 = currency("to3", self.to3.as_deref().unwrap_or_default())?;

        Ok(ConversionChain::ThreeLeg {
            first: Leg::new(from1, to1),
            second: Leg::new(from2, to2),
            third: Leg::new(from3, to3),
        })
    }
}

impl ConversionChain {
    pub fn is_two_leg(&self) -> bool {
        matches!(self, ConversionChain::TwoLeg { .. })
    }

    pub fn first(&self) -> &Leg {
        match self {
            ConversionChain::TwoLeg { leg } => leg,
            ConversionChain::ThreeLeg { first, .. } => first,
        }
    }

    /// Currencies visited, in order.
    pub fn path(&self) -> Vec<String> {
        match self {
            ConversionChain::TwoLeg { leg } => {
                vec![leg.from.clone(), leg.to.clone(), leg.from.clone()]
            }
            ConversionChain::ThreeLeg {
                first,
                second,
                third,
            } => vec![
                first.from.clone(),
                first.to.clone(),
                second.to.clone(),
                third.to.clone(),
            ],
        }
    }

    /// Distinct currencies whose volatility drives the path.
    pub fn currencies(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = match self {
            ConversionChain::TwoLeg { leg } => vec![&leg.from, &leg.to],
            ConversionChain::ThreeLeg {
                first,
                second,
                third,
            } => vec![&first.from, &first.to, &second.to, &third.to],
        };
        for code in candidates {
            if !out.contains(code) {
                out.push(code.clone());
            }
        }
        out
    }

    /// Live rates for each leg.
    ///
    /// A two-leg path reports `second = 1` and the return rate as `third`.
    pub fn leg_rates(&self, converter: &CurrencyConverter<'_>) -> Result<LegRates> {
        match self {
            ConversionChain::TwoLeg { leg } => Ok(LegRates {
                first: converter.rate(&leg.from, &leg.to)?,
                second: 1.0,
                third: converter.rate(&leg.to, &leg.from)?,
            }),
            ConversionChain::ThreeLeg {
                first,
                second,
                third,
            } => Ok(LegRates {
                first: converter.rate(&first.from, &first.to)?,
                second: converter.rate(&second.from, &second.to)?,
                third: converter.rate(&third.from, &third.to)?,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegRates {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

/// Target rates a trader waits for before executing a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingThresholds {
    pub first_threshold: f64,
    /// Quoted inverted: units of the second leg's source per unit of its target
    pub second_threshold: f64,
    pub third_threshold: f64,
}

impl Default for TradingThresholds {
    fn default() -> Self {
        Self {
            first_threshold: 18.95,
            second_threshold: 25.50,
            third_threshold: 1.38,
        }
    }
}

impl TradingThresholds {
    fn validate(&self) -> Result<()> {
        let all_positive = [
            self.first_threshold,
            self.second_threshold,
            self.third_threshold,
        ]
        .iter()
        .all(|t| t.is_finite() && *t > 0.0);
        if !all_positive {
            return Err(ValidationError::InvalidInput(
                "thresholds must be positive numbers".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageResult {
    pub initial_amount: f64,
    pub after_first: f64,
    pub after_second: f64,
    pub final_amount: f64,
    pub profit: f64,
    pub profit_percentage: f64,
    pub path: Vec<String>,
}

impl ArbitrageResult {
    fn new(
        chain: &ConversionChain,
        amount: f64,
        after_first: f64,
        after_second: f64,
        final_amount: f64,
    ) -> Self {
        let profit = final_amount - amount;
        Self {
            initial_amount: amount,
            after_first,
            after_second,
            final_amount,
            profit,
            profit_percentage: profit / amount * 100.0,
            path: chain.path(),
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidInput(format!(
            "amount must be a positive number, got {}",
            amount
        ))
        .into());
    }
    Ok(())
}

/// Walk `chain` with live rates.
///
/// A two-leg round trip converts back at the same rate, so it always ends
/// where it started.
pub fn calculate_arbitrage(
    amount: f64,
    chain: &ConversionChain,
    converter: &CurrencyConverter<'_>,
) -> Result<ArbitrageResult> {
    validate_amount(amount)?;
    let rates = chain.leg_rates(converter)?;

    let after_first = amount * rates.first;
    let (after_second, final_amount) = if chain.is_two_leg() {
        (after_first, after_first / rates.first)
    } else {
        let after_second = after_first * rates.second;
        (after_second, after_second * rates.third)
    };

    Ok(ArbitrageResult::new(
        chain,
        amount,
        after_first,
        after_second,
        final_amount,
    ))
}

/// Walk `chain` as if every leg executed exactly at its threshold.
pub fn calculate_threshold_arbitrage(
    amount: f64,
    chain: &ConversionChain,
    thresholds: &TradingThresholds,
) -> Result<ArbitrageResult> {
    validate_amount(amount)?;
    thresholds.validate()?;

    let after_first = amount * thresholds.first_threshold;
    let (after_second, final_amount) = if chain.is_two_leg() {
        (after_first, after_first / thresholds.first_threshold)
    } else {
        let after_second = after_first / thresholds.second_threshold;
        (after_second, after_second * thresholds.third_threshold)
    };

    Ok(ArbitrageResult::new(
        chain,
        amount,
        after_first,
        after_second,
        final_amount,
    ))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdReadiness {
    pub first_ready: bool,
    pub second_ready: bool,
    pub third_ready: bool,
    pub all_ready: bool,
}

/// Whether live rates have reached the thresholds. Legs a two-leg path does
/// not use are always ready.
pub fn check_thresholds(
    chain: &ConversionChain,
    rates: &LegRates,
    thresholds: &TradingThresholds,
) -> ThresholdReadiness {
    let two_leg = chain.is_two_leg();
    let first_ready = rates.first >= thresholds.first_threshold;
    let second_ready = two_leg || 1.0 / rates.second >= thresholds.second_threshold;
    let third_ready = two_leg || rates.third >= thresholds.third_threshold;
    ThresholdReadiness {
        first_ready,
        second_ready,
        third_ready,
        all_ready: first_ready && second_ready && third_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use livetools_market_data::RateTable;

    fn table() -> RateTable {
        RateTable::today(
            "USD",
            "TEST",
            vec![
                ("MXN".to_string(), 18.0),
                ("EUR".to_string(), 0.9),
                ("GBP".to_string(), 0.75),
            ],
        )
    }

    fn three_leg() -> ConversionChain {
        CurrencySelection {
            from1: "USD".into(),
            to1: "MXN".into(),
            from2: None,
            to2: Some("EUR".into()),
            from3: None,
            to3: Some("USD".into()),
        }
        .into_chain()
        .unwrap()
    }

    #[test]
    fn test_sentinel_selects_two_leg() {
        let chain = CurrencySelection::two_leg("usd", "mxn").into_chain().unwrap();
        assert_eq!(
            chain,
            ConversionChain::TwoLeg {
                leg: Leg::new("USD", "MXN")
            }
        );

        let chain = CurrencySelection {
            from1: "USD".into(),
            to1: "MXN".into(),
            from2: Some("MXN".into()),
            to2: Some("EUR".into()),
            from3: Some("None".into()),
            to3: Some("USD".into()),
        }
        .into_chain()
        .unwrap();
        assert!(chain.is_two_leg());

        let chain = CurrencySelection {
            from1: "USD".into(),
            to1: "EUR".into(),
            ..Default::default()
        }
        .into_chain()
        .unwrap();
        assert!(chain.is_two_leg());
    }

    #[test]
    fn test_three_leg_follows_previous_targets() {
        let chain = three_leg();
        match &chain {
            ConversionChain::ThreeLeg {
                first,
                second,
                third,
            } => {
                assert_eq!(first, &Leg::new("USD", "MXN"));
                assert_eq!(second, &Leg::new("MXN", "EUR"));
                assert_eq!(third, &Leg::new("EUR", "USD"));
            }
            other => panic!("expected three legs, got {:?}", other),
        }
        assert_eq!(chain.path(), vec!["USD", "MXN", "EUR", "USD"]);
        assert_eq!(chain.currencies(), vec!["USD", "MXN", "EUR"]);
    }

    #[test]
    fn test_invalid_currency_rejected() {
        let err = CurrencySelection::two_leg("USD", "PESO").into_chain().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_two_leg_round_trip_is_neutral() {
        let table = table();
        let converter = CurrencyConverter::new(&table);
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();

        let result = calculate_arbitrage(1000.0, &chain, &converter).unwrap();
        assert_eq!(result.after_first, 18_000.0);
        assert_eq!(result.after_second, 18_000.0);
        assert!((result.final_amount - 1000.0).abs() < 1e-9);
        assert!(result.profit.abs() < 1e-9);
        assert_eq!(result.path, vec!["USD", "MXN", "USD"]);
    }

    #[test]
    fn test_three_leg_uses_cross_rates() {
        let table = table();
        let converter = CurrencyConverter::new(&table);
        let result = calculate_arbitrage(100.0, &three_leg(), &converter).unwrap();

        assert!((result.after_first - 1800.0).abs() < 1e-9);
        // MXN -> EUR = 0.9 / 18
        assert!((result.after_second - 90.0).abs() < 1e-9);
        // EUR -> USD = 1 / 0.9
        assert!((result.final_amount - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_currency_in_path_is_error() {
        let table = table();
        let converter = CurrencyConverter::new(&table);
        let chain = CurrencySelection::two_leg("USD", "JPY").into_chain().unwrap();
        let err = calculate_arbitrage(100.0, &chain, &converter).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCurrency(c) if c == "JPY"));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let table = table();
        let converter = CurrencyConverter::new(&table);
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        assert!(calculate_arbitrage(0.0, &chain, &converter).is_err());
        assert!(calculate_arbitrage(f64::NAN, &chain, &converter).is_err());
    }

    #[test]
    fn test_threshold_arbitrage_three_leg() {
        let thresholds = TradingThresholds::default();
        let result = calculate_threshold_arbitrage(1000.0, &three_leg(), &thresholds).unwrap();

        let after_first = 1000.0 * 18.95;
        let after_second = after_first / 25.50;
        assert!((result.after_first - after_first).abs() < 1e-9);
        assert!((result.after_second - after_second).abs() < 1e-9);
        assert!((result.final_amount - after_second * 1.38).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_arbitrage_two_leg_is_neutral() {
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        let result =
            calculate_threshold_arbitrage(500.0, &chain, &TradingThresholds::default()).unwrap();
        assert!(result.profit.abs() < 1e-9);
    }

    #[test]
    fn test_readiness() {
        let thresholds = TradingThresholds::default();
        let chain = three_leg();

        let ready = check_thresholds(
            &chain,
            &LegRates {
                first: 19.0,
                second: 1.0 / 26.0,
                third: 1.40,
            },
            &thresholds,
        );
        assert!(ready.all_ready);

        let not_ready = check_thresholds(
            &chain,
            &LegRates {
                first: 19.0,
                second: 1.0 / 20.0,
                third: 1.40,
            },
            &thresholds,
        );
        assert!(not_ready.first_ready);
        assert!(!not_ready.second_ready);
        assert!(!not_ready.all_ready);

        let two_leg = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        let readiness = check_thresholds(
            &two_leg,
            &LegRates {
                first: 18.0,
                second: 1.0,
                third: 1.0 / 18.0,
            },
            &thresholds,
        );
        assert!(!readiness.first_ready);
        assert!(readiness.second_ready && readiness.third_ready);
    }
}
