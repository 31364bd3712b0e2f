use async_trait::async_trait;
use chrono::Utc;
use livetools_market_data::{
    merge_rate_tables, normalize_currency, ChainOutcome, DataClass, FallbackPolicy, MarketBias,
    MarketDataError, Provenance, ProviderChain, RateRequest, RateTable, SyntheticRates,
    SYNTHETIC_SOURCE,
};
use log::{debug, info};

use super::arbitrage::{calculate_arbitrage, calculate_threshold_arbitrage, check_thresholds};
use super::currency_converter::CurrencyConverter;
use super::fx_model::{ArbitrageReport, ArbitrageRequest, RatesSnapshot};
use super::fx_traits::FxServiceTrait;
use super::insights::{realistic_gains, ArbitrageTables, PredictionModel};
use super::market_metrics::MarketMetricsConfig;
use crate::constants::{DEFAULT_BASE_CURRENCY, DISPLAY_CURRENCIES};
use crate::errors::{Error, Result};

pub struct FxService {
    chain: ProviderChain<RateRequest, RateTable>,
    policy: FallbackPolicy,
    synthetic: SyntheticRates,
    display_currencies: Vec<String>,
    tables: ArbitrageTables,
    metrics: MarketMetricsConfig,
}

/// Merged table plus what is needed to describe where it came from.
struct ReconciledRates {
    outcome: ChainOutcome<RateTable>,
    bias: Option<MarketBias>,
}

impl FxService {
    pub fn new(chain: ProviderChain<RateRequest, RateTable>, policy: FallbackPolicy) -> Self {
        let display_currencies = std::iter::once(DEFAULT_BASE_CURRENCY)
            .chain(DISPLAY_CURRENCIES)
            .map(str::to_string)
            .collect();
        Self {
            chain,
            policy,
            synthetic: SyntheticRates::default(),
            display_currencies,
            tables: ArbitrageTables::default(),
            metrics: MarketMetricsConfig::default(),
        }
    }

    pub fn with_synthetic(mut self, synthetic: SyntheticRates) -> Self {
        self.synthetic = synthetic;
        self
    }

    /// Currencies kept in [`RatesSnapshot::rates`]. Empty keeps everything.
    pub fn with_display_currencies(mut self, currencies: Vec<String>) -> Self {
        self.display_currencies = currencies;
        self
    }

    pub fn with_tables(mut self, tables: ArbitrageTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Settle-all fetch, median merge, then the fallback policy.
    async fn reconcile(&self, base: &str) -> Result<ReconciledRates> {
        let base = normalize_currency(base).ok_or_else(|| {
            MarketDataError::InvalidRequest(format!("'{}' is not a currency code", base))
        })?;

        let merged = self
            .chain
            .settle_all(&RateRequest::new(base.clone()))
            .await
            .and_then(|outcome| {
                let attempted = outcome.attempted;
                let outcome = drop_unusable_fragments(&base, outcome);
                match merge_rate_tables(&base, &outcome.value) {
                    Some(table) => Ok(outcome.map(|_| table)),
                    None => {
                        info!("No usable {} rates after merging {} tables", base, outcome.value.len());
                        Err(MarketDataError::AllProvidersFailed { attempted })
                    }
                }
            });

        let mut bias = None;
        let outcome = self.policy.recover(DataClass::FxRates, merged, || {
            let mut rng = rand::thread_rng();
            match self.synthetic.generate(&base, Utc::now(), &mut rng) {
                Some(set) => {
                    bias = Some(set.bias);
                    set.table
                }
                None => RateTable::today(base.clone(), SYNTHETIC_SOURCE, Vec::new()),
            }
        })?;

        if outcome.is_synthesized() && outcome.value.is_empty() {
            return Err(Error::UnsupportedCurrency(base));
        }

        debug!(
            "{} rates for {} from {:?} ({})",
            outcome.value.len(),
            base,
            outcome.sources,
            outcome.provenance.header_value()
        );
        Ok(ReconciledRates { outcome, bias })
    }
}

/// Keep only fragments that can be expressed against `base`. A provider
/// whose table was dropped no longer counts as a source, and the outcome is
/// downgraded to partial.
fn drop_unusable_fragments(
    base: &str,
    outcome: ChainOutcome<Vec<RateTable>>,
) -> ChainOutcome<Vec<RateTable>> {
    let total = outcome.value.len();
    let (sources, tables): (Vec<String>, Vec<RateTable>) = outcome
        .sources
        .into_iter()
        .zip(outcome.value)
        .filter(|(source, table)| {
            let usable = table.rebase(base).is_some_and(|t| !t.is_empty());
            if !usable {
                info!("Dropping {} table from {} quoted in {}", base, source, table.base);
            }
            usable
        })
        .unzip();

    let provenance = if tables.len() < total {
        Provenance::Partial
    } else {
        outcome.provenance
    };
    ChainOutcome {
        value: tables,
        provenance,
        sources,
        attempted: outcome.attempted,
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_latest_rates(&self, base: &str) -> Result<RatesSnapshot> {
        let ReconciledRates { outcome, bias } = self.reconcile(base).await?;
        let sources_succeeded = if outcome.is_synthesized() {
            0
        } else {
            outcome.sources.len()
        };

        let mut table = outcome.value;
        if !self.display_currencies.is_empty() {
            table.retain_currencies(&self.display_currencies);
        }

        Ok(RatesSnapshot {
            base: table.base.clone(),
            date: table.date,
            provenance: outcome.provenance,
            sources: outcome.sources,
            sources_attempted: outcome.attempted,
            sources_succeeded,
            sentiment: bias,
            timestamp: Utc::now(),
            rates: table.into_rates(),
        })
    }

    async fn analyze_arbitrage(&self, request: &ArbitrageRequest) -> Result<ArbitrageReport> {
        let chain = request.selection.clone().into_chain()?;
        let ReconciledRates { outcome, .. } = self.reconcile(DEFAULT_BASE_CURRENCY).await?;
        let converter = CurrencyConverter::new(&outcome.value);

        let market = self.metrics.compute(&converter);
        let rates = chain.leg_rates(&converter)?;
        let result = calculate_arbitrage(request.amount, &chain, &converter)?;
        let thresholds = request.thresholds.unwrap_or_default();
        let threshold_result = calculate_threshold_arbitrage(request.amount, &chain, &thresholds)?;
        let readiness = check_thresholds(&chain, &rates, &thresholds);

        let prediction = PredictionModel::build(&chain, &self.tables, market.trend);
        let gains = realistic_gains(result.profit, &chain, &self.tables, market.trend, &prediction);
        let threshold_gains = realistic_gains(
            threshold_result.profit,
            &chain,
            &self.tables,
            market.trend,
            &prediction,
        );
        let apy_currency = request
            .apy_currency
            .as_deref()
            .unwrap_or(&chain.first().from);
        let apy = self.tables.apy_gains(request.amount, apy_currency);

        Ok(ArbitrageReport {
            chain,
            rates,
            result,
            gains,
            thresholds,
            threshold_result,
            threshold_gains,
            readiness,
            prediction,
            market,
            apy,
            provenance: outcome.provenance,
            timestamp: Utc::now(),
        })
    }
}
