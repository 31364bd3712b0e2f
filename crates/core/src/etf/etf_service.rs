use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use livetools_market_data::{
    ChainOutcome, DataClass, FallbackPolicy, HistoryRequest, MarketDataError, PricePoint,
    Provenance, ProviderChain, Quote, QuoteRequest, SyntheticHistory, SyntheticQuotes,
};
use log::{debug, info, warn};

use super::analytics::{annualized_volatility, HealthModel};
use super::etf_model::{EtfDataSet, EtfHealthReport, EtfSnapshot};
use super::etf_traits::EtfServiceTrait;
use super::reference::EtfReferenceData;
use crate::constants::{ETF_HISTORY_DAYS, MAX_ETF_SYMBOLS};
use crate::errors::{Result, ValidationError};
use crate::projections::{
    EtfStats, MarketConditions, PortfolioModel, PortfolioPredictions, PortfolioRequest,
};

/// Closes needed before measured volatility replaces the default.
const MIN_CLOSES_FOR_VOLATILITY: usize = 11;

pub struct EtfService {
    quotes: ProviderChain<QuoteRequest, Quote>,
    history: ProviderChain<HistoryRequest, Vec<PricePoint>>,
    policy: FallbackPolicy,
    synthetic_quotes: SyntheticQuotes,
    synthetic_history: SyntheticHistory,
    reference: EtfReferenceData,
    health: HealthModel,
    portfolio: PortfolioModel,
    history_days: u32,
}

impl EtfService {
    pub fn new(
        quotes: ProviderChain<QuoteRequest, Quote>,
        history: ProviderChain<HistoryRequest, Vec<PricePoint>>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            quotes,
            history,
            policy,
            synthetic_quotes: SyntheticQuotes::default(),
            synthetic_history: SyntheticHistory {
                days: ETF_HISTORY_DAYS,
                ..Default::default()
            },
            reference: EtfReferenceData::default(),
            health: HealthModel::default(),
            portfolio: PortfolioModel::default(),
            history_days: ETF_HISTORY_DAYS,
        }
    }

    pub fn with_health_model(mut self, health: HealthModel) -> Self {
        self.health = health;
        self
    }

    pub fn with_portfolio_model(mut self, portfolio: PortfolioModel) -> Self {
        self.portfolio = portfolio;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Quote chain, then the history chain for live quotes.
    ///
    /// Returns `None` when the quote chain is exhausted and the policy
    /// refuses to synthesize.
    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<EtfSnapshot>> {
        let result = self.quotes.first_success(&QuoteRequest::new(symbol)).await;
        let quote = match self.policy.recover(DataClass::EtfQuotes, result, || {
            self.synthetic_quotes
                .generate(symbol, Utc::now(), &mut rand::thread_rng())
        }) {
            Ok(outcome) => outcome,
            Err(e) if e.is_chain_exhausted() => {
                warn!("No quote for {}: {}", symbol, e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let (price_history, history_provenance) = if quote.is_synthesized() {
            (self.synthesize_history(quote.value.price), Provenance::Synthesized)
        } else {
            self.fetch_history(symbol, quote.value.price).await
        };

        let ChainOutcome {
            value, provenance, ..
        } = quote;
        let provenance =
            Provenance::combine([provenance, history_provenance]).unwrap_or(provenance);

        Ok(Some(EtfSnapshot {
            name: self.reference.name(symbol).to_string(),
            quote: value,
            price_history,
            provenance,
        }))
    }

    /// History for a live quote. A failed history chain yields synthesized
    /// closes under `Synthesize` and no closes under `Refuse`; either way the
    /// snapshot is no longer fully live.
    async fn fetch_history(&self, symbol: &str, anchor: f64) -> (Vec<PricePoint>, Provenance) {
        let request = HistoryRequest {
            symbol: symbol.to_string(),
            days: self.history_days,
        };
        match self.history.first_success(&request).await {
            Ok(outcome) => (outcome.value, outcome.provenance),
            Err(e) => {
                info!("No price history for {}: {}", symbol, e);
                match self.policy {
                    FallbackPolicy::Synthesize => {
                        (self.synthesize_history(anchor), Provenance::Synthesized)
                    }
                    FallbackPolicy::Refuse => (Vec::new(), Provenance::Partial),
                }
            }
        }
    }

    fn synthesize_history(&self, anchor: f64) -> Vec<PricePoint> {
        self.synthetic_history
            .generate(anchor, Utc::now().date_naive(), &mut rand::thread_rng())
    }

    /// Statistics the portfolio model needs from a snapshot.
    fn stats(&self, snapshot: &EtfSnapshot) -> EtfStats {
        let volatility = if snapshot.price_history.len() >= MIN_CLOSES_FOR_VOLATILITY {
            annualized_volatility(&snapshot.price_history)
        } else {
            None
        };
        EtfStats {
            volatility: volatility.unwrap_or(self.health.default_volatility),
            beta: snapshot.quote.beta,
            dividend_yield: snapshot.quote.dividend_yield,
        }
    }
}

/// Trim, upper-case and de-duplicate requested symbols, keeping order.
pub fn normalize_symbols(symbols: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for raw in symbols.iter().flat_map(|s| s.split(',')) {
        let symbol = raw.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            continue;
        }
        let valid = symbol.len() <= 10
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(ValidationError::InvalidInput(format!("invalid symbol '{}'", raw.trim())).into());
        }
        if !out.contains(&symbol) {
            out.push(symbol);
        }
    }

    if out.is_empty() {
        return Err(ValidationError::MissingField("symbols".to_string()).into());
    }
    if out.len() > MAX_ETF_SYMBOLS {
        return Err(ValidationError::InvalidInput(format!(
            "at most {} symbols per request, got {}",
            MAX_ETF_SYMBOLS,
            out.len()
        ))
        .into());
    }
    Ok(out)
}

#[async_trait]
impl EtfServiceTrait for EtfService {
    async fn get_etf_data(&self, symbols: &[String]) -> Result<EtfDataSet> {
        let symbols = normalize_symbols(symbols)?;
        debug!("Fetching ETF data for {}", symbols.join(", "));

        let fetched = join_all(symbols.iter().map(|s| self.fetch_symbol(s))).await;

        let mut etfs = BTreeMap::new();
        let mut missing = Vec::new();
        for (symbol, result) in symbols.iter().zip(fetched) {
            match result? {
                Some(snapshot) => {
                    etfs.insert(symbol.clone(), snapshot);
                }
                None => missing.push(symbol.clone()),
            }
        }

        if etfs.is_empty() {
            return Err(MarketDataError::AllProvidersFailed {
                attempted: self.quotes.len(),
            }
            .into());
        }

        let parts = etfs
            .values()
            .map(|s| s.provenance)
            .chain((!missing.is_empty()).then_some(Provenance::Partial));
        let provenance = Provenance::combine(parts).unwrap_or(Provenance::Partial);

        Ok(EtfDataSet {
            etfs,
            provenance,
            missing,
            timestamp: Utc::now(),
        })
    }

    async fn predict_health(&self, symbols: &[String], market_regime: f64) -> Result<EtfHealthReport> {
        let data = self.get_etf_data(symbols).await?;
        let predictions = data
            .etfs
            .values()
            .map(|s| self.health.predict(&s.quote, &s.price_history, market_regime))
            .collect();

        Ok(EtfHealthReport {
            predictions,
            market_regime,
            provenance: data.provenance,
            missing: data.missing,
            timestamp: Utc::now(),
        })
    }

    async fn project_portfolio(
        &self,
        request: &PortfolioRequest,
        conditions: &MarketConditions,
    ) -> Result<PortfolioPredictions> {
        let mut request = request.clone();
        for holding in &mut request.holdings {
            holding.symbol = holding.symbol.trim().to_ascii_uppercase();
        }
        let symbols: Vec<String> = request.holdings.iter().map(|h| h.symbol.clone()).collect();
        let data = self.get_etf_data(&symbols).await?;

        let stats: HashMap<String, EtfStats> = data
            .etfs
            .iter()
            .map(|(symbol, snapshot)| (symbol.clone(), self.stats(snapshot)))
            .collect();
        self.portfolio.predict(&request, &stats, conditions)
    }
}
