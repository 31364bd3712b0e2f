use std::sync::Arc;

use crate::config::Config;
use livetools_core::{
    etf::{EtfService, EtfServiceTrait},
    fx::{FxService, FxServiceTrait},
    news::{default_sources, NewsService, NewsServiceTrait},
};
use livetools_market_data::{
    AlphaVantageProvider, CurrencyApiProvider, DataClass, ExchangeRateApiProvider,
    ExchangeRateHostProvider, FixerProvider, FmpProvider, FrankfurterProvider, HistoryProvider,
    OpenErApiProvider, ProviderChain, QuoteProvider, RateProvider, YahooProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub etf_service: Arc<dyn EtfServiceTrait>,
    pub news_service: Arc<dyn NewsServiceTrait>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wire every provider adapter into its chain and build the services.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let timeout = config.provider_timeout;
    let keys = &config.api_keys;

    let rate_providers: Vec<RateProvider> = vec![
        Arc::new(ExchangeRateApiProvider::with_timeout(timeout)),
        Arc::new(FrankfurterProvider::with_timeout(timeout)),
        Arc::new(ExchangeRateHostProvider::with_timeout(timeout)),
        Arc::new(OpenErApiProvider::with_timeout(timeout)),
        Arc::new(FixerProvider::with_timeout(keys.fixer.clone(), timeout)),
        Arc::new(CurrencyApiProvider::with_timeout(keys.currency_api.clone(), timeout)),
    ];
    let rates = ProviderChain::new(DataClass::FxRates, rate_providers, timeout);
    tracing::info!(
        "FX chain: {} (fallback {:?})",
        rates.provider_ids().join(", "),
        config.fx_policy
    );
    let fx_service = Arc::new(FxService::new(rates, config.fx_policy));

    let yahoo = Arc::new(YahooProvider::with_timeout(timeout));
    let quote_providers: Vec<QuoteProvider> = vec![
        yahoo.clone(),
        Arc::new(AlphaVantageProvider::with_timeout(keys.alpha_vantage.clone(), timeout)),
        Arc::new(FmpProvider::with_timeout(keys.fmp.clone(), timeout)),
    ];
    let history_providers: Vec<HistoryProvider> = vec![yahoo];
    let quotes = ProviderChain::new(DataClass::EtfQuotes, quote_providers, timeout);
    let history = ProviderChain::new(DataClass::EtfQuotes, history_providers, timeout);
    tracing::info!(
        "ETF chain: {} (fallback {:?})",
        quotes.provider_ids().join(", "),
        config.etf_policy
    );
    let etf_service = Arc::new(EtfService::new(quotes, history, config.etf_policy));

    let sources = default_sources();
    tracing::info!(
        "News: {} feeds (fallback {:?})",
        sources.len(),
        config.news_policy
    );
    let news_service = Arc::new(NewsService::from_sources(sources, timeout, config.news_policy));

    Ok(Arc::new(AppState {
        fx_service,
        etf_service,
        news_service,
    }))
}
