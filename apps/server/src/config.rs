use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::anyhow;
use livetools_market_data::{DataClass, FallbackPolicy};

/// API keys for the keyed providers. `demo` works with reduced quotas.
#[derive(Clone, Debug)]
pub struct ApiKeys {
    pub alpha_vantage: String,
    pub fmp: String,
    pub fixer: String,
    pub currency_api: String,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            alpha_vantage: "demo".into(),
            fmp: "demo".into(),
            fixer: "demo".into(),
            currency_api: "demo".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub provider_timeout: Duration,
    pub fx_policy: FallbackPolicy,
    pub etf_policy: FallbackPolicy,
    pub news_policy: FallbackPolicy,
    pub api_keys: ApiKeys,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".into()],
            request_timeout: Duration::from_millis(30_000),
            provider_timeout: Duration::from_millis(8_000),
            fx_policy: FallbackPolicy::default_for(DataClass::FxRates),
            etf_policy: FallbackPolicy::default_for(DataClass::EtfQuotes),
            news_policy: FallbackPolicy::default_for(DataClass::News),
            api_keys: ApiKeys::default(),
            log_format: "text".into(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}='{}': {}", name, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Read `LT_*` variables, loading `.env` first when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = parse_var("LT_LISTEN_ADDR", defaults.listen_addr)?;
        let cors_allow = var("LT_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allow);
        let request_timeout_ms: u64 = parse_var("LT_REQUEST_TIMEOUT_MS", 30_000)?;
        let provider_timeout_ms: u64 = parse_var("LT_PROVIDER_TIMEOUT_MS", 8_000)?;
        if provider_timeout_ms == 0 {
            return Err(anyhow!("LT_PROVIDER_TIMEOUT_MS must be positive"));
        }

        let policy = |name: &str, default: FallbackPolicy| -> anyhow::Result<FallbackPolicy> {
            match var(name) {
                Some(raw) => FallbackPolicy::from_str(&raw).map_err(|e| anyhow!("Invalid {}: {}", name, e)),
                None => Ok(default),
            }
        };

        let defaults_keys = ApiKeys::default();
        let api_keys = ApiKeys {
            alpha_vantage: var("LT_ALPHA_VANTAGE_KEY").unwrap_or(defaults_keys.alpha_vantage),
            fmp: var("LT_FMP_KEY").unwrap_or(defaults_keys.fmp),
            fixer: var("LT_FIXER_KEY").unwrap_or(defaults_keys.fixer),
            currency_api: var("LT_CURRENCY_API_KEY").unwrap_or(defaults_keys.currency_api),
        };

        let log_format = var("LT_LOG_FORMAT").unwrap_or(defaults.log_format);
        if !log_format.eq_ignore_ascii_case("text") && !log_format.eq_ignore_ascii_case("json") {
            return Err(anyhow!("Invalid LT_LOG_FORMAT='{}', expected text or json", log_format));
        }

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
            provider_timeout: Duration::from_millis(provider_timeout_ms),
            fx_policy: policy("LT_FX_FALLBACK", defaults.fx_policy)?,
            etf_policy: policy("LT_ETF_FALLBACK", defaults.etf_policy)?,
            news_policy: policy("LT_NEWS_FALLBACK", defaults.news_policy)?,
            api_keys,
            log_format,
        })
    }
}
