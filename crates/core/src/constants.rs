/// Base currency used when a request does not name one
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Currencies shown by the exchange rate widgets, besides the base
pub const DISPLAY_CURRENCIES: [&str; 19] = [
    "MXN", "GBP", "EUR", "JPY", "CAD", "AUD", "CHF", "CNY", "INR", "BRL", "KRW", "SGD", "HKD",
    "NOK", "SEK", "DKK", "PLN", "CZK", "HUF",
];

/// ETF symbols served when a request does not name any
pub const DEFAULT_ETF_SYMBOLS: [&str; 5] = ["VTI", "QQQ", "ITA", "SCHD", "VXUS"];

/// Calendar days of price history attached to each ETF quote
pub const ETF_HISTORY_DAYS: u32 = 30;

/// Maximum number of symbols accepted by one ETF request
pub const MAX_ETF_SYMBOLS: usize = 20;

/// Maximum number of articles returned by the news service
pub const MAX_NEWS_ARTICLES: usize = 150;

/// Maximum number of tickers kept per article
pub const MAX_TICKERS_PER_ARTICLE: usize = 3;

/// Trading days per year, used to annualise daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Two-sided 95% z-score used for projection bands
pub const CONFIDENCE_Z: f64 = 1.96;

/// Retirement age for long-horizon projections
pub const RETIREMENT_AGE: u32 = 65;
