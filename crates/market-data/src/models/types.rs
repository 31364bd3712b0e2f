use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Currency code (ISO 4217)
pub type Currency = String;

/// Ticker symbol as requested by the caller (e.g. "VTI")
pub type Symbol = String;

/// Kind of data a chain produces. Fallback policy is configured per class.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataClass {
    FxRates,
    EtfQuotes,
    News,
}

impl DataClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataClass::FxRates => "fx-rates",
            DataClass::EtfQuotes => "etf-quotes",
            DataClass::News => "news",
        }
    }
}

impl std::fmt::Display for DataClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to cents, the precision every quote field is reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalise a user-supplied currency code. Returns `None` unless it is
/// exactly three ASCII letters.
pub fn normalize_currency(code: &str) -> Option<Currency> {
    let trimmed = code.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}
