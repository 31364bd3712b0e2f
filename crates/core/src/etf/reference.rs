use std::collections::HashMap;

/// Static facts about the ETFs the tools know by name.
#[derive(Clone, Debug)]
pub struct EtfReferenceData {
    names: HashMap<String, String>,
    /// Long-run annual return, as a fraction
    historical_returns: HashMap<String, f64>,
    /// Annual expense ratio, as a fraction
    expense_ratios: HashMap<String, f64>,
    pub default_return: f64,
    pub default_expense_ratio: f64,
}

impl Default for EtfReferenceData {
    fn default() -> Self {
        let names = [
            ("VTI", "Vanguard Total Stock Market ETF"),
            ("QQQ", "Invesco QQQ Trust ETF"),
            ("ITA", "iShares U.S. Aerospace & Defense ETF"),
            ("SCHD", "Schwab US Dividend Equity ETF"),
            ("VXUS", "Vanguard Total International Stock ETF"),
            ("SPY", "SPDR S&P 500 ETF Trust"),
            ("VOO", "Vanguard S&P 500 ETF"),
            ("VEA", "Vanguard FTSE Developed Markets ETF"),
            ("VWO", "Vanguard FTSE Emerging Markets ETF"),
            ("BND", "Vanguard Total Bond Market ETF"),
            ("VNQ", "Vanguard Real Estate Index Fund ETF"),
            ("GLD", "SPDR Gold Shares"),
            ("TLT", "iShares 20+ Year Treasury Bond ETF"),
            ("XLK", "Technology Select Sector SPDR Fund"),
            ("XLF", "Financial Select Sector SPDR Fund"),
        ];
        let historical_returns = [
            ("VTI", 0.105),
            ("SPY", 0.103),
            ("VOO", 0.103),
            ("QQQ", 0.145),
            ("XLK", 0.138),
            ("ITA", 0.087),
            ("XLF", 0.082),
            ("SCHD", 0.092),
            ("VXUS", 0.058),
            ("VEA", 0.055),
            ("VWO", 0.065),
            ("BND", 0.028),
            ("TLT", 0.035),
            ("VNQ", 0.078),
            ("GLD", 0.042),
        ];
        let expense_ratios = [
            ("VTI", 0.0003),
            ("SPY", 0.000945),
            ("VOO", 0.0003),
            ("QQQ", 0.0020),
            ("ITA", 0.0040),
            ("SCHD", 0.0006),
            ("VXUS", 0.0008),
            ("VEA", 0.0005),
            ("VWO", 0.0010),
            ("BND", 0.0003),
            ("VNQ", 0.0012),
            ("GLD", 0.0040),
            ("TLT", 0.0015),
            ("XLK", 0.0010),
            ("XLF", 0.0010),
        ];

        Self {
            names: names
                .into_iter()
                .map(|(s, n)| (s.to_string(), n.to_string()))
                .collect(),
            historical_returns: historical_returns
                .into_iter()
                .map(|(s, r)| (s.to_string(), r))
                .collect(),
            expense_ratios: expense_ratios
                .into_iter()
                .map(|(s, r)| (s.to_string(), r))
                .collect(),
            default_return: 0.08,
            default_expense_ratio: 0.005,
        }
    }
}

impl EtfReferenceData {
    /// Display name, falling back to the symbol itself.
    pub fn name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.names.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    pub fn historical_return(&self, symbol: &str) -> f64 {
        self.historical_returns
            .get(symbol)
            .copied()
            .unwrap_or(self.default_return)
    }

    pub fn expense_ratio(&self, symbol: &str) -> f64 {
        self.expense_ratios
            .get(symbol)
            .copied()
            .unwrap_or(self.default_expense_ratio)
    }

    pub fn known_symbols(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_and_defaults() {
        let data = EtfReferenceData::default();
        assert_eq!(data.name("VTI"), "Vanguard Total Stock Market ETF");
        assert_eq!(data.name("ABCD"), "ABCD");
        assert_eq!(data.historical_return("QQQ"), 0.145);
        assert_eq!(data.historical_return("ABCD"), 0.08);
        assert_eq!(data.expense_ratio("ABCD"), 0.005);
        assert_eq!(data.known_symbols().count(), 15);
    }

    #[test]
    fn test_expense_ratios_are_fractions() {
        let data = EtfReferenceData::default();
        for symbol in data.known_symbols() {
            assert!(data.expense_ratio(symbol) < 0.01, "{symbol}");
        }
    }
}
