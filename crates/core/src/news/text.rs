//! Text helpers for feed items: markup stripping and ticker extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::MAX_TICKERS_PER_ARTICLE;

lazy_static! {
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").expect("Invalid regex pattern");
    static ref HTML_ENTITY_REGEX: Regex = Regex::new(r"&[^;\s]+;").expect("Invalid regex pattern");
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").expect("Invalid regex pattern");
    static ref TICKER_REGEX: Regex = Regex::new(r"\b[A-Z]{1,5}\b").expect("Invalid regex pattern");
}

/// Upper-case words that look like tickers but are ordinary English.
const TICKER_STOP_WORDS: [&str; 95] = [
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HER", "WAS", "ONE", "OUR",
    "HAD", "WHAT", "SO", "UP", "OUT", "IF", "ABOUT", "WHO", "GET", "WHICH", "GO", "ME", "WHEN",
    "MAKE", "LIKE", "TIME", "NO", "JUST", "HIM", "KNOW", "TAKE", "PEOPLE", "INTO", "YEAR", "YOUR",
    "GOOD", "SOME", "COULD", "THEM", "SEE", "OTHER", "THAN", "THEN", "NOW", "LOOK", "ONLY", "COME",
    "ITS", "OVER", "THINK", "ALSO", "BACK", "AFTER", "USE", "TWO", "HOW", "WORK", "FIRST", "WELL",
    "WAY", "EVEN", "NEW", "WANT", "BECAUSE", "ANY", "THESE", "GIVE", "DAY", "MOST", "US", "IS",
    "IT", "IN", "ON", "AT", "TO", "OF", "BY", "AN", "AS", "BE", "OR", "DO", "WE", "HE", "MY",
    "AM", "A", "I", "CEO", "CFO", "AI",
];

/// Strip tags, replace entities with spaces and collapse whitespace.
pub fn clean_text(raw: &str) -> String {
    let without_tags = HTML_TAG_REGEX.replace_all(raw, "");
    let without_entities = HTML_ENTITY_REGEX.replace_all(&without_tags, " ");
    WHITESPACE_REGEX
        .replace_all(&without_entities, " ")
        .trim()
        .to_string()
}

/// Ticker-like words in `text`, first occurrence order, at most
/// [`MAX_TICKERS_PER_ARTICLE`].
pub fn extract_tickers(text: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for found in TICKER_REGEX.find_iter(text) {
        let word = found.as_str();
        if word.len() < 2 || TICKER_STOP_WORDS.contains(&word) {
            continue;
        }
        if tickers.iter().any(|t| t == word) {
            continue;
        }
        tickers.push(word.to_string());
        if tickers.len() == MAX_TICKERS_PER_ARTICLE {
            break;
        }
    }
    tickers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        let raw = "<p>Stocks&nbsp;rally <b>hard</b></p>\n\n  as   yields&amp;fall ";
        assert_eq!(clean_text(raw), "Stocks rally hard as yields fall");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text("<br/>  "), "");
    }

    #[test]
    fn test_extract_tickers_skips_stop_words() {
        let tickers = extract_tickers("THE AAPL and NVDA rally; IF MSFT GOES UP");
        assert_eq!(tickers, vec!["AAPL", "NVDA", "MSFT"]);
    }

    #[test]
    fn test_extract_tickers_dedupes_and_caps() {
        let tickers = extract_tickers("TSLA TSLA beats, X rises, GM and F lag, AMD TSM");
        assert_eq!(tickers, vec!["TSLA", "GM", "AMD"]);
    }

    #[test]
    fn test_extract_tickers_ignores_long_words() {
        assert!(extract_tickers("NASDAQ100 BREAKING news").is_empty());
    }
}
