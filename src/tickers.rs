//! Ticker symbol extraction
//!
//! Turns free text into a list of ticker symbols:
//! - comma-separated input is taken verbatim (uppercased)
//! - known company names map through a fixed table
//! - standalone 1-5 letter uppercase words are treated as explicit symbols

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Company name → ticker lookup — static, zero allocation
const COMPANY_TICKERS: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("nvidia", "NVDA"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("tesla", "TSLA"),
    ("amazon", "AMZN"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("adobe", "ADBE"),
    ("salesforce", "CRM"),
    ("oracle", "ORCL"),
    ("intel", "INTC"),
    ("amd", "AMD"),
    ("zoom", "ZM"),
];

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b[A-Za-z]{1,5}\b").expect("valid word regex"))
}

/// Extract ticker symbols from free text.
///
/// Returns an empty vector when nothing in the input looks like a ticker;
/// callers map that to an error object.
pub fn extract_tickers(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    if input.contains(',') {
        return dedup_preserving_order(
            input
                .split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty()),
        );
    }

    let lowered = input.to_lowercase();
    let mut tickers = Vec::new();

    for (name, symbol) in COMPANY_TICKERS {
        if lowered.contains(name) {
            tickers.push((*symbol).to_string());
        }
    }

    // Explicit symbols the user already wrote in uppercase (e.g. "TSLA")
    for word in word_regex().find_iter(input) {
        let word = word.as_str();
        if word.chars().all(|c| c.is_ascii_uppercase()) {
            tickers.push(word.to_string());
        }
    }

    dedup_preserving_order(tickers.into_iter())
}

fn dedup_preserving_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|t| seen.insert(t.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_company_names() {
        assert_eq!(extract_tickers("how is tesla doing"), vec!["TSLA"]);
        assert_eq!(
            extract_tickers("compare Microsoft against nvidia"),
            vec!["NVDA", "MSFT"]
        );
    }

    #[test]
    fn test_meta_and_facebook_collapse() {
        assert_eq!(extract_tickers("meta or facebook?"), vec!["META"]);
    }

    #[test]
    fn test_comma_separated_list() {
        assert_eq!(
            extract_tickers("aapl, msft , googl"),
            vec!["AAPL", "MSFT", "GOOGL"]
        );
    }

    #[test]
    fn test_explicit_uppercase_symbols() {
        assert_eq!(extract_tickers("check TSLA against NVDA"), vec!["TSLA", "NVDA"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(extract_tickers("tell me about the weather").is_empty());
        assert!(extract_tickers("").is_empty());
        assert!(extract_tickers("   ").is_empty());
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(extract_tickers("TSLA, tsla, TSLA"), vec!["TSLA"]);
    }
}
