//! Equity analyzer tool
//!
//! Resolves ticker symbols from free text and fetches one month of
//! price history plus valuation fields from Yahoo Finance.

use crate::error::MeshError;
use crate::tickers::extract_tickers;
use crate::tools::Tool;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct EquityAnalyzerTool {
    client: Client,
}

impl EquityAnalyzerTool {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            MeshError::MarketDataError(format!("Request failed for {}: {}", url, e))
        })?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| MeshError::MarketDataError(format!("Invalid JSON response: {}", e)))?;

        if !status.is_success() {
            return Err(MeshError::MarketDataError(format!(
                "Provider returned {} for {}",
                status, url
            )));
        }

        Ok(body)
    }

    /// One month of daily closes for a ticker.
    async fn fetch_history(&self, ticker: &str) -> Result<Vec<f64>> {
        let url = format!("{}/{}?range=1mo&interval=1d", CHART_BASE_URL, ticker);
        let body = self.get_json(&url).await?;
        Ok(parse_chart_closes(&body))
    }

    /// Valuation fields for a ticker (52-week range, market cap, P/E).
    async fn fetch_quote(&self, ticker: &str) -> Result<Value> {
        let url = format!("{}?symbols={}", QUOTE_BASE_URL, ticker);
        let body = self.get_json(&url).await?;

        Ok(body
            .pointer("/quoteResponse/result/0")
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn analyze(&self, ticker: &str) -> Result<Value> {
        let closes = self.fetch_history(ticker).await?;

        let Some((latest, change, pct)) = summarize_closes(&closes) else {
            return Ok(json!({"error": "No data."}));
        };

        let quote = self.fetch_quote(ticker).await?;

        Ok(build_summary(latest, change, pct, &quote))
    }
}

impl Default for EquityAnalyzerTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Tool for EquityAnalyzerTool {
    fn name(&self) -> &'static str {
        "equity_analyzer"
    }

    fn description(&self) -> &'static str {
        "Advanced equity analysis tool that retrieves comprehensive stock metrics, \
         price movements, and financial ratios."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "Stock ticker symbols, company names, or comma-separated list for batch analysis"
                }
            },
            "required": ["input"]
        })
    }

    async fn execute(&self, input: &str) -> Result<Value> {
        if input.trim().is_empty() {
            return Ok(json!({"error": "No input provided."}));
        }

        let tickers = extract_tickers(input);
        if tickers.is_empty() {
            return Ok(json!({"error": "No valid ticker symbols found."}));
        }

        debug!(?tickers, "Analyzing tickers");

        let mut results = Map::new();
        for ticker in &tickers {
            let entry = match self.analyze(ticker).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Ticker analysis failed");
                    json!({"error": e.to_string()})
                }
            };
            results.insert(ticker.clone(), entry);
        }

        Ok(Value::Object(results))
    }
}

/// Pull the daily close series out of a v8 chart response, skipping
/// null entries from holidays and partial sessions.
fn parse_chart_closes(body: &Value) -> Vec<f64> {
    body.pointer("/chart/result/0/indicators/quote/0/close")
        .and_then(Value::as_array)
        .map(|closes| closes.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

/// Latest close, absolute change, and percent change over the series.
fn summarize_closes(closes: &[f64]) -> Option<(f64, f64, f64)> {
    let first = *closes.first()?;
    let last = *closes.last()?;

    if first == 0.0 {
        return None;
    }

    let change = last - first;
    let pct = change / first * 100.0;
    Some((last, change, pct))
}

fn build_summary(latest: f64, change: f64, pct: f64, quote: &Value) -> Value {
    let field = |name: &str| quote.get(name).cloned().unwrap_or(Value::Null);

    json!({
        "latest_price": latest,
        "price_change": change,
        "percent_change": pct,
        "52_week_high": field("fiftyTwoWeekHigh"),
        "52_week_low": field("fiftyTwoWeekLow"),
        "market_cap": field("marketCap"),
        "pe_ratio": field("trailingPE"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_closes() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "TSLA"},
                    "indicators": {
                        "quote": [{"close": [100.0, null, 105.0, 110.0]}]
                    }
                }],
                "error": null
            }
        });

        assert_eq!(parse_chart_closes(&body), vec![100.0, 105.0, 110.0]);
    }

    #[test]
    fn test_parse_chart_closes_empty_result() {
        let body = json!({"chart": {"result": null, "error": {"code": "Not Found"}}});
        assert!(parse_chart_closes(&body).is_empty());
    }

    #[test]
    fn test_summarize_closes() {
        let (latest, change, pct) = summarize_closes(&[100.0, 105.0, 110.0]).unwrap();
        assert_eq!(latest, 110.0);
        assert_eq!(change, 10.0);
        assert!((pct - 10.0).abs() < 1e-9);

        assert!(summarize_closes(&[]).is_none());
    }

    #[test]
    fn test_build_summary_missing_fields_are_null() {
        let quote = json!({"fiftyTwoWeekHigh": 120.5});
        let summary = build_summary(110.0, 10.0, 10.0, &quote);

        assert_eq!(summary["latest_price"], 110.0);
        assert_eq!(summary["52_week_high"], 120.5);
        assert!(summary["market_cap"].is_null());
        assert!(summary["pe_ratio"].is_null());
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_input() {
        let tool = EquityAnalyzerTool::new();

        let result = tool.execute("").await.unwrap();
        assert_eq!(result["error"], "No input provided.");

        let result = tool.execute("tell me about the weather").await.unwrap();
        assert_eq!(result["error"], "No valid ticker symbols found.");
    }
}
