//! Market intelligence tool
//!
//! Scrapes headlines and the company snapshot table from Finviz.
//! With a ticker it targets the quote page, otherwise the general
//! news page.

use crate::error::MeshError;
use crate::tools::Tool;
use crate::Result;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

const QUOTE_URL: &str = "https://finviz.com/quote.ashx";
const NEWS_URL: &str = "https://finviz.com/news.ashx";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Headline rows to keep per page
const MAX_NEWS_ITEMS: usize = 5;

pub struct MarketIntelligenceTool {
    client: Client,
}

impl MarketIntelligenceTool {
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

    async fn fetch(&self, input: &str) -> Result<Value> {
        let ticker = input.trim().to_uppercase();

        let url = if ticker.is_empty() {
            Url::parse(NEWS_URL)
        } else {
            Url::parse_with_params(QUOTE_URL, &[("t", ticker.to_lowercase())])
        }
        .map_err(|e| MeshError::ScrapeError(format!("Invalid URL: {}", e)))?;

        debug!(url = %url, "Fetching Finviz page");

        let html = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MeshError::ScrapeError(format!("Request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| MeshError::ScrapeError(format!("Failed to read body: {}", e)))?;

        Ok(parse_finviz_page(&html, &url))
    }
}

impl Default for MarketIntelligenceTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Tool for MarketIntelligenceTool {
    fn name(&self) -> &'static str {
        "market_intelligence"
    }

    fn description(&self) -> &'static str {
        "Real-time market intelligence gathering from financial news sources \
         and company-specific updates."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "Company ticker for targeted news or leave empty for general market intelligence"
                }
            }
        })
    }

    async fn execute(&self, input: &str) -> Result<Value> {
        // Blanket conversion: any failure becomes an error object for the caller
        match self.fetch(input).await {
            Ok(value) => Ok(value),
            Err(e) => Ok(json!({"error": format!("Error fetching news: {}", e)})),
        }
    }
}

/// Parse a Finviz page into news items and the snapshot key/value table.
///
/// Parsing is synchronous: `scraper::Html` is not Send and must not be
/// held across await points.
fn parse_finviz_page(html: &str, base_url: &Url) -> Value {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("#news-table tr").expect("valid news row selector");
    let cell_selector = Selector::parse("td").expect("valid cell selector");
    let link_selector = Selector::parse("a").expect("valid link selector");
    let snapshot_selector =
        Selector::parse("table.snapshot-table2 tr").expect("valid snapshot selector");

    let mut news_items = Vec::new();
    for row in document.select(&row_selector).take(MAX_NEWS_ITEMS) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }

        let date = cells[0].text().collect::<String>();
        let title_cell = &cells[1];
        let title = title_cell.text().collect::<String>().trim().to_string();

        let link = title_cell
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_link(href, base_url))
            .unwrap_or_default();

        news_items.push(json!({
            "date": date,
            "title": title,
            "link": link,
        }));
    }

    let mut snapshot = Map::new();
    for row in document.select(&snapshot_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|c| c.text().collect::<String>())
            .collect();

        for pair in cells.chunks(2) {
            if let [key, value] = pair {
                snapshot.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }

    json!({
        "news_items": news_items,
        "snapshot": snapshot,
    })
}

fn resolve_link(href: &str, base_url: &Url) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    base_url
        .join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <table id="news-table">
          <tr>
            <td>Jan-02-25 09:00AM</td>
            <td><a href="/news/123.html">Markets rally on earnings</a></td>
          </tr>
          <tr>
            <td>Jan-02-25 08:30AM</td>
            <td><a href="https://example.com/fed">Fed holds rates steady</a></td>
          </tr>
          <tr><td>malformed row</td></tr>
        </table>
        <table class="snapshot-table2">
          <tr><td>P/E</td><td>24.1</td><td>Market Cap</td><td>1.2T</td></tr>
          <tr><td>52W High</td><td>410.00</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_news_rows() {
        let base = Url::parse("https://finviz.com/quote.ashx?t=tsla").unwrap();
        let parsed = parse_finviz_page(FIXTURE, &base);

        let news = parsed["news_items"].as_array().unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0]["title"], "Markets rally on earnings");
        assert_eq!(news[0]["link"], "https://finviz.com/news/123.html");
        assert_eq!(news[1]["link"], "https://example.com/fed");
    }

    #[test]
    fn test_parse_snapshot_pairs() {
        let base = Url::parse("https://finviz.com/news.ashx").unwrap();
        let parsed = parse_finviz_page(FIXTURE, &base);

        let snapshot = &parsed["snapshot"];
        assert_eq!(snapshot["P/E"], "24.1");
        assert_eq!(snapshot["Market Cap"], "1.2T");
        assert_eq!(snapshot["52W High"], "410.00");
    }

    #[test]
    fn test_parse_empty_page() {
        let base = Url::parse("https://finviz.com/news.ashx").unwrap();
        let parsed = parse_finviz_page("<html></html>", &base);

        assert!(parsed["news_items"].as_array().unwrap().is_empty());
        assert!(parsed["snapshot"].as_object().unwrap().is_empty());
    }
}
