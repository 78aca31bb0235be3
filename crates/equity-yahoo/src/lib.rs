#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/equity/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance quote provider.
//!
//! This crate provides a Yahoo Finance provider that implements the
//! [`DataProvider`] and [`QuoteProvider`] traits from `equity-core`.
//!
//! # Features
//!
//! - Market capitalization and forward dividend yield from the quote summary
//! - Dividend payout ratio from the summary statistics
//! - Built-in rate limiting (1 request per second by default)
//!
//! # Example
//!
//! ```no_run
//! use equity_yahoo::YahooProvider;
//! use equity_core::{ProfileConfig, QuoteProvider, Symbol};
//!
//! # async fn example() -> equity_core::Result<()> {
//! let provider = YahooProvider::new(&ProfileConfig::default())?;
//! let summary = provider.fetch_summary(&Symbol::new("AAPL")).await?;
//! println!("Market cap: {}", summary.market_cap);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use equity_core::{
    DataProvider, ProfileConfig, ProfileError, QuoteProvider, QuoteStatistics, QuoteSummary,
    Result, Symbol,
};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

/// Yahoo Finance quote summary API base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules requested for the quote summary.
const SUMMARY_MODULES: &str = "price,summaryDetail";

/// Modules requested for the statistics.
const STATISTICS_MODULES: &str = "summaryDetail,defaultKeyStatistics";

/// Yahoo Finance quote provider.
///
/// Implements [`DataProvider`] and [`QuoteProvider`].
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    rate_limit_ms: u64,
    last_request_time: AtomicU64,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider from configuration.
    ///
    /// Uses the configured user agent, request timeout and rate limit.
    pub fn new(config: &ProfileConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProfileError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            Duration::from_millis(config.yahoo_rate_limit_ms),
        ))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Rate limiting is still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client, rate_limit: Duration) -> Self {
        Self {
            client,
            rate_limit_ms: rate_limit.as_millis() as u64,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Apply rate limiting before making a request.
    async fn apply_rate_limit(&self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last = self.last_request_time.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            Ordering::Relaxed,
        );
    }

    /// Build the quote summary URL for a symbol and set of modules.
    fn build_summary_url(&self, symbol: &Symbol, modules: &str) -> String {
        format!(
            "{}/{}?modules={}",
            QUOTE_SUMMARY_URL,
            symbol.as_str(),
            modules
        )
    }

    /// Fetch quote summary data for a symbol.
    async fn fetch_quote_summary(
        &self,
        symbol: &Symbol,
        modules: &str,
    ) -> Result<QuoteSummaryData> {
        self.apply_rate_limit().await;

        let url = self.build_summary_url(symbol, modules);
        debug!("Fetching quote summary: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProfileError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProfileError::RateLimited {
                provider: "Yahoo Finance".to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProfileError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(ProfileError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| ProfileError::Parse(e.to_string()))?;

        first_result(symbol, body)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Yahoo Finance quote provider for market capitalization and dividend data"
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn fetch_summary(&self, symbol: &Symbol) -> Result<QuoteSummary> {
        let data = self.fetch_quote_summary(symbol, SUMMARY_MODULES).await?;
        parse_summary(symbol, data)
    }

    async fn fetch_statistics(&self, symbol: &Symbol) -> Result<QuoteStatistics> {
        let data = self.fetch_quote_summary(symbol, STATISTICS_MODULES).await?;
        Ok(parse_statistics(data))
    }
}

/// Extract the single result of a quote summary response.
fn first_result(symbol: &Symbol, response: QuoteSummaryResponse) -> Result<QuoteSummaryData> {
    if let Some(error) = response.quote_summary.error {
        if error.code == "Not Found" {
            return Err(ProfileError::SymbolNotFound(symbol.to_string()));
        }
        return Err(ProfileError::Other(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProfileError::SymbolNotFound(symbol.to_string()))
}

/// Convert the `price` and `summaryDetail` modules into a [`QuoteSummary`].
fn parse_summary(symbol: &Symbol, data: QuoteSummaryData) -> Result<QuoteSummary> {
    let price = data.price.unwrap_or_default();
    let detail = data.summary_detail.unwrap_or_default();

    let market_cap = detail
        .market_cap
        .raw
        .or(price.market_cap.raw)
        .ok_or_else(|| ProfileError::DataNotAvailable {
            symbol: symbol.to_string(),
            field: "marketCap".to_string(),
        })?;

    let reported = price
        .symbol
        .map(Symbol::new)
        .unwrap_or_else(|| symbol.clone());

    let summary = QuoteSummary::new(reported, market_cap);
    Ok(match detail.dividend_yield.raw {
        Some(dividend_yield) => summary.with_forward_dividend_yield(dividend_yield),
        None => summary,
    })
}

/// Convert the statistics modules into [`QuoteStatistics`].
fn parse_statistics(data: QuoteSummaryData) -> QuoteStatistics {
    QuoteStatistics {
        dividend_payout_ratio: data.summary_detail.unwrap_or_default().payout_ratio.raw,
    }
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Quote Summary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    price: Option<Price>,
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Price {
    symbol: Option<String>,
    #[serde(default)]
    market_cap: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    market_cap: RawValue,
    #[serde(default)]
    dividend_yield: RawValue,
    #[serde(default)]
    payout_ratio: RawValue,
}

/// Yahoo's `{"raw": 1.0, "fmt": "1.00"}` wrapper; empty objects mean unreported.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_JSON: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {
                    "symbol": "KO",
                    "marketCap": {"raw": 271000000000, "fmt": "271B"}
                },
                "summaryDetail": {
                    "marketCap": {"raw": 270500000000, "fmt": "270.5B"},
                    "dividendYield": {"raw": 0.0309, "fmt": "3.09%"},
                    "payoutRatio": {"raw": 0.7826, "fmt": "78.26%"}
                }
            }],
            "error": null
        }
    }"#;

    fn parse(json: &str) -> QuoteSummaryResponse {
        serde_json::from_str(json).unwrap()
    }

    fn provider() -> YahooProvider {
        YahooProvider::new(&ProfileConfig::default()).unwrap()
    }

    #[test]
    fn test_build_summary_url() {
        let url = provider().build_summary_url(&Symbol::new("aapl"), SUMMARY_MODULES);

        assert!(url.starts_with(QUOTE_SUMMARY_URL));
        assert!(url.contains("/AAPL?"));
        assert!(url.contains("modules=price,summaryDetail"));
    }

    #[test]
    fn test_parse_summary() {
        let symbol = Symbol::new("KO");
        let data = first_result(&symbol, parse(SUMMARY_JSON)).unwrap();
        let summary = parse_summary(&symbol, data).unwrap();

        assert_eq!(summary.symbol.as_str(), "KO");
        assert_eq!(summary.market_cap, 270_500_000_000.0);
        assert_eq!(summary.forward_dividend_yield, Some(0.0309));
    }

    #[test]
    fn test_parse_statistics() {
        let symbol = Symbol::new("KO");
        let data = first_result(&symbol, parse(SUMMARY_JSON)).unwrap();

        assert_eq!(parse_statistics(data).dividend_payout_ratio, Some(0.7826));
    }

    #[test]
    fn test_market_cap_falls_back_to_price_module() {
        let json = r#"{"quoteSummary": {"result": [{
            "price": {"symbol": "AMZN", "marketCap": {"raw": 1900000000000}},
            "summaryDetail": {"dividendYield": {}, "payoutRatio": {}}
        }], "error": null}}"#;
        let symbol = Symbol::new("AMZN");
        let summary = parse_summary(&symbol, first_result(&symbol, parse(json)).unwrap()).unwrap();

        assert_eq!(summary.market_cap, 1_900_000_000_000.0);
        assert_eq!(summary.forward_dividend_yield, None);
    }

    #[test]
    fn test_missing_market_cap() {
        let json = r#"{"quoteSummary": {"result": [{"price": {"symbol": "XYZ"}}], "error": null}}"#;
        let symbol = Symbol::new("XYZ");
        let err = parse_summary(&symbol, first_result(&symbol, parse(json)).unwrap()).unwrap_err();

        assert!(matches!(err, ProfileError::DataNotAvailable { .. }));
    }

    #[test]
    fn test_api_not_found_error() {
        let json = r#"{"quoteSummary": {"result": null, "error": {
            "code": "Not Found", "description": "Quote not found for ticker symbol: NOPE"
        }}}"#;
        let err = first_result(&Symbol::new("NOPE"), parse(json)).unwrap_err();

        assert!(matches!(err, ProfileError::SymbolNotFound(s) if s == "NOPE"));
    }

    #[test]
    fn test_provider_info() {
        let provider = provider();

        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(!provider.description().is_empty());
    }
}
