#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/equity/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR filing search and statement parsing.
//!
//! This crate provides:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Filing search over the EDGAR submissions API
//! - Lazy download of a filing's XBRL instance document
//! - XBRL instance parsing into a [`FinancialStatement`](equity_core::FinancialStatement)
//!
//! # Example
//!
//! ```no_run
//! use equity_edgar::{EdgarProvider, XbrlStatementParser};
//! use equity_core::{FilingSearchService, ProfileConfig, StatementParser, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProfileConfig::default().with_user_agent("MyApp/1.0 (contact@example.com)");
//!     let provider = EdgarProvider::new(&config)?;
//!
//!     let filings = provider.search(&Symbol::new("AAPL"), "10-K").await?;
//!     if let Some(latest) = filings.first() {
//!         let document = latest.fetch_document().await?;
//!         let statement = XbrlStatementParser::new().parse(&document)?;
//!         println!("Revenue: {:?}", statement.revenue);
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use equity_core::{
    DataProvider, FilingRecord, FilingSearchService, ProfileConfig, ProfileError, Result, Symbol,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Lazy filing document download.
pub mod document;
/// XBRL instance document parsing.
pub mod xbrl;

pub use document::EdgarDocument;
pub use xbrl::XbrlStatementParser;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
pub(crate) struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now()
                .checked_sub(min_interval)
                .unwrap_or_else(Instant::now),
            min_interval,
        }
    }

    pub(crate) async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR filing search service.
///
/// Resolves tickers to CIKs and lists a company's recent filings. Every
/// returned [`FilingRecord`] carries an [`EdgarDocument`] that shares this
/// provider's HTTP client and rate limiter (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl EdgarProvider {
    /// Create a new EDGAR provider from configuration.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    pub fn new(config: &ProfileConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProfileError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            Duration::from_millis(config.edgar_rate_limit_ms),
        ))
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    ///
    /// The client must already carry an identifying user agent.
    #[must_use]
    pub fn with_client(client: reqwest::Client, rate_limit: Duration) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(rate_limit))),
        }
    }

    /// Look up a company's CIK number from its ticker symbol.
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string
    pub async fn get_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(ProfileError::InvalidParameter("Empty ticker".to_string()));
        }

        let ticker_upper = ticker.to_uppercase();

        // Rate limit
        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching company tickers from SEC");
        let response = self
            .client
            .get(COMPANY_TICKERS_URL)
            .send()
            .await
            .map_err(|e| ProfileError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProfileError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response.json().await.map_err(|e| {
            ProfileError::Parse(format!("Failed to parse company tickers: {}", e))
        })?;

        find_cik(&data, &ticker_upper).ok_or_else(|| ProfileError::SymbolNotFound(ticker.to_string()))
    }

    /// Fetch company submissions/filings metadata.
    async fn fetch_company_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let cik_padded = format!("{:0>10}", cik);

        // Rate limit
        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/submissions/CIK{}.json", EDGAR_BASE_URL, cik_padded);

        debug!("Fetching company submissions from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProfileError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProfileError::Network(format!(
                "Failed to fetch company submissions for CIK {}: HTTP {}",
                cik_padded,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProfileError::Parse(format!("Failed to parse submissions: {}", e)))
    }

    /// Build filing records for every recent filing whose form starts with
    /// `filing_type` (so "10-K" also yields "10-K/A").
    fn filing_records(
        &self,
        cik: &str,
        recent: &RecentFilings,
        filing_type: &str,
    ) -> Vec<FilingRecord> {
        let wanted = filing_type.to_uppercase();
        let mut records = Vec::new();

        for (idx, form) in recent.form.iter().enumerate() {
            if !form.to_uppercase().starts_with(&wanted) {
                continue;
            }

            let (Some(accession), Some(date)) =
                (recent.accession_number.get(idx), recent.filing_date.get(idx))
            else {
                warn!(index = idx, "Submissions arrays have mismatched lengths");
                break;
            };

            let filing_date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(d) => d,
                Err(e) => {
                    warn!(accession = %accession, error = %e, "Skipping filing with invalid date");
                    continue;
                }
            };

            let document = EdgarDocument::new(
                self.client.clone(),
                Arc::clone(&self.rate_limiter),
                cik,
                accession,
            );

            records.push(
                FilingRecord::new(form.clone(), filing_date, Arc::new(document))
                    .with_accession_number(accession.clone()),
            );
        }

        records
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR filing search with XBRL instance document download"
    }
}

#[async_trait]
impl FilingSearchService for EdgarProvider {
    async fn search(&self, symbol: &Symbol, filing_type: &str) -> Result<Vec<FilingRecord>> {
        let cik = self.get_cik(symbol.as_str()).await?;
        let submissions = self.fetch_company_submissions(&cik).await?;

        let records = self.filing_records(&cik, &submissions.filings.recent, filing_type);
        debug!(
            symbol = %symbol,
            company = %submissions.name,
            count = records.len(),
            "EDGAR search complete"
        );

        Ok(records)
    }
}

/// Find a ticker in the SEC ticker index, returning its zero-padded CIK.
fn find_cik(data: &HashMap<String, CompanyTickerInfo>, ticker_upper: &str) -> Option<String> {
    data.values()
        .find(|company| company.ticker.to_uppercase() == ticker_upper)
        .map(|company| {
            // CIK should be zero-padded to 10 digits
            let cik = format!("{:0>10}", company.cik_str);
            debug!("Found CIK {} for ticker {}", cik, ticker_upper);
            cik
        })
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

/// Company submissions/filings metadata.
#[derive(Debug, Deserialize)]
struct CompanySubmissions {
    /// Company name
    name: String,
    /// Filing history
    filings: FilingHistory,
}

/// Container for filing history data.
#[derive(Debug, Deserialize)]
struct FilingHistory {
    recent: RecentFilings,
}

/// Recent filings, as parallel arrays where each index is one filing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    accession_number: Vec<String>,
    filing_date: Vec<String>,
    form: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
