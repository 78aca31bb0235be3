//! Core data types exchanged between the pipeline and its collaborators.
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`FinancialStatement`] - Line items extracted from one filing
//! - [`FilingRecord`] - Filing metadata with a lazy document handle
//! - [`QuoteSummary`] - Market cap and dividend yield at capture time
//! - [`QuoteStatistics`] - Statistics page values (payout ratio)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{error::Result, provider::FilingDocumentSource};

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Financial statement line items for one filing period.
///
/// Every item is optional: absent means the filing did not report it (or the
/// parser could not find an unambiguous value).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// End date of the reporting period, when the document states one.
    pub period_end: Option<NaiveDate>,

    // Income Statement
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,

    // Cash Flow Statement
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Investing cash flow.
    pub investing_cash_flow: Option<f64>,
    /// Financing cash flow.
    pub financing_cash_flow: Option<f64>,

    // Balance Sheet
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Total liabilities.
    pub total_liabilities: Option<f64>,
    /// Stockholders' equity.
    pub stockholders_equity: Option<f64>,
    /// Current assets.
    pub current_assets: Option<f64>,
    /// Current liabilities.
    pub current_liabilities: Option<f64>,
}

impl FinancialStatement {
    /// Creates an empty statement for the given period end.
    #[must_use]
    pub fn new(period_end: NaiveDate) -> Self {
        Self {
            period_end: Some(period_end),
            ..Default::default()
        }
    }
}

/// Metadata for a single regulatory filing returned by a search.
///
/// The underlying document is not downloaded until
/// [`fetch_document`](Self::fetch_document) is called.
#[derive(Clone)]
pub struct FilingRecord {
    /// Filing type label as reported by the search (e.g. "10-K", "10-K/A").
    pub filing_type: String,
    /// Date the filing was submitted.
    pub filing_date: NaiveDate,
    /// Accession number, when the search service provides one.
    pub accession_number: Option<String>,
    document: Arc<dyn FilingDocumentSource>,
}

impl FilingRecord {
    /// Creates a new filing record backed by a document source.
    #[must_use]
    pub fn new(
        filing_type: impl Into<String>,
        filing_date: NaiveDate,
        document: Arc<dyn FilingDocumentSource>,
    ) -> Self {
        Self {
            filing_type: filing_type.into(),
            filing_date,
            accession_number: None,
            document,
        }
    }

    /// Sets the accession number.
    #[must_use]
    pub fn with_accession_number(mut self, accession_number: impl Into<String>) -> Self {
        self.accession_number = Some(accession_number.into());
        self
    }

    /// Returns true if this filing's type equals `filing_type`, ignoring case.
    #[must_use]
    pub fn is_type(&self, filing_type: &str) -> bool {
        self.filing_type.eq_ignore_ascii_case(filing_type)
    }

    /// Downloads the underlying filing document.
    pub async fn fetch_document(&self) -> Result<Vec<u8>> {
        self.document.fetch_document().await
    }
}

impl fmt::Debug for FilingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilingRecord")
            .field("filing_type", &self.filing_type)
            .field("filing_date", &self.filing_date)
            .field("accession_number", &self.accession_number)
            .field("document", &self.document)
            .finish()
    }
}

/// Quote summary values captured at build time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    /// Symbol as reported by the quote provider.
    pub symbol: Symbol,
    /// Market capitalization.
    pub market_cap: f64,
    /// Forward annual dividend yield.
    pub forward_dividend_yield: Option<f64>,
}

impl QuoteSummary {
    /// Creates a new quote summary with required fields.
    #[must_use]
    pub const fn new(symbol: Symbol, market_cap: f64) -> Self {
        Self {
            symbol,
            market_cap,
            forward_dividend_yield: None,
        }
    }

    /// Sets the forward dividend yield.
    #[must_use]
    pub const fn with_forward_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.forward_dividend_yield = Some(dividend_yield);
        self
    }
}

/// Statistics values captured at build time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteStatistics {
    /// Dividend payout ratio.
    pub dividend_payout_ratio: Option<f64>,
}
