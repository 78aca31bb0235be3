//! Collaborator traits consumed by the profile pipeline.
//!
//! This module defines the seams between the pipeline and the outside world:
//!
//! - [`DataProvider`] - Base trait for network-backed collaborators
//! - [`QuoteProvider`] - Quote summary and statistics
//! - [`FilingSearchService`] - Filing metadata search
//! - [`FilingDocumentSource`] - On-demand download of one filing document
//! - [`StatementParser`] - Turns a filing document into line items
//! - [`ProgressSink`] - Receives human-readable stage notifications

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{FilingRecord, FinancialStatement, QuoteStatistics, QuoteSummary, Symbol},
};

/// Base trait for network-backed collaborators.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for quote data captured alongside the filings.
#[async_trait]
pub trait QuoteProvider: DataProvider {
    /// Fetches the quote summary (symbol, market cap, forward dividend yield).
    async fn fetch_summary(&self, symbol: &Symbol) -> Result<QuoteSummary>;

    /// Fetches statistics for a symbol (dividend payout ratio).
    async fn fetch_statistics(&self, symbol: &Symbol) -> Result<QuoteStatistics>;
}

/// Service returning filing metadata for a symbol.
#[async_trait]
pub trait FilingSearchService: DataProvider {
    /// Searches filings of `filing_type` for a symbol.
    ///
    /// Implementations may return an empty list, and may include related
    /// forms (amendments) that callers are expected to filter out.
    async fn search(&self, symbol: &Symbol, filing_type: &str) -> Result<Vec<FilingRecord>>;
}

/// Lazily downloads the document behind a [`FilingRecord`].
#[async_trait]
pub trait FilingDocumentSource: Send + Sync + Debug {
    /// Downloads the raw document bytes.
    async fn fetch_document(&self) -> Result<Vec<u8>>;
}

/// Parses a raw filing document into a [`FinancialStatement`].
pub trait StatementParser: Send + Sync + Debug {
    /// Parses the document bytes.
    fn parse(&self, document: &[u8]) -> Result<FinancialStatement>;
}

/// Receives human-readable progress notifications.
///
/// Delivery is best-effort: callers discard any error returned here.
pub trait ProgressSink: Send + Sync {
    /// Notifies the sink that a stage was reached.
    fn notify(&self, stage: &str) -> Result<()>;
}
