#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/equity/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for building equity profiles.
//!
//! This crate provides the foundational abstractions shared by the pipeline
//! and its collaborators:
//!
//! - [`QuoteProvider`](provider::QuoteProvider) - Market cap and dividend data
//! - [`FilingSearchService`](provider::FilingSearchService) - Regulatory filing metadata
//! - [`FilingDocumentSource`](provider::FilingDocumentSource) - Lazy document download
//! - [`StatementParser`](provider::StatementParser) - Document to line items
//! - [`ProgressSink`](provider::ProgressSink) - Best-effort stage notifications
//! - [`DerivedMetrics`](metrics::DerivedMetrics) - Growth rates and ratios
//! - [`EquityProfile`](profile::EquityProfile) - The assembled output record

/// Configuration shared by the pipeline and its collaborators.
pub mod config;
/// Error types for profile building.
pub mod error;
/// Null-safe derived metrics (growth rates and ratios).
pub mod metrics;
/// The assembled equity profile record.
pub mod profile;
/// Collaborator traits consumed by the pipeline.
pub mod provider;
/// Core data types (Symbol, FinancialStatement, FilingRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use config::{FilingWindow, ProfileConfig};
pub use error::{ProfileError, Result};
pub use metrics::DerivedMetrics;
pub use profile::EquityProfile;
pub use provider::{
    DataProvider, FilingDocumentSource, FilingSearchService, ProgressSink, QuoteProvider,
    StatementParser,
};
pub use types::{FilingRecord, FinancialStatement, QuoteStatistics, QuoteSummary, Symbol};
