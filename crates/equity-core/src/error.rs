//! Error types for profile building.
//!
//! This module defines [`ProfileError`] which covers the pipeline's own
//! failure kinds (no filings, no annual filings, no one-year-prior filing)
//! as well as the errors surfaced by the quote, search, download and parse
//! collaborators.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building an equity profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The filing search returned no results for the symbol.
    #[error("Filing search returned no results for {symbol}")]
    NoFilingsFound {
        /// The symbol that was searched.
        symbol: String,
    },

    /// Filings were found but none matched the annual filing type.
    #[error("No {filing_type} filings found for {symbol}")]
    NoAnnualFilingsFound {
        /// The symbol that was searched.
        symbol: String,
        /// The annual filing type that was required.
        filing_type: String,
    },

    /// No annual filing falls roughly one year before the most recent one.
    #[error("No one-year-prior filing found for {symbol} (most recent filed {current_date})")]
    NoPriorYearFilingFound {
        /// The symbol that was searched.
        symbol: String,
        /// Filing date of the most recent annual filing.
        current_date: NaiveDate,
    },

    /// A filing document could not be downloaded.
    #[error("Download error: {0}")]
    Download(String),

    /// Error parsing data from a provider or a filing document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A provider answered but the requested field was missing.
    #[error("Data not available for {symbol}: {field}")]
    DataNotAvailable {
        /// The symbol that was requested.
        symbol: String,
        /// The missing field.
        field: String,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`ProfileError`].
pub type Result<T> = std::result::Result<T, ProfileError>;
