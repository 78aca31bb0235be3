//! Assembly of an [`EquityProfile`] from quote data and two annual filings.

use std::sync::Arc;

use tracing::{debug, instrument};

use equity_core::{
    DerivedMetrics, EquityProfile, FilingSearchService, FinancialStatement, ProfileConfig,
    ProfileError, ProgressSink, QuoteProvider, Result, StatementParser, Symbol,
};

use crate::{FilingPairSelector, progress::notify_best_effort};

/// Builds point-in-time equity profiles.
///
/// A build is a sequential chain: quote summary and statistics, filing
/// search, selection of the current and prior annual filings, download and
/// parsing of both documents, and derivation of growth and ratio metrics.
/// Any collaborator failure aborts the build; partial profiles are never
/// returned.
///
/// # Example
///
/// ```rust,ignore
/// use equity::{ProfileBuilder, ProfileConfig, Symbol};
///
/// let config = ProfileConfig::default().with_user_agent("MyApp/1.0 (contact@example.com)");
/// let builder = ProfileBuilder::from_config(&config)?;
///
/// let profile = builder.build(&Symbol::new("AAPL")).await?;
/// println!("{:?}", profile.revenue_growth());
/// ```
#[derive(Clone)]
pub struct ProfileBuilder {
    quotes: Arc<dyn QuoteProvider>,
    filings: Arc<dyn FilingSearchService>,
    parser: Arc<dyn StatementParser>,
    selector: FilingPairSelector,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl std::fmt::Debug for ProfileBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileBuilder")
            .field("quotes", &self.quotes.name())
            .field("filings", &self.filings.name())
            .field("parser", &self.parser)
            .field("selector", &self.selector)
            .field("progress", &self.progress.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl ProfileBuilder {
    /// Create a builder over the given collaborators with the default
    /// annual filing type and window.
    #[must_use]
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        filings: Arc<dyn FilingSearchService>,
        parser: Arc<dyn StatementParser>,
    ) -> Self {
        Self {
            quotes,
            filings,
            parser,
            selector: FilingPairSelector::default(),
            progress: None,
        }
    }

    /// Create a builder backed by Yahoo Finance and SEC EDGAR.
    #[cfg(all(feature = "yahoo", feature = "edgar"))]
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        config.validate()?;

        let quotes = Arc::new(equity_yahoo::YahooProvider::new(config)?);
        let filings = Arc::new(equity_edgar::EdgarProvider::new(config)?);
        let parser = Arc::new(equity_edgar::XbrlStatementParser::new());

        Ok(Self::new(quotes, filings, parser).with_config(config))
    }

    /// Apply the annual filing type and prior-filing window from `config`.
    #[must_use]
    pub fn with_config(self, config: &ProfileConfig) -> Self {
        self.with_selector(FilingPairSelector::new(
            config.annual_filing_type.clone(),
            config.window,
        ))
    }

    /// Replace the filing selector.
    #[must_use]
    pub fn with_selector(mut self, selector: FilingPairSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Attach a sink for progress notifications.
    #[must_use]
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    fn notify(&self, stage: &str) {
        notify_best_effort(self.progress.as_deref(), stage);
    }

    /// Build the profile for `symbol`.
    #[instrument(skip_all, fields(symbol = %symbol))]
    pub async fn build(&self, symbol: &Symbol) -> Result<EquityProfile> {
        self.notify("Downloading quote summary");
        let summary = self.quotes.fetch_summary(symbol).await?;

        self.notify("Downloading statistics");
        let statistics = self.quotes.fetch_statistics(symbol).await?;

        let filing_type = self.selector.filing_type();
        self.notify(&format!("Searching {} filings", filing_type));
        let candidates = self.filings.search(symbol, filing_type).await?;
        self.notify(&format!("Filing search returned {} results", candidates.len()));

        let annual = self.selector.annual_filings(symbol, &candidates)?;

        self.notify(&format!("Selecting most recent {}", filing_type));
        let current = self.selector.most_recent(&annual).ok_or_else(|| {
            ProfileError::NoAnnualFilingsFound {
                symbol: symbol.to_string(),
                filing_type: filing_type.to_string(),
            }
        })?;

        self.notify(&format!("Selecting one-year-prior {}", filing_type));
        let prior = self.selector.prior_year(current, &annual).ok_or_else(|| {
            ProfileError::NoPriorYearFilingFound {
                symbol: symbol.to_string(),
                current_date: current.filing_date,
            }
        })?;

        debug!(
            current = %current.filing_date,
            prior = %prior.filing_date,
            "Selected filing pair"
        );

        self.notify("Downloading current filing document");
        let current_document = current.fetch_document().await?;

        self.notify("Downloading prior filing document");
        let prior_document = prior.fetch_document().await?;

        self.notify("Parsing current filing document");
        let current_statement = self.parser.parse(&current_document)?;

        self.notify("Parsing prior filing document");
        let prior_statement = self.parser.parse(&prior_document)?;

        self.notify("Computing derived metrics");
        let market_cap = market_cap_to_i64(symbol, summary.market_cap)?;

        Ok(assemble(
            summary.symbol,
            market_cap,
            &current_statement,
            &prior_statement,
        )
        .with_dividends(
            summary.forward_dividend_yield,
            statistics.dividend_payout_ratio,
        ))
    }
}

/// Copy the current statement's line items and derive metrics against the
/// prior statement.
#[must_use]
pub fn assemble(
    symbol: Symbol,
    market_cap: i64,
    current: &FinancialStatement,
    prior: &FinancialStatement,
) -> EquityProfile {
    EquityProfile::new(symbol, market_cap)
        .with_statement(current)
        .with_derived_metrics(DerivedMetrics::compute(current, prior))
}

#[allow(clippy::cast_possible_truncation)]
fn market_cap_to_i64(symbol: &Symbol, market_cap: f64) -> Result<i64> {
    if !market_cap.is_finite() {
        return Err(ProfileError::DataNotAvailable {
            symbol: symbol.to_string(),
            field: "market_cap".to_string(),
        });
    }
    Ok(market_cap.round() as i64)
}
