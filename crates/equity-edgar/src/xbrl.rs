//! XBRL instance document parsing.
//!
//! Extracts the annual line items of the document's own fiscal period:
//! facts tagged in the `us-gaap` taxonomy whose context carries no
//! dimensional segment and whose period ends on the document period end.
//! Duration concepts (income and cash flow statement) must span a full year;
//! instant concepts (balance sheet) must be reported at the period end.

use chrono::NaiveDate;
use equity_core::{FinancialStatement, ProfileError, Result, StatementParser};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Minimum length in days of a duration context treated as annual.
const MIN_ANNUAL_DAYS: i64 = 300;

/// Namespace fragment identifying the US-GAAP taxonomy.
const US_GAAP_NAMESPACE: &str = "fasb.org/us-gaap";

/// Parser for XBRL instance documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct XbrlStatementParser;

impl XbrlStatementParser {
    /// Create a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StatementParser for XbrlStatementParser {
    fn parse(&self, document: &[u8]) -> Result<FinancialStatement> {
        let text = std::str::from_utf8(document)
            .map_err(|e| ProfileError::Parse(format!("XBRL document is not UTF-8: {}", e)))?;
        let text = text.trim_start_matches('\u{feff}');

        let doc = roxmltree::Document::parse(text)
            .map_err(|e| ProfileError::Parse(format!("Invalid XBRL document: {}", e)))?;

        let instance = Instance::from_document(&doc);
        if instance.contexts.is_empty() {
            return Err(ProfileError::Parse(
                "Document contains no XBRL contexts".to_string(),
            ));
        }

        let period_end = instance.period_end().ok_or_else(|| {
            ProfileError::Parse("Unable to determine document period end".to_string())
        })?;
        debug!(%period_end, facts = instance.fact_count(), "Parsing XBRL instance");

        let mut stmt = FinancialStatement::new(period_end);

        // Income Statement
        stmt.revenue = instance.extract_fact("Revenue", period_end);
        stmt.net_income = instance.extract_fact("NetIncome", period_end);

        // Cash Flow Statement
        stmt.operating_cash_flow = instance.extract_fact("OperatingCashFlow", period_end);
        stmt.investing_cash_flow = instance.extract_fact("InvestingCashFlow", period_end);
        stmt.financing_cash_flow = instance.extract_fact("FinancingCashFlow", period_end);

        // Balance Sheet
        stmt.total_assets = instance.extract_fact("Assets", period_end);
        stmt.total_liabilities = instance.extract_fact("Liabilities", period_end);
        stmt.stockholders_equity = instance.extract_fact("StockholdersEquity", period_end);
        stmt.current_assets = instance.extract_fact("AssetsCurrent", period_end);
        stmt.current_liabilities = instance.extract_fact("LiabilitiesCurrent", period_end);

        Ok(stmt)
    }
}

/// Reporting period of an XBRL context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Period {
    Instant(NaiveDate),
    Duration { start: NaiveDate, end: NaiveDate },
}

impl Period {
    const fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Duration { end, .. } => *end,
        }
    }
}

/// Whether a concept is measured over a period or at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PeriodKind {
    Duration,
    Instant,
}

/// A context that can carry primary (non-dimensional) facts.
#[derive(Debug)]
struct Context {
    period: Period,
    dimensional: bool,
}

/// Contexts and numeric us-gaap facts of one instance document.
#[derive(Debug, Default)]
struct Instance {
    contexts: HashMap<String, Context>,
    /// Local tag name -> (context id, value), in document order.
    facts: HashMap<String, Vec<(String, f64)>>,
    document_period_end: Option<NaiveDate>,
}

impl Instance {
    fn from_document(doc: &roxmltree::Document<'_>) -> Self {
        let mut instance = Self::default();

        for node in doc.descendants().filter(|n| n.is_element()) {
            let tag = node.tag_name();
            match tag.name() {
                "context" => {
                    if let (Some(id), Some(period)) = (node.attribute("id"), parse_period(node)) {
                        let dimensional = node.descendants().any(|n| {
                            n.is_element() && matches!(n.tag_name().name(), "segment" | "scenario")
                        });
                        instance
                            .contexts
                            .insert(id.to_string(), Context { period, dimensional });
                    }
                }
                "DocumentPeriodEndDate" => {
                    instance.document_period_end = node.text().and_then(parse_date);
                }
                name if tag
                    .namespace()
                    .is_some_and(|ns| ns.contains(US_GAAP_NAMESPACE)) =>
                {
                    let (Some(context_ref), Some(text)) = (node.attribute("contextRef"), node.text())
                    else {
                        continue;
                    };
                    if let Ok(value) = text.trim().parse::<f64>() {
                        instance
                            .facts
                            .entry(name.to_string())
                            .or_default()
                            .push((context_ref.to_string(), value));
                    }
                }
                _ => {}
            }
        }

        instance
    }

    fn fact_count(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    /// The document's fiscal period end.
    ///
    /// Uses `dei:DocumentPeriodEndDate`, falling back to the latest period end
    /// among non-dimensional contexts.
    fn period_end(&self) -> Option<NaiveDate> {
        if let Some(date) = self.document_period_end {
            // Some filers tag the period end a few days off the context dates.
            if self.contexts.values().any(|c| c.period.end() == date) {
                return Some(date);
            }
            warn!(%date, "DocumentPeriodEndDate matches no context, using latest context end");
        }

        self.contexts
            .values()
            .filter(|c| !c.dimensional)
            .map(|c| c.period.end())
            .max()
    }

    /// Extract the value of a concept for the annual period ending at `period_end`.
    fn extract_fact(&self, concept: &str, period_end: NaiveDate) -> Option<f64> {
        let (tags, kind) = get_xbrl_tags(concept)?;

        for tag in tags {
            let Some(values) = self.facts.get(*tag) else {
                continue;
            };

            let found = values.iter().find(|(context_ref, _)| {
                self.contexts
                    .get(context_ref)
                    .is_some_and(|ctx| !ctx.dimensional && matches_period(ctx.period, kind, period_end))
            });

            if let Some((_, value)) = found {
                return Some(*value);
            }
        }

        None
    }
}

fn matches_period(period: Period, kind: PeriodKind, period_end: NaiveDate) -> bool {
    match (period, kind) {
        (Period::Instant(date), PeriodKind::Instant) => date == period_end,
        (Period::Duration { start, end }, PeriodKind::Duration) => {
            end == period_end && (end - start).num_days() > MIN_ANNUAL_DAYS
        }
        _ => false,
    }
}

fn parse_period(context: roxmltree::Node<'_, '_>) -> Option<Period> {
    let period = context
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "period")?;

    let child_date = |name: &str| {
        period
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == name)
            .and_then(|n| n.text())
            .and_then(parse_date)
    };

    if let Some(instant) = child_date("instant") {
        return Some(Period::Instant(instant));
    }

    Some(Period::Duration {
        start: child_date("startDate")?,
        end: child_date("endDate")?,
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    // Dates may carry a time or offset suffix ("2024-09-28T00:00:00")
    let text = text.trim();
    NaiveDate::parse_from_str(text.get(..10).unwrap_or(text), "%Y-%m-%d").ok()
}

// =============================================================================
// XBRL Tag Mappings
// =============================================================================

const REVENUE_TAGS: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "SalesRevenueNet",
    "RevenueFromContractWithCustomerIncludingAssessedTax",
];

const NET_INCOME_TAGS: &[&str] = &[
    "NetIncomeLoss",
    "ProfitLoss",
    "NetIncomeLossAvailableToCommonStockholdersBasic",
];

const OPERATING_CASH_FLOW_TAGS: &[&str] = &[
    "NetCashProvidedByUsedInOperatingActivities",
    "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
];

const INVESTING_CASH_FLOW_TAGS: &[&str] = &[
    "NetCashProvidedByUsedInInvestingActivities",
    "NetCashProvidedByUsedInInvestingActivitiesContinuingOperations",
];

const FINANCING_CASH_FLOW_TAGS: &[&str] = &[
    "NetCashProvidedByUsedInFinancingActivities",
    "NetCashProvidedByUsedInFinancingActivitiesContinuingOperations",
];

const ASSETS_TAGS: &[&str] = &["Assets"];
const ASSETS_CURRENT_TAGS: &[&str] = &["AssetsCurrent"];
const LIABILITIES_TAGS: &[&str] = &["Liabilities"];
const LIABILITIES_CURRENT_TAGS: &[&str] = &["LiabilitiesCurrent"];

const STOCKHOLDERS_EQUITY_TAGS: &[&str] = &[
    "StockholdersEquity",
    "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
];

/// Get possible XBRL tags for a concept, in priority order, with the kind of
/// period the concept is measured over.
///
/// Different companies may use different XBRL tags for the same concept.
fn get_xbrl_tags(concept: &str) -> Option<(&'static [&'static str], PeriodKind)> {
    match concept {
        // Income Statement
        "Revenue" => Some((REVENUE_TAGS, PeriodKind::Duration)),
        "NetIncome" => Some((NET_INCOME_TAGS, PeriodKind::Duration)),

        // Cash Flow
        "OperatingCashFlow" => Some((OPERATING_CASH_FLOW_TAGS, PeriodKind::Duration)),
        "InvestingCashFlow" => Some((INVESTING_CASH_FLOW_TAGS, PeriodKind::Duration)),
        "FinancingCashFlow" => Some((FINANCING_CASH_FLOW_TAGS, PeriodKind::Duration)),

        // Balance Sheet
        "Assets" => Some((ASSETS_TAGS, PeriodKind::Instant)),
        "AssetsCurrent" => Some((ASSETS_CURRENT_TAGS, PeriodKind::Instant)),
        "Liabilities" => Some((LIABILITIES_TAGS, PeriodKind::Instant)),
        "LiabilitiesCurrent" => Some((LIABILITIES_CURRENT_TAGS, PeriodKind::Instant)),
        "StockholdersEquity" => Some((STOCKHOLDERS_EQUITY_TAGS, PeriodKind::Instant)),

        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
