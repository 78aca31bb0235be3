//! The point-in-time equity profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    metrics::DerivedMetrics,
    types::{FinancialStatement, Symbol},
};

/// Fundamental metrics for one symbol paired with its market capitalization.
///
/// Fields are set once while the profile is assembled and read through
/// accessors afterwards. `captured_at` is stamped at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityProfile {
    symbol: Symbol,
    market_cap: i64,
    captured_at: DateTime<Utc>,

    // Income and cash flow statement (period based)
    annual_revenue: Option<f64>,
    annual_net_income: Option<f64>,
    annual_operating_cash_flow: Option<f64>,
    annual_investing_cash_flow: Option<f64>,
    annual_financing_cash_flow: Option<f64>,

    // Balance sheet
    total_assets: Option<f64>,
    total_liabilities: Option<f64>,
    total_equity: Option<f64>,
    current_assets: Option<f64>,
    current_liabilities: Option<f64>,

    #[serde(flatten)]
    derived: DerivedMetrics,

    // Dividends
    dividend_yield: Option<f64>,
    dividend_payout_ratio: Option<f64>,
}

impl EquityProfile {
    /// Creates a profile with identifying data, captured now.
    #[must_use]
    pub fn new(symbol: Symbol, market_cap: i64) -> Self {
        Self {
            symbol,
            market_cap,
            captured_at: Utc::now(),
            annual_revenue: None,
            annual_net_income: None,
            annual_operating_cash_flow: None,
            annual_investing_cash_flow: None,
            annual_financing_cash_flow: None,
            total_assets: None,
            total_liabilities: None,
            total_equity: None,
            current_assets: None,
            current_liabilities: None,
            derived: DerivedMetrics::default(),
            dividend_yield: None,
            dividend_payout_ratio: None,
        }
    }

    /// Copies the raw line items of the most recent statement, untransformed.
    #[must_use]
    pub fn with_statement(mut self, statement: &FinancialStatement) -> Self {
        self.annual_revenue = statement.revenue;
        self.annual_net_income = statement.net_income;
        self.annual_operating_cash_flow = statement.operating_cash_flow;
        self.annual_investing_cash_flow = statement.investing_cash_flow;
        self.annual_financing_cash_flow = statement.financing_cash_flow;
        self.total_assets = statement.total_assets;
        self.total_liabilities = statement.total_liabilities;
        self.total_equity = statement.stockholders_equity;
        self.current_assets = statement.current_assets;
        self.current_liabilities = statement.current_liabilities;
        self
    }

    /// Sets the derived growth rates and ratios.
    #[must_use]
    pub const fn with_derived_metrics(mut self, derived: DerivedMetrics) -> Self {
        self.derived = derived;
        self
    }

    /// Sets the dividend fields.
    ///
    /// A payout ratio that is not strictly positive is treated as unreported.
    #[must_use]
    pub fn with_dividends(mut self, dividend_yield: Option<f64>, payout_ratio: Option<f64>) -> Self {
        self.dividend_yield = dividend_yield;
        self.dividend_payout_ratio = payout_ratio.filter(|r| *r > 0.0);
        self
    }

    /// Ticker symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Market capitalization at capture time.
    #[must_use]
    pub const fn market_cap(&self) -> i64 {
        self.market_cap
    }

    /// When the profile was captured (UTC).
    #[must_use]
    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Annual revenue.
    #[must_use]
    pub const fn annual_revenue(&self) -> Option<f64> {
        self.annual_revenue
    }

    /// Annual net income.
    #[must_use]
    pub const fn annual_net_income(&self) -> Option<f64> {
        self.annual_net_income
    }

    /// Annual operating cash flow.
    #[must_use]
    pub const fn annual_operating_cash_flow(&self) -> Option<f64> {
        self.annual_operating_cash_flow
    }

    /// Annual investing cash flow.
    #[must_use]
    pub const fn annual_investing_cash_flow(&self) -> Option<f64> {
        self.annual_investing_cash_flow
    }

    /// Annual financing cash flow.
    #[must_use]
    pub const fn annual_financing_cash_flow(&self) -> Option<f64> {
        self.annual_financing_cash_flow
    }

    /// Total assets.
    #[must_use]
    pub const fn total_assets(&self) -> Option<f64> {
        self.total_assets
    }

    /// Total liabilities.
    #[must_use]
    pub const fn total_liabilities(&self) -> Option<f64> {
        self.total_liabilities
    }

    /// Total stockholders' equity.
    #[must_use]
    pub const fn total_equity(&self) -> Option<f64> {
        self.total_equity
    }

    /// Current assets.
    #[must_use]
    pub const fn current_assets(&self) -> Option<f64> {
        self.current_assets
    }

    /// Current liabilities.
    #[must_use]
    pub const fn current_liabilities(&self) -> Option<f64> {
        self.current_liabilities
    }

    /// Derived growth rates and ratios.
    #[must_use]
    pub const fn derived(&self) -> &DerivedMetrics {
        &self.derived
    }

    /// Year-over-year revenue growth.
    #[must_use]
    pub const fn revenue_growth(&self) -> Option<f64> {
        self.derived.revenue_growth
    }

    /// Year-over-year net income growth.
    #[must_use]
    pub const fn net_income_growth(&self) -> Option<f64> {
        self.derived.net_income_growth
    }

    /// Net income as a fraction of revenue.
    #[must_use]
    pub const fn profit_margin(&self) -> Option<f64> {
        self.derived.profit_margin
    }

    /// Equity as a fraction of total assets.
    #[must_use]
    pub const fn percent_equity(&self) -> Option<f64> {
        self.derived.percent_equity
    }

    /// Current assets divided by current liabilities.
    #[must_use]
    pub const fn current_ratio(&self) -> Option<f64> {
        self.derived.current_ratio
    }

    /// Forward dividend yield.
    #[must_use]
    pub const fn dividend_yield(&self) -> Option<f64> {
        self.dividend_yield
    }

    /// Dividend payout ratio.
    #[must_use]
    pub const fn dividend_payout_ratio(&self) -> Option<f64> {
        self.dividend_payout_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_statement() -> FinancialStatement {
        FinancialStatement {
            period_end: None,
            revenue: Some(391_035_000_000.0),
            net_income: Some(93_736_000_000.0),
            operating_cash_flow: Some(118_254_000_000.0),
            investing_cash_flow: Some(2_935_000_000.0),
            financing_cash_flow: Some(-121_983_000_000.0),
            total_assets: Some(364_980_000_000.0),
            total_liabilities: Some(308_030_000_000.0),
            stockholders_equity: Some(56_950_000_000.0),
            current_assets: Some(152_987_000_000.0),
            current_liabilities: None,
        }
    }

    #[test]
    fn test_raw_fields_round_trip() {
        let statement = sample_statement();
        let profile = EquityProfile::new(Symbol::new("AAPL"), 3_400_000_000_000)
            .with_statement(&statement);

        assert_eq!(profile.annual_revenue(), statement.revenue);
        assert_eq!(profile.annual_net_income(), statement.net_income);
        assert_eq!(profile.annual_operating_cash_flow(), statement.operating_cash_flow);
        assert_eq!(profile.annual_investing_cash_flow(), statement.investing_cash_flow);
        assert_eq!(profile.annual_financing_cash_flow(), statement.financing_cash_flow);
        assert_eq!(profile.total_assets(), statement.total_assets);
        assert_eq!(profile.total_liabilities(), statement.total_liabilities);
        assert_eq!(profile.total_equity(), statement.stockholders_equity);
        assert_eq!(profile.current_assets(), statement.current_assets);
        assert_eq!(profile.current_liabilities(), None);
    }

    #[test]
    fn test_payout_ratio_requires_positive_value() {
        let profile = EquityProfile::new(Symbol::new("AMZN"), 1).with_dividends(None, Some(0.0));
        assert_eq!(profile.dividend_payout_ratio(), None);

        let profile =
            EquityProfile::new(Symbol::new("KO"), 1).with_dividends(Some(0.029), Some(0.71));
        assert_eq!(profile.dividend_yield(), Some(0.029));
        assert_eq!(profile.dividend_payout_ratio(), Some(0.71));
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let derived = DerivedMetrics {
            revenue_growth: Some(0.02),
            ..Default::default()
        };
        let profile = EquityProfile::new(Symbol::new("AAPL"), 42)
            .with_statement(&sample_statement())
            .with_derived_metrics(derived);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["marketCap"], 42);
        assert_eq!(json["revenueGrowth"], 0.02);
        assert!(json["profitMargin"].is_null());
        assert!(json.get("derived").is_none());

        let back: EquityProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
