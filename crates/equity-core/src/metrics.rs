//! Derived metrics computed from a pair of financial statements.
//!
//! Every metric is null-safe: it is present only when all of its inputs are
//! present, the denominator is nonzero and the result is finite. A genuinely
//! zero ratio and a ratio that could not be computed stay distinguishable.

use serde::{Deserialize, Serialize};

use crate::types::FinancialStatement;

/// Growth rates and ratios derived from the current and prior statements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Year-over-year revenue growth.
    pub revenue_growth: Option<f64>,
    /// Year-over-year net income growth.
    pub net_income_growth: Option<f64>,
    /// Net income as a fraction of revenue.
    pub profit_margin: Option<f64>,
    /// Stockholders' equity as a fraction of total assets.
    pub percent_equity: Option<f64>,
    /// Current assets divided by current liabilities.
    pub current_ratio: Option<f64>,
}

impl DerivedMetrics {
    /// Computes all derived metrics for a current/prior statement pair.
    ///
    /// Growth rates compare `current` against `prior`; the ratios use the
    /// current period only.
    #[must_use]
    pub fn compute(current: &FinancialStatement, prior: &FinancialStatement) -> Self {
        Self {
            revenue_growth: growth(current.revenue, prior.revenue),
            net_income_growth: growth(current.net_income, prior.net_income),
            profit_margin: ratio(current.net_income, current.revenue),
            percent_equity: ratio(current.stockholders_equity, current.total_assets),
            current_ratio: ratio(current.current_assets, current.current_liabilities),
        }
    }

    /// Returns true if no metric could be computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revenue_growth.is_none()
            && self.net_income_growth.is_none()
            && self.profit_margin.is_none()
            && self.percent_equity.is_none()
            && self.current_ratio.is_none()
    }
}

/// `numerator / denominator`, absent on a missing operand, a zero
/// denominator or a non-finite result.
#[must_use]
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (num, den) = (numerator?, denominator?);
    if den == 0.0 {
        return None;
    }
    Some(num / den).filter(|v| v.is_finite())
}

/// `(current - prior) / prior`, with the same absence rules as [`ratio`].
#[must_use]
pub fn growth(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    let (cur, prev) = (current?, prior?);
    ratio(Some(cur - prev), Some(prev))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(revenue: Option<f64>, net_income: Option<f64>) -> FinancialStatement {
        FinancialStatement {
            revenue,
            net_income,
            ..Default::default()
        }
    }

    #[test]
    fn test_revenue_growth() {
        let current = statement(Some(110.0), None);
        let prior = statement(Some(100.0), None);

        let metrics = DerivedMetrics::compute(&current, &prior);
        assert_eq!(metrics.revenue_growth, Some(0.10));
        assert_eq!(metrics.net_income_growth, None);
    }

    #[test]
    fn test_growth_absent_when_prior_missing() {
        let current = statement(Some(110.0), Some(5.0));
        let prior = statement(None, Some(4.0));

        let metrics = DerivedMetrics::compute(&current, &prior);
        assert_eq!(metrics.revenue_growth, None);
        assert_eq!(metrics.net_income_growth, Some(0.25));
    }

    #[test]
    fn test_growth_absent_when_prior_zero() {
        let current = statement(Some(50.0), None);
        let prior = statement(Some(0.0), None);

        assert_eq!(DerivedMetrics::compute(&current, &prior).revenue_growth, None);
    }

    #[test]
    fn test_negative_prior_income_growth() {
        // Loss of 10 to loss of 5: (-5 - -10) / -10
        let current = statement(None, Some(-5.0));
        let prior = statement(None, Some(-10.0));

        assert_eq!(
            DerivedMetrics::compute(&current, &prior).net_income_growth,
            Some(-0.5)
        );
    }

    #[test]
    fn test_profit_margin_zero_revenue_is_absent() {
        let current = statement(Some(0.0), Some(0.0));
        let metrics = DerivedMetrics::compute(&current, &FinancialStatement::default());

        assert_eq!(metrics.profit_margin, None);
    }

    #[test]
    fn test_zero_ratio_is_present() {
        let current = statement(Some(200.0), Some(0.0));
        let metrics = DerivedMetrics::compute(&current, &FinancialStatement::default());

        assert_eq!(metrics.profit_margin, Some(0.0));
    }

    #[test]
    fn test_balance_sheet_ratios() {
        let current = FinancialStatement {
            total_assets: Some(400.0),
            stockholders_equity: Some(100.0),
            current_assets: Some(150.0),
            current_liabilities: Some(100.0),
            ..Default::default()
        };
        let metrics = DerivedMetrics::compute(&current, &FinancialStatement::default());

        assert_eq!(metrics.percent_equity, Some(0.25));
        assert_eq!(metrics.current_ratio, Some(1.5));
        assert_eq!(metrics.revenue_growth, None);
    }

    #[test]
    fn test_current_ratio_zero_liabilities_is_absent() {
        let current = FinancialStatement {
            current_assets: Some(150.0),
            current_liabilities: Some(0.0),
            ..Default::default()
        };

        assert_eq!(
            DerivedMetrics::compute(&current, &FinancialStatement::default()).current_ratio,
            None
        );
    }

    #[test]
    fn test_non_finite_results_are_absent() {
        assert_eq!(ratio(Some(f64::MAX), Some(f64::MIN_POSITIVE)), None);
        assert_eq!(ratio(Some(f64::NAN), Some(1.0)), None);
        assert_eq!(growth(Some(f64::INFINITY), Some(1.0)), None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let current = FinancialStatement {
            revenue: Some(383_285_000_000.0),
            net_income: Some(96_995_000_000.0),
            total_assets: Some(352_583_000_000.0),
            stockholders_equity: Some(62_146_000_000.0),
            current_assets: Some(143_566_000_000.0),
            current_liabilities: Some(145_308_000_000.0),
            ..Default::default()
        };
        let prior = statement(Some(394_328_000_000.0), Some(99_803_000_000.0));

        let first = DerivedMetrics::compute(&current, &prior);
        let second = DerivedMetrics::compute(&current, &prior);

        let bits = |m: &DerivedMetrics| {
            [
                m.revenue_growth,
                m.net_income_growth,
                m.profit_margin,
                m.percent_equity,
                m.current_ratio,
            ]
            .map(|v| v.map(f64::to_bits))
        };
        assert_eq!(bits(&first), bits(&second));
        assert!(!first.is_empty());
    }

    #[test]
    fn test_empty_statements_produce_no_metrics() {
        let metrics = DerivedMetrics::compute(
            &FinancialStatement::default(),
            &FinancialStatement::default(),
        );
        assert!(metrics.is_empty());
    }
}
