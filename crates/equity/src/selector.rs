//! Selection of the current and one-year-prior annual filings.

use equity_core::{FilingRecord, FilingWindow, ProfileError, Result, Symbol};

/// The two annual filings compared by a profile.
#[derive(Clone, Copy, Debug)]
pub struct FilingPair<'a> {
    /// The most recent annual filing.
    pub current: &'a FilingRecord,
    /// The annual filing filed roughly one year before `current`.
    pub prior: &'a FilingRecord,
}

/// Chooses the most recent annual filing and its one-year-prior counterpart.
#[derive(Clone, Debug)]
pub struct FilingPairSelector {
    filing_type: String,
    window: FilingWindow,
}

impl FilingPairSelector {
    /// Creates a selector for an annual filing type and prior-filing window.
    #[must_use]
    pub fn new(filing_type: impl Into<String>, window: FilingWindow) -> Self {
        Self {
            filing_type: filing_type.into(),
            window,
        }
    }

    /// The annual filing type this selector matches.
    #[must_use]
    pub fn filing_type(&self) -> &str {
        &self.filing_type
    }

    /// Returns the annual filings among `candidates`, in input order.
    pub fn annual_filings<'a>(
        &self,
        symbol: &Symbol,
        candidates: &'a [FilingRecord],
    ) -> Result<Vec<&'a FilingRecord>> {
        if candidates.is_empty() {
            return Err(ProfileError::NoFilingsFound {
                symbol: symbol.to_string(),
            });
        }

        let annual: Vec<&FilingRecord> = candidates
            .iter()
            .filter(|f| f.is_type(&self.filing_type))
            .collect();

        if annual.is_empty() {
            return Err(ProfileError::NoAnnualFilingsFound {
                symbol: symbol.to_string(),
                filing_type: self.filing_type.clone(),
            });
        }

        Ok(annual)
    }

    /// Picks the most recent filing.
    ///
    /// When several filings share the latest date the first one in input
    /// order is kept.
    #[must_use]
    pub fn most_recent<'a>(&self, annual: &[&'a FilingRecord]) -> Option<&'a FilingRecord> {
        annual.iter().copied().fold(None, |best, filing| match best {
            Some(b) if filing.filing_date <= b.filing_date => Some(b),
            _ => Some(filing),
        })
    }

    /// Picks the filing dated inside the window before `current`.
    ///
    /// Scans linearly and the last match wins.
    #[must_use]
    pub fn prior_year<'a>(
        &self,
        current: &FilingRecord,
        annual: &[&'a FilingRecord],
    ) -> Option<&'a FilingRecord> {
        annual
            .iter()
            .copied()
            .filter(|f| {
                self.window
                    .contains((current.filing_date - f.filing_date).num_days())
            })
            .last()
    }

    /// Selects the current and prior annual filings from `candidates`.
    pub fn select<'a>(
        &self,
        symbol: &Symbol,
        candidates: &'a [FilingRecord],
    ) -> Result<FilingPair<'a>> {
        let annual = self.annual_filings(symbol, candidates)?;

        let current = self
            .most_recent(&annual)
            .ok_or_else(|| ProfileError::Other("Annual filing set is empty".to_string()))?;

        let prior = self
            .prior_year(current, &annual)
            .ok_or_else(|| ProfileError::NoPriorYearFilingFound {
                symbol: symbol.to_string(),
                current_date: current.filing_date,
            })?;

        Ok(FilingPair { current, prior })
    }
}

impl Default for FilingPairSelector {
    fn default() -> Self {
        Self::new(equity_core::config::DEFAULT_ANNUAL_FILING_TYPE, FilingWindow::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use equity_core::FilingDocumentSource;
    use std::sync::Arc;

    #[derive(Debug)]
    struct NoDocument;

    #[async_trait]
    impl FilingDocumentSource for NoDocument {
        async fn fetch_document(&self) -> Result<Vec<u8>> {
            Err(ProfileError::Download("not used".to_string()))
        }
    }

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset)
    }

    fn filing(form: &str, offset: i64, accession: &str) -> FilingRecord {
        FilingRecord::new(form, day(offset), Arc::new(NoDocument)).with_accession_number(accession)
    }

    fn accession(filing: &FilingRecord) -> &str {
        filing.accession_number.as_deref().unwrap_or_default()
    }

    fn symbol() -> Symbol {
        Symbol::new("TEST")
    }

    #[test]
    fn test_selects_one_year_apart() {
        let candidates = vec![filing("10-K", 0, "a"), filing("10-K", 365, "b")];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(pair.current.filing_date, day(365));
        assert_eq!(pair.prior.filing_date, day(0));
    }

    #[test]
    fn test_outside_window_fails() {
        let candidates = vec![filing("10-K", 0, "a"), filing("10-K", 400, "b")];
        let err = FilingPairSelector::default()
            .select(&symbol(), &candidates)
            .unwrap_err();

        assert!(matches!(
            err,
            ProfileError::NoPriorYearFilingFound { current_date, .. } if current_date == day(400)
        ));
    }

    #[test]
    fn test_window_bounds_are_exclusive() {
        let selector = FilingPairSelector::default();

        let at_lower = vec![filing("10-K", 0, "a"), filing("10-K", 350, "b")];
        assert!(selector.select(&symbol(), &at_lower).is_err());

        let at_upper = vec![filing("10-K", 0, "a"), filing("10-K", 380, "b")];
        assert!(selector.select(&symbol(), &at_upper).is_err());

        let inside = vec![filing("10-K", 0, "a"), filing("10-K", 351, "b")];
        assert!(selector.select(&symbol(), &inside).is_ok());
    }

    #[test]
    fn test_no_annual_filings() {
        let candidates = vec![filing("10-Q", 0, "a"), filing("10-K/A", 365, "b")];
        let err = FilingPairSelector::default()
            .select(&symbol(), &candidates)
            .unwrap_err();

        assert!(matches!(
            err,
            ProfileError::NoAnnualFilingsFound { ref filing_type, .. } if filing_type == "10-K"
        ));
    }

    #[test]
    fn test_no_filings() {
        let err = FilingPairSelector::default().select(&symbol(), &[]).unwrap_err();
        assert!(matches!(err, ProfileError::NoFilingsFound { .. }));
    }

    #[test]
    fn test_type_match_ignores_case() {
        let candidates = vec![filing("10-k", 0, "a"), filing("10-K", 366, "b")];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(accession(pair.current), "b");
        assert_eq!(accession(pair.prior), "a");
    }

    #[test]
    fn test_amendments_are_ignored() {
        let candidates = vec![
            filing("10-K", 0, "a"),
            filing("10-K/A", 30, "amended"),
            filing("10-K", 365, "b"),
        ];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(accession(pair.prior), "a");
    }

    #[test]
    fn test_last_match_in_window_wins() {
        let candidates = vec![
            filing("10-K", 10, "first"),
            filing("10-K", 5, "second"),
            filing("10-K", 375, "current"),
            filing("10-K", 20, "third"),
        ];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(accession(pair.current), "current");
        assert_eq!(accession(pair.prior), "third");
    }

    #[test]
    fn test_tied_most_recent_keeps_first() {
        let candidates = vec![
            filing("10-K", 0, "prior"),
            filing("10-K", 365, "first"),
            filing("10-K", 365, "second"),
        ];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(accession(pair.current), "first");
    }

    #[test]
    fn test_unordered_input() {
        let candidates = vec![
            filing("10-K", 730, "2022"),
            filing("10-Q", 800, "q"),
            filing("10-K", 0, "2020"),
            filing("10-K", 1096, "2023"),
            filing("10-K", 365, "2021"),
        ];
        let pair = FilingPairSelector::default().select(&symbol(), &candidates).unwrap();

        assert_eq!(accession(pair.current), "2023");
        assert_eq!(accession(pair.prior), "2022");
        assert!(pair.current.filing_date > pair.prior.filing_date);
    }

    #[test]
    fn test_custom_window() {
        let selector = FilingPairSelector::new("20-F", FilingWindow::new(300, 420));
        let candidates = vec![filing("20-F", 0, "a"), filing("20-F", 400, "b")];

        let pair = selector.select(&symbol(), &candidates).unwrap();
        assert_eq!(accession(pair.prior), "a");
        assert_eq!(selector.filing_type(), "20-F");
    }
}
