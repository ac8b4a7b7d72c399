//! Report number synthesis
//!
//! `{prefix}-{YYYYMMDD}-{NNNN}` where the date segment comes from the
//! settings' report date and the four-digit suffix is random. The
//! suffix is the one non-deterministic input to a render, so it comes
//! in through a trait.

use chrono::NaiveDate;
use rand::Rng;
use std::fmt;

/// Source of the four-digit report number suffix
pub trait RandomSource {
    /// A value in `1000..=9999`
    fn report_suffix(&mut self) -> u16;
}

/// Production source, backed by the thread RNG
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn report_suffix(&mut self) -> u16 {
        rand::thread_rng().gen_range(1000..=9999)
    }
}

/// Fixed suffix, for deterministic renders in tests
#[derive(Debug)]
pub struct FixedSuffix(pub u16);

impl RandomSource for FixedSuffix {
    fn report_suffix(&mut self) -> u16 {
        self.0
    }
}

/// A synthesized report identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNumber(String);

impl ReportNumber {
    pub fn generate(prefix: &str, date: NaiveDate, rng: &mut dyn RandomSource) -> Self {
        Self(format!(
            "{}-{}-{}",
            prefix,
            attest_util::format_compact(date),
            rng.report_suffix()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_prefix_date_suffix() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let number = ReportNumber::generate("RPT", date, &mut FixedSuffix(4821));
        assert_eq!(number.as_str(), "RPT-20260805-4821");
    }

    #[test]
    fn thread_random_stays_in_range() {
        let mut rng = ThreadRandom;
        for _ in 0..100 {
            let suffix = rng.report_suffix();
            assert!((1000..=9999).contains(&suffix));
        }
    }

    #[test]
    fn prefix_and_date_segments_are_deterministic() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let a = ReportNumber::generate("QA", date, &mut ThreadRandom);
        let b = ReportNumber::generate("QA", date, &mut ThreadRandom);
        assert!(a.as_str().starts_with("QA-20260102-"));
        assert!(b.as_str().starts_with("QA-20260102-"));
    }
}
