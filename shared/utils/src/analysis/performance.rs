//! Historical performance of a room or 12NC.

use chrono::{Months, NaiveDate};
use matchwise_models::{Granularity, IdentifierKind, PerformanceData, SalesRecord, TimePeriod};
use std::collections::BTreeMap;

use super::period::period_key;

pub struct PerformanceAnalyzer<'a> {
    records: &'a [SalesRecord],
}

impl<'a> PerformanceAnalyzer<'a> {
    pub fn new(records: &'a [SalesRecord]) -> Self {
        Self { records }
    }

    /// Bucket the sales of one identifier into calendar periods.
    ///
    /// Only sales dated within `lookback_years` of `today` (both ends
    /// inclusive) count. An identifier without sales yields no periods and
    /// an average of 0. Bucket quantities and the total saturate at the
    /// `i64` bounds.
    pub fn analyze(
        &self,
        identifier: &str,
        kind: IdentifierKind,
        lookback_years: u32,
        granularity: Granularity,
        today: NaiveDate,
    ) -> PerformanceData {
        let start = lookback_start(today, lookback_years);

        let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
        for record in self
            .records
            .iter()
            .filter(|r| kind.select(r) == identifier)
            .filter(|r| r.date >= start && r.date <= today)
        {
            let bucket = buckets.entry(period_key(record.date, granularity)).or_insert(0);
            *bucket = bucket.saturating_add(record.quantity);
        }

        let periods: Vec<TimePeriod> = buckets
            .into_iter()
            .map(|(label, quantity)| TimePeriod::new(label, quantity))
            .collect();
        let total = periods
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.quantity));
        let average = if periods.is_empty() {
            0.0
        } else {
            total as f64 / periods.len() as f64
        };

        tracing::debug!(
            identifier = %identifier,
            kind = kind.label(),
            periods = periods.len(),
            total,
            "Analyzed sales history"
        );

        PerformanceData {
            identifier: identifier.to_string(),
            kind,
            periods,
            total,
            average,
        }
    }

    pub fn analyze_many<S: AsRef<str>>(
        &self,
        identifiers: &[S],
        kind: IdentifierKind,
        lookback_years: u32,
        granularity: Granularity,
        today: NaiveDate,
    ) -> Vec<PerformanceData> {
        identifiers
            .iter()
            .map(|id| self.analyze(id.as_ref(), kind, lookback_years, granularity, today))
            .collect()
    }
}

fn lookback_start(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sales() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new("123456789012", "Room001", 4, day(2024, 1, 10)),
            SalesRecord::new("123456789012", "Room002", 6, day(2024, 1, 20)),
            SalesRecord::new("123456789012", "Room001", 5, day(2024, 3, 2)),
            SalesRecord::new("987654321098", "Room001", 9, day(2024, 3, 3)),
            // outside a one-year lookback from 2024-06-30
            SalesRecord::new("123456789012", "Room001", 100, day(2023, 6, 29)),
            // in the future
            SalesRecord::new("123456789012", "Room001", 100, day(2024, 7, 1)),
        ]
    }

    #[test]
    fn test_monthly_buckets() {
        let records = sales();
        let data = PerformanceAnalyzer::new(&records).analyze(
            "123456789012",
            IdentifierKind::Part,
            1,
            Granularity::Monthly,
            day(2024, 6, 30),
        );

        assert_eq!(
            data.periods,
            vec![TimePeriod::new("2024-01", 10), TimePeriod::new("2024-03", 5)]
        );
        assert_eq!(data.total, 15);
        assert!((data.average - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lookback_is_inclusive() {
        let records = vec![SalesRecord::new("123456789012", "Room001", 2, day(2023, 6, 30))];
        let data = PerformanceAnalyzer::new(&records).analyze(
            "123456789012",
            IdentifierKind::Part,
            1,
            Granularity::Yearly,
            day(2024, 6, 30),
        );
        assert_eq!(data.periods, vec![TimePeriod::new("2023", 2)]);
    }

    #[test]
    fn test_room_kind() {
        let records = sales();
        let data = PerformanceAnalyzer::new(&records).analyze(
            "Room001",
            IdentifierKind::Room,
            1,
            Granularity::Quarterly,
            day(2024, 6, 30),
        );
        assert_eq!(
            data.periods,
            vec![TimePeriod::new("2024-Q1", 18)]
        );
        assert_eq!(data.kind, IdentifierKind::Room);
    }

    #[test]
    fn test_unknown_identifier_has_no_periods() {
        let records = sales();
        let data = PerformanceAnalyzer::new(&records).analyze(
            "000000000000",
            IdentifierKind::Part,
            3,
            Granularity::Monthly,
            day(2024, 6, 30),
        );
        assert!(data.periods.is_empty());
        assert_eq!(data.total, 0);
        assert_eq!(data.average, 0.0);
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let records = vec![
            SalesRecord::new("123456789012", "Room001", i64::MAX, day(2024, 5, 1)),
            SalesRecord::new("123456789012", "Room001", 1, day(2024, 5, 2)),
            SalesRecord::new("123456789012", "Room001", i64::MAX, day(2024, 6, 1)),
        ];
        let data = PerformanceAnalyzer::new(&records).analyze(
            "123456789012",
            IdentifierKind::Part,
            1,
            Granularity::Monthly,
            day(2024, 6, 30),
        );

        assert_eq!(
            data.periods,
            vec![TimePeriod::new("2024-05", i64::MAX), TimePeriod::new("2024-06", i64::MAX)]
        );
        assert_eq!(data.total, i64::MAX);
        assert!(data.average > 0.0);
    }

    #[test]
    fn test_analyze_many_keeps_order() {
        let records = sales();
        let results = PerformanceAnalyzer::new(&records).analyze_many(
            &["987654321098", "123456789012"],
            IdentifierKind::Part,
            1,
            Granularity::Yearly,
            day(2024, 6, 30),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].identifier, "987654321098");
        assert_eq!(results[0].total, 9);
        assert_eq!(results[1].total, 15);
    }
}
