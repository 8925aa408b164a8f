//! Calendar period labels.
//!
//! Labels sort lexicographically in chronological order for every
//! granularity, which the analyzer relies on.

use chrono::{Datelike, Duration, Months, NaiveDate};
use matchwise_models::Granularity;

/// Label of the period containing `date`.
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let week = date.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Granularity::Monthly => date.format("%Y-%m").to_string(),
        Granularity::Quarterly => format!("{}-Q{}", date.year(), quarter(date)),
        Granularity::Yearly => date.year().to_string(),
    }
}

/// Label of the period after the one containing `today`.
pub fn next_period_label(today: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => period_key(today + Duration::days(1), granularity),
        Granularity::Weekly => period_key(today + Duration::weeks(1), granularity),
        Granularity::Monthly => period_key(add_months(today, 1), granularity),
        Granularity::Quarterly => {
            let next = quarter(today) % 4 + 1;
            let year = if next > 1 { today.year() } else { today.year() + 1 };
            format!("{}-Q{}", year, next)
        }
        Granularity::Yearly => (today.year() + 1).to_string(),
    }
}

/// The `n` period labels following the one containing `today`.
pub fn following_period_labels(today: NaiveDate, granularity: Granularity, n: usize) -> Vec<String> {
    let mut labels = Vec::with_capacity(n);
    let mut anchor = today;
    for _ in 0..n {
        labels.push(next_period_label(anchor, granularity));
        anchor = step(anchor, granularity);
    }
    labels
}

/// Guess the granularity a label was produced with. Unrecognized labels
/// read as monthly.
pub fn infer_granularity(label: &str) -> Granularity {
    if label.contains("-W") {
        Granularity::Weekly
    } else if label.contains("-Q") {
        Granularity::Quarterly
    } else if label.len() == 4 && label.bytes().all(|b| b.is_ascii_digit()) {
        Granularity::Yearly
    } else if label.len() == 10 {
        Granularity::Daily
    } else {
        Granularity::Monthly
    }
}

fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

fn step(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date + Duration::days(1),
        Granularity::Weekly => date + Duration::weeks(1),
        Granularity::Monthly => add_months(date, 1),
        Granularity::Quarterly => add_months(date, 3),
        Granularity::Yearly => add_months(date, 12),
    }
}

// Day-of-month clamps to the end of shorter months
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}
