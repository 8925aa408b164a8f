//! Historical performance models.

use serde::{Deserialize, Serialize};

use crate::sales::IdentifierKind;

/// Calendar bucket size used when aggregating sales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// Aggregated quantity for one period label (e.g. `2024-03`, `2024-Q1`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePeriod {
    pub label: String,
    pub quantity: i64,
}

impl TimePeriod {
    pub fn new(label: impl Into<String>, quantity: i64) -> Self {
        Self {
            label: label.into(),
            quantity,
        }
    }
}

/// Performance summary of one identifier over time.
///
/// `periods` is sorted by label, which for every supported granularity is
/// also chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceData {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub periods: Vec<TimePeriod>,
    pub total: i64,
    pub average: f64,
}

impl PerformanceData {
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn period(&self, label: &str) -> Option<&TimePeriod> {
        self.periods.iter().find(|p| p.label == label)
    }

    pub fn last_period(&self) -> Option<&TimePeriod> {
        self.periods.last()
    }
}
