//! Demand forecast models.

use serde::{Deserialize, Serialize};

use crate::sales::IdentifierKind;

/// Baseline strategy for a forecast
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMethod {
    #[default]
    Average,
    Last,
    Trend,
}

/// Forecast for the period following the analyzed history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub period_label: String,
    pub predicted_quantity: f64,
    pub baseline: f64,
    pub buffer_percentage: f64,
    pub method: PredictionMethod,
}

impl Prediction {
    /// Safety stock added on top of the baseline
    pub fn buffer_amount(&self) -> f64 {
        self.predicted_quantity - self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_amount() {
        let prediction = Prediction {
            identifier: "Room001".to_string(),
            kind: IdentifierKind::Room,
            period_label: "2024-05".to_string(),
            predicted_quantity: 11.0,
            baseline: 10.0,
            buffer_percentage: 10.0,
            method: PredictionMethod::Average,
        };

        assert!((prediction.buffer_amount() - 1.0).abs() < f64::EPSILON);
    }
}
