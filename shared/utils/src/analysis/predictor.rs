//! Buffered demand forecasts from historical performance.

use chrono::NaiveDate;
use matchwise_models::{PerformanceData, Prediction, PredictionMethod};

use super::period::{following_period_labels, infer_granularity};
use crate::error::{MatchwiseError, MatchwiseResult};

/// Periods considered by the trend baseline
const TREND_WINDOW: usize = 3;

pub struct Predictor<'a> {
    data: &'a PerformanceData,
}

impl<'a> Predictor<'a> {
    pub fn new(data: &'a PerformanceData) -> Self {
        Self { data }
    }

    /// Forecast the period after `today`, inflated by `buffer_percentage`.
    pub fn predict(
        &self,
        method: PredictionMethod,
        buffer_percentage: f64,
        today: NaiveDate,
    ) -> MatchwiseResult<Prediction> {
        self.predict_many(1, method, buffer_percentage, today)?
            .pop()
            .ok_or_else(|| MatchwiseError::internal("no prediction produced"))
    }

    /// Forecast the next `count` periods. Every period gets the same
    /// baseline; only the labels advance.
    pub fn predict_many(
        &self,
        count: usize,
        method: PredictionMethod,
        buffer_percentage: f64,
        today: NaiveDate,
    ) -> MatchwiseResult<Vec<Prediction>> {
        if self.data.periods.is_empty() {
            return Err(MatchwiseError::analysis(format!(
                "no historical data available for {} {}",
                self.data.kind.label(),
                self.data.identifier
            )));
        }
        if !buffer_percentage.is_finite() {
            return Err(MatchwiseError::invalid_input("buffer percentage must be a finite number"));
        }

        let baseline = self.baseline(method);
        let predicted_quantity = baseline * (1.0 + buffer_percentage / 100.0);
        let granularity = infer_granularity(&self.data.periods[0].label);

        Ok(following_period_labels(today, granularity, count)
            .into_iter()
            .map(|period_label| Prediction {
                identifier: self.data.identifier.clone(),
                kind: self.data.kind,
                period_label,
                predicted_quantity,
                baseline,
                buffer_percentage,
                method,
            })
            .collect())
    }

    fn baseline(&self, method: PredictionMethod) -> f64 {
        match method {
            PredictionMethod::Average => self.data.average,
            PredictionMethod::Last => self
                .data
                .last_period()
                .map(|p| p.quantity as f64)
                .unwrap_or(self.data.average),
            PredictionMethod::Trend => self.trend(),
        }
    }

    /// Last quantity plus the mean change across the recent window
    fn trend(&self) -> f64 {
        let periods = &self.data.periods;
        if periods.len() < 2 {
            return self.data.average;
        }

        let recent = &periods[periods.len().saturating_sub(TREND_WINDOW)..];
        let changes: Vec<f64> = recent
            .windows(2)
            .map(|w| w[1].quantity as f64 - w[0].quantity as f64)
            .collect();
        let mean_change = changes.iter().sum::<f64>() / changes.len() as f64;

        recent[recent.len() - 1].quantity as f64 + mean_change
    }
}
