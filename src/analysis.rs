//! Next-day temperature estimate from daily history.
//!
//! An ordinary least-squares model maps each run of [`TEMP_WINDOW`] daily
//! values onto the value of the following day.

use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearError, LinearRegression};
use ndarray::{Array1, Array2};
use thiserror::Error;

/// Days of history the predictor looks at per estimate
pub const TEMP_WINDOW: usize = 7;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("need at least {needed} days of temperatures, got {got}")]
    NotEnoughData { needed: usize, got: usize },

    #[error("expected the last {expected} days, got {got}")]
    WindowSize { expected: usize, got: usize },

    #[error("regression failed: {0}")]
    Fit(#[from] LinearError<f64>),

    #[error("regression produced a non-finite estimate")]
    NonFinite,
}

pub struct TempPredictor {
    model: FittedLinearRegression<f64>,
}

impl TempPredictor {
    /// Fewest temperatures that give one sample per coefficient plus intercept
    pub const MIN_SAMPLES: usize = TEMP_WINDOW * 2 + 1;

    /// Fits on every `TEMP_WINDOW`-day run of `temps` and the day after it
    pub fn train(temps: &[f64]) -> Result<Self, AnalysisError> {
        if temps.len() < Self::MIN_SAMPLES {
            return Err(AnalysisError::NotEnoughData {
                needed: Self::MIN_SAMPLES,
                got: temps.len(),
            });
        }

        let samples = temps.len() - TEMP_WINDOW;
        let records = Array2::from_shape_fn((samples, TEMP_WINDOW), |(i, j)| temps[i + j]);
        let targets: Array1<f64> = temps[TEMP_WINDOW..].iter().copied().collect();

        let model = LinearRegression::new().fit(&Dataset::new(records, targets))?;
        Ok(Self { model })
    }

    /// Estimates the day following `last_days` (oldest first)
    pub fn predict_next(&self, last_days: &[f64]) -> Result<f64, AnalysisError> {
        if last_days.len() != TEMP_WINDOW {
            return Err(AnalysisError::WindowSize {
                expected: TEMP_WINDOW,
                got: last_days.len(),
            });
        }

        let record = Array2::from_shape_fn((1, TEMP_WINDOW), |(_, j)| last_days[j]);
        let prediction: Array1<f64> = self.model.predict(&record);

        match prediction.first() {
            Some(value) if value.is_finite() => Ok(*value),
            _ => Err(AnalysisError::NonFinite),
        }
    }
}

/// Trains on `temps` and estimates the day after its last entry
pub fn predict_next_day(temps: &[f64]) -> Result<f64, AnalysisError> {
    let predictor = TempPredictor::train(temps)?;
    predictor.predict_next(&temps[temps.len() - TEMP_WINDOW..])
}
