//! Dated forecasts
//!
//! Forecast rows are labelled with consecutive calendar days starting at the
//! end of the requested history range, regardless of trading days.

use crate::data::{date_series, DATE_COLUMN};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastResult, TrainedForecastModel};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Column holding the point forecast
pub const PREDICTED_COLUMN: &str = "predicted_mean";
pub const LOWER_COLUMN: &str = "lower";
pub const UPPER_COLUMN: &str = "upper";

/// `n` consecutive days starting at `start` inclusive
pub fn forecast_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

/// One forecast step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub predicted_mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Point forecasts with 95% bounds, one row per day
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    rows: Vec<ForecastRow>,
}

impl Forecast {
    /// Attach dates starting at `start` to a model forecast
    pub fn from_result(result: &ForecastResult, start: NaiveDate) -> Result<Self> {
        let values = result.values();
        let intervals = result.intervals().ok_or_else(|| {
            ForecastError::ModelError("Forecast has no confidence intervals".to_string())
        })?;

        let rows = forecast_dates(start, values.len())
            .into_iter()
            .zip(values)
            .zip(intervals)
            .map(|((date, mean), (lower, upper))| ForecastRow {
                date,
                predicted_mean: *mean,
                lower: *lower,
                upper: *upper,
            })
            .collect();

        Ok(Self { rows })
    }

    /// Forecast `steps` values from a trained model, dated from `start`
    pub fn from_model<M: TrainedForecastModel>(
        model: &M,
        steps: usize,
        start: NaiveDate,
    ) -> Result<Self> {
        Self::from_result(&model.forecast(steps)?, start)
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn predicted_mean(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.predicted_mean).collect()
    }

    /// `Date, predicted_mean, lower, upper` table
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let column = |name: &str, f: fn(&ForecastRow) -> f64| {
            Series::new(name, self.rows.iter().map(f).collect::<Vec<f64>>())
        };
        Ok(DataFrame::new(vec![
            date_series(DATE_COLUMN, &self.dates())?,
            column(PREDICTED_COLUMN, |r| r.predicted_mean),
            column(LOWER_COLUMN, |r| r.lower),
            column(UPPER_COLUMN, |r| r.upper),
        ])?)
    }

    /// Write the forecast table as CSV
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let mut df = self.to_dataframe()?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }
}
