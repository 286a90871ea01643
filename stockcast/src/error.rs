//! Error types for the stockcast dashboard

use chrono::NaiveDate;
use stock_forecast::ForecastError;
use thiserror::Error;

/// Errors raised while running the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source returned no rows, e.g. an unknown or empty ticker
    #[error("No price data for ticker '{ticker}' between {start} and {end}")]
    EmptyData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// A dashboard parameter is outside its allowed range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from fetching, testing, fitting or forecasting
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Malformed parameters file
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Error while serializing chart data
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with the dashboard error
pub type Result<T> = std::result::Result<T, DashboardError>;
