//! # Stock Forecast
//!
//! Daily stock price analysis and forecasting.
//!
//! ## Features
//!
//! - Daily OHLCV history from the Yahoo Finance chart API, CSV files or a
//!   seeded synthetic generator, held in a polars `DataFrame`
//! - Augmented Dickey-Fuller stationarity test
//! - Classical additive seasonal decomposition
//! - Seasonal ARIMA fitted by conditional sum of squares, with a
//!   statsmodels-style summary table
//! - Dated point forecasts with 95% intervals
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use stock_forecast::data::PriceColumn;
//! use stock_forecast::forecast::Forecast;
//! use stock_forecast::models::{Order, SarimaxModel, SeasonalOrder};
//! use stock_forecast::stationarity::adf_test;
//! use stock_forecast::synthetic::{generate_history, SyntheticConfig};
//!
//! # fn main() -> stock_forecast::error::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
//! let history = generate_history("DEMO", start, end, &SyntheticConfig::default())?;
//! let series = history.select(PriceColumn::Open)?;
//!
//! let adf = adf_test(&series.values)?;
//! println!("stationary: {}", adf.is_stationary());
//!
//! let model = SarimaxModel::new(Order::new(2, 1, 2), SeasonalOrder::new(2, 1, 2, 12))?;
//! let fit = model.fit(&series.values)?;
//! println!("{}", fit.summary("Open")?);
//!
//! let forecast = Forecast::from_result(&fit.predict(11)?, end)?;
//! println!("{:?}", forecast.predicted_mean());
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod decomposition;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod models;
pub mod stationarity;
pub mod synthetic;

// Re-export commonly used types
pub use crate::data::{ColumnSeries, DataLoader, PriceColumn, PriceHistory};
pub use crate::error::ForecastError;
pub use crate::fetch::YahooFinanceClient;
pub use crate::forecast::Forecast;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
