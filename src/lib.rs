//! # Stockcast workspace
//!
//! Umbrella crate over the workspace members:
//!
//! - [`series_math`]: linear algebra, least squares, filters, lag
//!   polynomials and optimization used by the models
//! - [`stock_forecast`]: price histories, stationarity testing, seasonal
//!   decomposition and SARIMA forecasting
//! - [`stockcast`]: the forecasting dashboard and its HTML report
//!
//! ## Example
//!
//! ```
//! use stockcast_workspace::stockcast::DashboardParams;
//!
//! let params = DashboardParams::default();
//! assert_eq!(params.forecast_steps(), 11);
//! assert!(params.validate().is_ok());
//! ```

pub use series_math;
pub use stock_forecast;
pub use stockcast;
