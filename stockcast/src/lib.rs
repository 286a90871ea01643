//! # Stockcast
//!
//! Stock market forecasting dashboard. One run picks a ticker and a date
//! range, fetches daily prices, charts them, tests the selected column for
//! stationarity, decomposes it, fits a seasonal ARIMA model and forecasts the
//! following days. Results go to the terminal and to a self-contained HTML
//! report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stockcast::{Dashboard, DashboardParams, HistorySource};
//!
//! # async fn demo() -> stockcast::error::Result<()> {
//! let dashboard = Dashboard::new(DashboardParams::default())?;
//! let report = dashboard.load_and_run(&HistorySource::Synthetic(42)).await?;
//! println!("{}", stockcast::report::terminal_summary(&report));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod params;
pub mod pipeline;
pub mod report;

pub use crate::error::DashboardError;
pub use crate::params::{DashboardParams, TICKERS};
pub use crate::pipeline::{Dashboard, DashboardReport, HistorySource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
