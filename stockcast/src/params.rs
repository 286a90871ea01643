//! Dashboard parameters
//!
//! Parameters come from defaults, an optional YAML file and command-line
//! overrides, in that order. Ranges match the dashboard controls: model
//! orders in `[0, 5]` and the seasonal period in `[0, 24]`.

use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stock_forecast::models::{Order, SeasonalOrder};
use stock_forecast::PriceColumn;

/// Companies offered by the ticker selector
pub const TICKERS: [&str; 11] = [
    "AAPL", "MSFT", "GOOGL", "TSLA", "NVDA", "ADBE", "PYPL", "INTC", "CMCSA", "NFLX", "PEP",
];

/// Largest value of p, d and q
pub const MAX_ORDER: usize = 5;
/// Largest seasonal period
pub const MAX_SEASONAL_PERIOD: usize = 24;
/// Largest number of forecast days
pub const MAX_FORECAST_PERIOD: usize = 365;

/// Everything one dashboard run depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardParams {
    pub ticker: String,
    pub start_date: NaiveDate,
    /// Exclusive end of the history range, and the first forecast date
    pub end_date: NaiveDate,
    /// Column to test, decompose and model
    pub column: PriceColumn,
    pub p: usize,
    pub d: usize,
    pub q: usize,
    /// Seasonal period `s`; the seasonal orders reuse `p`, `d` and `q`
    pub seasonal_period: usize,
    /// Days to forecast after the first forecast date
    pub forecast_period: usize,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            ticker: TICKERS[0].to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or_default(),
            column: PriceColumn::Open,
            p: 2,
            d: 1,
            q: 2,
            seasonal_period: 12,
            forecast_period: 10,
        }
    }
}

impl DashboardParams {
    /// Load parameters from a YAML file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.end_date <= self.start_date {
            return Err(DashboardError::InvalidParameter(format!(
                "End date {} must be after start date {}",
                self.end_date, self.start_date
            )));
        }
        for (name, value) in [("p", self.p), ("d", self.d), ("q", self.q)] {
            if value > MAX_ORDER {
                return Err(DashboardError::InvalidParameter(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_ORDER, value
                )));
            }
        }
        if self.seasonal_period > MAX_SEASONAL_PERIOD {
            return Err(DashboardError::InvalidParameter(format!(
                "Seasonal period must be between 0 and {}, got {}",
                MAX_SEASONAL_PERIOD, self.seasonal_period
            )));
        }
        if self.forecast_period > MAX_FORECAST_PERIOD {
            return Err(DashboardError::InvalidParameter(format!(
                "Forecast period must be between 0 and {}, got {}",
                MAX_FORECAST_PERIOD, self.forecast_period
            )));
        }
        Ok(())
    }

    pub fn order(&self) -> Order {
        Order::new(self.p, self.d, self.q)
    }

    /// Seasonal order `(p, d, q, s)`
    pub fn seasonal_order(&self) -> SeasonalOrder {
        SeasonalOrder::new(self.p, self.d, self.q, self.seasonal_period)
    }

    /// Number of forecast rows: the forecast period plus the first forecast date
    pub fn forecast_steps(&self) -> usize {
        self.forecast_period + 1
    }
}
