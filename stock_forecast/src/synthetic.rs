//! Synthetic daily price histories for offline runs
//!
//! Prices follow a seeded geometric random walk on weekdays, so the same seed
//! and range always produce the same history.

use crate::data::{DailyBar, OhlcvData, PriceHistory};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Parameters of the simulated price process
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// RNG seed
    pub seed: u64,
    /// First close price
    pub starting_price: f64,
    /// Mean daily log return
    pub drift: f64,
    /// Standard deviation of daily log returns
    pub volatility: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
        }
    }
}

/// Generate a weekday-only history with dates in `[start, end)`
pub fn generate_history(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    config: &SyntheticConfig,
) -> Result<PriceHistory> {
    if config.starting_price <= 0.0 {
        return Err(ForecastError::InvalidParameter(
            "Starting price must be positive".to_string(),
        ));
    }

    let returns = Normal::new(config.drift, config.volatility)
        .map_err(|e| ForecastError::InvalidParameter(format!("Invalid volatility: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut bars = Vec::new();
    let mut close = config.starting_price;
    for date in start.iter_days().take_while(|d| *d < end) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let open = close;
        close = open * returns.sample(&mut rng).exp();
        let spread = open * config.volatility * 0.5;
        let high = open.max(close) + rng.gen::<f64>() * spread;
        let low = (open.min(close) - rng.gen::<f64>() * spread).max(0.01);

        bars.push(DailyBar {
            date,
            data: OhlcvData {
                open,
                high,
                low,
                close,
                adj_close: close,
                volume: rng.gen_range(1_000_000..10_000_000),
            },
        });
    }

    PriceHistory::from_bars(ticker, bars)
}
