//! The dashboard pipeline
//!
//! One run fetches (or loads) the history, projects the selected column,
//! tests it for stationarity, decomposes it, fits the seasonal ARIMA model
//! and forecasts from the end date. Every run starts from scratch.

use crate::error::{DashboardError, Result};
use crate::params::DashboardParams;
use std::path::PathBuf;
use stock_forecast::decomposition::{seasonal_decompose, Decomposition, DECOMPOSITION_PERIOD};
use stock_forecast::models::{ModelSummary, SarimaxModel};
use stock_forecast::stationarity::{adf_test, AdfResult};
use stock_forecast::synthetic::{generate_history, SyntheticConfig};
use stock_forecast::{ColumnSeries, DataLoader, Forecast, PriceHistory, YahooFinanceClient};
use tracing::{info, warn};

/// Where the price history comes from
#[derive(Debug, Clone)]
pub enum HistorySource {
    /// Yahoo Finance chart API
    Yahoo(YahooFinanceClient),
    /// CSV file with `Date, Open, High, Low, Close[, Adj Close][, Volume]` columns
    Csv(PathBuf),
    /// Seeded synthetic random walk
    Synthetic(u64),
}

impl HistorySource {
    /// History for the ticker and date range in `params`
    pub async fn load(&self, params: &DashboardParams) -> Result<PriceHistory> {
        let (start, end) = (params.start_date, params.end_date);
        let history = match self {
            HistorySource::Yahoo(client) => client.fetch_daily(&params.ticker, start, end).await?,
            HistorySource::Csv(path) => {
                DataLoader::from_csv(&params.ticker, path)?.between(start, end)?
            }
            HistorySource::Synthetic(seed) => generate_history(
                &params.ticker,
                start,
                end,
                &SyntheticConfig {
                    seed: *seed,
                    ..SyntheticConfig::default()
                },
            )?,
        };
        Ok(history)
    }
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub params: DashboardParams,
    /// History as fetched, all columns
    pub history: PriceHistory,
    /// The selected column
    pub selected: ColumnSeries,
    pub adf: AdfResult,
    pub decomposition: Decomposition,
    pub summary: ModelSummary,
    pub forecast: Forecast,
}

impl DashboardReport {
    /// The answer to "is the data stationary?"
    pub fn is_stationary(&self) -> bool {
        self.adf.is_stationary()
    }
}

/// A validated set of parameters ready to run
#[derive(Debug, Clone)]
pub struct Dashboard {
    params: DashboardParams,
}

impl Dashboard {
    pub fn new(params: DashboardParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &DashboardParams {
        &self.params
    }

    /// Load the history from `source`, then run
    pub async fn load_and_run(&self, source: &HistorySource) -> Result<DashboardReport> {
        let history = source.load(&self.params).await?;
        self.run(history)
    }

    /// Fetch the history from Yahoo Finance, then run
    pub async fn fetch_and_run(&self, client: &YahooFinanceClient) -> Result<DashboardReport> {
        self.load_and_run(&HistorySource::Yahoo(client.clone())).await
    }

    /// Analyse and forecast an already loaded history
    pub fn run(&self, history: PriceHistory) -> Result<DashboardReport> {
        let params = &self.params;
        if history.is_empty() {
            warn!(ticker = %params.ticker, "no price data");
            return Err(DashboardError::EmptyData {
                ticker: params.ticker.clone(),
                start: params.start_date,
                end: params.end_date,
            });
        }
        info!(ticker = %params.ticker, rows = history.len(), "loaded price history");

        let selected = history.select(params.column)?;

        let adf = adf_test(&selected.values)?;
        info!(
            p_value = adf.p_value,
            stationary = adf.is_stationary(),
            "stationarity test"
        );

        let decomposition = seasonal_decompose(&selected.values, DECOMPOSITION_PERIOD)?;

        let model = SarimaxModel::new(params.order(), params.seasonal_order())?;
        let fit = model.fit(&selected.values)?;
        let summary = fit.summary(params.column.name())?;
        info!(
            model = %summary.model,
            aic = summary.aic,
            converged = summary.converged,
            "model fitted"
        );

        let forecast = Forecast::from_model(&fit, params.forecast_steps(), params.end_date)?;

        Ok(DashboardReport {
            params: params.clone(),
            history,
            selected,
            adf,
            decomposition,
            summary,
            forecast,
        })
    }
}
