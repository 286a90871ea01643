//! Daily price history handling
//!
//! A [`PriceHistory`] keeps the fetched bars in a polars `DataFrame` with the
//! columns `Date, Open, High, Low, Close, Adj Close, Volume`. Downstream
//! statistics work on a [`ColumnSeries`], a projection of one column that
//! leaves the history itself untouched.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Name of the date column in every price frame
pub const DATE_COLUMN: &str = "Date";

/// Days between 0001-01-01 and 1970-01-01, the epoch polars dates count from
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One of the value columns of a daily price frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    #[serde(rename = "Adj Close")]
    AdjClose,
    Volume,
}

impl PriceColumn {
    /// All value columns in frame order
    pub const ALL: [PriceColumn; 6] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::AdjClose,
        PriceColumn::Volume,
    ];

    /// Column name as it appears in the frame
    pub fn name(&self) -> &'static str {
        match self {
            PriceColumn::Open => "Open",
            PriceColumn::High => "High",
            PriceColumn::Low => "Low",
            PriceColumn::Close => "Close",
            PriceColumn::AdjClose => "Adj Close",
            PriceColumn::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriceColumn {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "open" => Ok(PriceColumn::Open),
            "high" => Ok(PriceColumn::High),
            "low" => Ok(PriceColumn::Low),
            "close" => Ok(PriceColumn::Close),
            "adjclose" | "adjustedclose" => Ok(PriceColumn::AdjClose),
            "volume" | "vol" => Ok(PriceColumn::Volume),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Unknown price column: {}",
                s
            ))),
        }
    }
}

/// OHLCV values of a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvData {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// Daily OHLCV bar with its trading date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub data: OhlcvData,
}

impl DailyBar {
    /// Value of one column of this bar
    pub fn value(&self, column: PriceColumn) -> f64 {
        match column {
            PriceColumn::Open => self.data.open,
            PriceColumn::High => self.data.high,
            PriceColumn::Low => self.data.low,
            PriceColumn::Close => self.data.close,
            PriceColumn::AdjClose => self.data.adj_close,
            PriceColumn::Volume => self.data.volume as f64,
        }
    }
}

/// Fetched daily price history for one ticker
#[derive(Debug, Clone)]
pub struct PriceHistory {
    ticker: String,
    df: DataFrame,
}

/// A single value column paired with its dates
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSeries {
    pub column: PriceColumn,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl ColumnSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Date of the last observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Data loader for price histories stored on disk
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price history from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(ticker: &str, path: P) -> Result<PriceHistory> {
        let df = CsvReader::from_path(path.as_ref())?
            .has_header(true)
            .finish()?;

        Self::from_dataframe(ticker, df)
    }

    /// Normalize an arbitrary frame with date and OHLC(V) columns into a [`PriceHistory`]
    pub fn from_dataframe(ticker: &str, df: DataFrame) -> Result<PriceHistory> {
        let time_column = Self::detect_time_column(&df)?;
        let dates = dates_from_series(df.column(&time_column)?)?;

        let find = |column: PriceColumn| -> Option<String> {
            df.get_column_names()
                .into_iter()
                .find(|name| {
                    PriceColumn::from_str(name)
                        .map(|c| c == column)
                        .unwrap_or(false)
                })
                .map(|name| name.to_string())
        };

        let mut values = Vec::with_capacity(PriceColumn::ALL.len());
        for column in [
            PriceColumn::Open,
            PriceColumn::High,
            PriceColumn::Low,
            PriceColumn::Close,
        ] {
            let name = find(column).ok_or_else(|| {
                ForecastError::DataError(format!("No '{}' column found in data", column))
            })?;
            values.push(f64_values(&df, &name)?);
        }

        let adj_close = match find(PriceColumn::AdjClose) {
            Some(name) => f64_values(&df, &name)?,
            None => values[3].clone(),
        };
        let volume = match find(PriceColumn::Volume) {
            Some(name) => f64_values(&df, &name)?,
            None => vec![0.0; dates.len()],
        };

        let bars = dates
            .iter()
            .enumerate()
            .map(|(i, date)| DailyBar {
                date: *date,
                data: OhlcvData {
                    open: values[0][i],
                    high: values[1][i],
                    low: values[2][i],
                    close: values[3][i],
                    adj_close: adj_close[i],
                    volume: volume[i].max(0.0) as u64,
                },
            })
            .collect::<Vec<_>>();

        PriceHistory::from_bars(ticker, bars)
    }

    /// Detect the time column in a DataFrame
    fn detect_time_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date") || lower_name.contains("time") {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No time column found in data".to_string(),
        ))
    }
}

impl PriceHistory {
    /// History with no rows, what the provider yields for unknown tickers
    pub fn empty(ticker: &str) -> Result<Self> {
        Self::from_bars(ticker, Vec::new())
    }

    /// Build a history from bars, sorted by date
    pub fn from_bars(ticker: &str, mut bars: Vec<DailyBar>) -> Result<Self> {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let mut columns = vec![date_series(DATE_COLUMN, &dates)?];
        for column in PriceColumn::ALL {
            let series = if column == PriceColumn::Volume {
                Series::new(
                    column.name(),
                    bars.iter().map(|b| b.data.volume).collect::<Vec<u64>>(),
                )
            } else {
                Series::new(
                    column.name(),
                    bars.iter().map(|b| b.value(column)).collect::<Vec<f64>>(),
                )
            };
            columns.push(series);
        }

        Ok(Self {
            ticker: ticker.to_string(),
            df: DataFrame::new(columns)?,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Trading dates in order
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        dates_from_series(self.df.column(DATE_COLUMN)?)
    }

    /// Values of one column as `f64`
    pub fn column_values(&self, column: PriceColumn) -> Result<Vec<f64>> {
        f64_values(&self.df, column.name())
    }

    /// Rows of the history as bars
    pub fn bars(&self) -> Result<Vec<DailyBar>> {
        let dates = self.dates()?;
        let cols = PriceColumn::ALL
            .iter()
            .map(|c| self.column_values(*c))
            .collect::<Result<Vec<_>>>()?;

        Ok(dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailyBar {
                date,
                data: OhlcvData {
                    open: cols[0][i],
                    high: cols[1][i],
                    low: cols[2][i],
                    close: cols[3][i],
                    adj_close: cols[4][i],
                    volume: cols[5][i] as u64,
                },
            })
            .collect())
    }

    /// Rows with dates in `[start, end)`, as a new history
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let bars = self
            .bars()?
            .into_iter()
            .filter(|b| b.date >= start && b.date < end)
            .collect();
        Self::from_bars(&self.ticker, bars)
    }

    /// Project the history onto `Date` and one value column.
    ///
    /// The projection is a new frame; this history is not modified.
    pub fn select(&self, column: PriceColumn) -> Result<ColumnSeries> {
        let frame = self.df.select([DATE_COLUMN, column.name()])?;
        Ok(ColumnSeries {
            column,
            dates: dates_from_series(frame.column(DATE_COLUMN)?)?,
            values: f64_values(&frame, column.name())?,
        })
    }

    /// Write the history to a CSV file with a header row
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let mut df = self.df.clone();
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }
}

/// Build a polars `Date` column
pub(crate) fn date_series(name: &str, dates: &[NaiveDate]) -> Result<Series> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
        .collect();
    Ok(Series::new(name, days).cast(&DataType::Date)?)
}

/// Read a column as `f64`, rejecting missing values
fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df
        .column(name)
        .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;
    let cast = col.cast(&DataType::Float64)?;
    cast.f64()?
        .into_iter()
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| ForecastError::DataError(format!("Column '{}' has missing values", name)))
}

/// Read a date column stored either as polars dates or as `YYYY-MM-DD` strings
fn dates_from_series(series: &Series) -> Result<Vec<NaiveDate>> {
    match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|d| {
                    d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE))
                        .ok_or_else(|| {
                            ForecastError::DataError("Missing or invalid date".to_string())
                        })
                })
                .collect()
        }
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .map(|s| {
                let s = s.ok_or_else(|| ForecastError::DataError("Missing date".to_string()))?;
                let day = s.get(..10).unwrap_or(s);
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map_err(|e| ForecastError::DataError(format!("Invalid date '{}': {}", s, e)))
            })
            .collect(),
        other => Err(ForecastError::DataError(format!(
            "Unsupported date column type: {}",
            other
        ))),
    }
}
