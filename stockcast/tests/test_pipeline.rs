use chrono::{Duration, NaiveDate};
use stock_forecast::synthetic::{generate_history, SyntheticConfig};
use stock_forecast::stationarity::SIGNIFICANCE_LEVEL;
use stock_forecast::{PriceColumn, PriceHistory};
use stockcast::{Dashboard, DashboardError, DashboardParams, HistorySource};
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn history(params: &DashboardParams) -> PriceHistory {
    generate_history(
        &params.ticker,
        params.start_date,
        params.end_date,
        &SyntheticConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_default_run() {
    let params = DashboardParams::default();
    let raw = history(&params);
    let before = raw.dataframe().clone();

    let report = Dashboard::new(params.clone()).unwrap().run(raw).unwrap();

    // Raw data keeps every column, the selection only one
    assert!(report.history.dataframe().frame_equal(&before));
    assert_eq!(report.selected.column, PriceColumn::Open);
    assert_eq!(report.selected.len(), report.history.len());

    assert_eq!(report.is_stationary(), report.adf.p_value < SIGNIFICANCE_LEVEL);
    assert_eq!(report.decomposition.period, 12);
    assert_eq!(report.decomposition.trend.len(), report.selected.len());

    assert_eq!(report.summary.model, "SARIMAX(2, 1, 2)x(2, 1, 2, 12)");
    assert_eq!(report.summary.dep_variable, "Open");

    assert_eq!(report.forecast.len(), params.forecast_period + 1);
    let dates = report.forecast.dates();
    assert_eq!(dates[0], params.end_date);
    for pair in dates.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(1));
    }
}

#[test]
fn test_zero_forecast_period_gives_one_row() {
    let params = DashboardParams {
        forecast_period: 0,
        seasonal_period: 0,
        ..DashboardParams::default()
    };
    let report = Dashboard::new(params.clone()).unwrap().run(history(&params)).unwrap();
    assert_eq!(report.forecast.len(), 1);
    assert_eq!(report.summary.model, "SARIMAX(2, 1, 2)");
}

#[test]
fn test_empty_history_is_an_error() {
    let params = DashboardParams {
        ticker: String::new(),
        ..DashboardParams::default()
    };
    let result = Dashboard::new(params)
        .unwrap()
        .run(PriceHistory::empty("").unwrap());
    assert!(matches!(result, Err(DashboardError::EmptyData { .. })));
}

#[test]
fn test_short_history_is_an_error() {
    let params = DashboardParams {
        start_date: day(2020, 1, 1),
        end_date: day(2020, 1, 20),
        ..DashboardParams::default()
    };
    let result = Dashboard::new(params.clone()).unwrap().run(history(&params));
    assert!(matches!(result, Err(DashboardError::Forecast(_))));
}

#[test]
fn test_invalid_params_rejected_up_front() {
    let params = DashboardParams {
        d: 9,
        ..DashboardParams::default()
    };
    assert!(Dashboard::new(params).is_err());
}

#[tokio::test]
async fn test_synthetic_source() {
    let dashboard = Dashboard::new(DashboardParams {
        column: PriceColumn::Close,
        ..DashboardParams::default()
    })
    .unwrap();
    let report = dashboard
        .load_and_run(&HistorySource::Synthetic(3))
        .await
        .unwrap();
    assert_eq!(report.summary.dep_variable, "Close");
    assert_eq!(report.forecast.len(), 11);
}

#[tokio::test]
async fn test_csv_source_is_clipped_to_range() {
    let wide = generate_history(
        "CSV",
        day(2019, 6, 1),
        day(2021, 6, 1),
        &SyntheticConfig::default(),
    )
    .unwrap();
    let file = NamedTempFile::new().unwrap();
    wide.to_csv(file.path()).unwrap();

    let params = DashboardParams::default();
    let source = HistorySource::Csv(file.path().to_path_buf());
    let loaded = source.load(&params).await.unwrap();
    let dates = loaded.dates().unwrap();
    assert!(dates.iter().all(|d| *d >= params.start_date && *d < params.end_date));
    assert!(!loaded.is_empty());

    let report = Dashboard::new(params).unwrap().load_and_run(&source).await.unwrap();
    assert_eq!(report.history.len(), loaded.len());
}
