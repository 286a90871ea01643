use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use stock_forecast::PriceColumn;
use stockcast::params::{MAX_FORECAST_PERIOD, MAX_ORDER, MAX_SEASONAL_PERIOD};
use stockcast::{DashboardError, DashboardParams, TICKERS};
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_defaults() {
    let params = DashboardParams::default();
    assert_eq!(params.ticker, TICKERS[0]);
    assert_eq!(params.start_date, day(2020, 1, 1));
    assert_eq!(params.end_date, day(2020, 12, 31));
    assert_eq!(params.column, PriceColumn::Open);
    assert_eq!((params.p, params.d, params.q), (2, 1, 2));
    assert_eq!(params.seasonal_period, 12);
    assert_eq!(params.forecast_period, 10);
}

#[test]
fn test_ticker_list() {
    assert_eq!(
        TICKERS.to_vec(),
        vec!["AAPL", "MSFT", "GOOGL", "TSLA", "NVDA", "ADBE", "PYPL", "INTC", "CMCSA", "NFLX", "PEP"]
    );
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let yaml = "ticker: MSFT\ncolumn: Adj Close\nforecast_period: 30\nstart_date: 2021-01-01\nend_date: 2021-06-30\n";
    let params = DashboardParams::from_yaml(yaml).unwrap();
    assert_eq!(params.ticker, "MSFT");
    assert_eq!(params.column, PriceColumn::AdjClose);
    assert_eq!(params.forecast_period, 30);
    assert_eq!(params.start_date, day(2021, 1, 1));
    assert_eq!(params.end_date, day(2021, 6, 30));
    assert_eq!(params.p, 2);
    assert_eq!(params.seasonal_period, 12);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ticker: NFLX").unwrap();
    writeln!(file, "p: 1").unwrap();
    writeln!(file, "seasonal_period: 0").unwrap();

    let params = DashboardParams::load(file.path()).unwrap();
    assert_eq!(params.ticker, "NFLX");
    assert_eq!(params.p, 1);
    assert_eq!(params.seasonal_period, 0);
    assert!(params.validate().is_ok());
}

#[test]
fn test_bad_yaml() {
    assert!(matches!(
        DashboardParams::from_yaml("tickr: AAPL"),
        Err(DashboardError::Config(_))
    ));
    assert!(DashboardParams::from_yaml("p: [1, 2]").is_err());
    assert!(matches!(
        DashboardParams::load("missing_params.yaml"),
        Err(DashboardError::Io(_))
    ));
}

#[rstest]
#[case(MAX_ORDER + 1, 1, 2, 12, 10)]
#[case(2, MAX_ORDER + 1, 2, 12, 10)]
#[case(2, 1, MAX_ORDER + 1, 12, 10)]
#[case(2, 1, 2, MAX_SEASONAL_PERIOD + 1, 10)]
#[case(2, 1, 2, 12, MAX_FORECAST_PERIOD + 1)]
fn test_out_of_range(
    #[case] p: usize,
    #[case] d: usize,
    #[case] q: usize,
    #[case] seasonal_period: usize,
    #[case] forecast_period: usize,
) {
    let params = DashboardParams {
        p,
        d,
        q,
        seasonal_period,
        forecast_period,
        ..DashboardParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(DashboardError::InvalidParameter(_))
    ));
}

#[test]
fn test_end_must_follow_start() {
    let params = DashboardParams {
        start_date: day(2020, 6, 1),
        end_date: day(2020, 6, 1),
        ..DashboardParams::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn test_upper_bounds_are_inclusive() {
    let params = DashboardParams {
        p: MAX_ORDER,
        d: 0,
        q: 0,
        seasonal_period: MAX_SEASONAL_PERIOD,
        forecast_period: MAX_FORECAST_PERIOD,
        ..DashboardParams::default()
    };
    assert!(params.validate().is_ok());
    assert_eq!(params.forecast_steps(), MAX_FORECAST_PERIOD + 1);
}
