use chrono::{Duration, NaiveDate};
use stock_forecast::data::PriceColumn;
use stock_forecast::forecast::{forecast_dates, Forecast, PREDICTED_COLUMN};
use stock_forecast::models::{Order, SarimaxModel, SeasonalOrder};
use stock_forecast::synthetic::{generate_history, SyntheticConfig};
use stock_forecast::DataLoader;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_dates_are_daily_from_end_date() {
    let end = day(2020, 12, 31);
    let dates = forecast_dates(end, 11);
    assert_eq!(dates.len(), 11);
    assert_eq!(dates[0], end);
    for pair in dates.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(1));
    }
    assert_eq!(dates[10], day(2021, 1, 10));
}

#[test]
fn test_horizon_plus_one_rows() {
    let start = day(2020, 1, 1);
    let end = day(2020, 12, 31);
    let horizon = 10;
    let history = generate_history("SYN", start, end, &SyntheticConfig::default()).unwrap();
    let series = history.select(PriceColumn::Open).unwrap();

    let fit = SarimaxModel::new(Order::new(2, 1, 2), SeasonalOrder::new(2, 1, 2, 12))
        .unwrap()
        .fit(&series.values)
        .unwrap();
    let forecast = Forecast::from_model(&fit, horizon + 1, end).unwrap();

    assert_eq!(forecast.len(), horizon + 1);
    assert_eq!(forecast.dates(), forecast_dates(end, horizon + 1));
    for row in forecast.rows() {
        assert!(row.lower <= row.predicted_mean && row.predicted_mean <= row.upper);
    }
}

#[test]
fn test_forecast_csv_export() {
    let fit = SarimaxModel::new(Order::new(1, 1, 0), SeasonalOrder::none())
        .unwrap()
        .fit(&(0..60).map(|t| 100.0 + (t as f64 * 0.7).sin()).collect::<Vec<_>>())
        .unwrap();
    let forecast = Forecast::from_model(&fit, 5, day(2021, 6, 1)).unwrap();

    let file = NamedTempFile::new().unwrap();
    forecast.to_csv(file.path()).unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(format!("Date,{},lower,upper", PREDICTED_COLUMN).as_str()));
    assert!(lines.next().unwrap().starts_with("2021-06-01,"));
    assert_eq!(text.lines().count(), 6);

    // The export is not a price table
    assert!(DataLoader::from_csv("X", file.path()).is_err());
}
