use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use stock_forecast::decomposition::{seasonal_decompose, DECOMPOSITION_PERIOD};
use stock_forecast::forecast::Forecast;
use stock_forecast::models::{Order, SarimaxModel, SeasonalOrder};
use stock_forecast::stationarity::{adf_test, SIGNIFICANCE_LEVEL};
use stock_forecast::synthetic::{generate_history, SyntheticConfig};
use stock_forecast::{DataLoader, PriceColumn};
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_full_forecast_workflow() {
    let start = day(2020, 1, 1);
    let end = day(2020, 12, 31);

    // 1. Generate and persist a history, then load it back
    let generated = generate_history(
        "SYN",
        start,
        end,
        &SyntheticConfig {
            seed: 7,
            ..SyntheticConfig::default()
        },
    )
    .unwrap();
    let file = NamedTempFile::new().unwrap();
    generated.to_csv(file.path()).unwrap();
    let history = DataLoader::from_csv("SYN", file.path()).unwrap();
    assert_eq!(history.len(), generated.len());
    let loaded_close = history.column_values(PriceColumn::Close).unwrap();
    for (a, b) in loaded_close.iter().zip(generated.column_values(PriceColumn::Close).unwrap()) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-9);
    }
    let snapshot = history.dataframe().clone();

    // 2. Select the column to model
    let series = history.select(PriceColumn::Close).unwrap();
    assert_eq!(series.len(), history.len());

    // 3. Stationarity
    let adf = adf_test(&series.values).unwrap();
    assert_eq!(adf.is_stationary(), adf.p_value < SIGNIFICANCE_LEVEL);

    // 4. Decomposition
    let decomposition = seasonal_decompose(&series.values, DECOMPOSITION_PERIOD).unwrap();
    assert_eq!(decomposition.trend.len(), series.len());
    assert_eq!(decomposition.seasonal.len(), series.len());
    assert_eq!(decomposition.residual.len(), series.len());

    // 5. Model and forecast
    let fit = SarimaxModel::new(Order::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12))
        .unwrap()
        .fit(&series.values)
        .unwrap();
    let forecast = Forecast::from_model(&fit, 11, end).unwrap();
    assert_eq!(forecast.len(), 11);
    assert_eq!(forecast.rows()[0].date, end);

    // The raw history is unchanged by the whole pipeline
    assert!(history.dataframe().frame_equal(&snapshot));
}
