use series_math::MathError;
use stock_forecast::error::ForecastError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    match ForecastError::from(io_error) {
        ForecastError::IoError(_) => {}
        other => panic!("Expected IoError variant, got {:?}", other),
    }

    let math_error = MathError::Singular("zero pivot".to_string());
    match ForecastError::from(math_error) {
        ForecastError::MathError(MathError::Singular(msg)) => assert_eq!(msg, "zero pivot"),
        other => panic!("Expected MathError variant, got {:?}", other),
    }

    let polars_error = polars::prelude::PolarsError::ColumnNotFound("Open".into());
    match ForecastError::from(polars_error) {
        ForecastError::PolarsError(msg) => assert!(msg.contains("Open")),
        other => panic!("Expected PolarsError variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("p must be between 0 and 5".to_string());
    assert!(error.to_string().contains("p must be between 0 and 5"));

    let error = ForecastError::InsufficientData { needed: 24, got: 10 };
    assert_eq!(
        error.to_string(),
        "Insufficient data: need at least 24 observations, got 10"
    );

    let error = ForecastError::from(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
    let text = error.to_string();
    assert!(text.contains("IO error"));
    assert!(text.contains("permission denied"));
}

#[test]
fn test_question_mark_propagation() {
    fn parse(s: &str) -> stock_forecast::error::Result<stock_forecast::PriceColumn> {
        let column = s.parse()?;
        Ok(column)
    }

    assert!(parse("Close").is_ok());
    assert!(matches!(parse("Bid"), Err(ForecastError::InvalidParameter(_))));
}
