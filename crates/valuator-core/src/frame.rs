//! Tabular export of a measures series.

use polars::prelude::*;

use crate::{
    error::{Result, ValuatorError},
    measures::Measures,
    wire::{MEASURES_FIELDS, YOY_FIELDS},
};

/// Builds a [`DataFrame`] with one row per period.
///
/// Columns are `ticker`, `filed_on` (as a date), every ratio under its
/// published name, then every year-over-year dimension. Year-over-year cells
/// of the first period are null.
///
/// # Errors
/// Returns [`ValuatorError::Other`] if polars rejects the frame.
pub fn measures_frame(series: &[Measures]) -> Result<DataFrame> {
    let tickers: Vec<String> = series.iter().map(|m| m.filing().ticker.to_string()).collect();
    let dates: Vec<String> = series
        .iter()
        .map(|m| m.filing().filed_on.format("%Y-%m-%d").to_string())
        .collect();

    let mut columns = vec![
        Column::new("ticker".into(), tickers),
        Column::new("filed_on".into(), dates),
    ];
    for field in MEASURES_FIELDS {
        let values: Vec<f64> = series.iter().map(field.get).collect();
        columns.push(Column::new(field.key.into(), values));
    }
    for field in YOY_FIELDS {
        let values: Vec<Option<f64>> = series.iter().map(|m| m.yoy().map(field.get)).collect();
        columns.push(Column::new(field.key.into(), values));
    }

    let df = DataFrame::new(columns).map_err(|e| ValuatorError::Other(e.to_string()))?;

    df.lazy()
        .with_column(col("filed_on").cast(DataType::Date))
        .collect()
        .map_err(|e| ValuatorError::Other(e.to_string()))
}
