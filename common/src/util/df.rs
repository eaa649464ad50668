use polars::datatypes::{AnyValue, DataType};
use polars::error::PolarsError;
use polars::frame::DataFrame;
use std::fmt;
use std::fmt::Display;

/// Names from `required` that `frame` does not have, in the order they were asked for
pub fn missing_columns<'a>(frame: &DataFrame, required: &[&'a str]) -> Vec<&'a str> {
    let present = frame.get_column_names();
    required
        .iter()
        .filter(|name| !present.iter().any(|col| col.as_str() == **name))
        .copied()
        .collect()
}

/// Fail with the first missing column
pub fn require_columns(frame: &DataFrame, required: &[&str]) -> Result<(), ColumnError> {
    match missing_columns(frame, required).first() {
        Some(missing) => Err(ColumnError::NotFound(missing.to_string())),
        None => Ok(()),
    }
}

/// All values of a column as floats, casting integer and string columns on the way
pub fn f64_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ColumnError> {
    let column = frame
        .column(name)
        .map_err(|_| ColumnError::NotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// All values of a column rendered as text. Numbers are formatted without quotes,
/// nulls stay `None`.
pub fn string_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ColumnError> {
    let column = frame
        .column(name)
        .map_err(|_| ColumnError::NotFound(name.to_string()))?;
    let series = column.as_materialized_series();
    let values = series
        .iter()
        .map(|value| match value {
            AnyValue::Null => None,
            AnyValue::String(s) => Some(s.to_string()),
            AnyValue::StringOwned(s) => Some(s.to_string()),
            other => Some(other.to_string()),
        })
        .collect();
    Ok(values)
}

#[derive(thiserror::Error, Debug)]
pub enum ColumnError {
    NotFound(String),
    Polars(#[from] PolarsError),
}

impl Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::NotFound(name) => write!(f, "{name} column not found in dataframe"),
            ColumnError::Polars(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame() -> DataFrame {
        df![
            "school" => ["North", "South"],
            "CENTER_LON" => [-0.1f64, -0.2],
            "CENTER_LAT" => [51i64, 52],
        ].unwrap()
    }

    #[test]
    fn test_missing_columns() {
        let frame = frame();
        assert!(missing_columns(&frame, &["school", "CENTER_LON"]).is_empty());
        assert_eq!(vec!["geometry", "x"], missing_columns(&frame, &["geometry", "school", "x"]));
        assert!(matches!(
            require_columns(&frame, &["school", "geometry"]),
            Err(ColumnError::NotFound(name)) if name == "geometry"
        ));
    }

    #[test]
    fn test_typed_columns() {
        let frame = frame();
        assert_eq!(vec![Some(51.0), Some(52.0)], f64_column(&frame, "CENTER_LAT").unwrap());
        assert_eq!(
            vec![Some("North".to_string()), Some("South".to_string())],
            string_column(&frame, "school").unwrap()
        );
        assert_eq!(vec![Some("51".to_string()), Some("52".to_string())], string_column(&frame, "CENTER_LAT").unwrap());
    }
}
