use crate::errors::VectorResult;
use crate::feature::{PropertyValue, VectorRecord};
use crate::reader::read_features;
use log::debug;
use polars::prelude::{Column, DataFrame};
use std::path::Path;
use wkt::ToWkt;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Str,
}

impl ColumnKind {
    fn of(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Null => None,
            PropertyValue::Bool(_) => Some(ColumnKind::Bool),
            PropertyValue::Int(_) => Some(ColumnKind::Int),
            PropertyValue::Float(_) => Some(ColumnKind::Float),
            PropertyValue::Str(_) => Some(ColumnKind::Str),
        }
    }

    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnKind::Int, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Int) => ColumnKind::Float,
            _ => ColumnKind::Str,
        }
    }
}

/// Load a vector file as a table. Every attribute becomes a column (integer, float, boolean
/// or text, whichever holds all of its values) and the geometry is stored as WKT in
/// `geometry_column`.
pub fn read_table(path: &Path, geometry_column: &str) -> VectorResult<DataFrame> {
    let layer = read_features(path)?;
    debug!(target: "vector-io", "Loaded {} records from {} (crs {:?})", layer.records.len(), path.display(), layer.crs);

    let mut names: Vec<&str> = vec![];
    for record in &layer.records {
        for (name, _) in &record.properties {
            if name != geometry_column && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len() + 1);
    for name in names {
        columns.push(property_column(name, &layer.records));
    }

    let geometries: Vec<Option<String>> = layer
        .records
        .iter()
        .map(|record| record.geometry.as_ref().map(|g| g.to_wkt().to_string()))
        .collect();
    columns.push(Column::new(geometry_column.into(), geometries));

    Ok(DataFrame::new(columns)?)
}

fn property_column(name: &str, records: &[VectorRecord]) -> Column {
    let values: Vec<Option<&PropertyValue>> = records
        .iter()
        .map(|record| record.property(name).filter(|v| **v != PropertyValue::Null))
        .collect();

    let kind = values
        .iter()
        .flatten()
        .filter_map(|value| ColumnKind::of(value))
        .reduce(ColumnKind::widen)
        .unwrap_or(ColumnKind::Str);

    match kind {
        ColumnKind::Int => {
            let ints: Vec<Option<i64>> = values
                .iter()
                .map(|value| match value {
                    Some(PropertyValue::Int(i)) => Some(*i),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), ints)
        }
        ColumnKind::Float => {
            let floats: Vec<Option<f64>> = values
                .iter()
                .map(|value| match value {
                    Some(PropertyValue::Int(i)) => Some(*i as f64),
                    Some(PropertyValue::Float(f)) => Some(*f),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), floats)
        }
        ColumnKind::Bool => {
            let bools: Vec<Option<bool>> = values
                .iter()
                .map(|value| match value {
                    Some(PropertyValue::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), bools)
        }
        ColumnKind::Str => {
            let strings: Vec<Option<String>> = values
                .iter()
                .map(|value| match value {
                    Some(PropertyValue::Str(s)) => Some(s.clone()),
                    Some(PropertyValue::Int(i)) => Some(i.to_string()),
                    Some(PropertyValue::Float(f)) => Some(f.to_string()),
                    Some(PropertyValue::Bool(b)) => Some(b.to_string()),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), strings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::datatypes::DataType;
    use std::fs;
    use wkt::TryFromWkt;

    #[test]
    fn test_columns_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("isochrones.geojson");
        fs::write(&path, r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "properties": {"school": "North", "CENTER_LON": -0.1, "CENTER_LAT": 51, "pupils": 300},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature",
             "properties": {"school": 12, "CENTER_LON": -0.2, "CENTER_LAT": 51.5, "pupils": null},
             "geometry": null}
        ]}"#).unwrap();

        let frame = read_table(&path, "geometry").unwrap();

        assert_eq!((2, 5), frame.shape());
        let school = frame.column("school").unwrap().as_materialized_series();
        assert_eq!(&DataType::String, school.dtype());
        assert_eq!(&DataType::Float64, frame.column("CENTER_LAT").unwrap().dtype());
        assert_eq!(&DataType::Int64, frame.column("pupils").unwrap().dtype());

        let geometry = frame.column("geometry").unwrap().as_materialized_series().str().unwrap();
        let polygon = geo::Polygon::<f64>::try_from_wkt_str(geometry.get(0).unwrap()).unwrap();
        assert_eq!(4, polygon.exterior().0.len());
        assert_eq!(None, geometry.get(1));
        assert_eq!(Some("12"), school.str().unwrap().get(1));
    }
}
