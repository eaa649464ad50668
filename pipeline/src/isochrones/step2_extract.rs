use crate::errors::PipelineError;
use crate::isochrones::step1_validate::ValidateStepOutput;
use common::types::Coordinate;
use common::util::df::{f64_column, string_column};
use geo::{Geometry, LineString, Polygon};
use log::warn;
use polars::frame::DataFrame;
use std::collections::HashSet;
use wkt::TryFromWkt;

/// One isochrone turned into routing input
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRow {
    pub index: usize,
    pub label: String,
    pub origins: Vec<Coordinate>,
    pub destination: Coordinate,
}

pub(crate) fn extract_rows(
    table: &DataFrame,
    validated: &ValidateStepOutput,
) -> Result<Vec<IsochroneRow>, PipelineError> {
    let (lon_column, lat_column) = &validated.options.coords_columns;
    let label_column = &validated.options.label_column;

    let geometries = string_column(table, validated.geometry_column)?;
    let labels = string_column(table, label_column)?;
    let lons = f64_column(table, lon_column)?;
    let lats = f64_column(table, lat_column)?;

    let missing = |row: usize, column: &str| PipelineError::MissingValue { row, column: column.to_string() };

    let mut rows = Vec::with_capacity(table.height());
    let mut seen = HashSet::new();
    for index in 0..table.height() {
        let wkt = geometries[index].as_deref().ok_or_else(|| missing(index, validated.geometry_column))?;
        let label = labels[index].clone().ok_or_else(|| missing(index, label_column))?;
        let lng = lons[index].ok_or_else(|| missing(index, lon_column))?;
        let lat = lats[index].ok_or_else(|| missing(index, lat_column))?;

        check_label(index, &label)?;
        if !seen.insert(label.clone()) {
            warn!(target: "pipeline", "Label {} appears more than once, row {} replaces its files", label, index);
        }

        rows.push(IsochroneRow {
            index,
            label,
            origins: boundary_origins(index, wkt)?,
            destination: Coordinate::new(lat, lng),
        });
    }

    Ok(rows)
}

/// Labels become file names inside the output directory
fn check_label(row: usize, label: &str) -> Result<(), PipelineError> {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || label.contains(['/', '\\']) {
        return Err(PipelineError::InvalidLabel { row, label: label.to_string() });
    }
    Ok(())
}

/// Exterior ring vertices of the polygon (or of every polygon of a multi polygon), without
/// the closing vertex that repeats the first one
pub(crate) fn boundary_origins(row: usize, wkt: &str) -> Result<Vec<Coordinate>, PipelineError> {
    let invalid = |message: String| PipelineError::InvalidGeometry { row, message };

    let geometry = Geometry::<f64>::try_from_wkt_str(wkt).map_err(|e| invalid(e.to_string()))?;
    let polygons: Vec<Polygon<f64>> = match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(multi) => multi.0,
        _ => return Err(invalid("expected a POLYGON or MULTIPOLYGON".to_string())),
    };

    Ok(polygons.iter().flat_map(|polygon| open_ring(polygon.exterior())).collect())
}

fn open_ring(ring: &LineString<f64>) -> Vec<Coordinate> {
    let mut coords = ring.0.clone();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords.into_iter().map(Coordinate::from_xy).collect()
}
