//! Point files marking destinations, e.g. the schools the isochrones belong to

use crate::errors::PipelineError;
use common::types::{Coordinate, Crs};
use common::util::df::{f64_column, string_column};
use polars::frame::DataFrame;
use routing::Config;
use std::path::Path;
use vector_io::writer::{resolve_crs, write_point, write_points};

/// Write a file with a single point (id 1)
pub fn create_point_file(
    config: &Config,
    coordinate: Coordinate,
    output: &Path,
    crs: Option<&Crs>,
) -> Result<(), PipelineError> {
    let crs = resolve_crs(crs, config.crs())?;
    write_point(output, coordinate, &crs)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PointColumns<'a> {
    pub id: &'a str,
    pub lon: &'a str,
    pub lat: &'a str,
}

impl<'a> PointColumns<'a> {
    pub fn new(id: &'a str) -> Self {
        Self { id, lon: "Longitude", lat: "Latitude" }
    }
}

/// One point per table row, labelled with the row's value in `columns.id`. Returns the
/// number of points written.
pub fn create_points_file(
    config: &Config,
    table: &DataFrame,
    columns: &PointColumns,
    output: &Path,
    crs: Option<&Crs>,
) -> Result<usize, PipelineError> {
    let crs = resolve_crs(crs, config.crs())?;

    let ids = string_column(table, columns.id)?;
    let lons = f64_column(table, columns.lon)?;
    let lats = f64_column(table, columns.lat)?;

    let missing = |row: usize, column: &str| PipelineError::MissingValue { row, column: column.to_string() };

    let points = (0..table.height())
        .map(|row| {
            let id = ids[row].clone().ok_or_else(|| missing(row, columns.id))?;
            let lng = lons[row].ok_or_else(|| missing(row, columns.lon))?;
            let lat = lats[row].ok_or_else(|| missing(row, columns.lat))?;
            Ok((id, Coordinate::new(lat, lng)))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(write_points(output, &points, &crs)?)
}
