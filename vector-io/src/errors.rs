use crate::driver::{Driver, DriverError};
use common::types::Crs;
use std::fmt;
use std::fmt::Display;
use std::io;

pub type VectorResult<O> = Result<O, VectorError>;

#[derive(thiserror::Error, Debug)]
pub enum VectorError {
    MissingPath,
    MissingCrs,
    Driver(#[from] DriverError),
    Io(#[from] io::Error),
    Json(#[from] serde_json::Error),
    GeoJson(#[from] geojson::Error),
    Shapefile(#[from] shapefile::Error),
    Sqlite(#[from] rusqlite::Error),
    Polars(#[from] polars::error::PolarsError),
    Wkb(String),
    InvalidField(String),
    InvalidLayer(String),
    UnsupportedCrs { driver: Driver, crs: Crs },
    UnsupportedGeometry(String),
    SchemaMismatch { index: usize },
    UnexpectedGeometry { index: usize, expected: &'static str },
    DegenerateLine { index: usize },
}

impl Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::MissingPath => write!(f, "A file name is required"),
            VectorError::MissingCrs => write!(
                f,
                "No coordinate reference system given and none configured"
            ),
            VectorError::Driver(err) => write!(f, "{err}"),
            VectorError::Io(err) => write!(f, "IO error: {err}"),
            VectorError::Json(err) => write!(f, "JSON error: {err}"),
            VectorError::GeoJson(err) => write!(f, "GeoJSON error: {err}"),
            VectorError::Shapefile(err) => write!(f, "Shapefile error: {err}"),
            VectorError::Sqlite(err) => write!(f, "GeoPackage error: {err}"),
            VectorError::Polars(err) => write!(f, "{err}"),
            VectorError::Wkb(msg) => write!(f, "Invalid geometry blob: {msg}"),
            VectorError::InvalidField(msg) => write!(f, "Invalid attribute field: {msg}"),
            VectorError::InvalidLayer(msg) => write!(f, "Invalid layer: {msg}"),
            VectorError::UnsupportedCrs { driver, crs } => write!(
                f,
                "{driver} output needs an EPSG coded reference system, got '{crs}'"
            ),
            VectorError::UnsupportedGeometry(kind) => write!(f, "Unsupported geometry: {kind}"),
            VectorError::SchemaMismatch { index } => write!(
                f,
                "Feature {index} does not match the layer schema"
            ),
            VectorError::UnexpectedGeometry { index, expected } => write!(
                f,
                "Feature {index} is not a {expected}"
            ),
            VectorError::DegenerateLine { index } => write!(
                f,
                "Feature {index} is a line with fewer than two vertices"
            ),
        }
    }
}
