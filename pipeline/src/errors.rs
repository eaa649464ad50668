use common::util::df::ColumnError;
use polars::error::PolarsError;
use routing::{ConfigError, RoutingError};
use std::fmt;
use std::fmt::Display;
use std::path::PathBuf;
use vector_io::{DriverError, VectorError};
use visualization::MapError;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    ColumnNotFound(String),
    InvalidOutputDirectory(PathBuf),
    InvalidGeometry { row: usize, message: String },
    MissingValue { row: usize, column: String },
    InvalidLabel { row: usize, label: String },
    Config(#[from] ConfigError),
    Routing(#[from] RoutingError),
    Driver(#[from] DriverError),
    Vector(#[from] VectorError),
    Map(#[from] MapError),
    Polars(#[from] PolarsError),
}

impl From<ColumnError> for PipelineError {
    fn from(value: ColumnError) -> Self {
        match value {
            ColumnError::NotFound(name) => PipelineError::ColumnNotFound(name),
            ColumnError::Polars(err) => PipelineError::Polars(err),
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::ColumnNotFound(name) => write!(f, "{name} column not found in dataframe"),
            PipelineError::InvalidOutputDirectory(path) if path.to_string_lossy().contains('.') => write!(
                f,
                "{} is not a valid directory (hint: the path contains a '.' but should be a directory and not a file)",
                path.display()
            ),
            PipelineError::InvalidOutputDirectory(path) => write!(
                f,
                "{} is not a valid directory or does not exist",
                path.display()
            ),
            PipelineError::InvalidGeometry { row, message } => write!(f, "Invalid geometry in row {row}: {message}"),
            PipelineError::MissingValue { row, column } => write!(f, "Row {row} has no value in column {column}"),
            PipelineError::InvalidLabel { row, label } => {
                write!(f, "Label {label:?} in row {row} cannot be used as a file name")
            }
            PipelineError::Config(err) => write!(f, "{err}"),
            PipelineError::Routing(err) => write!(f, "{err}"),
            PipelineError::Driver(err) => write!(f, "{err}"),
            PipelineError::Vector(err) => write!(f, "{err}"),
            PipelineError::Map(err) => write!(f, "{err}"),
            PipelineError::Polars(err) => write!(f, "{err}"),
        }
    }
}
