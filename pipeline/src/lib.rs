pub mod errors;
pub mod isochrones;
pub mod markers;
pub mod points_file;

#[cfg(test)]
mod tests;

pub use errors::PipelineError;
pub use isochrones::{generate_from_isochrones, BatchReport, FailurePolicy, IsochroneOptions, RowOutcome};
pub use points_file::{generate_from_points, PointsOptions};
