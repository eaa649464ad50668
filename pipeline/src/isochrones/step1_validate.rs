use crate::errors::PipelineError;
use crate::isochrones::IsochroneOptions;
use common::types::Crs;
use common::util::df::require_columns;
use log::debug;
use polars::frame::DataFrame;
use routing::provider::DirectionsProvider;
use routing::Config;
use std::path::PathBuf;
use vector_io::writer::resolve_crs;

pub(crate) struct ValidateStepOutput<'a> {
    pub(crate) provider: &'a dyn DirectionsProvider,
    pub(crate) options: &'a IsochroneOptions,
    pub(crate) geometry_column: &'a str,
    /// Target directory and reference system, only when routes get written
    pub(crate) output: Option<(PathBuf, Crs)>,
}

/// Everything that can be checked without a network call
pub(crate) fn validate<'a>(
    config: &'a Config,
    table: &DataFrame,
    options: &'a IsochroneOptions,
) -> Result<ValidateStepOutput<'a>, PipelineError> {
    let geometry_column = options.geometry_column.as_deref().unwrap_or("geometry");
    let (lon_column, lat_column) = &options.coords_columns;
    require_columns(table, &[geometry_column, options.label_column.as_str(), lon_column.as_str(), lat_column.as_str()])?;

    let output = match &options.routes_output {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(PipelineError::InvalidOutputDirectory(dir.clone()));
            }
            let crs = resolve_crs(options.crs.as_ref(), config.crs())?;
            debug!(target: "pipeline", "Writing {} files with {} to {}", options.driver, crs, dir.display());
            Some((dir.clone(), crs))
        }
        None => None,
    };

    let provider = config.client()?;

    Ok(ValidateStepOutput { provider, options, geometry_column, output })
}
