//! Batch routing from a table of isochrones: every row holds a polygon whose boundary
//! vertices are the origins and a pair of coordinate columns naming the shared destination.
//!
//! The batch runs in three steps:
//! 1. validate the table, output directory, reference system and client before any request
//! 2. turn every row into origins, a destination and a label
//! 3. route each row, write its vector file and optionally draw its map

mod step1_validate;
mod step2_extract;
mod step3_route;

use crate::errors::PipelineError;
use common::types::Crs;
use common::util::logging;
use log::{error, info, warn};
use polars::frame::DataFrame;
use routing::provider::RouteOptions;
use routing::Config;
use std::path::PathBuf;
use vector_io::Driver;

pub use step2_extract::IsochroneRow;

/// What happens when one row of a batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing row
    #[default]
    FailFast,
    /// Record the failure and carry on with the next row
    Continue,
}

#[derive(Debug, Clone)]
pub struct IsochroneOptions {
    /// Destination columns, longitude first
    pub coords_columns: (String, String),
    /// Column with the WKT polygons, `geometry` if not set
    pub geometry_column: Option<String>,
    pub label_column: String,
    pub route: RouteOptions,
    pub driver: Driver,
    /// Overrides the configured reference system
    pub crs: Option<Crs>,
    /// Directory for one vector file per row. Nothing is written without it.
    pub routes_output: Option<PathBuf>,
    pub map_output: PathBuf,
    pub plot_routes: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for IsochroneOptions {
    fn default() -> Self {
        Self {
            coords_columns: ("CENTER_LON".to_string(), "CENTER_LAT".to_string()),
            geometry_column: None,
            label_column: "school".to_string(),
            route: RouteOptions::default(),
            driver: Driver::Shapefile,
            crs: None,
            routes_output: None,
            map_output: PathBuf::from("routes.html"),
            plot_routes: false,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

/// Result of one row
#[derive(Debug)]
pub struct RowOutcome {
    pub row: usize,
    pub label: String,
    /// Routes that made it into the output, origins without a route are not counted
    pub routes: usize,
    pub routes_file: Option<PathBuf>,
    pub map_file: Option<PathBuf>,
    pub error: Option<PipelineError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows: Vec<RowOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|row| row.error.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &RowOutcome> {
        self.rows.iter().filter(|row| row.error.is_some())
    }
}

pub fn generate_from_isochrones(
    config: &Config,
    table: &DataFrame,
    options: &IsochroneOptions,
) -> Result<BatchReport, PipelineError> {
    info!(target: "pipeline", "Generating routes for {} isochrones", table.height());

    let validated = step1_validate::validate(config, table, options)?;
    let rows = step2_extract::extract_rows(table, &validated)?;

    let mut report = BatchReport::default();
    let total = rows.len();

    logging::run_with_pb("pipeline", "Routing isochrones", total as u64, |pb| {
        for row in rows {
            let outcome = step3_route::route_row(&validated, &row, total);
            pb.inc(1);

            match outcome {
                Ok(outcome) => report.rows.push(outcome),
                Err(err) if options.failure_policy == FailurePolicy::FailFast => {
                    error!(target: "pipeline", "Row {} ({}) failed: {}", row.index, row.label, err);
                    return Err(err);
                }
                Err(err) => {
                    warn!(target: "pipeline", "Row {} ({}) failed, continuing: {}", row.index, row.label, err);
                    report.rows.push(RowOutcome {
                        row: row.index,
                        label: row.label,
                        routes: 0,
                        routes_file: None,
                        map_file: None,
                        error: Some(err),
                    });
                }
            }
        }
        Ok(())
    })?;

    info!(target: "pipeline", "{} of {} isochrones routed", report.succeeded(), total);
    Ok(report)
}
