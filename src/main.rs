pub mod bootstrap_config;
mod commands;
mod config;

use bootstrap_config::BootstrapConfig;
use common::util::logging;
use log::error;
use polars::error::PolarsError;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "main", "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), GeoroutesError> {
    let bootstrap_config = BootstrapConfig::read();

    // A second logger cannot be installed, keep going with the first one
    if let Err(err) = logging::initialize_logging(bootstrap_config.log_level.clone().into()) {
        eprintln!("Could not initialize logging: {err}");
    }

    let settings = config::load_settings(&bootstrap_config)?;
    commands::execute(&bootstrap_config, &settings)
}

#[derive(thiserror::Error, Debug)]
pub enum GeoroutesError {
    Config(#[from] config::ConfigError),
    Client(#[from] routing::ConfigError),
    Routing(#[from] routing::RoutingError),
    Driver(#[from] vector_io::DriverError),
    Vector(#[from] vector_io::VectorError),
    Pipeline(#[from] pipeline::PipelineError),
    Polars(#[from] PolarsError),
    Json(#[from] serde_json::Error),
    IO(#[from] std::io::Error),
    BatchIncomplete(usize),
}

impl Display for GeoroutesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let failed;
        let err: &dyn Display = match self {
            GeoroutesError::Config(err) => err,
            GeoroutesError::Client(err) => err,
            GeoroutesError::Routing(err) => err,
            GeoroutesError::Driver(err) => err,
            GeoroutesError::Vector(err) => err,
            GeoroutesError::Pipeline(err) => err,
            GeoroutesError::Polars(err) => err,
            GeoroutesError::Json(err) => err,
            GeoroutesError::IO(err) => err,
            GeoroutesError::BatchIncomplete(count) => {
                failed = format!("{count} isochrones could not be routed");
                &failed
            }
        };
        let prefix = match self {
            GeoroutesError::Config(_) => "Reading config file",
            GeoroutesError::Client(_) => "Starting directions client",
            GeoroutesError::Routing(_) => "Fetching directions",
            GeoroutesError::Driver(_) => "Choosing file format",
            GeoroutesError::Vector(_) => "Reading or writing vector data",
            GeoroutesError::Pipeline(_) => "Generating routes",
            GeoroutesError::Polars(_) => "Reading table",
            GeoroutesError::Json(_) => "Printing response",
            GeoroutesError::IO(_) => "Error during IO",
            GeoroutesError::BatchIncomplete(_) => "Routing isochrones",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
