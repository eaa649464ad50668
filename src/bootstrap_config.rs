use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use common::types::{Crs, Location, TravelMode};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct BootstrapConfig {
    /// YAML file with defaults for crs, region, mode, driver and plotting
    #[clap(short('c'), long("config"), env("GEOROUTES_CONFIG"))]
    pub config_file: Option<PathBuf>,
    #[clap(short('l'), long("log-level"), env("GEOROUTES_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
    #[clap(long("api-key"), env("GOOGLE_MAPS_API_KEY"), hide_env_values = true)]
    pub api_key: Option<String>,
    /// Reference system for written files, e.g. epsg:27700
    #[clap(long)]
    pub crs: Option<Crs>,
    #[command(subcommand)]
    pub command: Command,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Print the raw directions response between two locations as JSON
    Directions {
        /// Address or "lat,lng"
        #[clap(long)]
        origin: Location,
        #[clap(long)]
        destination: Location,
        #[clap(long, default_value = "driving")]
        mode: TravelMode,
        #[clap(long)]
        alternatives: bool,
        #[command(flatten)]
        times: TimeArgs,
    },
    /// Route from every point of a vector file to one destination
    Generate {
        /// Point file (.shp, .gpkg or .geojson)
        #[clap(long)]
        origins: PathBuf,
        #[clap(long)]
        destination: Location,
        /// Output file, the format follows its extension unless --driver is given
        #[clap(short, long)]
        output: PathBuf,
        #[clap(long)]
        mode: Option<TravelMode>,
        #[clap(long)]
        driver: Option<String>,
        /// Also draw the routes into this HTML file
        #[clap(long)]
        map: Option<PathBuf>,
        #[command(flatten)]
        times: TimeArgs,
    },
    /// Route from the boundary of every isochrone in a vector file to its center
    Isochrones {
        /// Isochrone polygons with label and center columns
        #[clap(long)]
        input: PathBuf,
        #[clap(long)]
        geometry_column: Option<String>,
        #[clap(long, default_value = "school")]
        label_column: String,
        #[clap(long, default_value = "CENTER_LON")]
        lon_column: String,
        #[clap(long, default_value = "CENTER_LAT")]
        lat_column: String,
        /// Directory for one routes file per isochrone
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
        #[clap(long)]
        mode: Option<TravelMode>,
        #[clap(long)]
        driver: Option<String>,
        #[clap(long, default_value = "routes.html")]
        map: PathBuf,
        /// Draw a map per isochrone
        #[clap(long)]
        plot: bool,
        /// Keep going when an isochrone fails
        #[clap(long)]
        continue_on_error: bool,
        #[command(flatten)]
        times: TimeArgs,
    },
    /// Write a single point file
    Point {
        #[clap(long, allow_hyphen_values = true)]
        lat: f64,
        #[clap(long, allow_hyphen_values = true)]
        lng: f64,
        #[clap(short, long, default_value = "school.shp")]
        output: PathBuf,
    },
    /// Write one labelled point per row of a CSV file
    Points {
        #[clap(long)]
        input: PathBuf,
        #[clap(long)]
        id_column: String,
        #[clap(long, default_value = "Longitude")]
        lon_column: String,
        #[clap(long, default_value = "Latitude")]
        lat_column: String,
        #[clap(short, long, default_value = "schools.shp")]
        output: PathBuf,
    },
    /// Move shapefiles and their sidecar files to another directory
    MoveShapefiles {
        source: PathBuf,
        destination: PathBuf,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct TimeArgs {
    /// RFC 3339 timestamp
    #[clap(long)]
    pub departure_time: Option<DateTime<Utc>>,
    #[clap(long)]
    pub arrival_time: Option<DateTime<Utc>>,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        BootstrapConfig::command().debug_assert();
    }

    #[test]
    fn test_isochrones_arguments() {
        let config = BootstrapConfig::try_parse_from([
            "georoutes", "--crs", "epsg:27700", "isochrones", "--input", "iso.gpkg", "--plot",
            "--departure-time", "2024-09-02T08:00:00Z",
        ]).unwrap();

        assert_eq!(Some(Crs::new("epsg:27700").unwrap()), config.crs);
        match config.command {
            Command::Isochrones { input, label_column, plot, times, .. } => {
                assert_eq!(PathBuf::from("iso.gpkg"), input);
                assert_eq!("school", label_column);
                assert!(plot);
                assert!(times.departure_time.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_point_accepts_negative_longitude() {
        let config = BootstrapConfig::try_parse_from([
            "georoutes", "point", "--lat", "51.5", "--lng", "-0.1",
        ]).unwrap();

        assert!(matches!(config.command, Command::Point { lng, .. } if lng == -0.1));
    }
}
