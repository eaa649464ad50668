use crate::bootstrap_config::{BootstrapConfig, Command, TimeArgs};
use crate::config::Settings;
use crate::GeoroutesError;
use common::types::{Coordinate, TravelMode};
use log::{info, warn};
use pipeline::markers::{create_point_file, create_points_file, PointColumns};
use pipeline::{generate_from_isochrones, generate_from_points, FailurePolicy, IsochroneOptions, PointsOptions};
use polars::prelude::{CsvReadOptions, SerReader};
use routing::fetch::get_directions;
use routing::provider::{DirectionsRequest, RouteOptions};
use routing::Config;
use std::path::Path;
use vector_io::files::move_shapefiles;
use vector_io::table::read_table;
use vector_io::Driver;

pub(crate) fn execute(bootstrap_config: &BootstrapConfig, settings: &Settings) -> Result<(), GeoroutesError> {
    match &bootstrap_config.command {
        Command::Directions { origin, destination, mode, alternatives, times } => {
            let config = started_config(bootstrap_config, settings)?;
            let request = DirectionsRequest {
                origin: origin.clone(),
                destination: destination.clone(),
                options: RouteOptions {
                    mode: *mode,
                    alternatives: *alternatives,
                    ..route_options(settings, Some(*mode), times)
                },
            };
            let routes = get_directions(&config, &request)?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Command::Generate { origins, destination, output, mode, driver, map, times } => {
            let config = started_config(bootstrap_config, settings)?;
            let options = PointsOptions {
                route: route_options(settings, *mode, times),
                driver: parse_driver(driver.as_deref().or(settings.driver.as_deref()))?,
                crs: None,
                map_output: map.clone(),
            };
            let route_set = generate_from_points(&config, origins, destination, output, &options)?;
            info!(target: "main", "{} routes written to {}", route_set.len(), output.display());
        }
        Command::Isochrones {
            input,
            geometry_column,
            label_column,
            lon_column,
            lat_column,
            output_dir,
            mode,
            driver,
            map,
            plot,
            continue_on_error,
            times,
        } => {
            let config = started_config(bootstrap_config, settings)?;
            let geometry = geometry_column.as_deref().unwrap_or("geometry");
            let table = read_table(input, geometry)?;

            let options = IsochroneOptions {
                coords_columns: (lon_column.clone(), lat_column.clone()),
                geometry_column: geometry_column.clone(),
                label_column: label_column.clone(),
                route: route_options(settings, *mode, times),
                driver: parse_driver(driver.as_deref().or(settings.driver.as_deref()))?.unwrap_or(Driver::Shapefile),
                crs: None,
                routes_output: output_dir.clone(),
                map_output: map.clone(),
                plot_routes: *plot || settings.plot_routes,
                failure_policy: if *continue_on_error { FailurePolicy::Continue } else { FailurePolicy::FailFast },
            };

            let report = generate_from_isochrones(&config, &table, &options)?;
            let failed: Vec<_> = report.failed().collect();
            for row in &failed {
                if let Some(err) = &row.error {
                    warn!(target: "main", "Isochrone {} ({}) failed: {}", row.row, row.label, err);
                }
            }
            if !failed.is_empty() {
                return Err(GeoroutesError::BatchIncomplete(failed.len()));
            }
        }
        Command::Point { lat, lng, output } => {
            let config = crs_only_config(settings);
            create_point_file(&config, Coordinate::new(*lat, *lng), output, None)?;
        }
        Command::Points { input, id_column, lon_column, lat_column, output } => {
            let config = crs_only_config(settings);
            let table = read_csv(input)?;
            let columns = PointColumns { id: id_column, lon: lon_column, lat: lat_column };
            let written = create_points_file(&config, &table, &columns, output, None)?;
            info!(target: "main", "{} points written to {}", written, output.display());
        }
        Command::MoveShapefiles { source, destination } => {
            move_shapefiles(source, destination)?;
        }
    }

    Ok(())
}

fn started_config(bootstrap_config: &BootstrapConfig, settings: &Settings) -> Result<Config, GeoroutesError> {
    let mut config = Config::default();
    config.start(bootstrap_config.api_key.as_deref().unwrap_or_default(), settings.crs.clone())?;
    Ok(config)
}

fn crs_only_config(settings: &Settings) -> Config {
    let mut config = Config::default();
    config.set_crs(settings.crs.clone());
    config
}

fn route_options(settings: &Settings, mode: Option<TravelMode>, times: &TimeArgs) -> RouteOptions {
    RouteOptions {
        mode: mode.unwrap_or(settings.mode),
        region: settings.region.clone(),
        departure_time: times.departure_time,
        arrival_time: times.arrival_time,
        ..Default::default()
    }
}

fn parse_driver(name: Option<&str>) -> Result<Option<Driver>, GeoroutesError> {
    Ok(name.map(str::parse::<Driver>).transpose()?)
}

fn read_csv(path: &Path) -> Result<polars::frame::DataFrame, GeoroutesError> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_route_options_follow_settings() {
        let settings = Settings { region: "ie".to_string(), mode: TravelMode::Transit, ..Default::default() };
        let times = TimeArgs {
            departure_time: Some(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap()),
            arrival_time: None,
        };

        let options = route_options(&settings, None, &times);
        assert_eq!(TravelMode::Transit, options.mode);
        assert_eq!("ie", options.region);
        assert!(options.alternatives);
        assert_eq!(times.departure_time, options.departure_time);

        assert_eq!(TravelMode::Driving, route_options(&settings, Some(TravelMode::Driving), &times).mode);
    }

    #[test]
    fn test_driver_names() {
        assert_eq!(None, parse_driver(None).unwrap());
        assert_eq!(Some(Driver::GeoPackage), parse_driver(Some("gpkg")).unwrap());
        assert!(matches!(parse_driver(Some("KML")), Err(GeoroutesError::Driver(_))));
    }

    #[test]
    fn test_points_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("schools.csv");
        std::fs::write(&csv, "name,Longitude,Latitude\nNorth,-0.1,51.55\nSouth,-0.12,51.45\n").unwrap();

        let table = read_csv(&csv).unwrap();
        assert_eq!((2, 3), table.shape());

        let output = dir.path().join("schools.geojson");
        let columns = PointColumns::new("name");
        let written = create_points_file(&crs_only_config(&Settings::default()), &table, &columns, &output, None).unwrap();
        assert_eq!(2, written);
    }
}
