use crate::errors::PipelineError;
use common::types::{Coordinate, Crs, Location, RouteSet};
use log::info;
use routing::assemble::assemble;
use routing::fetch::fetch_routes;
use routing::provider::RouteOptions;
use routing::Config;
use std::path::{Path, PathBuf};
use vector_io::reader::read_points;
use vector_io::writer::{resolve_crs, route_features, write_features};
use vector_io::{resolve_driver, Driver, Schema};

#[derive(Debug, Clone, Default)]
pub struct PointsOptions {
    pub route: RouteOptions,
    /// Format of `routes_output`, taken from its extension when not set
    pub driver: Option<Driver>,
    pub crs: Option<Crs>,
    /// Where to draw the map, no map without it
    pub map_output: Option<PathBuf>,
}

/// Route from every point of `origins_path` to `destination` and write all routes into
/// `routes_output`, one line feature per origin that produced a route.
pub fn generate_from_points(
    config: &Config,
    origins_path: &Path,
    destination: &Location,
    routes_output: &Path,
    options: &PointsOptions,
) -> Result<RouteSet, PipelineError> {
    let driver = match options.driver {
        Some(driver) => driver,
        None => resolve_driver(routes_output)?,
    };
    let crs = resolve_crs(options.crs.as_ref(), config.crs())?;
    let provider = config.client()?;

    // Files store x = lng, directions want lat first
    let origins: Vec<Coordinate> = read_points(origins_path, true)?
        .into_iter()
        .map(|[lat, lng]| Coordinate::new(lat, lng))
        .collect();

    info!(target: "pipeline", "Generating routes from {} origins to {}", origins.len(), destination);
    let route_set = fetch_routes(provider, &origins, destination, &options.route)?;
    let multi_path = assemble(&route_set)?;

    info!(target: "pipeline", "Saving routes to {}", routes_output.display());
    write_features(routes_output, &Schema::ROUTES, driver, &crs, &route_features(&multi_path))?;

    if let Some(map_output) = &options.map_output {
        visualization::render(&route_set, options.route.mode, map_output)?;
    }

    Ok(route_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::started_config;
    use common::types::TravelMode;
    use routing::testing::{ScriptedProvider, ScriptedResponse};
    use vector_io::reader::read_features;
    use vector_io::writer::write_points;

    fn origins_file(dir: &Path) -> PathBuf {
        let path = dir.join("origins.geojson");
        write_points(
            &path,
            &[
                ("a".to_string(), Coordinate::new(51.52, -0.15)),
                ("b".to_string(), Coordinate::new(51.48, -0.08)),
                ("c".to_string(), Coordinate::new(51.47, -0.11)),
            ],
            &Crs::wgs84(),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_routes_from_points_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = Coordinate::new(51.5, -0.1);
        let provider = ScriptedProvider::new(vec![
            ScriptedResponse::Route(vec![Coordinate::new(51.52, -0.15), destination]),
            ScriptedResponse::Empty,
            ScriptedResponse::Route(vec![Coordinate::new(51.47, -0.11), destination]),
        ]);
        let config = started_config(provider.clone());
        let output = dir.path().join("routes.shp");
        let options = PointsOptions {
            route: RouteOptions { mode: TravelMode::Bicycling, ..Default::default() },
            map_output: Some(dir.path().join("routes.html")),
            ..Default::default()
        };

        let route_set = generate_from_points(
            &config,
            &origins_file(dir.path()),
            &Location::Coordinate(destination),
            &output,
            &options,
        )
        .unwrap();

        assert_eq!(2, route_set.len());
        let requests = provider.requests();
        assert_eq!(3, requests.len());
        assert_eq!(Location::Coordinate(Coordinate::new(51.48, -0.08)), requests[1].origin);
        assert_eq!(TravelMode::Bicycling, requests[1].options.mode);
        assert_eq!(2, read_features(&output).unwrap().records.len());
        assert!(dir.path().join("routes.html").exists());
    }

    #[test]
    fn test_unknown_output_format_fails_before_requests() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::default();
        let config = started_config(provider.clone());

        let result = generate_from_points(
            &config,
            &origins_file(dir.path()),
            &Location::Address("London".to_string()),
            &dir.path().join("routes.kml"),
            &PointsOptions::default(),
        );

        assert!(matches!(result, Err(PipelineError::Driver(_))));
        assert!(provider.requests().is_empty());
    }
}
