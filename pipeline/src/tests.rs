use crate::errors::PipelineError;
use crate::isochrones::{generate_from_isochrones, FailurePolicy, IsochroneOptions};
use common::types::{Coordinate, Crs, Location, TravelMode};
use polars::df;
use polars::frame::DataFrame;
use routing::testing::{ScriptedProvider, ScriptedResponse};
use routing::Config;
use vector_io::reader::read_features;
use vector_io::Driver;

const SQUARE: &str = "POLYGON((-0.11 51.49,-0.09 51.49,-0.09 51.51,-0.11 51.51,-0.11 51.49))";

pub(crate) fn isochrone_table() -> DataFrame {
    df![
        "school" => ["Hill Primary"],
        "CENTER_LON" => [-0.1],
        "CENTER_LAT" => [51.5],
        "geometry" => [SQUARE],
    ].unwrap()
}

fn two_isochrones() -> DataFrame {
    df![
        "school" => ["North", "South"],
        "CENTER_LON" => [-0.1, -0.12],
        "CENTER_LAT" => [51.55, 51.45],
        "geometry" => [
            "POLYGON((-0.11 51.54,-0.09 51.54,-0.1 51.56,-0.11 51.54))",
            "POLYGON((-0.13 51.44,-0.11 51.44,-0.12 51.46,-0.13 51.44))",
        ],
    ].unwrap()
}

pub(crate) fn started_config(provider: ScriptedProvider) -> Config {
    let mut config = Config::default();
    config.start_with_provider(Box::new(provider), Crs::wgs84());
    config
}

fn to_destination(origin: Coordinate) -> ScriptedResponse {
    ScriptedResponse::Route(vec![origin, Coordinate::new(51.5, -0.1)])
}

#[test]
fn test_square_isochrone_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        to_destination(Coordinate::new(51.49, -0.11)),
        to_destination(Coordinate::new(51.49, -0.09)),
        ScriptedResponse::Empty,
        to_destination(Coordinate::new(51.51, -0.11)),
    ]);
    let config = started_config(provider.clone());
    let options = IsochroneOptions {
        driver: Driver::GeoPackage,
        routes_output: Some(dir.path().to_path_buf()),
        map_output: dir.path().join("routes.html"),
        plot_routes: true,
        ..Default::default()
    };

    let report = generate_from_isochrones(&config, &isochrone_table(), &options).unwrap();

    let requests = provider.requests();
    assert_eq!(4, requests.len());
    assert!(requests.iter().all(|r| r.destination == Location::Coordinate(Coordinate::new(51.5, -0.1))));
    assert!(requests.iter().all(|r| r.options.mode == TravelMode::Walking && r.options.region == "uk"));

    let outcome = &report.rows[0];
    assert!(outcome.error.is_none());
    assert_eq!(3, outcome.routes);

    let gpkg = dir.path().join("Hill Primary.gpkg");
    assert_eq!(Some(gpkg.clone()), outcome.routes_file);
    let layer = read_features(&gpkg).unwrap();
    assert_eq!(3, layer.records.len());
    assert_eq!(Some(Crs::from_epsg(4326)), layer.crs);

    let html = std::fs::read_to_string(dir.path().join("routes.html")).unwrap();
    assert_eq!(3, html.matches("[51.5,-0.1]]").count());
}

#[test]
fn test_nothing_written_without_output_directory() {
    let provider = ScriptedProvider::new(vec![to_destination(Coordinate::new(51.49, -0.11))]);
    let config = started_config(provider);

    let report = generate_from_isochrones(&config, &isochrone_table(), &IsochroneOptions::default()).unwrap();

    assert_eq!(1, report.rows[0].routes);
    assert_eq!(None, report.rows[0].routes_file);
    assert_eq!(None, report.rows[0].map_file);
}

#[test]
fn test_fail_fast_stops_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![ScriptedResponse::Error("OVER_QUERY_LIMIT")]);
    let config = started_config(provider.clone());
    let options = IsochroneOptions {
        driver: Driver::GeoJson,
        routes_output: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let result = generate_from_isochrones(&config, &two_isochrones(), &options);

    assert!(matches!(result, Err(PipelineError::Routing(routing::RoutingError::Api { .. }))));
    assert_eq!(1, provider.requests().len());
    assert!(!dir.path().join("South.geojson").exists());
}

#[test]
fn test_continue_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        ScriptedResponse::Error("OVER_QUERY_LIMIT"),
        to_destination(Coordinate::new(51.44, -0.13)),
    ]);
    let config = started_config(provider.clone());
    let options = IsochroneOptions {
        driver: Driver::GeoJson,
        routes_output: Some(dir.path().to_path_buf()),
        failure_policy: FailurePolicy::Continue,
        ..Default::default()
    };

    let report = generate_from_isochrones(&config, &two_isochrones(), &options).unwrap();

    assert_eq!(2, report.rows.len());
    assert_eq!(1, report.succeeded());
    assert_eq!(vec!["North"], report.failed().map(|row| row.label.as_str()).collect::<Vec<_>>());
    // The failing row stops at its first request, the second row asks for all three origins
    assert_eq!(4, provider.requests().len());
    assert!(dir.path().join("South.geojson").exists());
    assert!(!dir.path().join("North.geojson").exists());
}

#[test]
fn test_row_without_any_route() {
    let provider = ScriptedProvider::default();
    let config = started_config(provider);
    let options = IsochroneOptions { failure_policy: FailurePolicy::Continue, ..Default::default() };

    let report = generate_from_isochrones(&config, &isochrone_table(), &options).unwrap();

    assert!(matches!(
        report.rows[0].error,
        Some(PipelineError::Routing(routing::RoutingError::EmptyRouteSet))
    ));
}
