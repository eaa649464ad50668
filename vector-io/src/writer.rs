use crate::driver::{resolve_driver, Driver};
use crate::errors::{VectorError, VectorResult};
use crate::feature::{Feature, FeatureId, Schema};
use crate::formats::{geojson_file, gpkg, shapefile_file};
use common::types::{Coordinate, Crs};
use geo::{MultiLineString, Point};
use log::{debug, info};
use std::path::Path;

/// Pick the reference system for a write: the one given for this call, else the configured
/// one. Having neither is an error, raised before any file is touched.
pub fn resolve_crs(explicit: Option<&Crs>, configured: Option<&Crs>) -> VectorResult<Crs> {
    explicit
        .or(configured)
        .cloned()
        .ok_or(VectorError::MissingCrs)
}

/// Write `features` to `path`, replacing whatever was there. Returns the number written.
pub fn write_features(
    path: &Path,
    schema: &Schema,
    driver: Driver,
    crs: &Crs,
    features: &[Feature],
) -> VectorResult<usize> {
    if path.as_os_str().is_empty() {
        return Err(VectorError::MissingPath);
    }
    if let Some(index) = features.iter().position(|feature| !schema.admits(feature)) {
        return Err(VectorError::SchemaMismatch { index });
    }

    debug!(target: "vector-io", "Writing {} features to {} ({driver}, {crs})", features.len(), path.display());
    match driver {
        Driver::Shapefile => shapefile_file::write(path, schema, crs, features)?,
        Driver::GeoPackage => gpkg::write(path, schema, crs, features)?,
        Driver::GeoJson => geojson_file::write(path, crs, features)?,
    }
    info!(target: "vector-io", "Wrote {} features to {}", features.len(), path.display());

    Ok(features.len())
}

/// One line feature per path, ids counting up from 0
pub fn route_features(multi_path: &MultiLineString<f64>) -> Vec<Feature> {
    multi_path
        .iter()
        .enumerate()
        .map(|(i, line)| Feature {
            geometry: line.clone().into(),
            id: FeatureId::Int(i as i64),
        })
        .collect()
}

pub fn write_routes(path: &Path, multi_path: &MultiLineString<f64>, crs: &Crs) -> VectorResult<usize> {
    let driver = resolve_driver(path)?;
    write_features(path, &Schema::ROUTES, driver, crs, &route_features(multi_path))
}

/// A single point file, the point gets id 1
pub fn write_point(path: &Path, coordinate: Coordinate, crs: &Crs) -> VectorResult<usize> {
    let driver = resolve_driver(path)?;
    let feature = Feature {
        geometry: Point::from(coordinate.to_xy()).into(),
        id: FeatureId::Int(1),
    };
    write_features(path, &Schema::POINT, driver, crs, &[feature])
}

pub fn write_points(path: &Path, points: &[(String, Coordinate)], crs: &Crs) -> VectorResult<usize> {
    let driver = resolve_driver(path)?;
    let features: Vec<Feature> = points
        .iter()
        .map(|(id, coordinate)| Feature {
            geometry: Point::from(coordinate.to_xy()).into(),
            id: FeatureId::Str(id.clone()),
        })
        .collect();
    write_features(path, &Schema::LABELLED_POINTS, driver, crs, &features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;
    use geo::line_string;

    #[test]
    fn test_crs_cascade() {
        let explicit = Crs::new("EPSG:27700").unwrap();
        let configured = Crs::wgs84();

        assert_eq!(explicit, resolve_crs(Some(&explicit), Some(&configured)).unwrap());
        assert_eq!(configured, resolve_crs(None, Some(&configured)).unwrap());
        assert!(matches!(resolve_crs(None, None), Err(VectorError::MissingCrs)));
    }

    #[test]
    fn test_route_features_are_numbered_from_zero() {
        let multi_path = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
            line_string![(x: 2.0, y: 2.0), (x: 1.0, y: 1.0)],
        ]);

        let features = route_features(&multi_path);

        assert_eq!(2, features.len());
        assert_eq!(FeatureId::Int(0), features[0].id);
        assert_eq!(FeatureId::Int(1), features[1].id);
        assert_eq!(geo::Geometry::LineString(multi_path.0[1].clone()), features[1].geometry);
    }

    #[test]
    fn test_schema_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.geojson");
        let features = vec![
            Feature { geometry: Point::new(0.0, 0.0).into(), id: FeatureId::Int(1) },
            Feature { geometry: Point::new(1.0, 0.0).into(), id: FeatureId::Str("b".into()) },
        ];

        let result = write_features(&path, &Schema::POINT, Driver::GeoJson, &Crs::wgs84(), &features);

        assert!(matches!(result, Err(VectorError::SchemaMismatch { index: 1 })));
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_extension() {
        let result = write_point(Path::new("out.kml"), Coordinate::new(51.5, -0.1), &Crs::wgs84());
        assert!(matches!(
            result,
            Err(VectorError::Driver(DriverError::UnsupportedExtension { .. }))
        ));
    }
}
