use crate::driver::{validate_input_path, Driver};
use crate::errors::{VectorError, VectorResult};
use crate::feature::VectorLayer;
use crate::formats::{geojson_file, gpkg, shapefile_file};
use geo::Geometry;
use log::debug;
use std::path::Path;

/// Every feature of a vector file together with the reference system the file declares
pub fn read_features(path: &Path) -> VectorResult<VectorLayer> {
    let driver = validate_input_path(path)?;
    debug!(target: "vector-io", "Reading {} as {}", path.display(), driver);

    match driver {
        Driver::Shapefile => shapefile_file::read(path),
        Driver::GeoPackage => gpkg::read(path),
        Driver::GeoJson => geojson_file::read(path),
    }
}

/// Coordinates of all point features in `path` as `[x, y]`, or `[y, x]` with `transpose`.
///
/// Multi point features contribute each of their points. Any other geometry fails the read,
/// features without geometry are skipped.
pub fn read_points(path: &Path, transpose: bool) -> VectorResult<Vec<[f64; 2]>> {
    if path.as_os_str().is_empty() {
        return Err(VectorError::MissingPath);
    }

    let layer = read_features(path)?;
    let mut points = Vec::with_capacity(layer.records.len());

    for (index, record) in layer.records.iter().enumerate() {
        match &record.geometry {
            Some(Geometry::Point(point)) => points.push(point.x_y()),
            Some(Geometry::MultiPoint(multi)) => points.extend(multi.iter().map(|p| p.x_y())),
            Some(_) => return Err(VectorError::UnexpectedGeometry { index, expected: "point" }),
            None => continue,
        }
    }

    Ok(points
        .into_iter()
        .map(|(x, y)| if transpose { [y, x] } else { [x, y] })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;
    use std::fs;

    #[test]
    fn test_missing_path() {
        assert!(matches!(read_points(Path::new(""), false), Err(VectorError::MissingPath)));
    }

    #[test]
    fn test_path_is_checked_before_extension() {
        assert!(matches!(
            read_points(Path::new("/nowhere/points.txt"), false),
            Err(VectorError::Driver(DriverError::PathNotFound(_)))
        ));
    }

    #[test]
    fn test_transpose() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("origins.geojson");
        fs::write(&path, r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-0.12, 51.5]}},
            {"type": "Feature", "properties": {}, "geometry": null},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "MultiPoint", "coordinates": [[-0.2, 51.4], [-0.3, 51.3]]}}
        ]}"#).unwrap();

        assert_eq!(vec![[-0.12, 51.5], [-0.2, 51.4], [-0.3, 51.3]], read_points(&path, false).unwrap());
        assert_eq!(vec![[51.5, -0.12], [51.4, -0.2], [51.3, -0.3]], read_points(&path, true).unwrap());
    }

    #[test]
    fn test_lines_are_not_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.geojson");
        fs::write(&path, r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}"#).unwrap();

        assert!(matches!(
            read_points(&path, false),
            Err(VectorError::UnexpectedGeometry { index: 0, .. })
        ));
    }
}
