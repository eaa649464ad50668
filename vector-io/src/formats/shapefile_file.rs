use crate::errors::{VectorError, VectorResult};
use crate::feature::{Feature, FeatureId, GeometryType, IdType, PropertyValue, Schema, VectorLayer, VectorRecord};
use crate::formats::prj;
use common::types::Crs;
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use log::warn;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{PolygonRing, Polyline, Shape};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const ID_FIELD: &str = "id";

pub(crate) fn write(path: &Path, schema: &Schema, crs: &Crs, features: &[Feature]) -> VectorResult<()> {
    let id_field = FieldName::try_from(ID_FIELD)
        .map_err(|e| VectorError::InvalidField(format!("{e:?}")))?;
    let table = match schema.id {
        IdType::Int => TableWriterBuilder::new().add_numeric_field(id_field, 18, 0),
        IdType::Str => TableWriterBuilder::new().add_character_field(id_field, 254),
    };

    // Validate before creating any file, shapefile lines need two vertices
    if schema.geometry == GeometryType::LineString {
        for (index, feature) in features.iter().enumerate() {
            if let Geometry::LineString(line) = &feature.geometry {
                if line.0.len() < 2 {
                    return Err(VectorError::DegenerateLine { index });
                }
            }
        }
    }

    {
        let mut writer = shapefile::Writer::from_path(path, table)?;
        for (index, feature) in features.iter().enumerate() {
            let mut record = Record::default();
            let id = match &feature.id {
                FeatureId::Int(id) => FieldValue::Numeric(Some(*id as f64)),
                FeatureId::Str(id) => FieldValue::Character(Some(id.clone())),
            };
            record.insert(ID_FIELD.to_string(), id);

            match &feature.geometry {
                Geometry::Point(point) => {
                    writer.write_shape_and_record(&shapefile::Point::new(point.x(), point.y()), &record)?;
                }
                Geometry::LineString(line) => {
                    let points = line.0.iter().map(|c| shapefile::Point::new(c.x, c.y)).collect();
                    writer.write_shape_and_record(&Polyline::new(points), &record)?;
                }
                _ => return Err(VectorError::SchemaMismatch { index }),
            }
        }
        // Dropping the writer finalizes the headers
    }

    let prj_path = path.with_extension("prj");
    match prj::wkt_for(crs) {
        Some(wkt) => fs::write(prj_path, wkt)?,
        None => {
            warn!(target: "vector-io", "No WKT definition known for '{}', writing {} without .prj", crs, path.display());
            if prj_path.exists() {
                fs::remove_file(prj_path)?;
            }
        }
    }
    fs::write(path.with_extension("cpg"), "UTF-8")?;

    Ok(())
}

pub(crate) fn read(path: &Path) -> VectorResult<VectorLayer> {
    let mut reader = shapefile::Reader::from_path(path)?;

    let mut records = vec![];
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let mut fields: Vec<(String, FieldValue)> = HashMap::<String, FieldValue>::from(record)
            .into_iter()
            .collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        records.push(VectorRecord {
            geometry: to_geometry(shape)?,
            properties: fields.into_iter().map(|(name, value)| (name, to_property(value))).collect(),
        });
    }

    let prj_path = path.with_extension("prj");
    let crs = if prj_path.exists() {
        prj::crs_from_wkt(&fs::read_to_string(prj_path)?)
    } else {
        None
    };

    Ok(VectorLayer { crs, records })
}

fn coord(point: &shapefile::Point) -> Coord<f64> {
    Coord { x: point.x, y: point.y }
}

fn line(points: &[shapefile::Point]) -> LineString<f64> {
    points.iter().map(coord).collect()
}

fn to_geometry(shape: Shape) -> VectorResult<Option<Geometry<f64>>> {
    let geometry: Geometry<f64> = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(point) => Point::new(point.x, point.y).into(),
        Shape::PointM(point) => Point::new(point.x, point.y).into(),
        Shape::PointZ(point) => Point::new(point.x, point.y).into(),
        Shape::Multipoint(points) => points
            .points()
            .iter()
            .map(|p| Point::new(p.x, p.y))
            .collect::<MultiPoint<f64>>()
            .into(),
        Shape::Polyline(polyline) => match polyline.parts().as_slice() {
            [single] => line(single).into(),
            parts => MultiLineString::new(parts.iter().map(|part| line(part)).collect()).into(),
        },
        Shape::Polygon(polygon) => {
            // Every outer ring opens a new polygon, inner rings belong to the last one
            let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = vec![];
            for ring in polygon.rings() {
                match ring {
                    PolygonRing::Outer(points) => polygons.push((line(points), vec![])),
                    PolygonRing::Inner(points) => match polygons.last_mut() {
                        Some((_, holes)) => holes.push(line(points)),
                        None => polygons.push((line(points), vec![])),
                    },
                }
            }
            let mut polygons = polygons
                .into_iter()
                .map(|(exterior, holes)| Polygon::new(exterior, holes))
                .collect::<Vec<_>>();
            if polygons.len() == 1 {
                polygons.remove(0).into()
            } else {
                MultiPolygon::new(polygons).into()
            }
        }
        other => return Err(VectorError::UnsupportedGeometry(format!("{:?}", other.shapetype()))),
    };
    Ok(Some(geometry))
}

fn to_property(value: FieldValue) -> PropertyValue {
    match value {
        FieldValue::Character(Some(s)) => PropertyValue::Str(s.trim_end().to_string()),
        FieldValue::Numeric(Some(n)) => PropertyValue::Float(n),
        FieldValue::Float(Some(n)) => PropertyValue::Float(n as f64),
        FieldValue::Integer(i) => PropertyValue::Int(i as i64),
        FieldValue::Double(n) => PropertyValue::Float(n),
        FieldValue::Logical(Some(b)) => PropertyValue::Bool(b),
        FieldValue::Memo(s) => PropertyValue::Str(s),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None) => PropertyValue::Null,
        other => PropertyValue::Str(format!("{other:?}")),
    }
}
