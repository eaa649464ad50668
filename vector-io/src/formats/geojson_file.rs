use crate::errors::VectorResult;
use crate::feature::{Feature, FeatureId, PropertyValue, VectorLayer, VectorRecord};
use common::types::Crs;
use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub(crate) fn write(path: &Path, crs: &Crs, features: &[Feature]) -> VectorResult<()> {
    let features = features
        .iter()
        .map(|feature| {
            let mut properties = JsonObject::new();
            let id = match &feature.id {
                FeatureId::Int(id) => json!(id),
                FeatureId::Str(id) => json!(id),
            };
            properties.insert("id".to_string(), id);

            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&feature.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    // Named crs member for every system, so a read returns what was written
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({ "type": "name", "properties": { "name": crs.urn() } }),
    );

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()?;

    Ok(())
}

pub(crate) fn read(path: &Path) -> VectorResult<VectorLayer> {
    let text = std::fs::read_to_string(path)?;
    let geojson: GeoJson = text.parse()?;

    let layer = match geojson {
        GeoJson::FeatureCollection(collection) => VectorLayer {
            crs: collection.foreign_members.as_ref().and_then(crs_member),
            records: collection
                .features
                .into_iter()
                .map(to_record)
                .collect::<VectorResult<_>>()?,
        },
        GeoJson::Feature(feature) => VectorLayer {
            crs: feature.foreign_members.as_ref().and_then(crs_member),
            records: vec![to_record(feature)?],
        },
        GeoJson::Geometry(geometry) => VectorLayer {
            crs: None,
            records: vec![VectorRecord {
                geometry: Some(geo::Geometry::try_from(geometry.value)?),
                properties: vec![],
            }],
        },
    };

    Ok(layer)
}

fn crs_member(members: &JsonObject) -> Option<Crs> {
    members
        .get("crs")?
        .pointer("/properties/name")?
        .as_str()
        .and_then(|name| Crs::new(name).ok())
}

fn to_record(feature: geojson::Feature) -> VectorResult<VectorRecord> {
    let geometry = match feature.geometry {
        Some(geometry) => Some(geo::Geometry::try_from(geometry.value)?),
        None => None,
    };

    let properties = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, to_property(value)))
        .collect();

    Ok(VectorRecord { geometry, properties })
}

fn to_property(value: JsonValue) -> PropertyValue {
    match value {
        JsonValue::Null => PropertyValue::Null,
        JsonValue::Bool(b) => PropertyValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => PropertyValue::Int(i),
            None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => PropertyValue::Str(s),
        other => PropertyValue::Str(other.to_string()),
    }
}
