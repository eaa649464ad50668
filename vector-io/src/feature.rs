use common::types::Crs;
use geo::Geometry;
use std::fmt;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureId {
    Int(i64),
    Str(String),
}

impl Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Int(id) => write!(f, "{id}"),
            FeatureId::Str(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
}

impl GeometryType {
    pub fn matches(&self, geometry: &Geometry<f64>) -> bool {
        matches!(
            (self, geometry),
            (GeometryType::Point, Geometry::Point(_)) | (GeometryType::LineString, Geometry::LineString(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Int,
    Str,
}

/// Layout of a written layer: one geometry type and a single `id` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub geometry: GeometryType,
    pub id: IdType,
}

impl Schema {
    pub const ROUTES: Schema = Schema { geometry: GeometryType::LineString, id: IdType::Int };
    pub const POINT: Schema = Schema { geometry: GeometryType::Point, id: IdType::Int };
    pub const LABELLED_POINTS: Schema = Schema { geometry: GeometryType::Point, id: IdType::Str };

    pub(crate) fn admits(&self, feature: &Feature) -> bool {
        let id_matches = matches!(
            (self.id, &feature.id),
            (IdType::Int, FeatureId::Int(_)) | (IdType::Str, FeatureId::Str(_))
        );
        id_matches && self.geometry.matches(&feature.geometry)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub id: FeatureId,
}

/// Attribute value as read back from a vector file
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub geometry: Option<Geometry<f64>>,
    /// Attributes in the order the file lists them
    pub properties: Vec<(String, PropertyValue)>,
}

impl VectorRecord {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// The `id` attribute. Whole floats count as integer ids, since some formats only know
    /// one numeric type.
    pub fn id(&self) -> Option<FeatureId> {
        match self.property("id")? {
            PropertyValue::Int(id) => Some(FeatureId::Int(*id)),
            PropertyValue::Float(id) if id.fract() == 0.0 => Some(FeatureId::Int(*id as i64)),
            PropertyValue::Str(id) => Some(FeatureId::Str(id.clone())),
            _ => None,
        }
    }
}

/// All features of one file plus the reference system the file declares, if any
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLayer {
    pub crs: Option<Crs>,
    pub records: Vec<VectorRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};

    #[test]
    fn test_schema_admits() {
        let line = Feature {
            geometry: line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into(),
            id: FeatureId::Int(0),
        };
        let named_point = Feature {
            geometry: point!(x: 0.0, y: 1.0).into(),
            id: FeatureId::Str("Hall".to_string()),
        };

        assert!(Schema::ROUTES.admits(&line));
        assert!(!Schema::ROUTES.admits(&named_point));
        assert!(Schema::LABELLED_POINTS.admits(&named_point));
        assert!(!Schema::POINT.admits(&named_point));
    }

    #[test]
    fn test_record_id() {
        let record = |value| VectorRecord { geometry: None, properties: vec![("id".to_string(), value)] };
        assert_eq!(Some(FeatureId::Int(3)), record(PropertyValue::Float(3.0)).id());
        assert_eq!(None, record(PropertyValue::Float(3.5)).id());
        assert_eq!(Some(FeatureId::Str("a".into())), record(PropertyValue::Str("a".into())).id());
    }
}
