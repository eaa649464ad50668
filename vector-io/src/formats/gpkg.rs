use crate::driver::Driver;
use crate::errors::{VectorError, VectorResult};
use crate::feature::{Feature, FeatureId, GeometryType, IdType, PropertyValue, Schema, VectorLayer, VectorRecord};
use crate::formats::{prj, wkb};
use common::types::Crs;
use geo::{BoundingRect, Geometry, Rect};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Transaction};
use std::fs;
use std::path::Path;

/// "GPKG" as big endian integer
const APPLICATION_ID: i32 = 0x4750_4B47;
const USER_VERSION: i32 = 10300;

const CORE_TABLES: &str = r#"
CREATE TABLE gpkg_spatial_ref_sys (
    srs_name TEXT NOT NULL,
    srs_id INTEGER PRIMARY KEY,
    organization TEXT NOT NULL,
    organization_coordsys_id INTEGER NOT NULL,
    definition TEXT NOT NULL,
    description TEXT
);
CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    min_x DOUBLE,
    min_y DOUBLE,
    max_x DOUBLE,
    max_y DOUBLE,
    srs_id INTEGER,
    CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
CREATE TABLE gpkg_geometry_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    geometry_type_name TEXT NOT NULL,
    srs_id INTEGER NOT NULL,
    z TINYINT NOT NULL,
    m TINYINT NOT NULL,
    CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name),
    CONSTRAINT fk_gc_tn FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
    CONSTRAINT fk_gc_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys (srs_id)
);
INSERT INTO gpkg_spatial_ref_sys VALUES
    ('Undefined cartesian SRS', -1, 'NONE', -1, 'undefined', 'undefined cartesian coordinate reference system'),
    ('Undefined geographic SRS', 0, 'NONE', 0, 'undefined', 'undefined geographic coordinate reference system');
"#;

pub(crate) fn write(path: &Path, schema: &Schema, crs: &Crs, features: &[Feature]) -> VectorResult<()> {
    let srs_id = crs.epsg_code().ok_or_else(|| VectorError::UnsupportedCrs {
        driver: Driver::GeoPackage,
        crs: crs.clone(),
    })?;

    let blobs = features
        .iter()
        .map(|feature| encode_geometry(srs_id as i32, &feature.geometry))
        .collect::<VectorResult<Vec<_>>>()?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    let mut conn = Connection::open(path)?;
    conn.pragma_update(None, "application_id", APPLICATION_ID)?;
    conn.pragma_update(None, "user_version", USER_VERSION)?;
    conn.execute_batch(CORE_TABLES)?;

    let tx = conn.transaction()?;
    register_srs(&tx, srs_id)?;

    let table = layer_name(path);
    let geometry_type = match schema.geometry {
        GeometryType::Point => "POINT",
        GeometryType::LineString => "LINESTRING",
    };
    let id_type = match schema.id {
        IdType::Int => "INTEGER",
        IdType::Str => "TEXT",
    };

    tx.execute_batch(&format!(
        "CREATE TABLE {} (fid INTEGER PRIMARY KEY AUTOINCREMENT, geom {geometry_type}, id {id_type});",
        quote(&table)
    ))?;

    let bounds = bounds(features.iter().map(|f| &f.geometry));
    tx.execute(
        "INSERT INTO gpkg_contents (table_name, data_type, identifier, min_x, min_y, max_x, max_y, srs_id)
         VALUES (?1, 'features', ?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            table,
            bounds.map(|r| r.min().x),
            bounds.map(|r| r.min().y),
            bounds.map(|r| r.max().x),
            bounds.map(|r| r.max().y),
            srs_id
        ],
    )?;
    tx.execute(
        "INSERT INTO gpkg_geometry_columns VALUES (?1, 'geom', ?2, ?3, 0, 0)",
        params![table, geometry_type, srs_id],
    )?;

    {
        let mut insert = tx.prepare(&format!("INSERT INTO {} (geom, id) VALUES (?1, ?2)", quote(&table)))?;
        for (feature, blob) in features.iter().zip(blobs) {
            match &feature.id {
                FeatureId::Int(id) => insert.execute(params![blob, id])?,
                FeatureId::Str(id) => insert.execute(params![blob, id])?,
            };
        }
    }

    tx.commit()?;
    Ok(())
}

fn register_srs(tx: &Transaction, srs_id: u32) -> VectorResult<()> {
    let name = prj::name_for(srs_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("EPSG:{srs_id}"));
    let definition = prj::wkt_for(&Crs::from_epsg(srs_id)).unwrap_or("undefined");
    tx.execute(
        "INSERT OR IGNORE INTO gpkg_spatial_ref_sys VALUES (?1, ?2, 'EPSG', ?2, ?3, NULL)",
        params![name, srs_id, definition],
    )?;
    Ok(())
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "features".to_string())
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn bounds<'a>(geometries: impl Iterator<Item = &'a Geometry<f64>>) -> Option<Rect<f64>> {
    geometries
        .filter_map(|geometry| geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })
}

/// GeoPackage binary: "GP" magic, version, flags, srs id, no envelope, then WKB
fn encode_geometry(srs_id: i32, geometry: &Geometry<f64>) -> VectorResult<Vec<u8>> {
    let mut blob = vec![b'G', b'P', 0, 0b0000_0001];
    blob.extend_from_slice(&srs_id.to_le_bytes());
    wkb::write_geometry(&mut blob, geometry)?;
    Ok(blob)
}

fn decode_geometry(blob: &[u8]) -> VectorResult<Option<Geometry<f64>>> {
    if blob.len() < 8 || &blob[0..2] != b"GP" {
        return Err(VectorError::Wkb("missing GeoPackage header".to_string()));
    }
    let flags = blob[3];
    if flags & 0b0001_0000 != 0 {
        return Ok(None);
    }
    let envelope = match (flags >> 1) & 0b111 {
        0 => 0,
        1 => 32,
        2 | 3 => 48,
        4 => 64,
        other => return Err(VectorError::Wkb(format!("invalid envelope indicator {other}"))),
    };
    let start = 8 + envelope;
    let body = blob
        .get(start..)
        .ok_or_else(|| VectorError::Wkb("header longer than blob".to_string()))?;
    wkb::read_geometry(body).map(Some)
}

pub(crate) fn read(path: &Path) -> VectorResult<VectorLayer> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let (table, geometry_column, srs_id): (String, String, i64) = conn
        .query_row(
            "SELECT c.table_name, g.column_name, g.srs_id
             FROM gpkg_contents c JOIN gpkg_geometry_columns g ON g.table_name = c.table_name
             WHERE c.data_type = 'features'
             ORDER BY c.table_name LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?
        .ok_or_else(|| VectorError::InvalidLayer(format!("{} has no feature table", path.display())))?;

    let crs = conn
        .query_row(
            "SELECT organization, organization_coordsys_id FROM gpkg_spatial_ref_sys WHERE srs_id = ?1",
            [srs_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?
        .filter(|(organization, _)| organization.eq_ignore_ascii_case("EPSG"))
        .map(|(_, code)| Crs::from_epsg(code as u32));

    let mut statement = conn.prepare(&format!("SELECT * FROM {}", quote(&table)))?;
    let columns: Vec<String> = statement.column_names().into_iter().map(String::from).collect();

    let mut records = vec![];
    let mut rows = statement.query([])?;
    while let Some(row) = rows.next()? {
        let mut geometry = None;
        let mut properties = vec![];

        for (index, name) in columns.iter().enumerate() {
            let value = row.get_ref(index)?;
            if *name == geometry_column {
                geometry = match value {
                    ValueRef::Blob(blob) => decode_geometry(blob)?,
                    _ => None,
                };
                continue;
            }
            if name.eq_ignore_ascii_case("fid") {
                continue;
            }
            let property = match value {
                ValueRef::Null => PropertyValue::Null,
                ValueRef::Integer(i) => PropertyValue::Int(i),
                ValueRef::Real(f) => PropertyValue::Float(f),
                ValueRef::Text(text) => PropertyValue::Str(String::from_utf8_lossy(text).to_string()),
                ValueRef::Blob(_) => continue,
            };
            properties.push((name.clone(), property));
        }

        records.push(VectorRecord { geometry, properties });
    }

    Ok(VectorLayer { crs, records })
}
