//! WKT definitions for the reference systems this crate can describe without a projection
//! library. Used for shapefile `.prj` sidecars and GeoPackage SRS rows.

use common::types::Crs;

const KNOWN: [(u32, &str, &str); 3] = [
    (
        4326,
        "WGS 84",
        r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#,
    ),
    (
        3857,
        "WGS 84 / Pseudo-Mercator",
        r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Mercator_Auxiliary_Sphere"],PARAMETER["False_Easting",0.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",0.0],PARAMETER["Standard_Parallel_1",0.0],PARAMETER["Auxiliary_Sphere_Type",0.0],UNIT["Meter",1.0]]"#,
    ),
    (
        27700,
        "OSGB36 / British National Grid",
        r#"PROJCS["British_National_Grid",GEOGCS["GCS_OSGB_1936",DATUM["D_OSGB_1936",SPHEROID["Airy_1830",6377563.396,299.3249646]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",400000.0],PARAMETER["False_Northing",-100000.0],PARAMETER["Central_Meridian",-2.0],PARAMETER["Scale_Factor",0.9996012717],PARAMETER["Latitude_Of_Origin",49.0],UNIT["Meter",1.0]]"#,
    ),
];

pub(crate) fn wkt_for(crs: &Crs) -> Option<&'static str> {
    let code = crs.epsg_code()?;
    KNOWN.iter().find(|(known, _, _)| *known == code).map(|(_, _, wkt)| *wkt)
}

pub(crate) fn name_for(code: u32) -> Option<&'static str> {
    KNOWN.iter().find(|(known, _, _)| *known == code).map(|(_, name, _)| *name)
}

pub(crate) fn crs_from_wkt(wkt: &str) -> Option<Crs> {
    let wkt = wkt.trim();
    KNOWN
        .iter()
        .find(|(_, _, known)| *known == wkt)
        .map(|(code, _, _)| Crs::from_epsg(*code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_definitions() {
        let bng = Crs::new("epsg:27700").unwrap();
        let wkt = wkt_for(&bng).unwrap();
        assert!(wkt.starts_with("PROJCS[\"British_National_Grid\""));
        assert_eq!(Some(Crs::from_epsg(27700)), crs_from_wkt(&format!("{wkt}\n")));
        assert_eq!(None, wkt_for(&Crs::from_epsg(2154)));
        assert_eq!(Some("WGS 84"), name_for(4326));
    }
}
