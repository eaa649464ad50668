pub(crate) mod geojson_file;
pub(crate) mod gpkg;
pub(crate) mod prj;
pub(crate) mod shapefile_file;
pub(crate) mod wkb;
