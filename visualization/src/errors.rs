use std::fmt;
use std::fmt::Display;
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum MapError {
    EmptyRouteSet,
    Io(#[from] io::Error),
    Json(#[from] serde_json::Error),
}

impl Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err: &dyn Display = match self {
            MapError::EmptyRouteSet => &"Cannot draw a map without routes",
            MapError::Io(err) => err,
            MapError::Json(err) => err,
        };
        write!(f, "Map rendering failed: {err}")
    }
}
