use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::types::errors::EmptyCrsError;

static EPSG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:epsg:|urn:ogc:def:crs:epsg:[0-9.]*:)(\d+)\s*$").expect("EPSG pattern is valid")
});

/// A coordinate reference system, kept verbatim as the caller wrote it ("epsg:4326",
/// "EPSG:27700", an OGC URN, ...). Nothing is reprojected, the value is only recorded in
/// written files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs(String);

impl Crs {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyCrsError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyCrsError);
        }
        Ok(Self(value))
    }

    pub fn wgs84() -> Self {
        Self("epsg:4326".to_string())
    }

    pub fn from_epsg(code: u32) -> Self {
        Self(format!("EPSG:{code}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The EPSG code if the value names one
    pub fn epsg_code(&self) -> Option<u32> {
        EPSG_PATTERN
            .captures(&self.0)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// OGC URN form, as used by named GeoJSON crs members
    pub fn urn(&self) -> String {
        match self.epsg_code() {
            Some(code) => format!("urn:ogc:def:crs:EPSG::{code}"),
            None => self.0.clone(),
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Crs {
    type Err = EmptyCrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crs::new(s)
    }
}

impl TryFrom<String> for Crs {
    type Error = EmptyCrsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Crs::new(value)
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.0
    }
}
