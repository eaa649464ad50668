use itertools::Itertools;
use std::fmt;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Vector file formats that can be read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Shapefile,
    GeoPackage,
    GeoJson,
}

pub const ALL_DRIVERS: [Driver; 3] = [Driver::Shapefile, Driver::GeoPackage, Driver::GeoJson];

impl Driver {
    pub fn name(&self) -> &'static str {
        match self {
            Driver::Shapefile => "ESRI Shapefile",
            Driver::GeoPackage => "GPKG",
            Driver::GeoJson => "GeoJSON",
        }
    }

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Driver::Shapefile => ".shp",
            Driver::GeoPackage => ".gpkg",
            Driver::GeoJson => ".geojson",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        ALL_DRIVERS.into_iter().find(|driver| driver.extension() == ext)
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Driver {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_DRIVERS
            .into_iter()
            .find(|driver| driver.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DriverError::UnsupportedDriver(s.to_string()))
    }
}

/// Lower-cased extension of `path` with its leading dot, `""` if there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub fn resolve_driver(path: &Path) -> Result<Driver, DriverError> {
    let ext = extension_of(path);
    Driver::from_extension(&ext).ok_or_else(|| DriverError::UnsupportedExtension {
        ext,
        allowed: ALL_DRIVERS.iter().map(|d| d.extension().to_string()).collect(),
    })
}

/// Check an input path before any I/O: it has to exist and carry a supported extension
pub fn validate_input_path(path: &Path) -> Result<Driver, DriverError> {
    if !path.exists() {
        return Err(DriverError::PathNotFound(path.display().to_string()));
    }
    resolve_driver(path)
}

/// Check `path` against an arbitrary allow-list. Entries are matched case-insensitively and
/// may be given with or without the leading dot; `""` admits files without an extension.
pub fn check_extension(path: &Path, allowed: &[&str]) -> Result<(), DriverError> {
    let allowed = allowed
        .iter()
        .map(|ext| match ext.to_lowercase() {
            ext if ext.is_empty() || ext.starts_with('.') => ext,
            ext => format!(".{ext}"),
        })
        .collect_vec();

    let ext = extension_of(path);
    if allowed.contains(&ext) {
        Ok(())
    } else {
        Err(DriverError::UnsupportedExtension { ext, allowed })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DriverError {
    UnsupportedExtension { ext: String, allowed: Vec<String> },
    UnsupportedDriver(String),
    PathNotFound(String),
}

impl Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::UnsupportedExtension { ext, allowed } if ext.is_empty() => write!(
                f,
                "File has no extension. Supported extensions: {}",
                allowed.join(", ")
            ),
            DriverError::UnsupportedExtension { ext, allowed } => write!(
                f,
                "Invalid file extension: {}. Supported extensions: {}",
                ext,
                allowed.join(", ")
            ),
            DriverError::UnsupportedDriver(driver) => write!(
                f,
                "{} is not a valid driver. Supported drivers are {}",
                driver,
                ALL_DRIVERS.iter().map(|d| d.name()).join(", ")
            ),
            DriverError::PathNotFound(path) => write!(f, "File or directory does not exist: {path}"),
        }
    }
}
