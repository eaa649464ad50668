use crate::bootstrap_config::BootstrapConfig;
use common::types::{Crs, TravelMode};
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

/// Defaults file, versioned so the layout can change without breaking old files
#[derive(Debug, Deserialize)]
#[serde(tag = "version")]
pub enum DefaultsFile {
    #[serde(rename = "1")]
    Version1 {
        crs: Option<Crs>,
        region: Option<String>,
        mode: Option<TravelMode>,
        driver: Option<String>,
        plot_routes: Option<bool>,
    },
}

/// Settings after merging command line, defaults file and built-in values, in that order
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub crs: Crs,
    pub region: String,
    pub mode: TravelMode,
    pub driver: Option<String>,
    pub plot_routes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crs: Crs::wgs84(),
            region: "uk".to_string(),
            mode: TravelMode::Walking,
            driver: None,
            plot_routes: false,
        }
    }
}

impl Settings {
    fn merge(self, file: DefaultsFile) -> Self {
        match file {
            DefaultsFile::Version1 { crs, region, mode, driver, plot_routes } => Self {
                crs: crs.unwrap_or(self.crs),
                region: region.unwrap_or(self.region),
                mode: mode.unwrap_or(self.mode),
                driver: driver.or(self.driver),
                plot_routes: plot_routes.unwrap_or(self.plot_routes),
            },
        }
    }
}

pub(super) fn load_settings(bootstrap_config: &BootstrapConfig) -> Result<Settings, ConfigError> {
    let mut settings = match &bootstrap_config.config_file {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|err| ConfigError::Open(path.clone(), err))?;
            let defaults: DefaultsFile =
                serde_yml::from_str(&text).map_err(|err| ConfigError::Parse(path.clone(), err))?;
            info!(target: "main", "Defaults read successfully from '{}'", path.display());
            Settings::default().merge(defaults)
        }
        None => Settings::default(),
    };

    if let Some(crs) = &bootstrap_config.crs {
        settings.crs = crs.clone();
    }
    debug!(target: "main", "Using {:?}", settings);

    Ok(settings)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    Open(PathBuf, std::io::Error),
    Parse(PathBuf, serde_yml::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Open(path, err) => write!(f, "Could not open '{}': {}", path.display(), err),
            ConfigError::Parse(path, err) => write!(f, "Could not read '{}': {}", path.display(), err),
        }
    }
}
