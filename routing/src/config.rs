use crate::provider::{DirectionsProvider, GoogleDirectionsClient};
use common::types::Crs;
use log::info;
use std::fmt;
use std::fmt::Display;

/// Everything a pipeline run needs besides its inputs: the directions client and the
/// default reference system for written files. Built once at process start and handed to
/// every call by reference.
#[derive(Default)]
pub struct Config {
    client: Option<Box<dyn DirectionsProvider>>,
    crs: Option<Crs>,
}

impl Config {
    /// Build a Google directions client for `api_key` and make `crs` the default reference
    /// system. Replaces whatever was configured before.
    pub fn start(&mut self, api_key: &str, crs: Crs) -> Result<(), ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let client = GoogleDirectionsClient::new(api_key.to_string())?;
        self.start_with_provider(Box::new(client), crs);
        info!(target: "routing", "Directions client started");

        Ok(())
    }

    pub fn start_with_provider(&mut self, provider: Box<dyn DirectionsProvider>, crs: Crs) {
        self.client = Some(provider);
        self.crs = Some(crs);
    }

    pub fn client(&self) -> Result<&dyn DirectionsProvider, ConfigError> {
        self.client.as_deref().ok_or(ConfigError::ClientNotInitialized)
    }

    pub fn is_started(&self) -> bool {
        self.client.is_some()
    }

    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = Some(crs);
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Drop the client. The reference system stays configured.
    pub fn stop(&mut self) {
        if self.client.take().is_some() {
            info!(target: "routing", "Directions client stopped");
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client", &self.client.as_ref().map(|_| "started"))
            .field("crs", &self.crs)
            .finish()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    MissingApiKey,
    ClientNotInitialized,
    Client(#[from] reqwest::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "API key is required"),
            ConfigError::ClientNotInitialized => {
                write!(f, "Directions client not initialized. Call start() first.")
            }
            ConfigError::Client(err) => write!(f, "Could not build directions client: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    #[test]
    fn test_client_before_start() {
        let config = Config::default();
        assert!(matches!(config.client(), Err(ConfigError::ClientNotInitialized)));
        assert_eq!(None, config.crs());
    }

    #[test]
    fn test_start_requires_api_key() {
        let mut config = Config::default();
        assert!(matches!(config.start("", Crs::wgs84()), Err(ConfigError::MissingApiKey)));
        assert!(!config.is_started());
    }

    #[test]
    fn test_start_stores_crs_verbatim() {
        let mut config = Config::default();
        config.start("some-key", Crs::new("epsg:27700").unwrap()).unwrap();
        assert!(config.client().is_ok());
        assert_eq!("epsg:27700", config.crs().unwrap().as_str());
    }

    #[test]
    fn test_stop_keeps_crs() {
        let mut config = Config::default();
        config.start_with_provider(Box::new(ScriptedProvider::default()), Crs::wgs84());
        config.set_crs(Crs::from_epsg(3857));
        config.stop();

        assert!(matches!(config.client(), Err(ConfigError::ClientNotInitialized)));
        assert_eq!(Some(&Crs::from_epsg(3857)), config.crs());
    }
}
