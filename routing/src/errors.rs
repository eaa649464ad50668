use crate::config::ConfigError;
use crate::polyline::PolylineError;
use std::fmt;
use std::fmt::Display;

pub type RoutingResult<O> = Result<O, RoutingError>;

#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    Request(#[from] reqwest::Error),
    Parse(#[from] serde_json::Error),
    Api { status: String, message: Option<String> },
    Polyline(#[from] PolylineError),
    Config(#[from] ConfigError),
    EmptyRoute,
    EmptyRouteSet,
}

impl Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingError::Request(err) => write!(f, "Directions request failed: {err}"),
            RoutingError::Parse(err) => write!(f, "Failed to parse directions response: {err}"),
            RoutingError::Api { status, message: Some(message) } => {
                write!(f, "Directions service error {status}: {message}")
            }
            RoutingError::Api { status, message: None } => write!(f, "Directions service error {status}"),
            RoutingError::Polyline(err) => write!(f, "{err}"),
            RoutingError::Config(err) => write!(f, "{err}"),
            RoutingError::EmptyRoute => write!(f, "Route is empty"),
            RoutingError::EmptyRouteSet => write!(f, "No routes to build a geometry from"),
        }
    }
}
