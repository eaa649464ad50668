mod google;
mod types;

pub use google::GoogleDirectionsClient;
pub use types::{DirectionsResponse, DirectionsRoute, EncodedPolyline, RouteLeg, RouteStep};

use crate::errors::RoutingError;
use chrono::{DateTime, Utc};
use common::types::{Location, TravelMode};

/// A service that answers directions requests. Calls are blocking and made one at a time.
pub trait DirectionsProvider {
    /// All routes the service returned, in the service's order. An empty list means the
    /// service had no route for this request.
    fn directions(&self, request: &DirectionsRequest) -> Result<Vec<DirectionsRoute>, RoutingError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Location,
    pub destination: Location,
    pub options: RouteOptions,
}

/// Knobs shared by all requests of one batch.
/// `departure_time` and `arrival_time` are forwarded as given, the service decides what
/// happens when both are set.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub mode: TravelMode,
    pub region: String,
    pub alternatives: bool,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            mode: TravelMode::Walking,
            region: "uk".to_string(),
            alternatives: true,
            departure_time: None,
            arrival_time: None,
        }
    }
}
