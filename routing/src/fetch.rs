use crate::config::Config;
use crate::errors::{RoutingError, RoutingResult};
use crate::polyline;
use crate::provider::{DirectionsProvider, DirectionsRequest, DirectionsRoute, RouteOptions};
use common::types::{Coordinate, Location, Route, RouteSet};
use log::debug;

/// Raw directions call through the configured client
pub fn get_directions(config: &Config, request: &DirectionsRequest) -> RoutingResult<Vec<DirectionsRoute>> {
    config.client()?.directions(request)
}

/// Flatten the first route of a response into one vertex sequence: legs in order, steps in
/// order, vertices in order. Junction vertices shared by consecutive steps are kept.
pub fn route_from_response(routes: &[DirectionsRoute]) -> RoutingResult<Route> {
    let Some(first) = routes.first() else {
        return Err(RoutingError::EmptyRoute);
    };

    let mut vertices = vec![];
    for step in first.legs.iter().flat_map(|leg| leg.steps.iter()) {
        vertices.extend(polyline::decode(&step.polyline.points)?);
    }

    if vertices.is_empty() {
        return Err(RoutingError::EmptyRoute);
    }

    Ok(Route(vertices))
}

pub fn fetch_route(
    provider: &dyn DirectionsProvider,
    origin: Location,
    destination: &Location,
    options: &RouteOptions,
) -> RoutingResult<Route> {
    let request = DirectionsRequest {
        origin,
        destination: destination.clone(),
        options: options.clone(),
    };
    let routes = provider.directions(&request)?;
    route_from_response(&routes)
}

/// One directions call per origin, strictly in sequence. Origins without a usable route
/// are left out of the result; any other failure ends the whole set.
pub fn fetch_routes(
    provider: &dyn DirectionsProvider,
    origins: &[Coordinate],
    destination: &Location,
    options: &RouteOptions,
) -> RoutingResult<RouteSet> {
    let mut routes = Vec::with_capacity(origins.len());

    for origin in origins {
        match fetch_route(provider, Location::Coordinate(*origin), destination, options) {
            Ok(route) => routes.push(route),
            Err(RoutingError::EmptyRoute) => {
                debug!(target: "routing", "No route from {} to {}, dropping origin", origin, destination);
            }
            Err(err) => return Err(err),
        }
    }

    debug!(target: "routing", "{} of {} origins produced a route", routes.len(), origins.len());

    Ok(RouteSet(routes))
}
