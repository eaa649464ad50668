use crate::errors::{RoutingError, RoutingResult};
use common::types::RouteSet;
use geo::{LineString, MultiLineString};

/// Turn a route set into one multi-path geometry in vector-format order (x = lng, y = lat).
/// Path `i` is route `i`.
pub fn assemble(routes: &RouteSet) -> RoutingResult<MultiLineString<f64>> {
    if routes.is_empty() {
        return Err(RoutingError::EmptyRouteSet);
    }

    let lines = routes
        .iter()
        .map(|route| LineString::from_iter(route.0.iter().map(|c| c.to_xy())))
        .collect();

    Ok(MultiLineString::new(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::{Coordinate, Route};
    use geo::Coord;

    #[test]
    fn test_paths_are_swapped_and_ordered() {
        let routes = RouteSet(vec![
            Route(vec![Coordinate::new(51.0, -0.2), Coordinate::new(51.5, -0.1)]),
            Route(vec![Coordinate::new(52.0, 1.0), Coordinate::new(52.1, 1.1), Coordinate::new(52.2, 1.2)]),
        ]);

        let geometry = assemble(&routes).unwrap();

        assert_eq!(routes.len(), geometry.0.len());
        for (route, path) in routes.iter().zip(&geometry.0) {
            let expected: Vec<Coord<f64>> = route.0.iter().map(|c| Coord { x: c.lng, y: c.lat }).collect();
            assert_eq!(expected, path.0);
        }
    }

    #[test]
    fn test_empty_route_set() {
        assert!(matches!(assemble(&RouteSet::default()), Err(RoutingError::EmptyRouteSet)));
    }
}
