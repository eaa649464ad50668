use std::convert::Infallible;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use geo::Coord;
use serde::{Deserialize, Serialize};
use crate::types::errors::ParseTravelModeError;

pub mod crs;
pub mod errors;

pub use crs::Crs;

/// A point on the globe. Fields are named on purpose: directions services expect (lat, lng),
/// vector formats store (x = lng, y = lat), and mixing the two up is easy with plain pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Vector-format order, x is the longitude
    pub fn to_xy(self) -> Coord<f64> {
        Coord { x: self.lng, y: self.lat }
    }

    pub fn from_xy(coord: Coord<f64>) -> Self {
        Self { lat: coord.y, lng: coord.x }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Ordered vertices of one path from an origin to the shared destination
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Route(pub Vec<Coordinate>);

impl Route {
    pub fn start(&self) -> Option<&Coordinate> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One route per origin that produced a usable directions result, in origin order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteSet(pub Vec<Route>);

impl RouteSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.0.iter()
    }
}

impl FromIterator<Route> for RouteSet {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Either end of a directions request
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinate(Coordinate),
    Address(String),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinate(coordinate) => write!(f, "{}", coordinate),
            Location::Address(address) => write!(f, "{}", address),
        }
    }
}

/// `"lat,lng"` becomes a coordinate, anything else is kept as an address
impl FromStr for Location {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coordinate = s
            .split_once(',')
            .and_then(|(lat, lng)| Some(Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?)));
        Ok(match coordinate {
            Some(coordinate) => Location::Coordinate(coordinate),
            None => Location::Address(s.trim().to_string()),
        })
    }
}

impl From<Coordinate> for Location {
    fn from(value: Coordinate) -> Self {
        Location::Coordinate(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    #[default]
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = ParseTravelModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(ParseTravelModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_xy_order() {
        let coord = Coordinate::new(51.5, -0.1);
        assert_eq!(Coord { x: -0.1, y: 51.5 }, coord.to_xy());
        assert_eq!(coord, Coordinate::from_xy(coord.to_xy()));
    }

    #[test]
    fn test_coordinate_display_is_lat_first() {
        assert_eq!("51.5,-0.1", Coordinate::new(51.5, -0.1).to_string());
    }

    #[test]
    fn test_location_parsing() {
        assert_eq!(Location::Coordinate(Coordinate::new(51.5, -0.1)), "51.5, -0.1".parse().unwrap());
        assert_eq!(
            Location::Address("10 Downing Street, London".to_string()),
            "10 Downing Street, London".parse().unwrap()
        );
    }

    #[test]
    fn test_travel_mode_parsing() {
        assert_eq!(TravelMode::Bicycling, "Bicycling".parse().unwrap());
        assert_eq!(TravelMode::Transit, "transit".parse().unwrap());
        assert!("flying".parse::<TravelMode>().is_err());
    }
}
