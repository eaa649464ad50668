use std::fmt;
use std::fmt::Formatter;

#[derive(thiserror::Error, Debug)]
pub struct ParseTravelModeError(pub String);

impl fmt::Display for ParseTravelModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown travel mode '{}'. Supported modes are driving, walking, bicycling and transit",
            self.0
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub struct EmptyCrsError;

impl fmt::Display for EmptyCrsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "A coordinate reference system must not be empty")
    }
}
