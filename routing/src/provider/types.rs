use serde::{Deserialize, Serialize};

/// Body of a directions response. Only the parts needed to rebuild route geometry are kept.
#[derive(Deserialize, Debug)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub polyline: EncodedPolyline,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EncodedPolyline {
    pub points: String,
}

impl RouteStep {
    pub fn new(points: impl Into<String>) -> Self {
        Self { polyline: EncodedPolyline { points: points.into() } }
    }
}
