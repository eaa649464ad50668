use super::types::{DirectionsResponse, DirectionsRoute};
use super::{DirectionsProvider, DirectionsRequest};
use crate::errors::RoutingError;
use log::{debug, error};
use reqwest::blocking::Client;
use reqwest::StatusCode;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api";

pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
        })
    }

    fn query(&self, request: &DirectionsRequest) -> Vec<(&'static str, String)> {
        let options = &request.options;
        let mut query = vec![
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", options.mode.to_string()),
            ("region", options.region.clone()),
            ("alternatives", options.alternatives.to_string()),
        ];
        if let Some(departure_time) = options.departure_time {
            query.push(("departure_time", departure_time.timestamp().to_string()));
        }
        if let Some(arrival_time) = options.arrival_time {
            query.push(("arrival_time", arrival_time.timestamp().to_string()));
        }
        query.push(("key", self.api_key.clone()));
        query
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<Vec<DirectionsRoute>, RoutingError> {
        let url = format!("{BASE_URL}/directions/json");
        debug!(
            target: "routing",
            "Requesting {} directions {} -> {}",
            request.options.mode, request.origin, request.destination
        );

        let response = self.client.get(&url).query(&self.query(request)).send()?;
        let status = response.status();
        let text = response.text()?;

        parse_response(status, &text)
    }
}

/// `OK` and `ZERO_RESULTS` are answers, every other status or a non-2xx reply is a failure
pub(crate) fn parse_response(status: StatusCode, text: &str) -> Result<Vec<DirectionsRoute>, RoutingError> {
    if !status.is_success() {
        error!(target: "routing", "Directions service returned HTTP {}. Body: {}", status, text);
        return Err(RoutingError::Api {
            status: status.to_string(),
            message: Some(text.to_string()),
        });
    }

    let body: DirectionsResponse = serde_json::from_str(text).map_err(|e| {
        error!(target: "routing", "Failed to parse directions response: {}. Body: {}", e, text);
        e
    })?;

    match body.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(body.routes),
        _ => Err(RoutingError::Api {
            status: body.status,
            message: body.error_message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RouteOptions;
    use chrono::{TimeZone, Utc};
    use common::types::{Coordinate, Location, TravelMode};

    #[test]
    fn test_query_parameters() {
        let client = GoogleDirectionsClient::new("secret".to_string()).unwrap();
        let request = DirectionsRequest {
            origin: Location::Coordinate(Coordinate::new(51.45, -0.2)),
            destination: Location::Address("Westminster, London".to_string()),
            options: RouteOptions {
                mode: TravelMode::Transit,
                departure_time: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
                ..RouteOptions::default()
            },
        };

        let query = client.query(&request);
        let get = |key: &str| query.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());

        assert_eq!(Some("51.45,-0.2"), get("origin"));
        assert_eq!(Some("Westminster, London"), get("destination"));
        assert_eq!(Some("transit"), get("mode"));
        assert_eq!(Some("uk"), get("region"));
        assert_eq!(Some("true"), get("alternatives"));
        assert_eq!(Some("1700000000"), get("departure_time"));
        assert_eq!(None, get("arrival_time"));
        assert_eq!(Some("secret"), get("key"));
    }

    // Trimmed directions body: one route, two legs, the second with two steps
    const OK_BODY: &str = r#"{
        "geocoded_waypoints": [{"geocoder_status": "OK", "place_id": "ChIJ"}],
        "routes": [{
            "bounds": {"northeast": {"lat": 43.252, "lng": -120.2}, "southwest": {"lat": 38.5, "lng": -126.453}},
            "copyrights": "Map data",
            "summary": "A1",
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"},
            "warnings": [],
            "legs": [
                {"distance": {"text": "1 km", "value": 1000},
                 "steps": [{"travel_mode": "WALKING", "polyline": {"points": "_p~iF~ps|U"}}]},
                {"distance": {"text": "2 km", "value": 2000},
                 "steps": [
                    {"travel_mode": "WALKING", "polyline": {"points": "_flwFn`faV"}},
                    {"travel_mode": "WALKING", "polyline": {"points": "_t~fGfzxbW"}}
                 ]}
            ]
        }],
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_ok_body() {
        let routes = parse_response(StatusCode::OK, OK_BODY).unwrap();

        assert_eq!(1, routes.len());
        assert_eq!("A1", routes[0].summary);
        assert_eq!(2, routes[0].legs.len());
        assert_eq!("_p~iF~ps|U", routes[0].legs[0].steps[0].polyline.points);
        assert_eq!("_t~fGfzxbW", routes[0].legs[1].steps[1].polyline.points);
    }

    #[test]
    fn test_parse_zero_results() {
        let body = r#"{"geocoded_waypoints": [], "routes": [], "status": "ZERO_RESULTS"}"#;
        assert!(parse_response(StatusCode::OK, body).unwrap().is_empty());

        // Some replies leave the routes out entirely
        assert!(parse_response(StatusCode::OK, r#"{"status": "ZERO_RESULTS"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_service_error() {
        let body = r#"{
            "error_message": "The provided API key is invalid.",
            "routes": [],
            "status": "REQUEST_DENIED"
        }"#;

        let result = parse_response(StatusCode::OK, body);

        assert!(matches!(
            result,
            Err(RoutingError::Api { status, message: Some(message) })
                if status == "REQUEST_DENIED" && message == "The provided API key is invalid."
        ));
    }

    #[test]
    fn test_parse_http_error() {
        let result = parse_response(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");

        assert!(matches!(
            result,
            Err(RoutingError::Api { status, message: Some(message) })
                if status.starts_with("502") && message.contains("Bad Gateway")
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_response(StatusCode::OK, "not json"), Err(RoutingError::Parse(_))));
    }
}
