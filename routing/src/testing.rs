//! In-process directions provider that replays canned answers and records every request.
//! Clones share their script and request log, so a test can hand one clone to a `Config`
//! and inspect the requests through another.

use crate::errors::RoutingError;
use crate::polyline;
use crate::provider::{DirectionsProvider, DirectionsRequest, DirectionsRoute, RouteLeg, RouteStep};
use common::types::Coordinate;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// One route running through the given vertices
    Route(Vec<Coordinate>),
    /// No routes at all
    Empty,
    /// One route without legs
    EmptyRoute,
    /// Service level failure with this status
    Error(&'static str),
}

#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Rc<RefCell<VecDeque<ScriptedResponse>>>,
    requests: Rc<RefCell<Vec<DirectionsRequest>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Rc::new(RefCell::new(script.into())),
            requests: Rc::default(),
        }
    }

    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.borrow().clone()
    }
}

impl DirectionsProvider for ScriptedProvider {
    fn directions(&self, request: &DirectionsRequest) -> Result<Vec<DirectionsRoute>, RoutingError> {
        self.requests.borrow_mut().push(request.clone());

        // An exhausted script answers like a service without results
        let response = self.script.borrow_mut().pop_front().unwrap_or(ScriptedResponse::Empty);
        match response {
            ScriptedResponse::Route(vertices) => Ok(vec![route_through(&vertices)]),
            ScriptedResponse::Empty => Ok(vec![]),
            ScriptedResponse::EmptyRoute => Ok(vec![DirectionsRoute::default()]),
            ScriptedResponse::Error(status) => Err(RoutingError::Api {
                status: status.to_string(),
                message: None,
            }),
        }
    }
}

/// A single-leg, single-step route through `vertices`
pub fn route_through(vertices: &[Coordinate]) -> DirectionsRoute {
    DirectionsRoute {
        summary: String::new(),
        legs: vec![RouteLeg {
            steps: vec![RouteStep::new(polyline::encode(vertices))],
        }],
    }
}
