//! # Route module
//!
//! A route is the ordered sequence of waypoints the robot drives in one run. Routes are picked by
//! name from a [`ShapeCatalog`] and loaded into a [`WaypointQueue`], from which the navigation
//! controller dequeues one waypoint per leg.
//!
//! The name of the route is obtained from a [`ShapeSource`], normally the coordination service,
//! through a [`RouteSelector`] which keeps the request off the control loop.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod catalog;
mod queue;
mod selector;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashMap;

use crate::nav_ctrl::Pose;

pub use catalog::*;
pub use queue::*;
pub use selector::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Route parameters, loaded from `route.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteParams {
    /// Retry policy for route selection requests
    pub retry: RetryParams,

    /// Additional shapes to add to the built-in catalog
    #[serde(default)]
    pub shapes: HashMap<String, Vec<Pose>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while selecting, loading or consuming a route.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RouteError {
    /// The route has no waypoints left. This is the normal end of a route.
    #[error("The waypoint queue is empty")]
    EmptyQueue,

    #[error("No shape named {0:?} in the catalog")]
    UnknownShape(String),

    #[error("Could not reach the route selection service: {0}")]
    TransportUnavailable(String),

    #[error("Invalid response from the route selection service: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use util::params::{self, LoadError};

    #[test]
    fn test_route_params() -> Result<(), LoadError> {
        let route_params: RouteParams = params::from_str(
            r#"
            [retry]
            max_attempts = 3
            initial_backoff_s = 0.25
            max_backoff_s = 1.0

            [shapes]
            line = [{ x = 2.0, y = 0.0 }, { x = 0.0, y = 0.0, theta = 3.0 }]
            "#,
        )?;

        assert_eq!(route_params.retry.max_attempts, 3);

        let catalog = ShapeCatalog::with_shapes(route_params.shapes);
        let line = catalog.get(Some("line")).unwrap();
        assert_eq!(line.len(), 2);
        assert_eq!((line[0].x, line[0].y, line[0].theta), (2.0, 0.0, 0.0));
        assert_eq!(line[1].theta, 3.0);

        Ok(())
    }

    #[test]
    fn test_route_params_without_shapes() -> Result<(), LoadError> {
        let route_params: RouteParams = params::from_str(
            "[retry]\nmax_attempts = 1\ninitial_backoff_s = 0.0\nmax_backoff_s = 0.0\n",
        )?;

        assert!(route_params.shapes.is_empty());

        Ok(())
    }
}
