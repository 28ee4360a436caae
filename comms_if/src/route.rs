//! # Route Selection Interface
//!
//! The navigation executable asks the coordination service which route it should drive by sending
//! a [`RouteRequest`]. The service answers with a [`RouteResponse`] naming a shape from the
//! waypoint catalog, or `null` for the default route.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Response from the coordination service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteResponse {
    /// Name of the selected shape, `None` selects the default route.
    #[serde(default)]
    pub shape: Option<String>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A request sent to the coordination service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum RouteRequest {
    /// Ask which shape should be driven next
    Shape,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RouteRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl RouteResponse {
    /// Parse a response from the service's JSON reply.
    ///
    /// Unknown fields are ignored so that the service may send additional information.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}
