//! # Navigation library.
//!
//! This library allows other crates in the workspace, as well as the benchmarks, to access items
//! defined inside the navigation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Navigation control module - drives the robot through the waypoints of a route
pub mod nav_ctrl;

/// Routes - the shape catalog, the waypoint queue and route selection
pub mod route;

/// Route client - asks the coordination service which route to drive
pub mod route_client;

/// Odometry client - receives pose samples from the robot base
pub mod odom_client;

/// Drive client - sends velocity commands to the robot base
pub mod drive_client;

/// Tick timer - paces the main loop
pub mod tick;

/// Executable parameters
pub mod params;
