//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the navigation software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data exchanged with the robot base (odometry in, velocity commands out)
pub mod eqpt;

/// Network module
pub mod net;

/// Route selection request and response exchanged with the coordination service
pub mod route;
