//! # Drive Equipment Communications Module
//!
//! Velocity commands sent to the robot base once per control tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A body velocity command.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct VelocityCmd {
    /// Forward speed of the robot body.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Rate of turn about the body's +Z (upwards) axis, positive turning left.
    ///
    /// Units: radians/second
    pub angular_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VelocityCmd {
    /// The zero command, bringing the robot to a stop.
    pub fn stop() -> Self {
        Self::default()
    }

    /// A turn on the spot at the given rate.
    pub fn turn(angular_rads: f64) -> Self {
        Self {
            linear_ms: 0.0,
            angular_rads,
        }
    }

    /// Returns true if this command has no linear or angular component.
    pub fn is_stop(&self) -> bool {
        self.linear_ms == 0.0 && self.angular_rads == 0.0
    }
}
