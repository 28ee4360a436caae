//! # Odometry Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A pose estimate published by the robot base's odometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PoseSample {
    /// UTC timestamp at which the estimate was made
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Position `(x, y, z)` in the odometry frame, in meters
    pub position_m: [f64; 3],

    /// Orientation quaternion in `(x, y, z, w)` order
    pub orientation_q: [f64; 4],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseSample {
    /// Build a planar sample at `(x, y)` facing `yaw_rad`, timestamped now.
    pub fn planar(x_m: f64, y_m: f64, yaw_rad: f64) -> Self {
        let half = 0.5 * yaw_rad;

        Self {
            timestamp: Utc::now(),
            position_m: [x_m, y_m, 0.0],
            orientation_q: [0.0, 0.0, half.sin(), half.cos()],
        }
    }

    /// Parse a sample from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}
