//! Navigation control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for navigation control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Per-axis distance under which the robot is reported as being at the leg's target.
    pub position_tolerance_m: f64,

    /// Heading error under which the rotate phase is complete, and under which no heading
    /// correction is applied while translating.
    pub rotation_tolerance_rad: f64,

    /// A leg is complete once the remaining distance (leg length minus distance travelled) is
    /// no more than this value.
    pub arrival_threshold_m: f64,

    /// Forward speed commanded while translating.
    pub linear_speed_ms: f64,

    /// Turn rate magnitude commanded while correcting heading.
    pub angular_rate_rads: f64,

    /// If true the heading error is taken as the shortest signed angle (wrapping at +-pi)
    /// rather than the raw difference between target and current heading.
    #[serde(default)]
    pub wrap_heading_error: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            position_tolerance_m: 0.1,
            rotation_tolerance_rad: 0.05,
            arrival_threshold_m: 0.1,
            linear_speed_ms: 0.5,
            angular_rate_rads: 0.5,
            wrap_heading_error: false,
        }
    }
}
