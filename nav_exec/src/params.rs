//! # Navigation Executable Parameters
//!
//! This module provides parameters for the navigation executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest accepted tick period.
///
/// Units: seconds
pub const MAX_TICK_PERIOD_S: f64 = 60.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavExecParams {
    /// Target period of one control tick.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Number of consecutive overrunning cycles after which an error is logged
    #[serde(default = "default_overrun_warn_limit")]
    pub overrun_warn_limit: u64,

    /// Pose samples older than this are still used, but a warning is logged.
    ///
    /// Units: seconds
    #[serde(default = "default_max_pose_age_s")]
    pub max_pose_age_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NavExecParamsError {
    #[error(
        "Invalid tick period {0} s, expected greater than 0 and at most {} s",
        MAX_TICK_PERIOD_S
    )]
    InvalidTickPeriod(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavExecParams {
    /// The tick period as a duration, rejecting periods which are not positive, not finite or
    /// longer than [`MAX_TICK_PERIOD_S`].
    pub fn tick_period(&self) -> Result<Duration, NavExecParamsError> {
        if self.tick_period_s > 0.0 && self.tick_period_s <= MAX_TICK_PERIOD_S {
            Ok(Duration::from_secs_f64(self.tick_period_s))
        } else {
            Err(NavExecParamsError::InvalidTickPeriod(self.tick_period_s))
        }
    }
}

impl Default for NavExecParams {
    fn default() -> Self {
        Self {
            tick_period_s: 0.05,
            overrun_warn_limit: default_overrun_warn_limit(),
            max_pose_age_s: default_max_pose_age_s(),
        }
    }
}

fn default_overrun_warn_limit() -> u64 {
    20
}

fn default_max_pose_age_s() -> f64 {
    0.5
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use util::params::{self, LoadError};

    #[test]
    fn test_overrun_limit_default() -> Result<(), LoadError> {
        let p: NavExecParams = params::from_str("tick_period_s = 0.1")?;

        assert_eq!(p.tick_period_s, 0.1);
        assert_eq!(p.overrun_warn_limit, 20);
        assert_eq!(p.max_pose_age_s, 0.5);

        Ok(())
    }

    #[test]
    fn test_tick_period() {
        let mut p = NavExecParams::default();
        assert_eq!(p.tick_period().ok(), Some(Duration::from_millis(50)));

        for &bad in [0.0, -0.05, std::f64::NAN, std::f64::INFINITY, 120.0].iter() {
            p.tick_period_s = bad;
            assert!(matches!(
                p.tick_period(),
                Err(NavExecParamsError::InvalidTickPeriod(_))
            ));
        }
    }
}
