//! # Navigation control module
//!
//! Navigation control drives the robot through the waypoints of a route, one leg at a time. Each
//! leg is split into two phases:
//!
//! - Rotating: the robot turns on the spot until its heading matches the bearing from the leg's
//!   origin to the leg's target.
//! - Translating: the robot drives forward, correcting its heading towards the target, until the
//!   distance travelled from the origin is within the arrival threshold of the leg's length.
//!
//! Both phases use fixed magnitude commands whose sign follows the sign of the error. Pose
//! samples are fed in with [`NavCtrl::on_pose`] and one velocity command is produced per control
//! tick by [`NavCtrl::step`]. The first pose sample also triggers the selection of the route,
//! which is loaded into the [`WaypointQueue`](crate::route::WaypointQueue).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod pose;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use pose::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during NavCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    /// A leg is active but no pose is known. Cannot happen while pose ingestion and ticking are
    /// driven from the same loop.
    #[error("No pose has been received")]
    NoPose,
}
