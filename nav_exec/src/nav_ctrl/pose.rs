//! Pose and rotation value types
//!
//! Both types are plain `Copy` values. Every operation returns a new value, so a pose stored as a
//! leg origin is never changed by arithmetic on the current or target pose.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::odom::PoseSample;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use util::maths::yaw_from_quaternion;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum per-axis position difference for two poses to be considered equal.
pub const POSE_TOLERANCE_M: f64 = 0.1;

/// Maximum heading difference for two rotations to be considered equal.
pub const ROTATION_TOLERANCE_RAD: f64 = 0.05;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Planar position and heading of the robot.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position along the X axis
    ///
    /// Units: meters
    pub x: f64,

    /// Position along the Y axis
    ///
    /// Units: meters
    pub y: f64,

    /// Heading, measured anticlockwise from the +X axis
    ///
    /// Units: radians
    #[serde(default)]
    pub theta: f64,
}

/// A heading with a flag marking whether the robot has settled on it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rotation {
    /// Units: radians
    pub theta: f64,

    /// Set by the controller once the rotate phase of the leg is complete.
    pub rotated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Build a pose from an odometry sample, using the yaw of the sample's orientation as the
    /// heading.
    pub fn from_sample(sample: &PoseSample) -> Self {
        Self {
            x: sample.position_m[0],
            y: sample.position_m[1],
            theta: yaw_from_quaternion(sample.orientation_q),
        }
    }

    /// Position equality.
    ///
    /// Two poses are equal if both their X and Y coordinates differ by no more than
    /// [`POSE_TOLERANCE_M`]. Heading is not compared.
    pub fn equals(&self, other: &Pose) -> bool {
        self.within(other, POSE_TOLERANCE_M)
    }

    /// Position equality with an explicit per-axis tolerance.
    pub fn within(&self, other: &Pose, tolerance_m: f64) -> bool {
        (self.x - other.x).abs() <= tolerance_m && (self.y - other.y).abs() <= tolerance_m
    }

    /// Vector from this pose to `target`.
    pub fn vector_to(&self, target: &Pose) -> Vector2<f64> {
        Vector2::new(target.x - self.x, target.y - self.y)
    }

    /// Straight line distance from this pose to `target`.
    pub fn distance_to(&self, target: &Pose) -> f64 {
        self.vector_to(target).norm()
    }

    /// Heading from this pose's position towards `target`, in the range [-pi, pi].
    pub fn bearing_to(&self, target: &Pose) -> f64 {
        let v = self.vector_to(target);
        v[1].atan2(v[0])
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={:.2}, y={:.2}, theta={:.2})", self.x, self.y, self.theta)
    }
}

impl Rotation {
    /// Create a new, not yet settled, rotation.
    pub fn new(theta: f64) -> Self {
        Self {
            theta,
            rotated: false,
        }
    }

    /// Heading equality.
    ///
    /// Two rotations are equal if their headings differ by no more than
    /// [`ROTATION_TOLERANCE_RAD`]. The `rotated` flag is not compared.
    pub fn equals(&self, other: &Rotation) -> bool {
        self.within(other, ROTATION_TOLERANCE_RAD)
    }

    /// Heading equality with an explicit tolerance.
    pub fn within(&self, other: &Rotation, tolerance_rad: f64) -> bool {
        (self.theta - other.theta).abs() <= tolerance_rad
    }

    /// Returns a copy of this rotation marked as settled.
    pub fn settled(&self) -> Self {
        Self {
            theta: self.theta,
            rotated: true,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(theta={:.2})", self.theta)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_pose_equality() {
        let a = Pose::new(1.0, 1.0, 0.0);

        assert!(a.equals(&Pose::new(1.05, 0.95, 0.0)));
        assert!(a.equals(&Pose::new(1.0, 1.0, 3.0)));
        assert!(!a.equals(&Pose::new(1.2, 1.0, 0.0)));
        assert!(!a.equals(&Pose::new(1.0, 0.85, 0.0)));

        // Equality is symmetric
        let b = Pose::new(0.92, 1.07, -1.0);
        assert_eq!(a.equals(&b), b.equals(&a));
    }

    #[test]
    fn test_rotation_equality() {
        let a = Rotation::new(0.5);

        assert!(a.equals(&Rotation::new(0.54)));
        assert!(a.equals(&Rotation::new(0.46).settled()));
        assert!(!a.equals(&Rotation::new(0.56)));
        assert!(!a.equals(&Rotation::new(0.44)));
    }

    #[test]
    fn test_vector_ops() {
        let origin = Pose::new(0.0, 0.0, 0.0);
        let target = Pose::new(3.0, 4.0, 0.0);

        let v = origin.vector_to(&target);
        assert_eq!((v[0], v[1]), (3.0, 4.0));
        assert_eq!(origin.distance_to(&target), 5.0);

        // Operands are left untouched
        assert_eq!((origin.x, origin.y), (0.0, 0.0));
        assert_eq!((target.x, target.y), (3.0, 4.0));
    }

    #[test]
    fn test_bearing() {
        let origin = Pose::new(0.0, 0.0, 0.0);

        assert!((origin.bearing_to(&Pose::new(1.0, 1.0, 0.0)) - FRAC_PI_4).abs() < 1e-12);
        assert!((origin.bearing_to(&Pose::new(-1.0, -1.0, 0.0)) + 3.0 * FRAC_PI_4).abs() < 1e-12);
        assert!((origin.bearing_to(&Pose::new(1.0, -1.0, 0.0)) + FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_from_sample() {
        let pose = Pose::from_sample(&PoseSample::planar(1.5, -0.5, 0.3));

        assert_eq!((pose.x, pose.y), (1.5, -0.5));
        assert!((pose.theta - 0.3).abs() < 1e-9);
    }
}
