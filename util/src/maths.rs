//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Quaternion, UnitQuaternion};
use num_traits::Float;

/// Get the heading (yaw, rotation about +Z) encoded by an orientation
/// quaternion given in `(x, y, z, w)` order.
///
/// The result is in the range [-pi, pi], 0 being along the +X axis.
pub fn yaw_from_quaternion(q_xyzw: [f64; 4]) -> f64 {
    let q = UnitQuaternion::from_quaternion(Quaternion::new(
        q_xyzw[3], q_xyzw[0], q_xyzw[1], q_xyzw[2],
    ));

    q.euler_angles().2
}

/// Get the shortest signed angular distance to go from `from` to `to`.
///
/// The result is in the range [-pi, pi), positive meaning a rotation about
/// +Z (anticlockwise).
pub fn get_ang_dist<T>(from: T, to: T) -> T
where
    T: Float,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t: T = pi_t + pi_t;

    rem_euclid(to - from + pi_t, tau_t) - pi_t
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}
