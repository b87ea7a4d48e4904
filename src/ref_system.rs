//! # Perifocal → inertial frame transform
//!
//! The propagator computes position and velocity in the perifocal (PQW) frame, where the
//! x-axis points to periapsis and the z-axis is normal to the orbital plane. This module
//! rotates those vectors into the Earth-centered inertial frame of the element set.
//!
//! The rotation is composed from elementary axis rotations:
//!
//! ```text
//! R = R₃(−Ω) · R₁(−i) · R₃(−ω)
//! ```
//!
//! where `Rₖ(θ)` is the *frame* rotation about axis `k`. [`rotmt`] builds the equivalent
//! *vector* rotation (`Rₖ(−θ)`), so the product reads `rotmt(Ω, Z) · rotmt(i, X) · rotmt(ω, Z)`.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;

/// Cartesian axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Build a rotation matrix around one of the principal axes.
///
/// The rotation is applied to the vector in a fixed frame (direct sense, counter-clockwise
/// when looking down the axis toward the origin), not a change of basis.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `axis`: axis of rotation.
///
/// Return
/// ------
/// * An orthonormal 3×3 matrix `R` such that the rotated vector is `x' = R · x`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation matrix from the perifocal frame to the inertial frame.
///
/// Arguments
/// ---------
/// * `raan`: right ascension of the ascending node Ω (radians).
/// * `inclination`: inclination i (radians).
/// * `arg_perigee`: argument of perigee ω (radians).
///
/// Return
/// ------
/// * The orthonormal matrix `R₃(−Ω)·R₁(−i)·R₃(−ω)`.
///
/// See also
/// --------
/// * [`PerifocalRotation`] – keeps the matrix around to rotate several vectors.
pub fn perifocal_to_inertial(raan: Radian, inclination: Radian, arg_perigee: Radian) -> Matrix3<f64> {
    rotmt(raan, Axis::Z) * rotmt(inclination, Axis::X) * rotmt(arg_perigee, Axis::Z)
}

/// Perifocal → inertial rotation for one orbit orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerifocalRotation {
    matrix: Matrix3<f64>,
}

impl PerifocalRotation {
    pub fn new(raan: Radian, inclination: Radian, arg_perigee: Radian) -> Self {
        PerifocalRotation {
            matrix: perifocal_to_inertial(raan, inclination, arg_perigee),
        }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Rotate a perifocal position and velocity into the inertial frame.
    ///
    /// Return
    /// ------
    /// * `(position, velocity)` in the inertial frame, same units as the input.
    pub fn apply(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        (self.matrix * position, self.matrix * velocity)
    }
}
