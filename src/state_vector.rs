//! Inertial state vectors produced by the propagator.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{JulianDate, KmPerSec, Kilometer};
use crate::orbitguard_errors::OrbitGuardError;

/// Earth-centered inertial state at a given time.
///
/// Units
/// -----
/// * `time`: Julian date.
/// * `position`: km.
/// * `velocity`: km/s.
///
/// A `StateVector` coming out of [`crate::propagator::propagate`] always has finite
/// components; [`StateVector::new`] enforces the same rule for caller-built states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub time: JulianDate,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    /// Build a state and reject any non-finite component.
    ///
    /// Return
    /// ------
    /// * `Err(OrbitGuardError::NonFiniteResult)` if the time, a position or a velocity
    ///   component is NaN or infinite.
    pub fn new(
        time: JulianDate,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
    ) -> Result<Self, OrbitGuardError> {
        let state = StateVector {
            time,
            position,
            velocity,
        };
        if state.is_finite() {
            Ok(state)
        } else {
            Err(OrbitGuardError::NonFiniteResult)
        }
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.position.iter().all(|x| x.is_finite())
            && self.velocity.iter().all(|x| x.is_finite())
    }

    /// Distance from the Earth center (km).
    #[inline]
    pub fn radius(&self) -> Kilometer {
        self.position.norm()
    }

    /// Speed (km/s).
    #[inline]
    pub fn speed(&self) -> KmPerSec {
        self.velocity.norm()
    }

    /// Euclidean distance between two positions (km).
    #[inline]
    pub fn distance_to(&self, other: &StateVector) -> Kilometer {
        (self.position - other.position).norm()
    }

    /// Magnitude of the velocity difference (km/s).
    #[inline]
    pub fn relative_speed(&self, other: &StateVector) -> KmPerSec {
        (self.velocity - other.velocity).norm()
    }
}

#[cfg(test)]
mod state_vector_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_distance_and_speed() {
        let a = StateVector::new(
            0.0,
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        let b = StateVector::new(
            0.0,
            Vector3::new(4.0, 5.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();

        assert_abs_diff_eq!(a.distance_to(&b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.distance_to(&a), 5.0, epsilon = 1e-12);
        assert_eq!(a.distance_to(&a), 0.0);
        assert_abs_diff_eq!(a.relative_speed(&b), 2f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(a.radius(), 3f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(b.speed(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let res = StateVector::new(
            0.0,
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::zeros(),
        );
        assert_eq!(res, Err(OrbitGuardError::NonFiniteResult));

        let res = StateVector::new(f64::INFINITY, Vector3::zeros(), Vector3::zeros());
        assert_eq!(res, Err(OrbitGuardError::NonFiniteResult));
    }
}
