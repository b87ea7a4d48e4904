#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;
use orbitguard::constants::{ObjectId, RADEG};
use orbitguard::orbital_elements::OrbitalElements;
use orbitguard::state_vector::StateVector;

pub const EPOCH: f64 = 2460000.0;

/// ISS-like low Earth orbit.
pub fn iss_elements() -> OrbitalElements {
    OrbitalElements::from_degrees(EPOCH, 15.5, 0.0001, 51.6, 45.0, 30.0, 0.0).unwrap()
}

/// Sun-synchronous-like polar orbit.
pub fn polar_elements() -> OrbitalElements {
    OrbitalElements::from_degrees(EPOCH, 14.2, 0.0012, 98.7, 120.0, 60.0, 10.0).unwrap()
}

/// Same plane as [`iss_elements`], trailing by `lag_deg` of mean anomaly.
pub fn trailing_iss(lag_deg: f64) -> OrbitalElements {
    let mut elem = iss_elements();
    elem.mean_anomaly -= lag_deg * RADEG;
    elem
}

/// Snapshot on the x-axis moving along +y.
pub fn snapshot(x_km: f64) -> StateVector {
    StateVector::new(
        EPOCH,
        Vector3::new(x_km, 0.0, 0.0),
        Vector3::new(0.0, 7.5, 0.0),
    )
    .unwrap()
}

pub fn ids(encounters: &[orbitguard::Encounter]) -> Vec<(ObjectId, ObjectId)> {
    encounters
        .iter()
        .map(|e| (e.object_a.clone(), e.object_b.clone()))
        .collect()
}

pub fn assert_state_close(actual: &StateVector, expected: &StateVector, epsilon: f64) {
    assert_relative_eq!(actual.time, expected.time, epsilon = epsilon);
    for k in 0..3 {
        assert_relative_eq!(actual.position[k], expected.position[k], epsilon = epsilon);
        assert_relative_eq!(actual.velocity[k], expected.velocity[k], epsilon = epsilon);
    }
}
