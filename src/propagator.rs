//! # Analytic propagator
//!
//! Mean elements + elapsed time → inertial state vector.
//!
//! ## Pipeline
//!
//! 1. Validate the element invariants (`e ∈ [0, 1)`, `n > 0`) **before** any solving.
//! 2. Apply the J2 secular drift ([`apply_j2_secular`]).
//! 3. Derive `a` from the corrected mean motion and advance the mean anomaly
//!    `M = M₀ + n·Δt`, wrapped into `[0, 2π)`.
//! 4. Solve Kepler's equation for `E` ([`crate::kepler::solve_kepler_equation`]).
//! 5. Build the perifocal state:
//!
//! ```text
//! r   = a(1 − e·cos E)
//! p   = a(1 − e²)
//! r⃗ₚ  = (r·cos ν, r·sin ν, 0)
//! v⃗ₚ  = √(μ/p) · (−sin ν, e + cos ν, 0)
//! ```
//!
//! 6. Rotate both vectors into the inertial frame ([`PerifocalRotation`]).
//!
//! A state with a non-finite component is never returned as a success; the whole call
//! fails with [`OrbitGuardError::NonFiniteResult`].
//!
//! ## Batch use
//!
//! [`Propagate::ephemeris`] samples one object over a minute grid and
//! [`propagate_catalog`] does the same for many objects on the rayon thread pool.
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::constants::{
    JulianDate, Minutes, ObjectId, MAX_EPHEMERIS_SAMPLES, MINUTES_PER_DAY, MU_EARTH,
};
use crate::j2::apply_j2_secular;
use crate::kepler::{
    principal_angle, solve_kepler_equation_with, true_anomaly_from_eccentric, KeplerSettings,
};
use crate::orbital_elements::OrbitalElements;
use crate::orbitguard_errors::OrbitGuardError;
use crate::ref_system::PerifocalRotation;
use crate::state_vector::StateVector;

/// Propagate an element set by `minutes_since_epoch`.
///
/// Arguments
/// ---------
/// * `elements`: mean elements, borrowed read-only.
/// * `minutes_since_epoch`: elapsed time in minutes, may be negative.
///
/// Return
/// ------
/// * `Ok(StateVector)` at `epoch + minutes/1440` (position in km, velocity in km/s).
/// * `Err(OrbitGuardError::InvalidInput)` for an eccentricity outside `[0, 1)`, a
///   non-positive mean motion or a non-finite time offset.
/// * `Err(OrbitGuardError::ConvergenceFailure | DegenerateDerivative)` from the Kepler solver.
/// * `Err(OrbitGuardError::NonFiniteResult)` if any output component is not finite.
pub fn propagate(
    elements: &OrbitalElements,
    minutes_since_epoch: Minutes,
) -> Result<StateVector, OrbitGuardError> {
    propagate_with(elements, minutes_since_epoch, &KeplerSettings::default())
}

/// Same as [`propagate`] with a caller-supplied Kepler budget.
///
/// Solver failures come back unchanged, so a tight budget surfaces as
/// `ConvergenceFailure { iterations }` with the budget's iteration count.
pub fn propagate_with(
    elements: &OrbitalElements,
    minutes_since_epoch: Minutes,
    settings: &KeplerSettings,
) -> Result<StateVector, OrbitGuardError> {
    elements.validate()?;
    if !minutes_since_epoch.is_finite() {
        return Err(OrbitGuardError::InvalidInput(
            "time offset is not finite".into(),
        ));
    }

    let corrected = apply_j2_secular(elements, minutes_since_epoch);
    let e = corrected.eccentricity;
    let a = corrected.semi_major_axis();

    let mean_anomaly = principal_angle(
        corrected.mean_anomaly + corrected.mean_motion_rad_per_min() * minutes_since_epoch,
    );
    let ecc_anomaly = solve_kepler_equation_with(mean_anomaly, e, settings)?;
    let (sin_nu, cos_nu) = true_anomaly_from_eccentric(ecc_anomaly, e);

    let r = a * (1.0 - e * ecc_anomaly.cos());
    let p = a * (1.0 - e * e);
    let vel_scale = (MU_EARTH / p).sqrt();

    let pos_pqw = Vector3::new(r * cos_nu, r * sin_nu, 0.0);
    let vel_pqw = Vector3::new(-vel_scale * sin_nu, vel_scale * (e + cos_nu), 0.0);

    let rotation = PerifocalRotation::new(corrected.raan, corrected.inclination, corrected.arg_perigee);
    let (position, velocity) = rotation.apply(&pos_pqw, &vel_pqw);

    StateVector::new(
        elements.epoch + minutes_since_epoch / MINUTES_PER_DAY,
        position,
        velocity,
    )
}

/// Number of samples on the grid `start, start + step, …, ≤ stop`.
fn grid_len(start: Minutes, stop: Minutes, step: Minutes) -> Result<usize, OrbitGuardError> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(OrbitGuardError::InvalidInput(format!(
            "ephemeris step {step} must be strictly positive"
        )));
    }
    if !start.is_finite() || !stop.is_finite() || stop < start {
        return Err(OrbitGuardError::InvalidInput(format!(
            "ephemeris window [{start}, {stop}] is empty or not finite"
        )));
    }
    // Absorb the rounding of (stop − start)/step so that an exact multiple keeps its last sample
    let intervals = ((stop - start) / step + 1e-9).floor();
    if !intervals.is_finite() || intervals >= MAX_EPHEMERIS_SAMPLES as f64 {
        return Err(OrbitGuardError::InvalidInput(format!(
            "ephemeris grid [{start}, {stop}] with step {step} exceeds {MAX_EPHEMERIS_SAMPLES} samples"
        )));
    }
    (intervals as usize).checked_add(1).ok_or_else(|| {
        OrbitGuardError::InvalidInput("ephemeris sample count overflows".into())
    })
}

/// Propagation services on an element set.
///
/// See also
/// --------
/// * [`propagate`] – the free function behind every method.
/// * [`propagate_catalog`] – parallel ephemerides for many objects.
pub trait Propagate {
    /// State at `minutes_since_epoch`.
    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, OrbitGuardError>;

    /// State at an absolute Julian date.
    fn propagate_to(&self, jd: JulianDate) -> Result<StateVector, OrbitGuardError>;

    /// States on the grid `start, start + step, …` up to and including `stop`.
    ///
    /// Arguments
    /// ---------
    /// * `start`, `stop`: minutes since epoch, `stop ≥ start`.
    /// * `step`: grid spacing in minutes, strictly positive.
    ///
    /// Return
    /// ------
    /// * The full series, or the first error encountered. No partial series is returned.
    fn ephemeris(
        &self,
        start: Minutes,
        stop: Minutes,
        step: Minutes,
    ) -> Result<Vec<StateVector>, OrbitGuardError>;
}

impl Propagate for OrbitalElements {
    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, OrbitGuardError> {
        propagate(self, minutes_since_epoch)
    }

    fn propagate_to(&self, jd: JulianDate) -> Result<StateVector, OrbitGuardError> {
        propagate(self, (jd - self.epoch) * MINUTES_PER_DAY)
    }

    fn ephemeris(
        &self,
        start: Minutes,
        stop: Minutes,
        step: Minutes,
    ) -> Result<Vec<StateVector>, OrbitGuardError> {
        let n = grid_len(start, stop, step)?;
        (0..n)
            .map(|k| propagate(self, start + k as f64 * step))
            .collect()
    }
}

/// Per-object result of [`propagate_catalog`].
pub type CatalogEphemeris = Vec<(ObjectId, Result<Vec<StateVector>, OrbitGuardError>)>;

/// Build ephemerides for a whole catalog in parallel.
///
/// Each object is sampled on the same minute grid relative to its own epoch. A failure
/// on one object does not abort the batch: it is reported in that object's slot.
///
/// Arguments
/// ---------
/// * `catalog`: objects with their mean elements.
/// * `start`, `stop`, `step`: minute grid, see [`Propagate::ephemeris`].
///
/// Return
/// ------
/// * One entry per input object, in input order.
pub fn propagate_catalog(
    catalog: &[(ObjectId, OrbitalElements)],
    start: Minutes,
    stop: Minutes,
    step: Minutes,
) -> CatalogEphemeris {
    let results: CatalogEphemeris = catalog
        .par_iter()
        .map(|(id, elements)| (id.clone(), elements.ephemeris(start, stop, step)))
        .collect();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    log::debug!(
        "Propagated {} objects ({} failed)",
        results.len(),
        failed
    );
    for (id, res) in &results {
        if let Err(e) = res {
            log::warn!("Propagation of object {id} failed: {e}");
        }
    }

    results
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use crate::constants::RADEG;
    use crate::orbital_elements::orbital_elements_test::iss_like;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_iss_state_at_epoch() {
        let state = propagate(&iss_like(), 0.0).unwrap();
        let r = state.radius();
        let v = state.speed();
        assert!((6500.0..=7000.0).contains(&r), "r = {r}");
        assert!((7.0..=7.8).contains(&v), "v = {v}");
        assert_eq!(state.time, 2460000.0);
    }

    #[test]
    fn test_output_time() {
        let state = propagate(&iss_like(), 720.0).unwrap();
        assert_abs_diff_eq!(state.time, 2460000.5, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_eccentricity_rejected() {
        let mut elem = iss_like();
        elem.eccentricity = 1.5;
        assert!(matches!(
            propagate(&elem, 0.0),
            Err(OrbitGuardError::InvalidInput(_))
        ));

        let mut elem = iss_like();
        elem.mean_motion = -1.0;
        assert!(matches!(
            propagate(&elem, 0.0),
            Err(OrbitGuardError::InvalidInput(_))
        ));

        assert!(matches!(
            propagate(&iss_like(), f64::NAN),
            Err(OrbitGuardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_equatorial_circular_position() {
        // i = Ω = ω = M = 0: the object sits on the x-axis moving along +y
        let elem = OrbitalElements::new(2460000.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let state = propagate(&elem, 0.0).unwrap();
        assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-9);
        assert!(state.position.x > 0.0);
        assert_abs_diff_eq!(state.velocity.x, 0.0, epsilon = 1e-12);
        assert!(state.velocity.y > 0.0);

        let circular_speed = (MU_EARTH / state.radius()).sqrt();
        assert_relative_eq!(state.speed(), circular_speed, max_relative = 1e-12);
    }

    #[test]
    fn test_angular_momentum_along_orbit_normal() {
        let elem = OrbitalElements::from_degrees(2460000.0, 14.2, 0.02, 98.7, 120.0, 60.0, 10.0)
            .unwrap();
        let state = propagate(&elem, 0.0).unwrap();
        let h = state.position.cross(&state.velocity).normalize();
        assert_abs_diff_eq!(h.z, (98.7 * RADEG).cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_propagate_to_matches_minutes() {
        let elem = iss_like();
        let a = elem.propagate(90.0).unwrap();
        let b = elem.propagate_to(elem.epoch + 90.0 / 1440.0).unwrap();
        assert_abs_diff_eq!(a.position, b.position, epsilon = 1e-6);
        assert_abs_diff_eq!(a.velocity, b.velocity, epsilon = 1e-9);
    }

    #[test]
    fn test_ephemeris_grid() {
        let elem = iss_like();
        let states = elem.ephemeris(0.0, 60.0, 10.0).unwrap();
        assert_eq!(states.len(), 7);
        assert_abs_diff_eq!(states[6].time, elem.epoch + 60.0 / 1440.0, epsilon = 1e-12);

        let single = elem.ephemeris(5.0, 5.0, 1.0).unwrap();
        assert_eq!(single.len(), 1);

        assert!(elem.ephemeris(0.0, 10.0, 0.0).is_err());
        assert!(elem.ephemeris(10.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_ephemeris_rejects_oversized_grid() {
        let elem = iss_like();
        assert!(matches!(
            elem.ephemeris(0.0, 10.0, 1e-300),
            Err(OrbitGuardError::InvalidInput(_))
        ));
        assert!(matches!(
            elem.ephemeris(0.0, 1e12, 1.0),
            Err(OrbitGuardError::InvalidInput(_))
        ));
        assert_eq!(grid_len(0.0, 10.0, 1e-300).ok(), None);
        assert_eq!(grid_len(0.0, 9.0, 3.0), Ok(4));

        let res = propagate_catalog(&[(ObjectId::Catalog(7), elem)], 0.0, 10.0, 1e-300);
        assert!(matches!(res[0].1, Err(OrbitGuardError::InvalidInput(_))));
    }

    #[test]
    fn test_kepler_failures_pass_through() {
        let elem = OrbitalElements::from_degrees(2460000.0, 3.0, 0.95, 63.4, 10.0, 20.0, 5.0)
            .unwrap();
        let tight = KeplerSettings {
            tolerance: 1e-15,
            max_iterations: 1,
        };
        assert_eq!(
            propagate_with(&elem, 0.0, &tight),
            Err(OrbitGuardError::ConvergenceFailure { iterations: 1 })
        );
        assert!(propagate_with(&elem, 0.0, &tight)
            .unwrap_err()
            .is_convergence_failure());

        let default = propagate_with(&elem, 0.0, &KeplerSettings::default()).unwrap();
        assert_eq!(default, propagate(&elem, 0.0).unwrap());
    }

    #[test]
    fn test_one_period_returns_close_to_start() {
        // J2 moves the node and perigee slightly, so only a loose match is expected
        let elem = iss_like();
        let start = propagate(&elem, 0.0).unwrap();
        let after = propagate(&elem, elem.period_minutes()).unwrap();
        let drift = start.distance_to(&after);
        assert!(drift < 0.02 * start.radius(), "drift = {drift}");
        assert!(after.time > start.time);
    }

    #[test]
    fn test_catalog_preserves_order_and_isolates_failures() {
        let mut broken = iss_like();
        broken.eccentricity = 2.0;
        let catalog = vec![
            (ObjectId::Catalog(1), iss_like()),
            (ObjectId::Catalog(2), broken),
            (ObjectId::from("C"), iss_like()),
        ];
        let res = propagate_catalog(&catalog, 0.0, 30.0, 10.0);
        assert_eq!(res.len(), 3);
        assert_eq!(res[0].0, ObjectId::Catalog(1));
        assert_eq!(res[1].0, ObjectId::Catalog(2));
        assert_eq!(res[2].0, ObjectId::from("C"));
        assert_eq!(res[0].1.as_ref().unwrap().len(), 4);
        assert!(matches!(res[1].1, Err(OrbitGuardError::InvalidInput(_))));
        assert!(res[2].1.is_ok());
    }
}
