//! # Kepler's equation
//!
//! Newton–Raphson solver for the elliptic Kepler equation
//!
//! ```text
//! E − e·sin(E) = M
//! ```
//!
//! relating the mean anomaly `M` to the eccentric anomaly `E` for `e ∈ [0, 1)`.
//!
//! The solver is a pure function: no shared state, identical inputs always give identical
//! outputs. It either returns an anomaly meeting the tolerance or a distinct error; it never
//! hands back a best-effort value.
//!
//! ## Starting guess
//!
//! * `e < 0.8`: `E₀ = M + e·sin(M)`
//! * `e ≥ 0.8`: `E₀ = M ± 0.85·e`, with the sign of `sin(M)`. Near periapsis the classical
//!   guess undershoots badly for very eccentric orbits and Newton needs many more steps.
//!
//! ## Failure modes
//!
//! * [`OrbitGuardError::DegenerateDerivative`] – `|1 − e·cos(E)|` fell below
//!   [`KEPLER_MIN_DERIVATIVE`].
//! * [`OrbitGuardError::ConvergenceFailure`] – the iteration budget was exhausted.
use std::fmt;

use crate::constants::{
    Radian, DPI, KEPLER_HIGH_ECCENTRICITY, KEPLER_MAX_ITERATIONS, KEPLER_MIN_DERIVATIVE,
    KEPLER_TOLERANCE,
};
use crate::orbitguard_errors::OrbitGuardError;

/// Wrap an angle in radians into the principal range [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    let wrapped = a.rem_euclid(DPI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Numerical budget for the Kepler solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSettings {
    /// Absolute tolerance on the Newton step `|ΔE|` (radians).
    pub tolerance: f64,
    /// Maximum number of Newton iterations.
    pub max_iterations: usize,
}

impl Default for KeplerSettings {
    fn default() -> Self {
        KeplerSettings {
            tolerance: KEPLER_TOLERANCE,
            max_iterations: KEPLER_MAX_ITERATIONS,
        }
    }
}

impl fmt::Display for KeplerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeplerSettings(tolerance={:.1e}, max_iterations={})",
            self.tolerance, self.max_iterations
        )
    }
}

/// Solve Kepler's equation with the default budget (tolerance `1e-10`, 30 iterations).
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` in radians, any real value (taken modulo 2π).
/// * `eccentricity`: orbital eccentricity, expected in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly `E` in radians.
///
/// See also
/// --------
/// * [`solve_kepler_equation_with`] – same solver with a caller-supplied budget.
pub fn solve_kepler_equation(mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, OrbitGuardError> {
    solve_kepler_equation_with(mean_anomaly, eccentricity, &KeplerSettings::default())
}

/// Solve Kepler's equation `E − e·sin(E) = M` by Newton–Raphson.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` in radians (wrapped into `[0, 2π)` first).
/// * `eccentricity`: orbital eccentricity in `[0, 1)`.
/// * `settings`: tolerance and iteration cap.
///
/// Return
/// ------
/// * `Ok(E)` once a Newton step smaller than `settings.tolerance` is taken.
/// * `Err(OrbitGuardError::InvalidInput)` if the eccentricity is outside `[0, 1)` or the
///   anomaly is not finite.
/// * `Err(OrbitGuardError::DegenerateDerivative)` if the slope vanishes.
/// * `Err(OrbitGuardError::ConvergenceFailure)` if the budget is exhausted.
pub fn solve_kepler_equation_with(
    mean_anomaly: Radian,
    eccentricity: f64,
    settings: &KeplerSettings,
) -> Result<Radian, OrbitGuardError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(OrbitGuardError::InvalidInput(format!(
            "eccentricity {eccentricity} outside [0, 1)"
        )));
    }
    if !mean_anomaly.is_finite() {
        return Err(OrbitGuardError::InvalidInput(
            "mean anomaly is not finite".into(),
        ));
    }

    let m = principal_angle(mean_anomaly);
    let e = eccentricity;

    let mut ecc_anomaly = if e < KEPLER_HIGH_ECCENTRICITY {
        m + e * m.sin()
    } else {
        m + 0.85 * e * if m.sin() >= 0.0 { 1.0 } else { -1.0 }
    };

    for _ in 0..settings.max_iterations {
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let f = ecc_anomaly - e * sin_e - m;
        let df = 1.0 - e * cos_e;

        if df.abs() < KEPLER_MIN_DERIVATIVE {
            return Err(OrbitGuardError::DegenerateDerivative);
        }

        let delta = f / df;
        ecc_anomaly -= delta;

        if delta.abs() < settings.tolerance {
            return Ok(ecc_anomaly);
        }
    }

    Err(OrbitGuardError::ConvergenceFailure {
        iterations: settings.max_iterations,
    })
}

/// Sine and cosine of the true anomaly ν from the eccentric anomaly E.
///
/// Uses `β = √(1 − e²)`:
///
/// ```text
/// cos ν = (cos E − e) / (1 − e·cos E)
/// sin ν = β·sin E / (1 − e·cos E)
/// ```
///
/// Return
/// ------
/// * `(sin ν, cos ν)`
pub fn true_anomaly_from_eccentric(ecc_anomaly: Radian, eccentricity: f64) -> (f64, f64) {
    let (sin_e, cos_e) = ecc_anomaly.sin_cos();
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    let denom = 1.0 - eccentricity * cos_e;
    let cos_nu = (cos_e - eccentricity) / denom;
    let sin_nu = beta * sin_e / denom;
    (sin_nu, cos_nu)
}

#[cfg(test)]
mod kepler_test {

    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn residual(ecc_anomaly: f64, e: f64, m: f64) -> f64 {
        (ecc_anomaly - e * ecc_anomaly.sin() - principal_angle(m)).abs()
    }

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-PI / 2.0), 1.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-12);
        assert_eq!(principal_angle(0.0), 0.0);
        assert!(principal_angle(-1e-18) < DPI);
    }

    #[test]
    fn test_circular_orbit_is_identity() {
        let e_anom = solve_kepler_equation(1.234, 0.0).unwrap();
        assert_abs_diff_eq!(e_anom, 1.234, epsilon = 1e-12);
    }

    #[test]
    fn test_known_solution() {
        // Vallado example 2-1: M = 235.4°, e = 0.4 → E ≈ 220.512074767522°
        let m = 235.4_f64.to_radians();
        let e_anom = solve_kepler_equation(m, 0.4).unwrap();
        assert_abs_diff_eq!(e_anom.to_degrees(), 220.512074767522, epsilon = 1e-8);
    }

    #[test]
    fn test_round_trip_random_sweep() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..5_000 {
            let e = rng.random_range(0.0..0.99);
            let m = rng.random_range(0.0..DPI);
            let e_anom = solve_kepler_equation(m, e).unwrap();
            assert!(
                residual(e_anom, e, m) < 1e-9,
                "residual too large for e={e}, M={m}"
            );
        }
    }

    #[test]
    fn test_high_eccentricity_near_periapsis() {
        for &m in &[1e-6, 1e-3, 0.05, DPI - 1e-4] {
            let e_anom = solve_kepler_equation(m, 0.95).unwrap();
            assert!(residual(e_anom, 0.95, m) < 1e-9);
        }
    }

    #[test]
    fn test_unwrapped_mean_anomaly() {
        let a = solve_kepler_equation(0.7, 0.3).unwrap();
        let b = solve_kepler_equation(0.7 + 4.0 * DPI, 0.3).unwrap();
        let c = solve_kepler_equation(0.7 - DPI, 0.3).unwrap();
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        assert_abs_diff_eq!(a, c, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_eccentricity() {
        assert!(matches!(
            solve_kepler_equation(1.0, 1.0),
            Err(OrbitGuardError::InvalidInput(_))
        ));
        assert!(matches!(
            solve_kepler_equation(1.0, -0.1),
            Err(OrbitGuardError::InvalidInput(_))
        ));
        assert!(matches!(
            solve_kepler_equation(f64::NAN, 0.1),
            Err(OrbitGuardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let settings = KeplerSettings {
            tolerance: 1e-10,
            max_iterations: 1,
        };
        let res = solve_kepler_equation_with(3.0, 0.9, &settings);
        assert_eq!(
            res,
            Err(OrbitGuardError::ConvergenceFailure { iterations: 1 })
        );
        assert!(res.unwrap_err().is_convergence_failure());
    }

    #[test]
    fn test_deterministic() {
        let a = solve_kepler_equation(2.5, 0.72).unwrap();
        let b = solve_kepler_equation(2.5, 0.72).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_true_anomaly() {
        // Circular orbit: ν = E
        let (s, c) = true_anomaly_from_eccentric(0.8, 0.0);
        assert_abs_diff_eq!(s, 0.8_f64.sin(), epsilon = 1e-15);
        assert_abs_diff_eq!(c, 0.8_f64.cos(), epsilon = 1e-15);

        // Unit circle for any e
        let (s, c) = true_anomaly_from_eccentric(2.1, 0.6);
        assert_abs_diff_eq!(s * s + c * c, 1.0, epsilon = 1e-12);

        // Periapsis and apoapsis
        let (s, c) = true_anomaly_from_eccentric(0.0, 0.5);
        assert_abs_diff_eq!(s, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(c, 1.0, epsilon = 1e-15);
        let (_, c) = true_anomaly_from_eccentric(PI, 0.5);
        assert_abs_diff_eq!(c, -1.0, epsilon = 1e-12);
    }
}
