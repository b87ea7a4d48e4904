//! # Conjunction screening
//!
//! Exhaustive pairwise search for close approaches between propagated objects.
//!
//! ## Components
//!
//! * [`ScreeningParams`] / [`ScreeningParamsBuilder`] – threshold, synchronization
//!   tolerance, output capacity and the [`RiskConfig`] used to score encounters.
//! * [`encounter`] – the [`Encounter`] record, the [`EncounterSetExt`] ranking and filtering
//!   services, and the [`ScreeningReport`] summary.
//! * [`screener`] – [`ConjunctionScreener`], which runs the pair loop on the rayon pool.
//!
//! ## Algorithm
//!
//! For every unordered pair `(i, j)` with `i < j`, the two time series are walked together
//! and only samples whose timestamps differ by less than the synchronization tolerance are
//! compared. The minimum distance, its time and the relative speed at that instant are
//! tracked, and at most one [`Encounter`] per pair is emitted when the minimum is within the
//! threshold. Cost is `O(N²·T)` for `T` samples per object, `O(N²)` for snapshots.
//!
//! Degenerate entries (empty series, non-finite samples, duplicate identifiers, series
//! whose timestamps go backwards) are skipped with a log warning rather than failing the
//! whole call.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use orbitguard::constants::ObjectId;
//! use orbitguard::screening::{ConjunctionScreener, ScreeningParams};
//! use orbitguard::state_vector::StateVector;
//!
//! let v = Vector3::new(0.0, 7.5, 0.0);
//! let objects = vec![
//!     (ObjectId::from("A"), StateVector::new(2460000.0, Vector3::new(6800.0, 0.0, 0.0), v).unwrap()),
//!     (ObjectId::from("B"), StateVector::new(2460000.0, Vector3::new(6801.0, 0.0, 0.0), v).unwrap()),
//! ];
//!
//! let params = ScreeningParams::builder().max_distance_km(5.0).build().unwrap();
//! let encounters = ConjunctionScreener::new(params).screen_snapshot(&objects).unwrap();
//! assert_eq!(encounters.len(), 1);
//! ```
use std::cmp::Ordering::Greater;
use std::fmt;

use nalgebra::Vector3;

use crate::constants::{Kilometer, KmPerSec, SCREENING_DISTANCE_KM, SYNC_TOLERANCE_DAYS};
use crate::orbitguard_errors::OrbitGuardError;
use crate::risk::RiskConfig;
use crate::state_vector::StateVector;

pub mod encounter;
pub mod screener;

pub use encounter::{Encounter, EncounterSetExt, ScreeningReport};
pub use screener::ConjunctionScreener;

/// Euclidean distance between two positions (km).
#[inline]
pub fn distance3d(a: &Vector3<f64>, b: &Vector3<f64>) -> Kilometer {
    (a - b).norm()
}

/// Magnitude of the velocity difference between two states (km/s).
#[inline]
pub fn relative_velocity(a: &StateVector, b: &StateVector) -> KmPerSec {
    a.relative_speed(b)
}

/// Configuration of a screening run.
///
/// Fields
/// -----------------
/// * `max_distance_km` – pairs whose minimum distance is at most this value yield an
///   encounter.
/// * `sync_tolerance_days` – two samples are compared only if their timestamps differ by
///   strictly less than this value (time-series screening only).
/// * `max_encounters` – output capacity. Exceeding it fails the run with
///   [`OrbitGuardError::InsufficientCapacity`] instead of truncating. `None` means unbounded.
/// * `risk` – severity bands and probability model applied to each encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningParams {
    pub max_distance_km: Kilometer,
    pub sync_tolerance_days: f64,
    pub max_encounters: Option<usize>,
    pub risk: RiskConfig,
}

impl Default for ScreeningParams {
    fn default() -> Self {
        ScreeningParams {
            max_distance_km: SCREENING_DISTANCE_KM,
            sync_tolerance_days: SYNC_TOLERANCE_DAYS,
            max_encounters: None,
            risk: RiskConfig::default(),
        }
    }
}

impl ScreeningParams {
    pub fn builder() -> ScreeningParamsBuilder {
        ScreeningParamsBuilder::new()
    }

    /// Check the parameter invariants.
    ///
    /// Validation rules
    /// ----------------
    /// * `max_distance_km ≥ 0` and finite.
    /// * `sync_tolerance_days > 0` and finite.
    /// * `max_encounters ≥ 1` when set.
    /// * `risk` passes [`RiskConfig::validate`].
    pub fn validate(&self) -> Result<(), OrbitGuardError> {
        if !(self.max_distance_km >= 0.0) || !self.max_distance_km.is_finite() {
            return Err(OrbitGuardError::InvalidScreeningParameter(format!(
                "max_distance_km must be a finite non-negative value, got {}",
                self.max_distance_km
            )));
        }
        if self.sync_tolerance_days.partial_cmp(&0.0) != Some(Greater)
            || !self.sync_tolerance_days.is_finite()
        {
            return Err(OrbitGuardError::InvalidScreeningParameter(format!(
                "sync_tolerance_days must be > 0, got {}",
                self.sync_tolerance_days
            )));
        }
        if self.max_encounters == Some(0) {
            return Err(OrbitGuardError::InvalidScreeningParameter(
                "max_encounters must be at least 1".into(),
            ));
        }
        self.risk.validate()
    }
}

/// Builder for [`ScreeningParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ScreeningParamsBuilder {
    params: ScreeningParams,
}

impl ScreeningParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ScreeningParams::default(),
        }
    }

    pub fn max_distance_km(mut self, v: f64) -> Self {
        self.params.max_distance_km = v;
        self
    }
    pub fn sync_tolerance_days(mut self, v: f64) -> Self {
        self.params.sync_tolerance_days = v;
        self
    }
    pub fn max_encounters(mut self, v: usize) -> Self {
        self.params.max_encounters = Some(v);
        self
    }
    pub fn risk(mut self, v: RiskConfig) -> Self {
        self.params.risk = v;
        self
    }

    /// Finalize the builder, see [`ScreeningParams::validate`] for the rules.
    pub fn build(self) -> Result<ScreeningParams, OrbitGuardError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for ScreeningParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capacity = match self.max_encounters {
            Some(n) => n.to_string(),
            None => "unbounded".to_string(),
        };
        if f.alternate() {
            writeln!(f, "Screening Parameters")?;
            writeln!(f, "--------------------")?;
            writeln!(f, "  max_distance_km     = {:.3} km", self.max_distance_km)?;
            writeln!(
                f,
                "  sync_tolerance_days = {:.3e} d ({:.3} s)",
                self.sync_tolerance_days,
                self.sync_tolerance_days * crate::constants::SECONDS_PER_DAY
            )?;
            writeln!(f, "  max_encounters      = {capacity}")?;
            write!(f, "{:#}", self.risk)
        } else {
            write!(
                f,
                "ScreeningParams(max_distance={} km, sync_tol={:.3e} d, capacity={}, {})",
                self.max_distance_km, self.sync_tolerance_days, capacity, self.risk
            )
        }
    }
}

#[cfg(test)]
mod screening_params_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_defaults() {
        let p = ScreeningParams::default();
        assert_eq!(p.max_distance_km, 100.0);
        assert_abs_diff_eq!(p.sync_tolerance_days * 86_400.0, 1.0, epsilon = 1e-12);
        assert_eq!(p.max_encounters, None);
        assert_eq!(p.risk, RiskConfig::default());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        let p = ScreeningParams::builder()
            .max_distance_km(5.0)
            .max_encounters(10)
            .build()
            .unwrap();
        assert_eq!(p.max_encounters, Some(10));

        for bad in [
            ScreeningParams::builder().max_distance_km(-1.0).build(),
            ScreeningParams::builder().max_distance_km(f64::NAN).build(),
            ScreeningParams::builder().sync_tolerance_days(0.0).build(),
            ScreeningParams::builder().max_encounters(0).build(),
        ] {
            assert!(matches!(
                bad,
                Err(OrbitGuardError::InvalidScreeningParameter(_))
            ));
        }
    }

    #[test]
    fn test_embedded_risk_config_is_validated() {
        let inverted = RiskConfig {
            logistic_k: -0.05,
            ..RiskConfig::default()
        };
        assert!(matches!(
            ScreeningParams::builder().risk(inverted).build(),
            Err(OrbitGuardError::InvalidRiskParameter(_))
        ));

        let params = ScreeningParams {
            risk: inverted,
            ..ScreeningParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(OrbitGuardError::InvalidRiskParameter(_))
        ));
    }

    #[test]
    fn test_helpers() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 6.0, 3.0);
        assert_abs_diff_eq!(distance3d(&a, &b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance3d(&b, &a), 5.0, epsilon = 1e-12);
        assert_eq!(distance3d(&a, &a), 0.0);

        let s1 = StateVector::new(0.0, a, Vector3::new(1.0, 0.0, 0.0)).unwrap();
        let s2 = StateVector::new(0.0, b, Vector3::new(1.0, 3.0, 4.0)).unwrap();
        assert_abs_diff_eq!(relative_velocity(&s1, &s2), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        let p = ScreeningParams::default();
        assert!(format!("{p}").contains("capacity=unbounded"));
        assert!(format!("{p:#}").contains("Risk Configuration"));
    }
}
