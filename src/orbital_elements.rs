//! # Mean orbital elements
//!
//! This module defines [`OrbitalElements`], the compact orbit description consumed by the
//! propagator. It mirrors the content of a two-line element set once a collaborator has
//! parsed the text: epoch, mean motion and the five angular/shape elements, plus the drag
//! terms that are carried through untouched.
//!
//! ## Units
//!
//! - Epoch: **Julian date** (days)
//! - Mean motion: **revolutions per day**
//! - Angles: **radians**, any real value (wrapped to `[0, 2π)` where drift is applied)
//!
//! ## Validation
//!
//! [`OrbitalElements::new`] rejects records that break the invariants (`e ∈ [0, 1)`,
//! `n > 0`, finite values). The propagator re-checks the same invariants at its entry
//! point, so a record built with a struct literal is still caught before any solving.
//!
//! ## Example
//!
//! ```rust
//! use orbitguard::orbital_elements::OrbitalElements;
//!
//! let iss = OrbitalElements::from_degrees(2460000.0, 15.5, 0.0001, 51.6, 45.0, 30.0, 0.0).unwrap();
//! assert!((iss.semi_major_axis() - 6796.0).abs() < 5.0);
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, JulianDate, Kilometer, Minutes, Radian, DPI, MINUTES_PER_DAY, MU_EARTH, RADEG,
    SECONDS_PER_DAY,
};
use crate::orbitguard_errors::OrbitGuardError;

/// Drag-related terms of a two-line element set.
///
/// The analytic propagator ignores them. They are kept so that a record read from a
/// catalog can be written back without loss.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragTerms {
    /// B* drag term (1/earth radii)
    pub bstar: f64,
    /// First derivative of mean motion (rev/day²)
    pub ndot: f64,
    /// Second derivative of mean motion (rev/day³)
    pub nddot: f64,
}

/// Mean orbital elements of an Earth-orbiting object.
///
/// Units
/// -----
/// * `epoch`: Julian date.
/// * `mean_motion`: revolutions per day.
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`: radians.
/// * `raan`: radians (Ω, right ascension of the ascending node).
/// * `arg_perigee`: radians (ω).
/// * `mean_anomaly`: radians (M at epoch).
///
/// See also
/// --------
/// * [`crate::propagator::propagate`] – state vector at a time offset.
/// * [`crate::j2::apply_j2_secular`] – secular drift of Ω, ω and n.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub epoch: JulianDate,
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub raan: Radian,
    pub arg_perigee: Radian,
    pub mean_anomaly: Radian,
    pub drag: Option<DragTerms>,
}

impl OrbitalElements {
    /// Build a validated element set from angles in radians.
    ///
    /// Arguments
    /// ---------
    /// * `epoch` – Julian date of the elements.
    /// * `mean_motion` – revolutions per day, strictly positive.
    /// * `eccentricity` – in `[0, 1)`.
    /// * `inclination`, `raan`, `arg_perigee`, `mean_anomaly` – radians, finite.
    ///
    /// Return
    /// ------
    /// * `Ok(OrbitalElements)` without drag terms.
    /// * `Err(OrbitGuardError::InvalidInput)` if any invariant is broken.
    pub fn new(
        epoch: JulianDate,
        mean_motion: f64,
        eccentricity: f64,
        inclination: Radian,
        raan: Radian,
        arg_perigee: Radian,
        mean_anomaly: Radian,
    ) -> Result<Self, OrbitGuardError> {
        let elements = OrbitalElements {
            epoch,
            mean_motion,
            eccentricity,
            inclination,
            raan,
            arg_perigee,
            mean_anomaly,
            drag: None,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Same as [`OrbitalElements::new`] with the four angles given in degrees.
    pub fn from_degrees(
        epoch: JulianDate,
        mean_motion: f64,
        eccentricity: f64,
        inclination: Degree,
        raan: Degree,
        arg_perigee: Degree,
        mean_anomaly: Degree,
    ) -> Result<Self, OrbitGuardError> {
        Self::new(
            epoch,
            mean_motion,
            eccentricity,
            inclination * RADEG,
            raan * RADEG,
            arg_perigee * RADEG,
            mean_anomaly * RADEG,
        )
    }

    /// Attach drag terms to the record.
    pub fn with_drag(mut self, drag: DragTerms) -> Self {
        self.drag = Some(drag);
        self
    }

    /// Check the element invariants.
    ///
    /// Return
    /// ------
    /// * `Err(OrbitGuardError::InvalidInput)` naming the first broken invariant.
    pub fn validate(&self) -> Result<(), OrbitGuardError> {
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitGuardError::InvalidInput(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        if !(self.mean_motion > 0.0) || !self.mean_motion.is_finite() {
            return Err(OrbitGuardError::InvalidInput(format!(
                "mean motion {} must be strictly positive",
                self.mean_motion
            )));
        }
        let finite = [
            self.epoch,
            self.inclination,
            self.raan,
            self.arg_perigee,
            self.mean_anomaly,
        ]
        .iter()
        .all(|x| x.is_finite());
        if !finite {
            return Err(OrbitGuardError::InvalidInput(
                "orbital elements contain a non-finite value".into(),
            ));
        }
        Ok(())
    }

    /// Mean motion in radians per second.
    #[inline]
    pub fn mean_motion_rad_per_sec(&self) -> f64 {
        self.mean_motion * DPI / SECONDS_PER_DAY
    }

    /// Mean motion in radians per minute.
    #[inline]
    pub fn mean_motion_rad_per_min(&self) -> f64 {
        self.mean_motion * DPI / MINUTES_PER_DAY
    }

    /// Unperturbed semi-major axis `a = (μ/n²)^(1/3)` in km.
    pub fn semi_major_axis(&self) -> Kilometer {
        let n = self.mean_motion_rad_per_sec();
        (MU_EARTH / (n * n)).cbrt()
    }

    /// Orbital period in minutes.
    pub fn period_minutes(&self) -> Minutes {
        MINUTES_PER_DAY / self.mean_motion
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Orbital Elements @ epoch (JD): {:.6}", self.epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  n   (mean motion)           = {:.8} rev/day",
            self.mean_motion
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.7}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.4}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (RAAN)                  = {:.6} rad ({:.4}°)",
            self.raan,
            self.raan * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of perigee)   = {:.6} rad ({:.4}°)",
            self.arg_perigee,
            self.arg_perigee * rad_to_deg
        )?;
        write!(
            f,
            "  M   (mean anomaly)          = {:.6} rad ({:.4}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )?;
        if let Some(drag) = &self.drag {
            write!(
                f,
                "\n  B*  = {:.4e}, ṅ = {:.4e}, n̈ = {:.4e}",
                drag.bstar, drag.ndot, drag.nddot
            )?;
        }
        Ok(())
    }
}
