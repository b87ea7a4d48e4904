//! # J2 secular corrections
//!
//! First-order secular effect of the Earth oblateness on a mean element set.
//!
//! The equatorial bulge makes the orbital plane precess (RAAN drift) and the line of
//! apsides rotate (argument-of-perigee drift), and slightly changes the mean motion.
//! Short-period terms are ignored.
//!
//! ## Model
//!
//! ```text
//! a₀   = (μ / n₀²)^(1/3)
//! temp = 1.5 · J2 · (Rₑ/a₀)² / (1 − e²)^1.5
//! δ₁   = temp · (3cos²i − 1)
//! a₁   = a₀ · (1 − δ₁/3 − δ₁² − 134/81 · δ₁³)
//! n₁   = √(μ / a₁³)
//! Ω̇    = −temp · cos i · n₁
//! ω̇    =  temp · (5cos²i − 1) · n₁ / 2
//! ```
//!
//! Mean motions are evaluated in rad/s for the semi-major axis and converted to rad/min
//! for the drift, since the elapsed time is expressed in minutes.
use crate::constants::{
    Kilometer, Minutes, EARTH_RADIUS_KM, J2, MINUTES_PER_DAY, MU_EARTH, SECONDS_PER_MINUTE,
};
use crate::constants::DPI;
use crate::kepler::principal_angle;
use crate::orbital_elements::OrbitalElements;

/// Secular rates and refined orbit size for one element set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct J2SecularRates {
    /// Refined semi-major axis a₁ (km).
    pub semi_major_axis: Kilometer,
    /// Refined mean motion n₁ (rad/min).
    pub mean_motion_rad_per_min: f64,
    /// RAAN drift (rad/min).
    pub raan_rate: f64,
    /// Argument-of-perigee drift (rad/min).
    pub arg_perigee_rate: f64,
}

impl J2SecularRates {
    /// Evaluate the secular model for `elements`.
    pub fn from_elements(elements: &OrbitalElements) -> Self {
        let n0 = elements.mean_motion_rad_per_sec();
        let a0 = (MU_EARTH / (n0 * n0)).cbrt();

        let e2 = elements.eccentricity * elements.eccentricity;
        let cos_inc = elements.inclination.cos();
        let cos_inc_sq = cos_inc * cos_inc;

        let temp = 1.5 * J2 * (EARTH_RADIUS_KM / a0).powi(2) / (1.0 - e2).powf(1.5);
        let del1 = temp * (3.0 * cos_inc_sq - 1.0);
        let a1 = a0 * (1.0 - del1 / 3.0 - del1 * del1 - 134.0 * del1.powi(3) / 81.0);

        let n1 = (MU_EARTH / a1.powi(3)).sqrt() * SECONDS_PER_MINUTE;

        J2SecularRates {
            semi_major_axis: a1,
            mean_motion_rad_per_min: n1,
            raan_rate: -temp * cos_inc * n1,
            arg_perigee_rate: temp * (5.0 * cos_inc_sq - 1.0) * n1 / 2.0,
        }
    }

    /// Refined mean motion in revolutions per day.
    #[inline]
    pub fn mean_motion_rev_per_day(&self) -> f64 {
        self.mean_motion_rad_per_min * MINUTES_PER_DAY / DPI
    }
}

/// Apply the J2 secular drift to an element set.
///
/// The input is not modified: a new record is returned with
///
/// * `raan` and `arg_perigee` advanced linearly by `rate × minutes_since_epoch` and wrapped
///   into `[0, 2π)`,
/// * `mean_motion` replaced by the refined n₁ (rev/day),
/// * every other field copied unchanged (epoch, eccentricity, inclination, mean anomaly,
///   drag terms).
///
/// Arguments
/// ---------
/// * `elements`: mean elements at their epoch.
/// * `minutes_since_epoch`: elapsed time, may be negative.
pub fn apply_j2_secular(elements: &OrbitalElements, minutes_since_epoch: Minutes) -> OrbitalElements {
    let rates = J2SecularRates::from_elements(elements);

    OrbitalElements {
        raan: principal_angle(elements.raan + rates.raan_rate * minutes_since_epoch),
        arg_perigee: principal_angle(
            elements.arg_perigee + rates.arg_perigee_rate * minutes_since_epoch,
        ),
        mean_motion: rates.mean_motion_rev_per_day(),
        ..*elements
    }
}
