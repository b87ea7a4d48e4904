//! # Risk classification
//!
//! Severity bands and a logistic collision-probability proxy for a close approach.
//!
//! ## Severity
//!
//! The miss distance `d` (km) is compared against three ordered band edges:
//!
//! | distance              | severity      |
//! |-----------------------|---------------|
//! | `d ≤ collision_km`    | `Collision`   |
//! | `d ≤ high_km`         | `High`        |
//! | `d ≤ medium_km`       | `Medium`      |
//! | otherwise             | `Low`         |
//! | negative or NaN       | `None`        |
//!
//! ## Probability proxy
//!
//! ```text
//! d' = d / (1 + v / v_scale)
//! p  = 1 / (1 + exp(k · (d' − d₀)))
//! ```
//!
//! A faster relative velocity shrinks the effective distance, so `p` is non-increasing in
//! `d` and non-decreasing in `v`. This is a heuristic ranking value, not a covariance-based
//! probability of collision.
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Kilometer, KmPerSec, LOGISTIC_K, LOGISTIC_VELOCITY_SCALE_KMS, LOGISTIC_X0_KM,
    SEVERITY_COLLISION_KM, SEVERITY_HIGH_KM, SEVERITY_MEDIUM_KM,
};
use crate::orbitguard_errors::OrbitGuardError;

/// Ordered severity of a close approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Collision,
}

impl Severity {
    /// All variants, least to most severe.
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Collision,
    ];

    /// Numeric rank, `0` for `None` up to `4` for `Collision`.
    pub fn rank(self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Collision => 4,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "No risk",
            Severity::Low => "Low risk",
            Severity::Medium => "Medium risk",
            Severity::High => "High risk",
            Severity::Collision => "Collision imminent",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity and probability proxy of one approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub severity: Severity,
    pub probability: f64,
}

/// Band edges and logistic parameters of the risk model.
///
/// Every length is in kilometers and every speed in km/s. [`RiskConfig::default`] is the
/// canonical configuration used by the screener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Upper edge of the `Collision` band (km)
    pub collision_km: Kilometer,
    /// Upper edge of the `High` band (km)
    pub high_km: Kilometer,
    /// Upper edge of the `Medium` band (km)
    pub medium_km: Kilometer,
    /// Logistic steepness `k` (1/km)
    pub logistic_k: f64,
    /// Logistic inflection distance `d₀` (km)
    pub logistic_x0_km: Kilometer,
    /// Relative speed that halves the effective distance (km/s)
    pub velocity_scale_kms: KmPerSec,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            collision_km: SEVERITY_COLLISION_KM,
            high_km: SEVERITY_HIGH_KM,
            medium_km: SEVERITY_MEDIUM_KM,
            logistic_k: LOGISTIC_K,
            logistic_x0_km: LOGISTIC_X0_KM,
            velocity_scale_kms: LOGISTIC_VELOCITY_SCALE_KMS,
        }
    }
}

impl RiskConfig {
    pub fn builder() -> RiskConfigBuilder {
        RiskConfigBuilder::new()
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Check the configuration invariants.
    ///
    /// Fields are public, so a hand-built value is only trusted after this check.
    ///
    /// Validation rules
    /// ----------------
    /// * `0 < collision_km ≤ high_km ≤ medium_km`, all finite.
    /// * `logistic_k > 0`, `velocity_scale_kms > 0`.
    /// * `logistic_x0_km` finite.
    pub fn validate(&self) -> Result<(), OrbitGuardError> {
        if !Self::gt0(self.collision_km)
            || !Self::le(self.collision_km, self.high_km)
            || !Self::le(self.high_km, self.medium_km)
            || !self.medium_km.is_finite()
        {
            return Err(OrbitGuardError::InvalidRiskParameter(
                "severity bands must satisfy 0 < collision ≤ high ≤ medium".into(),
            ));
        }
        if !Self::gt0(self.logistic_k) || !self.logistic_k.is_finite() {
            return Err(OrbitGuardError::InvalidRiskParameter(
                "logistic_k must be > 0".into(),
            ));
        }
        if !Self::gt0(self.velocity_scale_kms) || !self.velocity_scale_kms.is_finite() {
            return Err(OrbitGuardError::InvalidRiskParameter(
                "velocity_scale_kms must be > 0".into(),
            ));
        }
        if !self.logistic_x0_km.is_finite() {
            return Err(OrbitGuardError::InvalidRiskParameter(
                "logistic_x0_km must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Severity band of a miss distance.
    ///
    /// Arguments
    /// ---------
    /// * `distance`: miss distance in km.
    ///
    /// Return
    /// ------
    /// * [`Severity::None`] for a negative or NaN distance, otherwise the first band whose
    ///   upper edge is not exceeded (edges are inclusive).
    pub fn classify(&self, distance: Kilometer) -> Severity {
        if !(distance >= 0.0) {
            return Severity::None;
        }
        if distance <= self.collision_km {
            Severity::Collision
        } else if distance <= self.high_km {
            Severity::High
        } else if distance <= self.medium_km {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Logistic collision-probability proxy.
    ///
    /// Arguments
    /// ---------
    /// * `distance`: miss distance in km.
    /// * `relative_velocity`: relative speed in km/s.
    ///
    /// Return
    /// ------
    /// * A value in `[0, 1]`; `0` when either input is negative or NaN.
    pub fn probability(&self, distance: Kilometer, relative_velocity: KmPerSec) -> f64 {
        if !(distance >= 0.0) || !(relative_velocity >= 0.0) {
            return 0.0;
        }
        let effective = distance / (1.0 + relative_velocity / self.velocity_scale_kms);
        let p = 1.0 / (1.0 + (self.logistic_k * (effective - self.logistic_x0_km)).exp());
        p.clamp(0.0, 1.0)
    }

    /// Severity and probability in one call.
    pub fn assess(&self, distance: Kilometer, relative_velocity: KmPerSec) -> RiskAssessment {
        RiskAssessment {
            severity: self.classify(distance),
            probability: self.probability(distance, relative_velocity),
        }
    }
}

/// [`RiskConfig::default`]`.classify(distance)`.
pub fn classify(distance: Kilometer) -> Severity {
    RiskConfig::default().classify(distance)
}

/// [`RiskConfig::default`]`.probability(distance, relative_velocity)`.
pub fn probability(distance: Kilometer, relative_velocity: KmPerSec) -> f64 {
    RiskConfig::default().probability(distance, relative_velocity)
}

/// [`RiskConfig::default`]`.assess(distance, relative_velocity)`.
pub fn assess(distance: Kilometer, relative_velocity: KmPerSec) -> RiskAssessment {
    RiskConfig::default().assess(distance, relative_velocity)
}

/// Builder for [`RiskConfig`], with validation.
#[derive(Debug, Clone)]
pub struct RiskConfigBuilder {
    config: RiskConfig,
}

impl Default for RiskConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RiskConfig::default(),
        }
    }

    pub fn collision_km(mut self, v: f64) -> Self {
        self.config.collision_km = v;
        self
    }
    pub fn high_km(mut self, v: f64) -> Self {
        self.config.high_km = v;
        self
    }
    pub fn medium_km(mut self, v: f64) -> Self {
        self.config.medium_km = v;
        self
    }
    pub fn logistic_k(mut self, v: f64) -> Self {
        self.config.logistic_k = v;
        self
    }
    pub fn logistic_x0_km(mut self, v: f64) -> Self {
        self.config.logistic_x0_km = v;
        self
    }
    pub fn velocity_scale_kms(mut self, v: f64) -> Self {
        self.config.velocity_scale_kms = v;
        self
    }

    /// Validate and produce the [`RiskConfig`], see [`RiskConfig::validate`].
    pub fn build(self) -> Result<RiskConfig, OrbitGuardError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl fmt::Display for RiskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Risk Configuration")?;
            writeln!(f, "------------------")?;
            writeln!(f, "  collision_km       = {:.3} km", self.collision_km)?;
            writeln!(f, "  high_km            = {:.3} km", self.high_km)?;
            writeln!(f, "  medium_km          = {:.3} km", self.medium_km)?;
            writeln!(f, "  logistic_k         = {:.4} 1/km", self.logistic_k)?;
            writeln!(f, "  logistic_x0_km     = {:.3} km", self.logistic_x0_km)?;
            write!(
                f,
                "  velocity_scale_kms = {:.3} km/s",
                self.velocity_scale_kms
            )
        } else {
            write!(
                f,
                "RiskConfig(bands={}/{}/{} km, k={}, d0={} km, v_scale={} km/s)",
                self.collision_km,
                self.high_km,
                self.medium_km,
                self.logistic_k,
                self.logistic_x0_km,
                self.velocity_scale_kms
            )
        }
    }
}
