//! # Constants and type definitions for OrbitGuard
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **canonical screening configuration values**, and the **common type definitions** used
//! throughout the `orbitguard` library.
//!
//! ## Overview
//!
//! - Geophysical constants (Earth gravitational parameter, equatorial radius, J2)
//! - Unit conversions (degrees ↔ radians, days ↔ minutes ↔ seconds)
//! - Kepler solver budget (tolerance, iteration cap, degenerate slope threshold)
//! - Canonical severity bands and logistic parameters for the risk proxy
//! - Core type aliases and the [`ObjectId`] identifier
//!
//! Every module reads its defaults from here, so a single set of numbers drives the
//! propagator, the risk classifier and the screener.

use serde::{Deserialize, Serialize};

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Earth gravitational parameter μ in km³/s² (IERS Conventions 2010)
pub const MU_EARTH: f64 = 398_600.4418;

/// Earth equatorial radius in kilometers (WGS-84)
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Second zonal harmonic of the Earth gravity field (EGM2008)
pub const J2: f64 = 1.082_626_68e-3;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a Julian day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Standard gravitational acceleration g₀ in m/s²
pub const G0: f64 = 9.806_65;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

// -------------------------------------------------------------------------------------------------
// Kepler solver budget
// -------------------------------------------------------------------------------------------------

/// Absolute convergence tolerance on the eccentric anomaly step (radians)
pub const KEPLER_TOLERANCE: f64 = 1e-10;

/// Maximum number of Newton–Raphson iterations
pub const KEPLER_MAX_ITERATIONS: usize = 30;

/// Below this magnitude the Kepler derivative `1 − e·cos(E)` is treated as degenerate
pub const KEPLER_MIN_DERIVATIVE: f64 = 1e-15;

/// Eccentricity above which the solver switches to the sign-aware starting guess
pub const KEPLER_HIGH_ECCENTRICITY: f64 = 0.8;

// -------------------------------------------------------------------------------------------------
// Canonical risk configuration
// -------------------------------------------------------------------------------------------------

/// Distance (km) at or below which an encounter is classified as a collision
pub const SEVERITY_COLLISION_KM: f64 = 1.0;

/// Distance (km) at or below which an encounter is classified as high risk
pub const SEVERITY_HIGH_KM: f64 = 5.0;

/// Distance (km) at or below which an encounter is classified as medium risk
pub const SEVERITY_MEDIUM_KM: f64 = 25.0;

/// Steepness `k` of the logistic probability proxy (1/km)
pub const LOGISTIC_K: f64 = 0.05;

/// Inflection distance `d₀` of the logistic probability proxy (km)
pub const LOGISTIC_X0_KM: f64 = 2.0;

/// Relative velocity (km/s) that halves the effective miss distance
pub const LOGISTIC_VELOCITY_SCALE_KMS: f64 = 10.0;

/// Default maximum screening distance (km)
pub const SCREENING_DISTANCE_KM: f64 = 100.0;

/// Largest number of samples a single ephemeris request may produce
pub const MAX_EPHEMERIS_SAMPLES: usize = 10_000_000;

/// Default synchronization tolerance between paired samples: one second, in days
pub const SYNC_TOLERANCE_DAYS: f64 = 1.0 / SECONDS_PER_DAY;

// -------------------------------------------------------------------------------------------------
// Propulsion
// -------------------------------------------------------------------------------------------------

/// Specific impulse of a typical chemical thruster (s)
pub const ISP_CHEMICAL_S: f64 = 300.0;

/// Specific impulse of a typical electric thruster (s)
pub const ISP_ELECTRIC_S: f64 = 3_000.0;

/// Below this Δv/(Isp·g₀) ratio the rocket equation is linearized
pub const SMALL_DV_RATIO: f64 = 1e-3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Speed in kilometers per second
pub type KmPerSec = f64;
/// Julian date (days)
pub type JulianDate = f64;
/// Elapsed time in minutes
pub type Minutes = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Identifier of a tracked object.
///
/// This can be:
/// - A catalog number (e.g. `Catalog(25544)`)
/// - A free-form name or international designator (e.g. `"ISS (ZARYA)"`)
///
/// Identifiers are owned and unbounded inside the core. Fixed-width output formats should
/// go through [`ObjectId::truncated`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectId {
    /// Integer catalog number
    Catalog(u32),
    /// Name-based designation
    Name(String),
}

impl ObjectId {
    /// Render the identifier with at most `max_chars` characters.
    ///
    /// This is the truncation contract for serialization boundaries that impose a fixed
    /// width. Truncation happens on a `char` boundary, never inside a UTF-8 sequence.
    pub fn truncated(&self, max_chars: usize) -> String {
        self.to_string().chars().take(max_chars).collect()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectId::Catalog(n) => write!(f, "{n}"),
            ObjectId::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for ObjectId {
    fn from(n: u32) -> Self {
        ObjectId::Catalog(n)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        ObjectId::Name(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        ObjectId::Name(s.to_string())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = std::convert::Infallible;

    /// Parse an `ObjectId` from a string.
    /// - Pure digits fitting in `u32` → `Catalog(u32)`
    /// - Otherwise → `Name(String)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(n) => Ok(ObjectId::Catalog(n)),
            Err(_) => Ok(ObjectId::Name(s.to_string())),
        }
    }
}
