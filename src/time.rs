//! Time conversions between the Julian dates used by the core and `hifitime` epochs.
//!
//! Every computation in the crate runs on plain Julian dates (UTC, `f64` days). These
//! helpers sit at the boundary for collaborators that carry calendar epochs, ISO strings or
//! Unix timestamps.
use std::str::FromStr;

use hifitime::Epoch;

use crate::constants::{JulianDate, Minutes, JD_UNIX_EPOCH, MINUTES_PER_DAY, SECONDS_PER_DAY};
use crate::orbitguard_errors::OrbitGuardError;

/// Julian date (UTC) → `hifitime` epoch.
pub fn jd_to_epoch(jd: JulianDate) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// `hifitime` epoch → Julian date (UTC).
pub fn epoch_to_jd(epoch: Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// Parse an ISO 8601 timestamp (e.g. `"2021-01-01T00:00:00"`) into a Julian date.
pub fn iso_to_jd(date: &str) -> Result<JulianDate, OrbitGuardError> {
    Epoch::from_str(date)
        .map(epoch_to_jd)
        .map_err(|e| OrbitGuardError::InvalidInput(format!("invalid timestamp {date:?}: {e}")))
}

/// Unix time in milliseconds → Julian date.
///
/// Leap seconds are not counted, matching the Unix convention.
pub fn unix_ms_to_jd(unix_ms: f64) -> JulianDate {
    JD_UNIX_EPOCH + unix_ms / (SECONDS_PER_DAY * 1_000.0)
}

/// Julian date → Unix time in milliseconds.
pub fn jd_to_unix_ms(jd: JulianDate) -> f64 {
    (jd - JD_UNIX_EPOCH) * SECONDS_PER_DAY * 1_000.0
}

/// Signed minutes from `from` to `to`.
pub fn minutes_between(from: JulianDate, to: JulianDate) -> Minutes {
    (to - from) * MINUTES_PER_DAY
}
