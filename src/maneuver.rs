//! # Avoidance maneuver planning
//!
//! A first-order planner for a single along-track burn that opens a close approach.
//!
//! ## Heuristic
//!
//! A velocity change `Δv` applied along the velocity direction at the primary's epoch
//! displaces the object by roughly `Δv · Δt` after `Δt`. To turn a predicted separation
//! `d` into a target separation `d*` at the encounter:
//!
//! ```text
//! Δv = (d* − d) · 1000 / Δt      [m/s, with d in km and Δt in s]
//! ```
//!
//! No Lambert targeting or relative-motion model is involved; the result is an advisory
//! magnitude, not a flight-ready burn.
//!
//! ## Propellant
//!
//! Tsiolkovsky's equation `Δv = Isp·g₀·ln(m₀/m₁)` gives the propellant mass
//! `m₀(1 − exp(−Δv/(Isp·g₀)))`. Below `Δv/(Isp·g₀) = 1e-3` the linear form `m₀·Δv/(Isp·g₀)`
//! is used. The thruster efficiency inflates the requested Δv (`Δv / η`).
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    JulianDate, Kilometer, G0, ISP_CHEMICAL_S, ISP_ELECTRIC_S, SECONDS_PER_DAY, SMALL_DV_RATIO,
};
use crate::orbital_elements::OrbitalElements;
use crate::orbitguard_errors::OrbitGuardError;
use crate::propagator::Propagate;
use crate::state_vector::StateVector;

/// Default dry mass used by the propulsion presets (kg)
const DEFAULT_DRY_MASS_KG: f64 = 1_000.0;
/// Default propellant load used by the propulsion presets (kg)
const DEFAULT_PROPELLANT_KG: f64 = 100.0;

/// Thruster and mass budget of the maneuvering spacecraft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropulsionSpec {
    /// Specific impulse (s)
    pub isp_s: f64,
    /// Mass without propellant (kg)
    pub dry_mass_kg: f64,
    /// Propellant on board (kg)
    pub propellant_mass_kg: f64,
    /// Thruster efficiency in `(0, 1]`
    pub efficiency: f64,
}

impl Default for PropulsionSpec {
    fn default() -> Self {
        Self::chemical()
    }
}

impl PropulsionSpec {
    /// Chemical thruster, Isp = 300 s.
    pub fn chemical() -> Self {
        PropulsionSpec {
            isp_s: ISP_CHEMICAL_S,
            dry_mass_kg: DEFAULT_DRY_MASS_KG,
            propellant_mass_kg: DEFAULT_PROPELLANT_KG,
            efficiency: 1.0,
        }
    }

    /// Electric thruster, Isp = 3000 s.
    pub fn electric() -> Self {
        PropulsionSpec {
            isp_s: ISP_ELECTRIC_S,
            ..Self::chemical()
        }
    }

    pub fn with_masses(mut self, dry_mass_kg: f64, propellant_mass_kg: f64) -> Self {
        self.dry_mass_kg = dry_mass_kg;
        self.propellant_mass_kg = propellant_mass_kg;
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Check `Isp > 0`, `dry mass > 0`, `propellant ≥ 0` and `efficiency ∈ (0, 1]`.
    pub fn validate(&self) -> Result<(), OrbitGuardError> {
        if !(self.isp_s > 0.0) || !self.isp_s.is_finite() {
            return Err(OrbitGuardError::InvalidPropulsionParameter(format!(
                "specific impulse must be > 0 s, got {}",
                self.isp_s
            )));
        }
        if !(self.dry_mass_kg > 0.0) || !self.dry_mass_kg.is_finite() {
            return Err(OrbitGuardError::InvalidPropulsionParameter(format!(
                "dry mass must be > 0 kg, got {}",
                self.dry_mass_kg
            )));
        }
        if !(self.propellant_mass_kg >= 0.0) || !self.propellant_mass_kg.is_finite() {
            return Err(OrbitGuardError::InvalidPropulsionParameter(format!(
                "propellant mass must be ≥ 0 kg, got {}",
                self.propellant_mass_kg
            )));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(OrbitGuardError::InvalidPropulsionParameter(format!(
                "efficiency must lie in (0, 1], got {}",
                self.efficiency
            )));
        }
        Ok(())
    }

    /// Propellant needed for `delta_v_mps`, see [`fuel_consumption`].
    pub fn fuel_for(&self, delta_v_mps: f64) -> Result<f64, OrbitGuardError> {
        fuel_consumption(
            delta_v_mps,
            self.isp_s,
            self.dry_mass_kg,
            self.propellant_mass_kg,
            self.efficiency,
        )
    }
}

/// Propellant mass for a velocity change.
///
/// Arguments
/// ---------
/// * `delta_v_mps`: velocity change (m/s), non-negative.
/// * `isp_s`: specific impulse (s).
/// * `dry_mass_kg`, `propellant_mass_kg`: initial mass split, `m₀ = dry + propellant`.
/// * `efficiency`: thruster efficiency in `(0, 1]`.
///
/// Return
/// ------
/// * The propellant mass in kg. It is not compared to the available propellant here;
///   [`plan_avoidance`] does that check.
/// * `Err(OrbitGuardError::InvalidPropulsionParameter)` for out-of-range inputs.
pub fn fuel_consumption(
    delta_v_mps: f64,
    isp_s: f64,
    dry_mass_kg: f64,
    propellant_mass_kg: f64,
    efficiency: f64,
) -> Result<f64, OrbitGuardError> {
    let spec = PropulsionSpec {
        isp_s,
        dry_mass_kg,
        propellant_mass_kg,
        efficiency,
    };
    spec.validate()?;
    if !(delta_v_mps >= 0.0) || !delta_v_mps.is_finite() {
        return Err(OrbitGuardError::InvalidPropulsionParameter(format!(
            "delta-v must be a finite non-negative value, got {delta_v_mps}"
        )));
    }

    let m0 = dry_mass_kg + propellant_mass_kg;
    let dv_eff = delta_v_mps / efficiency;
    let ratio = dv_eff / (isp_s * G0);

    if ratio < SMALL_DV_RATIO {
        Ok(m0 * ratio)
    } else {
        Ok(m0 * (1.0 - (-ratio).exp()))
    }
}

/// Planned impulsive burn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Deterministic identifier `AVOID_<encounter JD × 10⁶>`.
    pub id: String,
    /// Burn time (Julian date).
    pub epoch: JulianDate,
    /// Encounter the burn is meant to open (Julian date).
    pub encounter_epoch: JulianDate,
    /// Inertial velocity change (m/s).
    pub delta_v_mps: Vector3<f64>,
    /// Propellant consumed (kg).
    pub fuel_cost_kg: f64,
}

impl Maneuver {
    #[inline]
    pub fn delta_v_magnitude_mps(&self) -> f64 {
        self.delta_v_mps.norm()
    }

    /// `true` when no burn is needed.
    pub fn is_zero(&self) -> bool {
        self.delta_v_mps == Vector3::zeros()
    }
}

fn maneuver_id(encounter_jd: JulianDate) -> String {
    format!("AVOID_{}", (encounter_jd * 1e6) as i64)
}

/// Plan an along-track burn on `primary` so that it passes `secondary` at a safe distance.
///
/// Arguments
/// ---------
/// * `primary`: elements of the maneuvering object. The burn happens at its epoch.
/// * `secondary`: elements of the other object.
/// * `encounter_jd`: predicted time of closest approach.
/// * `target_separation_km`: separation wanted at the encounter (> 0).
/// * `max_delta_v_mps`: ceiling on the burn magnitude (> 0).
/// * `propulsion`: thruster and mass budget.
///
/// Return
/// ------
/// * A [`Maneuver`] along the primary's velocity. If the objects are already at least
///   `target_separation_km` apart at the encounter, the returned maneuver has a zero Δv
///   and no fuel cost.
/// * `Err(OrbitGuardError::EncounterInPast)` if `encounter_jd ≤ primary.epoch`.
/// * `Err(OrbitGuardError::DeltaVExceedsCeiling)` if the burn is larger than allowed.
/// * `Err(OrbitGuardError::InsufficientPropellant)` if the burn costs more than the load.
/// * Propagation and validation errors otherwise.
pub fn plan_avoidance(
    primary: &OrbitalElements,
    secondary: &OrbitalElements,
    encounter_jd: JulianDate,
    target_separation_km: Kilometer,
    max_delta_v_mps: f64,
    propulsion: &PropulsionSpec,
) -> Result<Maneuver, OrbitGuardError> {
    if !(target_separation_km > 0.0) || !target_separation_km.is_finite() {
        return Err(OrbitGuardError::InvalidInput(format!(
            "target separation must be > 0 km, got {target_separation_km}"
        )));
    }
    if !(max_delta_v_mps > 0.0) {
        return Err(OrbitGuardError::InvalidInput(format!(
            "delta-v ceiling must be > 0 m/s, got {max_delta_v_mps}"
        )));
    }
    propulsion.validate()?;

    let dt_seconds = (encounter_jd - primary.epoch) * SECONDS_PER_DAY;
    if !(dt_seconds > 0.0) {
        return Err(OrbitGuardError::EncounterInPast {
            encounter: encounter_jd,
            reference: primary.epoch,
        });
    }

    let primary_at_encounter = primary.propagate_to(encounter_jd)?;
    let secondary_at_encounter = secondary.propagate_to(encounter_jd)?;
    let separation = primary_at_encounter.distance_to(&secondary_at_encounter);

    let id = maneuver_id(encounter_jd);

    if separation >= target_separation_km {
        log::debug!(
            "{id}: separation {separation:.3} km already above target {target_separation_km:.3} km"
        );
        return Ok(Maneuver {
            id,
            epoch: primary.epoch,
            encounter_epoch: encounter_jd,
            delta_v_mps: Vector3::zeros(),
            fuel_cost_kg: 0.0,
        });
    }

    let required_mps = (target_separation_km - separation) * 1000.0 / dt_seconds;
    if required_mps > max_delta_v_mps {
        return Err(OrbitGuardError::DeltaVExceedsCeiling {
            required: required_mps,
            ceiling: max_delta_v_mps,
        });
    }

    let burn_state = primary.propagate(0.0)?;
    let along_track = burn_state.velocity.normalize();

    let fuel = propulsion.fuel_for(required_mps)?;
    if fuel > propulsion.propellant_mass_kg {
        return Err(OrbitGuardError::InsufficientPropellant {
            required: fuel,
            available: propulsion.propellant_mass_kg,
        });
    }

    log::debug!(
        "{id}: Δv = {required_mps:.6} m/s along-track, fuel = {fuel:.4} kg (separation {separation:.3} → {target_separation_km:.3} km)"
    );

    Ok(Maneuver {
        id,
        epoch: primary.epoch,
        encounter_epoch: encounter_jd,
        delta_v_mps: along_track * required_mps,
        fuel_cost_kg: fuel,
    })
}

/// State of `elements` at `at_jd` with `maneuver` applied.
///
/// Before the burn epoch the unperturbed state is returned. After it, the impulse is
/// added to the velocity and the displacement `Δv · (t − t_burn)` to the position, the
/// same linear model the planner uses.
pub fn apply_maneuver(
    elements: &OrbitalElements,
    maneuver: &Maneuver,
    at_jd: JulianDate,
) -> Result<StateVector, OrbitGuardError> {
    let state = elements.propagate_to(at_jd)?;
    if at_jd < maneuver.epoch {
        return Ok(state);
    }

    let dv_kms = maneuver.delta_v_mps / 1000.0;
    let elapsed_s = (at_jd - maneuver.epoch) * SECONDS_PER_DAY;
    StateVector::new(
        state.time,
        state.position + dv_kms * elapsed_s,
        state.velocity + dv_kms,
    )
}
