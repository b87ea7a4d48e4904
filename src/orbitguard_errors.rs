use thiserror::Error;

use crate::constants::JulianDate;

#[derive(Error, Debug)]
pub enum OrbitGuardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Kepler equation did not converge within {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    #[error("Kepler equation derivative vanished (degenerate slope)")]
    DegenerateDerivative,

    #[error("Propagation produced a non-finite state component")]
    NonFiniteResult,

    #[error("Screening found more encounters than the allowed capacity ({capacity})")]
    InsufficientCapacity { capacity: usize },

    #[error("Screening requires at least two valid objects, got {0}")]
    InsufficientObjects(usize),

    #[error("Invalid screening parameter: {0}")]
    InvalidScreeningParameter(String),

    #[error("Invalid risk parameter: {0}")]
    InvalidRiskParameter(String),

    #[error("Screening cancelled by caller")]
    ScreeningCancelled,

    #[error("Encounter time {encounter} precedes reference epoch {reference}")]
    EncounterInPast {
        encounter: JulianDate,
        reference: JulianDate,
    },

    #[error("Required delta-V {required:.6} m/s exceeds ceiling {ceiling:.6} m/s")]
    DeltaVExceedsCeiling { required: f64, ceiling: f64 },

    #[error("Invalid propulsion parameter: {0}")]
    InvalidPropulsionParameter(String),

    #[error("Required propellant {required:.3} kg exceeds available {available:.3} kg")]
    InsufficientPropellant { required: f64, available: f64 },
}

impl OrbitGuardError {
    /// `true` for both ways the Kepler solver can give up.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            OrbitGuardError::ConvergenceFailure { .. } | OrbitGuardError::DegenerateDerivative
        )
    }
}

impl PartialEq for OrbitGuardError {
    fn eq(&self, other: &Self) -> bool {
        use OrbitGuardError::*;
        match (self, other) {
            (InvalidInput(a), InvalidInput(b)) => a == b,
            (ConvergenceFailure { iterations: a }, ConvergenceFailure { iterations: b }) => a == b,
            (InsufficientCapacity { capacity: a }, InsufficientCapacity { capacity: b }) => a == b,
            (InsufficientObjects(a), InsufficientObjects(b)) => a == b,
            (InvalidScreeningParameter(a), InvalidScreeningParameter(b)) => a == b,
            (InvalidRiskParameter(a), InvalidRiskParameter(b)) => a == b,
            (InvalidPropulsionParameter(a), InvalidPropulsionParameter(b)) => a == b,

            // Floating payloads: equality if same variant
            (EncounterInPast { .. }, EncounterInPast { .. }) => true,
            (DeltaVExceedsCeiling { .. }, DeltaVExceedsCeiling { .. }) => true,
            (InsufficientPropellant { .. }, InsufficientPropellant { .. }) => true,

            // Unit variants
            (DegenerateDerivative, DegenerateDerivative) => true,
            (NonFiniteResult, NonFiniteResult) => true,
            (ScreeningCancelled, ScreeningCancelled) => true,

            _ => false,
        }
    }
}
