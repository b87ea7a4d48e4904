//! # OrbitGuard
//!
//! Analytic orbit propagation and conjunction screening for Earth-orbiting objects.
//!
//! The crate turns mean orbital elements into inertial state vectors (Kepler solve, J2
//! secular drift, perifocal → inertial rotation), screens sets of trajectories for close
//! approaches between pairs of objects, ranks the encounters by severity and a
//! probability proxy, and sizes simple avoidance burns.
//!
//! ## Quick start
//!
//! ```rust
//! use orbitguard::constants::ObjectId;
//! use orbitguard::orbital_elements::OrbitalElements;
//! use orbitguard::propagator::{propagate_catalog, Propagate};
//! use orbitguard::screening::{ConjunctionScreener, EncounterSetExt, ScreeningParams};
//!
//! let a = OrbitalElements::from_degrees(2460000.0, 15.5, 0.0001, 51.6, 45.0, 30.0, 0.0).unwrap();
//! let b = OrbitalElements::from_degrees(2460000.0, 15.5, 0.0001, 51.6, 45.0, 30.0, 0.05).unwrap();
//!
//! let state = a.propagate(0.0).unwrap();
//! assert!(state.radius() > 6500.0);
//!
//! let catalog = vec![(ObjectId::Catalog(1), a), (ObjectId::Catalog(2), b)];
//! let trajectories: Vec<_> = propagate_catalog(&catalog, 0.0, 90.0, 1.0)
//!     .into_iter()
//!     .filter_map(|(id, res)| res.ok().map(|states| (id, states)))
//!     .collect();
//!
//! let params = ScreeningParams::builder().max_distance_km(50.0).build().unwrap();
//! let mut encounters = ConjunctionScreener::new(params).screen(&trajectories).unwrap();
//! encounters.sort_by_risk();
//! assert_eq!(encounters.len(), 1);
//! ```
//!
//! ## Features
//!
//! * `progress` – live `indicatif` progress bar during screening.
pub mod constants;
pub mod j2;
pub mod kepler;
pub mod maneuver;
pub mod orbital_elements;
pub mod orbitguard_errors;
pub mod progress;
pub mod propagator;
pub mod ref_system;
pub mod risk;
pub mod screening;
pub mod state_vector;
pub mod time;

pub use constants::ObjectId;
pub use orbital_elements::OrbitalElements;
pub use orbitguard_errors::OrbitGuardError;
pub use propagator::{propagate, propagate_with, Propagate};
pub use risk::{RiskConfig, Severity};
pub use screening::{ConjunctionScreener, Encounter, EncounterSetExt, ScreeningParams};
pub use state_vector::StateVector;
