//! Encounter records and the ranking/filtering services on encounter batches.
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::{JulianDate, Kilometer, KmPerSec, ObjectId};
use crate::risk::Severity;

/// A close approach between two objects.
///
/// `object_a` is always the object that came first in the screener input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub object_a: ObjectId,
    pub object_b: ObjectId,
    /// Time of closest approach (Julian date).
    pub tca: JulianDate,
    pub min_distance_km: Kilometer,
    pub relative_velocity_kms: KmPerSec,
    pub severity: Severity,
    /// Collision-probability proxy in `[0, 1]`.
    pub probability: f64,
}

impl Encounter {
    /// Ranking key used by [`EncounterSetExt::sort_by_risk`]: `p · (rank + 1)`.
    #[inline]
    pub fn risk_score(&self) -> f64 {
        self.probability * (self.severity.rank() as f64 + 1.0)
    }
}

impl fmt::Display for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ↔ {} @ JD {:.6}: d = {:.3} km, v_rel = {:.3} km/s, {} (p = {:.4})",
            self.object_a,
            self.object_b,
            self.tca,
            self.min_distance_km,
            self.relative_velocity_kms,
            self.severity,
            self.probability
        )
    }
}

/// Reordering and filtering of an encounter batch.
///
/// Both sorts are stable: encounters comparing equal keep their relative order.
pub trait EncounterSetExt {
    /// Sort by descending `probability × (severity rank + 1)`.
    fn sort_by_risk(&mut self);

    /// Sort by ascending time of closest approach.
    fn sort_by_time(&mut self);

    /// Keep only encounters with `probability ≥ min_probability`, preserving their order.
    ///
    /// A negative or NaN threshold leaves the batch untouched.
    ///
    /// Return
    /// ------
    /// * The number of retained encounters.
    fn filter_by_probability(&mut self, min_probability: f64) -> usize;
}

impl EncounterSetExt for Vec<Encounter> {
    fn sort_by_risk(&mut self) {
        self.sort_by(|a, b| b.risk_score().total_cmp(&a.risk_score()));
    }

    fn sort_by_time(&mut self) {
        self.sort_by(|a, b| a.tca.total_cmp(&b.tca));
    }

    fn filter_by_probability(&mut self, min_probability: f64) -> usize {
        if !(min_probability >= 0.0) {
            return self.len();
        }
        self.retain(|e| e.probability >= min_probability);
        self.len()
    }
}

/// Outcome of a screening run with bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Encounters in pair-index order.
    pub encounters: Vec<Encounter>,
    /// Number of object pairs examined.
    pub pairs_evaluated: usize,
    /// Objects dropped before the pair loop (empty, non-finite, duplicate or unordered).
    pub skipped_objects: Vec<ObjectId>,
}

impl ScreeningReport {
    /// Number of encounters per severity, every variant present.
    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        for e in &self.encounters {
            *counts.entry(e.severity).or_default() += 1;
        }
        counts
    }

    /// Highest severity found, `Severity::None` for an empty report.
    pub fn worst_severity(&self) -> Severity {
        self.encounters
            .iter()
            .map(|e| e.severity)
            .max()
            .unwrap_or(Severity::None)
    }
}

impl fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Screening report: {} encounters over {} pairs ({} objects skipped)",
            self.encounters.len(),
            self.pairs_evaluated,
            self.skipped_objects.len()
        )?;
        for (severity, count) in self.severity_counts().iter().rev() {
            writeln!(f, "  {:<20} {}", severity.label(), count)?;
        }
        if f.alternate() {
            // Highest risk first, pair-index order on ties
            for e in self
                .encounters
                .iter()
                .sorted_by(|a, b| b.risk_score().total_cmp(&a.risk_score()))
            {
                writeln!(f, "  {e}")?;
            }
        }
        Ok(())
    }
}
