//! Pairwise conjunction search.
//!
//! [`ConjunctionScreener`] validates its inputs, then evaluates every unordered pair on the
//! rayon pool. Work is split by outer index: row `i` owns the pairs `(i, j > i)` and fills
//! its own buffer, and the row buffers are concatenated in row order. The output is
//! therefore in pair-index order whatever the thread count.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ahash::RandomState;
use itertools::Itertools;
use rayon::prelude::*;

use super::encounter::{Encounter, ScreeningReport};
use super::ScreeningParams;
use crate::constants::ObjectId;
use crate::orbitguard_errors::OrbitGuardError;
use crate::progress::ScreeningProgress;
use crate::state_vector::StateVector;

type HashSet<K> = std::collections::HashSet<K, RandomState>;

/// One validated object ready for the pair loop.
struct Track<'a> {
    id: &'a ObjectId,
    samples: &'a [StateVector],
}

/// Closest sampled approach between two tracks.
struct Approach<'a> {
    distance: f64,
    first: &'a StateVector,
    second: &'a StateVector,
}

/// Exhaustive pairwise screener.
///
/// See also
/// --------
/// * [`ScreeningParams`] – threshold, tolerance, capacity and risk model.
/// * [`super::EncounterSetExt`] – ranking and filtering of the output.
#[derive(Debug, Clone, Default)]
pub struct ConjunctionScreener {
    params: ScreeningParams,
}

impl ConjunctionScreener {
    pub fn new(params: ScreeningParams) -> Self {
        ConjunctionScreener { params }
    }

    pub fn params(&self) -> &ScreeningParams {
        &self.params
    }

    /// Screen time series of states.
    ///
    /// Arguments
    /// ---------
    /// * `objects`: one `(id, series)` entry per object. A series is expected in ascending
    ///   time order; only samples whose timestamps differ by less than
    ///   `sync_tolerance_days` are compared.
    ///
    /// Return
    /// ------
    /// * Encounters in pair-index order, at most one per pair.
    /// * `Err(OrbitGuardError::InsufficientObjects)` if fewer than two objects survive
    ///   validation.
    /// * `Err(OrbitGuardError::InsufficientCapacity)` if more than `max_encounters` are found.
    /// * `Err(OrbitGuardError::InvalidScreeningParameter)` for invalid parameters.
    pub fn screen<S>(&self, objects: &[(ObjectId, S)]) -> Result<Vec<Encounter>, OrbitGuardError>
    where
        S: AsRef<[StateVector]> + Sync,
    {
        self.screen_report(objects).map(|report| report.encounters)
    }

    /// Screen a single state per object.
    ///
    /// Timestamps are not compared: every pair is evaluated at its snapshot.
    pub fn screen_snapshot(
        &self,
        objects: &[(ObjectId, StateVector)],
    ) -> Result<Vec<Encounter>, OrbitGuardError> {
        let tracks: Vec<(&ObjectId, &[StateVector])> = objects
            .iter()
            .map(|(id, state)| (id, std::slice::from_ref(state)))
            .collect();
        self.run(&tracks, false, None).map(|report| report.encounters)
    }

    /// Same as [`ConjunctionScreener::screen`] with cooperative cancellation.
    ///
    /// `cancel` is polled between pair evaluations. Once it reads `true` the run stops
    /// and returns `Err(OrbitGuardError::ScreeningCancelled)` without partial output.
    pub fn screen_with_cancel<S>(
        &self,
        objects: &[(ObjectId, S)],
        cancel: &AtomicBool,
    ) -> Result<Vec<Encounter>, OrbitGuardError>
    where
        S: AsRef<[StateVector]> + Sync,
    {
        let tracks: Vec<(&ObjectId, &[StateVector])> =
            objects.iter().map(|(id, s)| (id, s.as_ref())).collect();
        self.run(&tracks, true, Some(cancel))
            .map(|report| report.encounters)
    }

    /// Screen time series and return the encounters with run bookkeeping.
    pub fn screen_report<S>(&self, objects: &[(ObjectId, S)]) -> Result<ScreeningReport, OrbitGuardError>
    where
        S: AsRef<[StateVector]> + Sync,
    {
        let tracks: Vec<(&ObjectId, &[StateVector])> =
            objects.iter().map(|(id, s)| (id, s.as_ref())).collect();
        self.run(&tracks, true, None)
    }

    fn run(
        &self,
        objects: &[(&ObjectId, &[StateVector])],
        synchronized: bool,
        cancel: Option<&AtomicBool>,
    ) -> Result<ScreeningReport, OrbitGuardError> {
        self.params.validate()?;
        let started = Instant::now();

        let (tracks, skipped_objects) = prepare_tracks(objects, synchronized);
        if tracks.len() < 2 {
            return Err(OrbitGuardError::InsufficientObjects(tracks.len()));
        }

        let n = tracks.len();
        let progress = ScreeningProgress::new(n);

        let rows = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut buffer = Vec::new();
                for j in (i + 1)..n {
                    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                        return Err(OrbitGuardError::ScreeningCancelled);
                    }
                    if let Some(encounter) = self.evaluate_pair(&tracks[i], &tracks[j], synchronized) {
                        buffer.push(encounter);
                    }
                }
                progress.row_done();
                Ok(buffer)
            })
            .collect::<Result<Vec<Vec<Encounter>>, OrbitGuardError>>();
        progress.finish(started.elapsed());

        let encounters: Vec<Encounter> = rows?.into_iter().flatten().collect();

        if let Some(capacity) = self.params.max_encounters {
            if encounters.len() > capacity {
                return Err(OrbitGuardError::InsufficientCapacity { capacity });
            }
        }

        let pairs_evaluated = n * (n - 1) / 2;
        log::debug!(
            "Screened {} objects ({} pairs, {} skipped): {} encounters within {} km",
            n,
            pairs_evaluated,
            skipped_objects.len(),
            encounters.len(),
            self.params.max_distance_km
        );

        Ok(ScreeningReport {
            encounters,
            pairs_evaluated,
            skipped_objects,
        })
    }

    fn evaluate_pair(&self, a: &Track<'_>, b: &Track<'_>, synchronized: bool) -> Option<Encounter> {
        let approach = if synchronized {
            closest_synchronized(a.samples, b.samples, self.params.sync_tolerance_days)?
        } else {
            closest_any(a.samples, b.samples)?
        };

        if approach.distance > self.params.max_distance_km {
            return None;
        }

        let relative_velocity = approach.first.relative_speed(approach.second);
        let risk = self.params.risk.assess(approach.distance, relative_velocity);

        log::trace!(
            "Encounter {} / {}: {:.3} km at JD {:.6}",
            a.id,
            b.id,
            approach.distance,
            approach.first.time
        );

        Some(Encounter {
            object_a: a.id.clone(),
            object_b: b.id.clone(),
            tca: approach.first.time,
            min_distance_km: approach.distance,
            relative_velocity_kms: relative_velocity,
            severity: risk.severity,
            probability: risk.probability,
        })
    }
}

/// Drop degenerate objects and keep the first occurrence of each identifier.
fn prepare_tracks<'a>(
    objects: &[(&'a ObjectId, &'a [StateVector])],
    synchronized: bool,
) -> (Vec<Track<'a>>, Vec<ObjectId>) {
    let mut seen: HashSet<&ObjectId> = HashSet::default();
    let mut tracks = Vec::with_capacity(objects.len());
    let mut skipped = Vec::new();

    for &(id, samples) in objects {
        let reason = if samples.is_empty() {
            Some("empty series")
        } else if !samples.iter().all(StateVector::is_finite) {
            Some("non-finite sample")
        } else if synchronized
            && samples
                .iter()
                .tuple_windows()
                .any(|(prev, next)| !(next.time >= prev.time))
        {
            Some("timestamps not in ascending order")
        } else if seen.contains(id) {
            Some("duplicate identifier")
        } else {
            None
        };

        match reason {
            Some(reason) => {
                log::warn!("Skipping object {id} from screening: {reason}");
                skipped.push(id.clone());
            }
            None => {
                seen.insert(id);
                tracks.push(Track { id, samples });
            }
        }
    }

    (tracks, skipped)
}

/// Compare every pair of samples closer than `tolerance` in time.
///
/// For each sample of `a` the matching window of `b` is scanned. The window's lower edge
/// only moves forward, so ordered series are walked once. On ties the earliest minimum
/// is kept.
fn closest_synchronized<'a>(
    a: &'a [StateVector],
    b: &'a [StateVector],
    tolerance: f64,
) -> Option<Approach<'a>> {
    let mut best: Option<Approach<'a>> = None;
    let mut lo = 0;

    for first in a {
        while lo < b.len() && first.time - b[lo].time >= tolerance {
            lo += 1;
        }
        for second in b[lo..]
            .iter()
            .take_while(|s| s.time - first.time < tolerance)
        {
            let distance = first.distance_to(second);
            if best.as_ref().map_or(true, |m| distance < m.distance) {
                best = Some(Approach {
                    distance,
                    first,
                    second,
                });
            }
        }
    }

    best
}

/// Compare every sample of `a` with the sample of `b` at the same index, ignoring time.
fn closest_any<'a>(a: &'a [StateVector], b: &'a [StateVector]) -> Option<Approach<'a>> {
    a.iter()
        .zip(b)
        .map(|(first, second)| Approach {
            distance: first.distance_to(second),
            first,
            second,
        })
        .fold(None, |best: Option<Approach<'a>>, candidate| match best {
            Some(m) if m.distance <= candidate.distance => Some(m),
            _ => Some(candidate),
        })
}
