use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbitguard::constants::ObjectId;
use orbitguard::orbital_elements::OrbitalElements;
use orbitguard::propagator::propagate_catalog;
use orbitguard::screening::{ConjunctionScreener, ScreeningParams};
use orbitguard::state_vector::StateVector;

const EPOCH: f64 = 2460000.0;

/// Random LEO catalog, all objects sharing the same epoch.
fn random_catalog(rng: &mut StdRng, n: usize) -> Vec<(ObjectId, OrbitalElements)> {
    (0..n)
        .map(|k| {
            let elem = OrbitalElements::from_degrees(
                EPOCH,
                rng.random_range(14.0..15.8),
                rng.random_range(0.0..0.02),
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
            )
            .unwrap();
            (ObjectId::Catalog(k as u32), elem)
        })
        .collect()
}

fn trajectories(catalog: &[(ObjectId, OrbitalElements)]) -> Vec<(ObjectId, Vec<StateVector>)> {
    propagate_catalog(catalog, 0.0, 120.0, 1.0)
        .into_iter()
        .filter_map(|(id, res)| res.ok().map(|states| (id, states)))
        .collect()
}

fn bench_propagate_catalog(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let catalog = random_catalog(&mut rng, 200);

    c.bench_function("propagate_catalog/200_objects_121_steps", |b| {
        b.iter(|| black_box(trajectories(black_box(&catalog))))
    });
}

fn bench_screen(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let screener = ConjunctionScreener::new(ScreeningParams::default());

    let mut group = c.benchmark_group("screen_conjunctions");
    group.sample_size(20);
    for n in [50usize, 200] {
        let tracks = trajectories(&random_catalog(&mut rng, n));
        group.bench_function(format!("time_series/{n}_objects"), |b| {
            b.iter_batched(
                || tracks.clone(),
                |tracks| black_box(screener.screen(&tracks).unwrap()),
                BatchSize::LargeInput,
            )
        });
    }

    let snapshots: Vec<(ObjectId, StateVector)> = trajectories(&random_catalog(&mut rng, 1000))
        .into_iter()
        .map(|(id, states)| (id, states[0]))
        .collect();
    group.bench_function("snapshot/1000_objects", |b| {
        b.iter(|| black_box(screener.screen_snapshot(black_box(&snapshots)).unwrap()))
    });
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_propagate_catalog, bench_screen
);
criterion_main!(benches);
