use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hopnet_core::{energy, synchronous_step, PackedSymMatrix, Pattern};

/// Network orders we benchmark: 16x16, 32x32, 64x64 grids.
const NEURON_COUNTS: &[usize] = &[256, 1024, 4096];

fn random_pattern(seed: u64, neurons: usize) -> Pattern {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<i8> = (0..neurons)
        .map(|_| if rng.gen_bool(0.5) { 1 } else { -1 })
        .collect();
    Pattern::from_values("bench.txt", values).unwrap()
}

fn trained_matrix(neurons: usize) -> PackedSymMatrix {
    let patterns: Vec<Pattern> = (0..4).map(|k| random_pattern(k, neurons)).collect();
    let mut matrix = PackedSymMatrix::new(neurons);
    matrix.fill(&patterns).unwrap();
    matrix
}

fn bench_hebbian_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hebbian fill");
    group.sample_size(10);

    for &neurons in NEURON_COUNTS {
        let patterns: Vec<Pattern> = (0..4).map(|k| random_pattern(k, neurons)).collect();

        group.throughput(Throughput::Elements((neurons * (neurons - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::new("fill", neurons), &neurons, |bencher, &n| {
            bencher.iter(|| {
                let mut matrix = PackedSymMatrix::new(n);
                matrix.fill(black_box(&patterns)).unwrap();
                matrix
            })
        });
    }

    group.finish();
}

fn bench_synchronous_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Synchronous step");
    group.sample_size(10);

    for &neurons in NEURON_COUNTS {
        let matrix = trained_matrix(neurons);
        let state = random_pattern(99, neurons);

        group.throughput(Throughput::Elements(neurons as u64));
        group.bench_with_input(BenchmarkId::new("step", neurons), &neurons, |bencher, _| {
            bencher.iter(|| synchronous_step(black_box(&matrix), black_box(state.values())))
        });
    }

    group.finish();
}

fn bench_energy(c: &mut Criterion) {
    let mut group = c.benchmark_group("Energy");
    group.sample_size(10);

    for &neurons in NEURON_COUNTS {
        let matrix = trained_matrix(neurons);
        let state = random_pattern(99, neurons);

        group.throughput(Throughput::Elements(neurons as u64));
        group.bench_with_input(
            BenchmarkId::new("energy", neurons),
            &neurons,
            |bencher, _| bencher.iter(|| energy(black_box(&matrix), black_box(state.values()))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hebbian_fill,
    bench_synchronous_step,
    bench_energy
);
criterion_main!(benches);
