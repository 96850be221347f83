use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use myriad_core::{
    BucketConfig, CameraState, CpuResolver, DatasetSnapshot, LodBuckets, Resolver,
};

fn synthetic_dataset(n: usize) -> (Vec<f32>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut positions = Vec::with_capacity(n * 3);
    let mut elements = Vec::with_capacity(n);
    for i in 0..n {
        positions.push(rng.gen_range(-200.0..200.0));
        positions.push(rng.gen_range(-200.0..200.0));
        positions.push(rng.gen_range(-200.0..200.0));
        elements.push((i % 4) as u8);
    }
    (positions, elements)
}

fn bench_cpu_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_resolve");
    let camera = CameraState::default();
    let resolver = CpuResolver::new();

    for &n in &[1_000usize, 100_000, 1_000_000] {
        let (positions, elements) = synthetic_dataset(n);
        let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &snap, |b, snap| {
            b.iter(|| resolver.resolve(black_box(snap), black_box(&camera)).unwrap())
        });
    }
    group.finish();
}

fn bench_bucketing(c: &mut Criterion) {
    let camera = CameraState::default();
    let (positions, elements) = synthetic_dataset(1_000_000);
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
    let frame = CpuResolver::new().resolve(&snap, &camera).unwrap();
    let config = BucketConfig::default();

    c.bench_function("bucket_rebuild_1m", |b| {
        let mut buckets = LodBuckets::new();
        b.iter(|| buckets.rebuild(black_box(&frame.records), &config))
    });
}

criterion_group!(benches, bench_cpu_resolve, bench_bucketing);
criterion_main!(benches);
