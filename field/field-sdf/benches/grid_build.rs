//! Distance-grid build throughput over generated spheres.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use field_sdf::SignedDistanceGrid;
use field_types::generators::uv_sphere;

fn bench_grid_build(c: &mut Criterion) {
    let sphere = uv_sphere(1.0, 12, 16);
    let mut group = c.benchmark_group("grid_build");
    for resolution in [8usize, 16, 32] {
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| SignedDistanceGrid::build(black_box(&sphere), resolution));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_grid_build);
criterion_main!(benches);
