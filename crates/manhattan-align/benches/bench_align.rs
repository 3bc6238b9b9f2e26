use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use manhattan_3d::linalg::transform_points3d;
use manhattan_3d::pointcloud::PointCloud;
use manhattan_3d::transforms::axis_angle_to_rotation_matrix;
use manhattan_align::{align_to_manhattan, AlignParams};
use rand::{rngs::StdRng, Rng, SeedableRng};

// room-shaped cloud, tilted off the world axes
fn make_cloud(num_points: usize) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(7);
    let points = (0..num_points)
        .map(|_| {
            [
                rng.random_range(-4.0..4.0),
                rng.random_range(-2.5..2.5),
                rng.random_range(0.0..2.5),
            ]
        })
        .collect::<Vec<_>>();

    let rotation = axis_angle_to_rotation_matrix(&[0.2, -0.1, 1.0], 0.5)
        .expect("valid rotation axis");
    let mut rotated = vec![[0.0; 3]; points.len()];
    transform_points3d(&points, &rotation, &[0.0; 3], &mut rotated);

    PointCloud::new(rotated, None)
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    for num_points in [1_000usize, 10_000, 100_000] {
        let cloud = make_cloud(num_points);
        let params = AlignParams::default();
        group.bench_with_input(
            BenchmarkId::new("align_to_manhattan", num_points),
            &num_points,
            |b, _| b.iter(|| align_to_manhattan(black_box(&cloud), &params)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_align);
criterion_main!(benches);
