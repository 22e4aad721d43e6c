use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tiled_geometry_slicer::driver::{GroupInput, RingInput};
use tiled_geometry_slicer::sequence::Point;
use tiled_geometry_slicer::{TiledGeometry, WorldExtents};

/// A regular `n`-gon inscribed in a circle of radius `radius` centered on `(center, center)`,
/// in world units — `n` controls how many stripe/cell transitions the clip has to do.
fn ngon(center: f64, radius: f64, n: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..n {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
        points.push(Point::new(center + radius * theta.cos(), center + radius * theta.sin()));
    }
    points.push(points[0]);
    points
}

fn polygon_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_shapes/polygon");
    let z = 6u8;
    let w = 1i64 << z;
    let extents = WorldExtents::new(z);
    let center = w as f64 / 2.0;

    for &n in &[8usize, 64, 512] {
        let ring = ngon(center, (w as f64) / 3.0, n);
        group.bench_with_input(BenchmarkId::new("vertices", n), &ring, |b, ring| {
            b.iter(|| {
                let mut geom = TiledGeometry::new(z).unwrap();
                let input = GroupInput {
                    rings: vec![RingInput {
                        points: ring.clone(),
                        outer: true,
                    }],
                };
                geom.slice_shapes(&extents, 0.0, true, &[input]);
                geom
            });
        });
    }

    group.finish();
}

fn zoom_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_shapes/zoom");

    for &z in &[2u8, 6, 10] {
        let w = 1i64 << z;
        let extents = WorldExtents::new(z);
        let center = w as f64 / 2.0;
        let ring = ngon(center, (w as f64) / 3.0, 64);

        group.bench_with_input(BenchmarkId::new("z", z), &(z, ring), |b, (z, ring)| {
            b.iter(|| {
                let mut geom = TiledGeometry::new(*z).unwrap();
                let input = GroupInput {
                    rings: vec![RingInput {
                        points: ring.clone(),
                        outer: true,
                    }],
                };
                geom.slice_shapes(&extents, 0.0, true, &[input]);
                geom
            });
        });
    }

    group.finish();
}

fn points(c: &mut Criterion) {
    let z = 8u8;
    let extents = WorldExtents::new(z);
    let coords: Vec<(f64, f64)> = (0..1000).map(|i| ((i as f64 * 0.0123) % 1.0, (i as f64 * 0.0071) % 1.0)).collect();

    c.bench_function("slice_points/1000", |b| {
        b.iter(|| {
            let mut geom = TiledGeometry::new(z).unwrap();
            geom.slice_points(&extents, 0.0, coords.iter().copied());
            geom
        });
    });
}

criterion_group!(benches, polygon_sizes, zoom_levels, points);
criterion_main!(benches);
