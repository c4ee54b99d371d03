// Criterion benchmarks for GoWhere

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gowhere::core::{haversine_distance, match_classrooms, proximity_alert, route_bounds};
use gowhere::models::{ClassroomRecord, Coordinate, FavoriteSet};

const BUILDINGS: [(&str, &str); 4] = [
    ("KHE", "Kerr Hall East"),
    ("ENG", "Engineering Building"),
    ("RCC", "Rogers Communications Centre"),
    ("LIB", "Library Building"),
];

fn create_directory(size: usize) -> Vec<ClassroomRecord> {
    (0..size)
        .map(|i| {
            let (code, building) = BUILDINGS[i % BUILDINGS.len()];
            let offset = (i as f64 * 0.0001) % 0.01;
            ClassroomRecord::new(
                format!("{}-{:03}", code, i),
                Coordinate::new(43.6577 + offset, -79.3788 - offset),
            )
            .with_building(building)
            .with_floor((i % 5) as i32)
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    let a = Coordinate::new(43.6577, -79.3788);
    let b = Coordinate::new(43.65834, -79.38189);

    c.bench_function("haversine_distance", |bench| {
        bench.iter(|| haversine_distance(black_box(a), black_box(b)));
    });

    c.bench_function("proximity_alert", |bench| {
        bench.iter(|| proximity_alert(black_box(a), black_box(b), black_box(10.0)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    for size in [10, 100, 1000, 5000].iter() {
        let directory = create_directory(*size);
        let favorites: FavoriteSet = directory.iter().step_by(7).map(|r| r.id.clone()).collect();

        group.bench_with_input(BenchmarkId::new("two_tokens", size), size, |b, _| {
            b.iter(|| match_classrooms(black_box("kerr 1"), black_box(&directory), &favorites));
        });

        group.bench_with_input(BenchmarkId::new("empty_query", size), size, |b, _| {
            b.iter(|| match_classrooms(black_box(""), black_box(&directory), &favorites));
        });
    }

    group.finish();
}

fn bench_route_bounds(c: &mut Criterion) {
    let polyline: Vec<Coordinate> = (0..500)
        .map(|i| Coordinate::new(43.6577 + i as f64 * 0.00001, -79.3788 - i as f64 * 0.00002))
        .collect();

    c.bench_function("route_bounds_500_points", |b| {
        b.iter(|| route_bounds(black_box(&polyline)));
    });
}

criterion_group!(benches, bench_haversine_distance, bench_matching, bench_route_bounds);

criterion_main!(benches);
