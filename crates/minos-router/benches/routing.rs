//! Routing benchmarks.
//!
//! Run with: `cargo bench -p minos-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use minos_router::{table, RoutePattern, Router};

fn build_router(controllers: usize) -> Router<usize> {
    let mut router = Router::new();

    for i in 0..controllers {
        let url = table::fix_url(&format!("org/resource{i}.rs"));
        for route in table::routes_for_url(&url) {
            router.add(route.method, RoutePattern::path(route.url), i);
        }
    }

    router
}

fn bench_route_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_table");

    for depth in [1, 2, 4, 6] {
        let path: Vec<String> = (0..depth).map(|i| format!("things{i}")).collect();
        let url = table::fix_url(&path.join("/"));

        group.bench_with_input(BenchmarkId::new("routes_for_url", depth), &url, |b, url| {
            b.iter(|| black_box(table::routes_for_url(url)));
        });
    }

    group.finish();
}

fn bench_first_match(c: &mut Criterion) {
    let router = build_router(50);

    c.bench_function("first_match_collection", |b| {
        b.iter(|| black_box(router.matches(&Method::GET, "/org/resource25").next()));
    });

    c.bench_function("first_match_member", |b| {
        b.iter(|| {
            black_box(
                router
                    .matches(&Method::GET, "/org/acme/resource25/12345")
                    .next(),
            )
        });
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(50);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(router.matches(&Method::GET, "/nonexistent/path/x/y").next()));
    });
}

criterion_group!(benches, bench_route_table, bench_first_match, bench_miss);
criterion_main!(benches);
