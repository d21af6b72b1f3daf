use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heightmesh::terrain::{build_mesh, ChangeWatcher, GenerationParameters};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mesh Build");

    for &n in &[16, 64, 256] {
        group.bench_function(format!("build_{}x{}", n, n), |b| {
            let params = GenerationParameters::terrain().with_grid(n, n);
            b.iter(|| {
                black_box(build_mesh(&params, None).ok());
            });
        });
    }

    group.finish();
}

fn bench_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("Change Watcher");

    group.bench_function("poll_unchanged_256", |b| {
        let params = GenerationParameters::terrain().with_grid(256, 256);
        let mut watcher = ChangeWatcher::new();
        let _ = watcher.poll(&params);
        b.iter(|| {
            black_box(watcher.poll(&params).ok());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_poll);
criterion_main!(benches);
