use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lifegrid::{Grid, engine};

fn make_grid(size: usize) -> Grid {
    let alive = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .filter(|(row, col)| (row + col) % 3 == 0);
    Grid::from_alive(size, size, alive).expect("cells in bounds")
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for size in [25, 50, 256] {
        let grid = make_grid(size);

        group.bench_with_input(BenchmarkId::new("serial", size), &grid, |b, grid| {
            b.iter(|| engine::step(grid));
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &grid, |b, grid| {
            b.iter(|| engine::step_parallel(grid));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
