//! Benchmarks for scalar reduction and deduplicating build

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spreduce::{
    build, reduce_to_scalar, BitmapMatrix, FullMatrix, Matrix, Monoid, SparseMatrixCSR, Workspace,
};

const N: usize = 1 << 20;

/// Reduce a dense array over a range of task counts
fn bench_panel_reduction(c: &mut Criterion) {
    let a = Matrix::from(FullMatrix::column((0..N as u64).collect()));
    let plus = Monoid::<u64>::plus();

    let mut group = c.benchmark_group("panel_plus_uint64");
    for ntasks in [1, 4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(ntasks), &ntasks, |bench, &ntasks| {
            let mut ws = Workspace::new(ntasks, 0);
            bench.iter(|| {
                let mut s = plus.identity();
                reduce_to_scalar(&mut s, black_box(&a), &plus, &mut ws, ntasks, ntasks).unwrap();
                black_box(s)
            })
        });
    }
    group.finish();
}

/// Presence-aware path: a CSR matrix with every tenth entry deleted,
/// and a half-populated bitmap
fn bench_presence_reduction(c: &mut Criterion) {
    let n_rows = 1024;
    let per_row = N / n_rows;
    let row_ptr: Vec<usize> = (0..=n_rows).map(|i| i * per_row).collect();
    let col_idx: Vec<usize> = (0..N).map(|p| p % per_row).collect();
    let mut csr = SparseMatrixCSR::new(n_rows, per_row, row_ptr, col_idx, vec![1.0f64; N]);
    for p in (0..N).step_by(10) {
        csr.mark_zombie(p);
    }
    let zombies = Matrix::from(csr);

    let mut bitmap = BitmapMatrix::empty(1, N, 0.5f64);
    for j in (0..N).step_by(2) {
        bitmap.insert(0, j, 1.0);
    }
    let bitmap = Matrix::from(bitmap);

    let plus = Monoid::<f64>::plus();
    let ntasks = 16;
    let mut ws = Workspace::new(ntasks, 0.0);

    c.bench_function("zombies_plus_fp64", |bench| {
        bench.iter(|| {
            let mut s = 0.0;
            reduce_to_scalar(&mut s, black_box(&zombies), &plus, &mut ws, ntasks, ntasks).unwrap();
            black_box(s)
        })
    });
    c.bench_function("bitmap_plus_fp64", |bench| {
        bench.iter(|| {
            let mut s = 0.0;
            reduce_to_scalar(&mut s, black_box(&bitmap), &plus, &mut ws, ntasks, ntasks).unwrap();
            black_box(s)
        })
    });
}

/// Early exit: a zero near the front of a long product
fn bench_terminal_exit(c: &mut Criterion) {
    let mut values = vec![1i32; N];
    values[1000] = 0;
    let a = Matrix::from(FullMatrix::column(values));
    let times = Monoid::<i32>::times();
    let mut ws = Workspace::new(16, 1);

    c.bench_function("times_int32_terminal", |bench| {
        bench.iter(|| {
            let mut s = times.identity();
            reduce_to_scalar(&mut s, black_box(&a), &times, &mut ws, 16, 16).unwrap();
            black_box(s)
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let indices: Vec<usize> = (0..N).map(|i| (i * 7919) % (N / 8)).collect();
    let values = vec![1u32; N];
    let plus = Monoid::<u32>::plus();

    let mut group = c.benchmark_group("build_plus_uint32");
    group.sample_size(20);
    for ntasks in [1, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(ntasks), &ntasks, |bench, &ntasks| {
            bench.iter(|| black_box(build(&indices, &values, &plus, ntasks, ntasks).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_panel_reduction,
    bench_presence_reduction,
    bench_terminal_exit,
    bench_build
);
criterion_main!(benches);
