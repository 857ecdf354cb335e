//! Tests for reducing matrices to a scalar

use spreduce::{
    reduce_partitioned, reduce_to_scalar, BitmapMatrix, Entries, FullMatrix, Liveness, Matrix,
    Monoid, ReduceOptions, SparseMatrixCSR, TaskPartition, Workspace,
};

// Helper: reduce with a fresh workspace, starting from the identity
fn reduce<T: spreduce::Scalar>(
    matrix: &Matrix<T>,
    monoid: &Monoid<T>,
    ntasks: usize,
    nthreads: usize,
) -> T {
    let mut ws = Workspace::new(ntasks, monoid.identity());
    let mut s = monoid.identity();
    reduce_to_scalar(&mut s, matrix, monoid, &mut ws, ntasks, nthreads).unwrap();
    s
}

#[test]
fn test_result_independent_of_task_count() {
    let values: Vec<u64> = (0..10_000).map(|i| (i * 7919) % 1013).collect();
    let expected: u64 = values.iter().sum();
    let a = Matrix::from(FullMatrix::column(values));

    for ntasks in [1, 2, 4, 8, 13, 64] {
        for nthreads in [1, 4] {
            assert_eq!(
                reduce(&a, &Monoid::plus(), ntasks, nthreads),
                expected,
                "ntasks = {}, nthreads = {}",
                ntasks,
                nthreads
            );
        }
    }
}

#[test]
fn test_min_max_over_panels() {
    let values: Vec<i32> = (0..1000).map(|i| ((i * 37) % 501) - 250).collect();
    let a = Matrix::from(FullMatrix::column(values));

    for ntasks in [1, 3, 8] {
        assert_eq!(reduce(&a, &Monoid::min(), ntasks, 2), -250);
        assert_eq!(reduce(&a, &Monoid::max(), ntasks, 2), 250);
    }
}

#[test]
fn test_more_tasks_than_entries() {
    let a = Matrix::from(FullMatrix::column(vec![2u32, 3, 4]));
    assert_eq!(reduce(&a, &Monoid::times(), 8, 4), 24);
}

#[test]
fn test_empty_matrix_leaves_running_value() {
    let a = Matrix::from(FullMatrix::<i64>::new(0, 0, vec![]));
    let plus = Monoid::<i64>::plus();
    let mut ws = Workspace::new(2, 0);
    let mut s = 41;
    reduce_to_scalar(&mut s, &a, &plus, &mut ws, 2, 2).unwrap();
    assert_eq!(s, 41);
}

#[test]
fn test_terminal_value_matches_full_fold() {
    // a zero early on: every task count must agree with the sequential product
    let mut values = vec![3i16; 5000];
    values[17] = 0;
    let a = Matrix::from(FullMatrix::column(values));
    for ntasks in [1, 2, 4, 8] {
        assert_eq!(reduce(&a, &Monoid::times(), ntasks, 4), 0);
    }

    let mut flags = vec![false; 3000];
    flags[2999] = true;
    let b = Matrix::from(FullMatrix::column(flags));
    for ntasks in [1, 5] {
        assert!(reduce(&b, &Monoid::lor(), ntasks, 2));
        assert!(!reduce(&b, &Monoid::land(), ntasks, 2));
    }
}

#[test]
fn test_terminal_check_granularity_does_not_change_result() {
    let mut values = vec![u8::MAX - 1; 2048];
    values[1500] = u8::MAX;
    let max = Monoid::<u8>::max();
    let partition = TaskPartition::even(values.len(), 4);

    for panels in [1, 2, 16, 1000] {
        let options = ReduceOptions {
            terminal_check_panels: panels,
            cross_task_exit: panels % 2 == 0,
        };
        let mut ws = Workspace::new(4, 0);
        let mut s = max.identity();
        reduce_partitioned(&mut s, Entries::dense(&values), &max, &mut ws, &partition, 4, &options)
            .unwrap();
        assert_eq!(s, u8::MAX, "terminal_check_panels = {}", panels);
    }
}

#[test]
fn test_zombie_values_never_contribute() {
    let build = |dead_value: u32| {
        let mut csr = SparseMatrixCSR::new(
            3, 4,
            vec![0, 3, 5, 8],
            vec![0, 1, 3, 0, 2, 1, 2, 3],
            vec![1, 2, 3, 4, dead_value, 6, 7, dead_value],
        );
        csr.mark_zombie(4);
        csr.mark_zombie(7);
        Matrix::from(csr)
    };

    for dead_value in [0u32, 1, 1_000_000] {
        let a = build(dead_value);
        assert_eq!(a.n_zombies(), 2);
        for ntasks in [1, 2, 3, 8] {
            assert_eq!(reduce(&a, &Monoid::plus(), ntasks, 2), 23);
            assert_eq!(reduce(&a, &Monoid::max(), ntasks, 2), 7);
            assert_eq!(reduce(&a, &Monoid::times(), ntasks, 2), 1008);
        }
    }
}

#[test]
fn test_revived_entry_counts_again() {
    let mut csr = SparseMatrixCSR::new(1, 3, vec![0, 3], vec![0, 1, 2], vec![5i64, 6, 7]);
    csr.mark_zombie(1);
    assert_eq!(reduce(&Matrix::from(csr.clone()), &Monoid::plus(), 2, 1), 12);
    csr.revive(1);
    assert_eq!(reduce(&Matrix::from(csr), &Monoid::plus(), 2, 1), 18);
}

#[test]
fn test_bitmap_absent_slots_never_contribute() {
    for fill in [0i8, -128, 127] {
        let mut b = BitmapMatrix::empty(4, 4, fill);
        b.insert(0, 0, 3);
        b.insert(2, 1, -5);
        b.insert(3, 3, 4);
        let a = Matrix::from(b);
        for ntasks in [1, 4, 16] {
            assert_eq!(reduce(&a, &Monoid::plus(), ntasks, 3), 2);
            assert_eq!(reduce(&a, &Monoid::min(), ntasks, 3), -5);
            assert_eq!(reduce(&a, &Monoid::max(), ntasks, 3), 4);
        }
    }
}

#[test]
fn test_bitmap_removed_entry() {
    let mut b = BitmapMatrix::empty(1, 3, 0u16);
    b.insert(0, 0, 10);
    b.insert(0, 2, 20);
    assert_eq!(b.remove(0, 2), Some(20));
    assert_eq!(reduce(&Matrix::from(b), &Monoid::plus(), 2, 2), 10);
}

#[test]
fn test_liveness_view_directly() {
    let values = [1u8, 2, 4, 8];
    let present = [true, false, true, false];
    let entries = Entries {
        values: &values,
        liveness: Liveness::Bitmap(&present),
        n_zombies: 0,
    };
    let bor = Monoid::<u8>::bor();
    let mut ws = Workspace::new(2, 0);
    let mut s = bor.identity();
    reduce_partitioned(
        &mut s,
        entries,
        &bor,
        &mut ws,
        &TaskPartition::even(4, 2),
        1,
        &ReduceOptions::default(),
    )
    .unwrap();
    assert_eq!(s, 0b0101);
}

#[test]
fn test_any_returns_some_live_entry() {
    let mut b = BitmapMatrix::empty(1, 6, -1i32);
    b.insert(0, 2, 30);
    b.insert(0, 4, 50);
    let a = Matrix::from(b);
    for ntasks in [1, 2, 6] {
        let v = reduce(&a, &Monoid::any(), ntasks, 2);
        assert!(v == 30 || v == 50, "any returned {}", v);
    }
}

#[test]
fn test_float_plus_close_to_sequential() {
    let values: Vec<f64> = (1..=1000).map(|i| 1.0 / i as f64).collect();
    let expected: f64 = values.iter().sum();
    let a = Matrix::from(FullMatrix::column(values));
    for ntasks in [1, 4, 16] {
        let s = reduce(&a, &Monoid::plus(), ntasks, 4);
        assert!((s - expected).abs() < 1.0e-10, "ntasks = {}: {} vs {}", ntasks, s, expected);
    }
}

#[test]
fn test_disabled_monoid_is_rejected() {
    let a = Matrix::from(FullMatrix::column(vec![1.0f32, 2.0]));
    let plus = Monoid::<f32>::plus().disabled();
    let mut ws = Workspace::new(1, 0.0);
    let mut s = 0.0;
    let err = reduce_to_scalar(&mut s, &a, &plus, &mut ws, 1, 1).unwrap_err();
    assert!(err.is_not_supported());
    assert!(err.to_string().contains("plus"));
}

#[test]
#[should_panic(expected = "workspace has")]
fn test_small_workspace_panics() {
    let a = Matrix::from(FullMatrix::column(vec![1u8, 2, 3]));
    let plus = Monoid::<u8>::plus();
    let mut ws = Workspace::new(1, 0);
    let mut s = 0;
    let _ = reduce_to_scalar(&mut s, &a, &plus, &mut ws, 3, 1);
}
