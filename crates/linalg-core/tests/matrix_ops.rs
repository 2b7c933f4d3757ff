//! Integration tests for matrix views, shape manipulation and arithmetic.

use linalg_core::{Axis, LinalgError, Matrix, Vector};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample() -> Matrix {
    "[[1, 2, 3]; [4, 5, 6]]".parse().expect("failed to parse sample matrix")
}

// ---------------------------------------------------------------------------
// Transpose views
// ---------------------------------------------------------------------------

#[test]
fn test_transpose_view_sees_owner_writes() {
    init();
    let mut m = sample();
    let t = m.t();
    assert_eq!(t.shape(), (3, 2));
    m.set(1, 2, 60.0).expect("owner write failed");
    assert_eq!(t.get(2, 1).unwrap(), 60.0);
}

#[test]
fn test_transpose_view_is_read_only() {
    init();
    let m = sample();
    let mut t = m.t();
    let err = t.set(0, 0, 1.0).unwrap_err();
    assert!(matches!(err, LinalgError::InvalidOperation(_)));
    // a copy of the view is an ordinary owner again
    let mut owned = t.copy();
    owned.set(0, 0, 9.0).expect("copy should be writable");
    assert_eq!(m.get(0, 0).unwrap(), 1.0);
}

#[test]
fn test_row_vector_of_view_reads_through() {
    init();
    let mut m = sample();
    let col_as_row = m.t().row(0).expect("row 0 of view");
    assert!(col_as_row.is_view());
    assert_eq!(col_as_row.to_vec(), vec![1.0, 4.0]);
    m.set(1, 0, 40.0).unwrap();
    assert_eq!(col_as_row.to_vec(), vec![1.0, 40.0]);
}

// ---------------------------------------------------------------------------
// Shape manipulation
// ---------------------------------------------------------------------------

#[test]
fn test_reshape_unshape_round_trip() {
    init();
    let m = sample();
    let flat = m.unshape(Axis::Row);
    assert_eq!(flat.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let back = Matrix::from_vector(&flat, 2, 3, Axis::Row).unwrap();
    assert_eq!(back, m);
    let by_col = m.unshape(Axis::Col);
    assert_eq!(by_col.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(Matrix::from_vector(&by_col, 2, 3, Axis::Col).unwrap(), m);
    assert!(Matrix::from_vector(&flat, 4, 4, Axis::Row).is_err());
}

#[test]
fn test_stack_insert_remove() {
    init();
    let m = sample();
    let wide = m.stack(&Matrix::ones(2, 1)).unwrap();
    assert_eq!(wide.shape(), (2, 4));
    let tall = m.vstack(&Matrix::zeros(1, 3)).unwrap();
    assert_eq!(tall.shape(), (3, 3));
    assert!(m.vstack(&Matrix::zeros(1, 2)).is_err());

    let v = Vector::from_vec(vec![7.0, 8.0, 9.0]);
    let inserted = m.insert(&v, 1, Axis::Row).unwrap();
    assert_eq!(inserted.row(1).unwrap(), v);
    assert_eq!(inserted.remove(1, Axis::Row).unwrap(), m);
}

#[test]
fn test_sort_rows_by_key() {
    init();
    let m = Matrix::from_rows(&[[3.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
    let (sorted, order) = m.sort(|row| row.get(0).unwrap_or(0.0), Axis::Row, true);
    assert_eq!(order.to_vec(), vec![1.0, 2.0, 0.0]);
    assert_eq!(sorted.col(0).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_sort_cols_by_key() {
    init();
    let m = Matrix::from_rows(&[[3.0, 1.0, 2.0], [30.0, 10.0, 20.0]]);
    let (sorted, order) = m.sort(|col| col.sum(), Axis::Col, false);
    assert_eq!(order.to_vec(), vec![0.0, 2.0, 1.0]);
    assert_eq!(
        sorted,
        Matrix::from_rows(&[[3.0, 2.0, 1.0], [30.0, 20.0, 10.0]])
    );
    assert!(!sorted.is_view());
}

#[test]
fn test_sort_with_nan_keys_is_deterministic() {
    init();
    let m = Matrix::from_rows(&[[2.0], [f64::NAN], [1.0]]);
    let (_, order) = m.sort(|row| row.get(0).unwrap_or(0.0), Axis::Row, true);
    assert_eq!(order.to_vec(), vec![2.0, 0.0, 1.0]);
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn test_product_with_transpose() {
    init();
    let m = sample();
    let gram = &m * &m.t();
    assert_eq!(gram, Matrix::from_rows(&[[14.0, 32.0], [32.0, 77.0]]));
    assert_eq!(gram, gram.transpose());
}

#[test]
fn test_checked_shapes_report_operation() {
    init();
    let err = sample().matmul(&sample()).unwrap_err();
    assert!(err.to_string().contains("matmul"));
}

#[test]
fn test_value_hash_follows_values() {
    init();
    let a = sample();
    let b = a.copy();
    assert_eq!(a.value_hash(), b.value_hash());
    let mut c = a.copy();
    c.set(0, 0, -1.0).unwrap();
    assert_ne!(a.value_hash(), c.value_hash());
}

#[test]
fn test_normalize_then_center() {
    init();
    let mut m = Matrix::from_rows(&[[3.0, 4.0], [6.0, 8.0]]);
    m.normalize(Axis::Row).unwrap();
    assert!(m.approx_eq(&Matrix::from_rows(&[[0.6, 0.8], [0.6, 0.8]]), 1e-12));
    m.center(Axis::Row).unwrap();
    assert!(m.approx_eq(&Matrix::zeros(2, 2), 1e-12));
}
