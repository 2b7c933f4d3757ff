//! Integration tests for JSON save/load.

use linalg_core::io::{read_matrix, write_matrix};
use linalg_core::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_matrix_file_round_trip_is_exact() {
    init();
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().join("weights.json");
    let m = Matrix::randn_with(7, 3, 0.0, 1e3, &mut StdRng::seed_from_u64(42)).unwrap();
    m.save(&path).expect("save failed");
    let loaded = Matrix::load(&path).expect("load failed");
    assert_eq!(loaded, m);
    assert_eq!(loaded.value_hash(), m.value_hash());
}

#[test]
fn test_vector_file_round_trip_is_exact() {
    init();
    let dir = tempdir().unwrap();
    let path = dir.path().join("bias.json");
    let v = Vector::from_vec(vec![0.1 + 0.2, std::f64::consts::PI, -1e-310, 1e308]);
    v.save(&path).unwrap();
    assert_eq!(Vector::load(&path).unwrap(), v);
}

#[test]
fn test_saving_a_view_stores_logical_layout() {
    init();
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    m.t().save(&path).unwrap();
    assert_eq!(Matrix::load(&path).unwrap(), m.transpose());
}

#[test]
fn test_row_less_matrix_is_not_saved() {
    init();
    let dir = tempdir().expect("failed to create temp dir");
    for (i, empty) in [Matrix::zeros(0, 3), Matrix::zeros(0, 0)].iter().enumerate() {
        let path = dir.path().join(format!("empty{}.json", i));
        let err = empty.save(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("no rows"), "{:#}", err);
        assert!(!path.exists());
    }

    let path = dir.path().join("no_cols.json");
    let m = Matrix::zeros(3, 0);
    m.save(&path).expect("save failed");
    assert_eq!(Matrix::load(&path).expect("load failed"), m);
}

#[test]
fn test_load_errors_carry_the_path() {
    init();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = Matrix::load(&missing).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));

    let bad = dir.path().join("ragged.json");
    std::fs::write(&bad, "[[1, 2], [3]]").unwrap();
    let err = Matrix::load(&bad).unwrap_err();
    assert!(err.to_string().contains("ragged.json"));
    assert!(format!("{:#}", err).contains("dimension mismatch"));
}

#[test]
fn test_stream_api_writes_plain_json() {
    init();
    let m = Matrix::identity(2);
    let mut buf = Vec::new();
    write_matrix(&mut buf, &m).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value, serde_json::json!([[1.0, 0.0], [0.0, 1.0]]));
    assert_eq!(read_matrix(buf.as_slice()).unwrap(), m);
}
