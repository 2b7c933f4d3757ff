//! Property tests for algebraic identities.

use linalg_core::{Axis, Matrix, Vector};
use proptest::prelude::*;

/// Matrices of shape up to 6x6 with moderate entries.
fn matrix_strategy() -> impl Strategy<Value = Matrix> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-1e3f64..1e3, rows * cols)
            .prop_map(move |data| Matrix::from_shape_vec((rows, cols), data).unwrap())
    })
}

fn matrix_pair_strategy() -> impl Strategy<Value = (Matrix, Matrix)> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        let cell = prop::collection::vec(-1e3f64..1e3, rows * cols);
        (cell.clone(), cell).prop_map(move |(a, b)| {
            (
                Matrix::from_shape_vec((rows, cols), a).unwrap(),
                Matrix::from_shape_vec((rows, cols), b).unwrap(),
            )
        })
    })
}

proptest! {
    #[test]
    fn add_then_subtract_is_identity((a, b) in matrix_pair_strategy()) {
        let back = &(&a + &b) - &b;
        prop_assert!(back.approx_eq(&a, 1e-9));
    }

    #[test]
    fn double_transpose_is_identity(a in matrix_strategy()) {
        prop_assert_eq!(a.t().t(), a.clone());
        prop_assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn transpose_swaps_indices(a in matrix_strategy()) {
        let t = a.t();
        for i in 0..a.rows() {
            for j in 0..a.cols() {
                prop_assert_eq!(a.get(i, j).unwrap(), t.get(j, i).unwrap());
            }
        }
    }

    #[test]
    fn identity_is_neutral(a in matrix_strategy()) {
        prop_assert_eq!(&a * &Matrix::identity(a.cols()), a.clone());
        prop_assert_eq!(&Matrix::identity(a.rows()) * &a, a);
    }

    #[test]
    fn display_parses_back_within_precision(a in matrix_strategy()) {
        let text = format!("{:.6}", a);
        let back: Matrix = text.parse().unwrap();
        prop_assert!(back.approx_eq(&a, 1e-6));
    }

    #[test]
    fn unshape_reshape_round_trip(a in matrix_strategy(), by_col in any::<bool>()) {
        let axis = if by_col { Axis::Col } else { Axis::Row };
        let flat: Vector = a.unshape(axis);
        let back = Matrix::from_vector(&flat, a.rows(), a.cols(), axis).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn value_hash_agrees_with_equality(a in matrix_strategy()) {
        prop_assert_eq!(a.copy().value_hash(), a.value_hash());
    }
}
