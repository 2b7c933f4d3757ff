//! Arithmetic on `Vector` and `Matrix`.
//!
//! Every shape-sensitive operation has a checked method returning
//! [`Result`]; the operator overloads call those and panic with the
//! error message on a shape mismatch, the same way slice indexing panics.
use std::ops::{Add, BitXor, Div, Mul, Neg, Sub};

use crate::error::{LinalgError, Result};
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;

impl Vector {
    fn zip_with<F>(&self, other: &Vector, operation: &'static str, f: F) -> Result<Vector>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.len() != other.len() {
            return Err(LinalgError::length_mismatch(operation, self.len(), other.len()));
        }
        Ok(self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect())
    }

    pub fn checked_add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector add", |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector subtract", |a, b| a - b)
    }

    /// Elementwise product.
    pub fn checked_mul(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector multiply", |a, b| a * b)
    }

    /// Elementwise quotient.
    pub fn checked_div(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector divide", |a, b| a / b)
    }

    /// Elementwise `x.powf(exponent)`.
    pub fn powf(&self, exponent: f64) -> Vector {
        self.map(|x| x.powf(exponent))
    }
}

impl Matrix {
    fn zip_with<F>(&self, other: &Matrix, operation: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(LinalgError::shape_mismatch(operation, self.shape(), other.shape()));
        }
        let rhs = other.to_row_major();
        let data = self
            .to_row_major()
            .into_iter()
            .zip(rhs)
            .map(|(a, b)| f(a, b))
            .collect();
        Matrix::from_shape_vec(self.shape(), data)
    }

    pub fn checked_add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "matrix add", |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "matrix subtract", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "hadamard product", |a, b| a * b)
    }

    /// Matrix product; requires `self.cols() == other.rows()`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols() != other.rows() {
            return Err(LinalgError::DimensionMismatch {
                operation: "matmul",
                expected: format!("{} rows on the right-hand side", self.cols()),
                actual: format!("{}x{}", other.rows(), other.cols()),
            });
        }
        Ok(Matrix::from_dense(self.to_dense().matmul(&other.to_dense())))
    }

    /// `self * v` with `v` treated as a column; requires `self.cols() == v.len()`.
    pub fn mul_vector(&self, v: &Vector) -> Result<Vector> {
        if self.cols() != v.len() {
            return Err(LinalgError::length_mismatch("matrix-vector product", self.cols(), v.len()));
        }
        let x = v.values();
        Ok(self
            .vectors(crate::config::Axis::Row)
            .map(|row| row.iter().zip(x.iter()).map(|(a, b)| a * b).sum())
            .collect())
    }
}

macro_rules! forward_owned_binop {
    ($ty:ty, $rhs:ty, $trait:ident, $method:ident, $output:ty) => {
        impl $trait<$rhs> for $ty {
            type Output = $output;
            fn $method(self, rhs: $rhs) -> $output {
                (&self).$method(&rhs)
            }
        }
        impl<'a> $trait<&'a $rhs> for $ty {
            type Output = $output;
            fn $method(self, rhs: &'a $rhs) -> $output {
                (&self).$method(rhs)
            }
        }
        impl<'a> $trait<$rhs> for &'a $ty {
            type Output = $output;
            fn $method(self, rhs: $rhs) -> $output {
                self.$method(&rhs)
            }
        }
    };
}

macro_rules! checked_binop {
    ($ty:ty, $rhs:ty, $trait:ident, $method:ident, $checked:ident, $output:ty) => {
        impl<'a, 'b> $trait<&'b $rhs> for &'a $ty {
            type Output = $output;
            fn $method(self, rhs: &'b $rhs) -> $output {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{}", e))
            }
        }
        forward_owned_binop!($ty, $rhs, $trait, $method, $output);
    };
}

macro_rules! scalar_binop {
    ($ty:ty, $trait:ident, $method:ident, $op:tt) => {
        impl<'a> $trait<f64> for &'a $ty {
            type Output = $ty;
            fn $method(self, rhs: f64) -> $ty {
                self.map(|x| x $op rhs)
            }
        }
        impl $trait<f64> for $ty {
            type Output = $ty;
            fn $method(self, rhs: f64) -> $ty {
                (&self).$method(rhs)
            }
        }
        impl<'a> $trait<&'a $ty> for f64 {
            type Output = $ty;
            fn $method(self, rhs: &'a $ty) -> $ty {
                rhs.map(|x| self $op x)
            }
        }
        impl $trait<$ty> for f64 {
            type Output = $ty;
            fn $method(self, rhs: $ty) -> $ty {
                self.$method(&rhs)
            }
        }
    };
}

checked_binop!(Vector, Vector, Add, add, checked_add, Vector);
checked_binop!(Vector, Vector, Sub, sub, checked_sub, Vector);
checked_binop!(Vector, Vector, Mul, mul, checked_mul, Vector);
checked_binop!(Vector, Vector, Div, div, checked_div, Vector);

// `s - v` evaluates `s + (-x)` per element, not `x - s`.
scalar_binop!(Vector, Add, add, +);
scalar_binop!(Vector, Sub, sub, -);
scalar_binop!(Vector, Mul, mul, *);
scalar_binop!(Vector, Div, div, /);

checked_binop!(Matrix, Matrix, Add, add, checked_add, Matrix);
checked_binop!(Matrix, Matrix, Sub, sub, checked_sub, Matrix);
checked_binop!(Matrix, Matrix, Mul, mul, matmul, Matrix);
checked_binop!(Matrix, Vector, Mul, mul, mul_vector, Vector);

scalar_binop!(Matrix, Add, add, +);
scalar_binop!(Matrix, Sub, sub, -);
scalar_binop!(Matrix, Mul, mul, *);
scalar_binop!(Matrix, Div, div, /);

impl<'a> Neg for &'a Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        self.map(|x| -x)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        -&self
    }
}

impl<'a> Neg for &'a Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        self.map(|x| -x)
    }
}

impl Neg for Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        -&self
    }
}

/// `v ^ p` raises every element to `p`.
impl<'a> BitXor<f64> for &'a Vector {
    type Output = Vector;
    fn bitxor(self, exponent: f64) -> Vector {
        self.powf(exponent)
    }
}

impl BitXor<f64> for Vector {
    type Output = Vector;
    fn bitxor(self, exponent: f64) -> Vector {
        self.powf(exponent)
    }
}

/// `m ^ n` is the matrix power [`Matrix::pow`]; panics where `pow` errors.
impl<'a> BitXor<i32> for &'a Matrix {
    type Output = Matrix;
    fn bitxor(self, n: i32) -> Matrix {
        self.pow(n).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl BitXor<i32> for Matrix {
    type Output = Matrix;
    fn bitxor(self, n: i32) -> Matrix {
        (&self) ^ n
    }
}
