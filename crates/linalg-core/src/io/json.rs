use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;
use log::debug;

use crate::error::{LinalgError, Result};
use crate::math::{Matrix, Vector};

fn ensure_finite<'a>(values: impl IntoIterator<Item = &'a f64>, what: &str) -> Result<()> {
    match values.into_iter().find(|x| !x.is_finite()) {
        Some(x) => Err(LinalgError::Serialization(format!(
            "cannot write {} containing non-finite value {}",
            what, x
        ))),
        None => Ok(()),
    }
}

/// A matrix without rows is written as `[]`, which carries no column count.
fn ensure_has_rows(matrix: &Matrix) -> Result<()> {
    if matrix.rows() == 0 {
        return Err(LinalgError::Serialization(format!(
            "cannot write a {}x{} matrix: a matrix with no rows cannot be persisted",
            matrix.rows(),
            matrix.cols()
        )));
    }
    Ok(())
}

/// Writes `matrix` as `[[row0...], [row1...], ...]`.
///
/// Matrices with zero rows are rejected before anything is written.
pub fn write_matrix<W: Write>(writer: W, matrix: &Matrix) -> Result<()> {
    ensure_has_rows(matrix)?;
    let data = matrix.to_row_major();
    ensure_finite(&data, "a matrix")?;
    let cols = matrix.cols();
    let rows: Vec<&[f64]> = (0..matrix.rows())
        .map(|r| &data[r * cols..(r + 1) * cols])
        .collect();
    serde_json::to_writer(writer, &rows)?;
    Ok(())
}

/// Reads a matrix written by [`write_matrix`]. Ragged or empty row lists
/// are rejected the same way [`Matrix::from_jagged`] rejects them.
pub fn read_matrix<R: Read>(reader: R) -> Result<Matrix> {
    let rows: Vec<Vec<f64>> = serde_json::from_reader(reader)?;
    Matrix::from_jagged(&rows)
}

pub fn write_vector<W: Write>(writer: W, vector: &Vector) -> Result<()> {
    let data = vector.values();
    ensure_finite(data.iter(), "a vector")?;
    serde_json::to_writer(writer, &*data)?;
    Ok(())
}

pub fn read_vector<R: Read>(reader: R) -> Result<Vector> {
    let data: Vec<f64> = serde_json::from_reader(reader)?;
    Ok(Vector::from_vec(data))
}

impl Matrix {
    /// Saves the matrix as JSON at `path`, replacing any existing file.
    /// A matrix with no rows cannot be saved and leaves `path` untouched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        ensure_has_rows(self)
            .with_context(|| format!("Failed to write matrix to {}", path.display()))?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create matrix file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_matrix(&mut writer, self)
            .with_context(|| format!("Failed to write matrix to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush matrix file: {}", path.display()))?;
        debug!("saved {}x{} matrix to {}", self.rows(), self.cols(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Matrix> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open matrix file: {}", path.display()))?;
        let matrix = read_matrix(BufReader::new(file))
            .with_context(|| format!("Failed to read matrix from {}", path.display()))?;
        debug!(
            "loaded {}x{} matrix from {}",
            matrix.rows(),
            matrix.cols(),
            path.display()
        );
        Ok(matrix)
    }
}

impl Vector {
    /// Saves the vector as a JSON array at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create vector file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_vector(&mut writer, self)
            .with_context(|| format!("Failed to write vector to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush vector file: {}", path.display()))?;
        debug!("saved vector of length {} to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Vector> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open vector file: {}", path.display()))?;
        let vector = read_vector(BufReader::new(file))
            .with_context(|| format!("Failed to read vector from {}", path.display()))?;
        debug!("loaded vector of length {} from {}", vector.len(), path.display());
        Ok(vector)
    }
}
