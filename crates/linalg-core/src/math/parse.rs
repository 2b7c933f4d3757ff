//! Bracket-syntax parsing and fixed-width rendering.
//!
//! Matrices read as `[[1, 2, 3]; [4, 5, 6]]` or `[1 2 3; 4 5 6]`: rows are
//! separated by `;`, values by `,` or whitespace. Vectors read as
//! `[1, 2, 3]` or `[1 2 3]`. `Display` output of both types parses back.
use std::fmt;
use std::str::FromStr;

use crate::config::SolverConfig;
use crate::error::{LinalgError, Result};
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;

fn parse_error(input: &str, reason: impl Into<String>) -> LinalgError {
    LinalgError::Parse {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn strip_brackets<'a>(input: &'a str, original: &str) -> Result<&'a str> {
    let trimmed = input.trim();
    match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => Ok(&rest[..rest.len() - 1]),
        (None, false) => Ok(trimmed),
        _ => Err(parse_error(original, "unbalanced brackets")),
    }
}

/// Values separated by `,` and/or whitespace. An empty piece between two
/// commas is malformed.
fn parse_values(text: &str, original: &str) -> Result<Vec<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut values = Vec::new();
    for piece in text.split(',') {
        let mut tokens = piece.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(parse_error(original, "empty value between separators"));
        }
        for token in tokens {
            let value = token
                .parse::<f64>()
                .map_err(|e| parse_error(original, format!("invalid number '{}': {}", token, e)))?;
            values.push(value);
        }
    }
    Ok(values)
}

impl FromStr for Vector {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = strip_brackets(s, s)?;
        if inner.contains('[') || inner.contains(']') {
            return Err(parse_error(s, "nested brackets in a vector"));
        }
        let flat = inner.replace(';', ",");
        Ok(Vector::from_vec(parse_values(&flat, s)?))
    }
}

impl FromStr for Matrix {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = strip_brackets(s, s)?;
        if inner.trim().is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for chunk in inner.split(';') {
            let row_text = strip_brackets(chunk, s)?;
            if row_text.contains('[') || row_text.contains(']') {
                return Err(parse_error(s, "rows must be separated by ';'"));
            }
            let row = parse_values(row_text, s)?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(parse_error(
                        s,
                        format!(
                            "row {} has {} values, expected {}",
                            rows.len(),
                            row.len(),
                            first.len()
                        ),
                    ));
                }
            }
            rows.push(row);
        }
        Matrix::from_jagged(&rows)
    }
}

impl Matrix {
    /// Fixed-width rendering with `precision` digits after the point.
    pub fn render(&self, precision: usize) -> String {
        if self.rows() == 0 {
            return "[]".to_string();
        }
        let cells: Vec<String> = self
            .to_row_major()
            .iter()
            .map(|x| format!("{:.*}", precision, x))
            .collect();
        let width = cells.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut out = String::from("[");
        for r in 0..self.rows() {
            if r > 0 {
                out.push_str(";\n ");
            }
            out.push('[');
            let row = &cells[r * self.cols()..(r + 1) * self.cols()];
            let padded: Vec<String> = row.iter().map(|c| format!("{:>w$}", c, w = width)).collect();
            out.push_str(&padded.join(", "));
            out.push(']');
        }
        out.push(']');
        out
    }
}

impl fmt::Display for Matrix {
    /// Diagnostic output only; the layout is not a stable format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f
            .precision()
            .unwrap_or_else(|| SolverConfig::default().display_precision);
        f.write_str(&self.render(precision))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let len = self.len();
        for (idx, value) in self.iter().enumerate() {
            match f.precision() {
                Some(p) => write!(f, "{:.*}", p, value)?,
                None => write!(f, "{}", value)?,
            }
            if idx + 1 != len {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
