use std::path::PathBuf;

use anyhow::{Context, Result};
use linalg_core::{Matrix, Vector};

fn main() -> Result<()> {
    env_logger::init();

    // 3x + 2y - z = 1, 2x - 2y + 4z = -2, -x + y/2 - z = 0
    let a = Matrix::from_rows(&[[3.0, 2.0, -1.0], [2.0, -2.0, 4.0], [-1.0, 0.5, -1.0]]);
    let b: Vector = "[1, -2, 0]".parse()?;

    println!("det(A) = {:.4}", a.det()?);

    let inv = a.inverse().context("system matrix is singular")?;
    let x = &inv * &b;
    println!("solution via inverse: {:.6}", x);

    let (p, l, u) = a.lu()?;
    println!("P =\n{}\nL =\n{}\nU =\n{}", p, l, u);

    let residual = &(&a * &x) - &b;
    println!("residual norm: {:e}", residual.norm(2.0));

    let out: PathBuf = std::env::temp_dir().join("linalg_core_solution.json");
    x.save(&out)?;
    let reloaded = Vector::load(&out)?;
    println!("saved and reloaded {} -> {}", out.display(), reloaded);

    Ok(())
}
