use anyhow::Result;
use linalg_core::{Axis, Evd, Matrix, SolverConfig};

fn main() -> Result<()> {
    env_logger::init();

    // Five samples of three correlated features
    let x: Matrix = "[[2.5, 2.4, 0.5];
                      [0.5, 0.7, 1.9];
                      [2.2, 2.9, 0.8];
                      [1.9, 2.2, 1.1];
                      [3.1, 3.0, 0.2]]"
        .parse()?;
    println!("Samples:\n{}", x);

    let cov = x.covariance(Axis::Col)?;
    println!("Covariance:\n{:.3}", cov);

    let config = SolverConfig::new(1e-12, 50);
    let mut evd = Evd::new(&cov)?;
    evd.compute_with(&config)?;
    println!("Converged after {} sweeps", evd.sweeps());

    let values = evd.eigenvalues();
    let total = values.sum();
    for (i, lambda) in values.iter().enumerate() {
        println!(
            "component {}: eigenvalue {:.4} ({:.1}% of variance), direction {:.3}",
            i,
            lambda,
            100.0 * lambda / total,
            evd.eigenvectors().col(i)?
        );
    }

    // Project the centered samples onto the leading two components
    let mut centered = x.copy();
    centered.center(Axis::Row)?;
    let basis = evd.eigenvectors().extract(0, 0, 3, 2)?;
    let projected = &centered * &basis;
    println!("Projection onto two components:\n{:.3}", projected);

    Ok(())
}
