//! Numerical inversion of two-dimensional forward equations.

use crs_common::{CrsError, CrsResult};
use nalgebra::{Matrix2, Vector2};

const MAX_ITERATIONS: usize = 50;
/// Finite-difference step in degrees.
const STEP: f64 = 1e-7;
/// Degrees.
const TOLERANCE: f64 = 1e-12;

/// Solve `forward(lon, lat) == target` by Newton iteration with a
/// finite-difference Jacobian, starting at `initial`.
pub fn newton_inverse<F>(forward: F, target: (f64, f64), initial: (f64, f64)) -> CrsResult<(f64, f64)>
where
    F: Fn(f64, f64) -> CrsResult<(f64, f64)>,
{
    let goal = Vector2::new(target.0, target.1);
    let mut p = Vector2::new(initial.0, initial.1.clamp(-90.0, 90.0));

    for _ in 0..MAX_ITERATIONS {
        let (fx, fy) = forward(p.x, p.y)?;
        let residual = Vector2::new(fx, fy) - goal;

        // Step away from the poles so the finite difference stays in domain.
        let dy = if p.y + STEP > 90.0 { -STEP } else { STEP };
        let (ax, ay) = forward(p.x + STEP, p.y)?;
        let (bx, by) = forward(p.x, p.y + dy)?;
        let jacobian = Matrix2::new(
            (ax - fx) / STEP, (bx - fx) / dy,
            (ay - fy) / STEP, (by - fy) / dy,
        );

        let delta = jacobian.try_inverse().ok_or_else(|| {
            CrsError::transform(format!("singular Jacobian at ({}, {})", p.x, p.y))
        })? * residual;

        p -= delta;
        p.y = p.y.clamp(-90.0, 90.0);
        if delta.x.abs() < TOLERANCE && delta.y.abs() < TOLERANCE {
            return Ok((p.x, p.y));
        }
    }

    Err(CrsError::transform(format!(
        "inverse did not converge for ({}, {})",
        target.0, target.1
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map() {
        let f = |x: f64, y: f64| Ok((2.0 * x + y, x - 3.0 * y));
        let (x, y) = newton_inverse(f, (5.0, -8.0), (0.0, 0.0)).unwrap();
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular() {
        let f = |x: f64, _y: f64| Ok((x, x));
        assert!(newton_inverse(f, (1.0, 2.0), (0.0, 0.0)).is_err());
    }
}
