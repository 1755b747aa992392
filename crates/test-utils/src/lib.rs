//! Test support for the coordinate-operation crates.
//!
//! - tolerance assertions for ordinates and whole points
//! - synthetic NTv2 / GR3D grid files written into a temporary directory
//! - reference points, ellipsoid axes and Bursa-Wolf parameter sets
//!
//! ```ignore
//! use test_utils::{assert_points_approx_eq, fixtures::points, grid_directory};
//!
//! let grids = grid_directory()?;
//! assert_points_approx_eq!(&out, &[points::PARIS.0, points::PARIS.1], 1e-9);
//! ```

pub mod fixtures;
pub mod generators;

pub use generators::*;

/// Assert that two ordinates differ by at most `tolerance`.
///
/// NaN on either side always fails.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: f64 = $actual as f64;
        let expected: f64 = $expected as f64;
        let tolerance: f64 = $tolerance as f64;
        let error = (actual - expected).abs();
        if !(error <= tolerance) {
            panic!(
                "ordinate out of tolerance: actual {} expected {} (error {:e}, tolerance {:e})",
                actual, expected, error, tolerance
            );
        }
    }};
}

/// [`assert_approx_eq!`] on both ordinates of an `(x, y)` pair.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $tolerance:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $tolerance);
        $crate::assert_approx_eq!($y1, $y2, $tolerance);
    }};
}

/// Compare two points ordinate by ordinate, reporting the failing axis.
#[macro_export]
macro_rules! assert_points_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: &[f64] = $actual;
        let expected: &[f64] = $expected;
        assert_eq!(
            actual.len(),
            expected.len(),
            "point has {} ordinates, expected {}",
            actual.len(),
            expected.len()
        );
        let tolerance: f64 = $tolerance;
        for (axis, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            if !((a - e).abs() <= tolerance) {
                panic!(
                    "ordinate out of tolerance on axis {}: actual {:?} expected {:?} (tolerance {:e})",
                    axis, actual, expected, tolerance
                );
            }
        }
    }};
}
