//! Affine transforms in homogeneous matrix form.

use std::sync::Arc;

use crs_common::{CrsError, CrsResult};
use nalgebra::DMatrix;

use crate::transform::{check_point, MathTransform};

/// An affine map `y = A·x + b` stored as a `(target+1) × (source+1)` matrix
/// whose last row is `[0 … 0 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    matrix: DMatrix<f64>,
}

impl AffineTransform {
    /// Wrap a homogeneous matrix, checking its shape and last row.
    pub fn new(matrix: DMatrix<f64>) -> CrsResult<Self> {
        let (rows, cols) = matrix.shape();
        if rows < 2 || cols < 2 {
            return Err(CrsError::unsupported(format!(
                "affine matrix must be at least 2x2, got {}x{}",
                rows, cols
            )));
        }
        let last = rows - 1;
        for c in 0..cols {
            let expected = if c == cols - 1 { 1.0 } else { 0.0 };
            if matrix[(last, c)] != expected {
                return Err(CrsError::unsupported(format!(
                    "last matrix row must be [0 .. 0 1], element ({}, {}) is {}",
                    last,
                    c,
                    matrix[(last, c)]
                )));
            }
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(CrsError::unsupported("affine matrix contains non-finite elements"));
        }
        Ok(Self { matrix })
    }

    pub fn identity(dimension: usize) -> Self {
        Self {
            matrix: DMatrix::identity(dimension + 1, dimension + 1),
        }
    }

    /// A pure translation by `offsets`, one per dimension.
    pub fn translation(offsets: &[f64]) -> Self {
        let dim = offsets.len();
        let mut matrix = DMatrix::identity(dim + 1, dim + 1);
        for (i, offset) in offsets.iter().enumerate() {
            matrix[(i, dim)] = *offset;
        }
        Self { matrix }
    }

    /// Per-axis scale followed by translation.
    pub fn scale_translate(scales: &[f64], offsets: &[f64]) -> CrsResult<Self> {
        if scales.len() != offsets.len() {
            return Err(CrsError::unsupported("scale and offset counts differ"));
        }
        let dim = scales.len();
        let mut matrix = DMatrix::identity(dim + 1, dim + 1);
        for i in 0..dim {
            matrix[(i, i)] = scales[i];
            matrix[(i, dim)] = offsets[i];
        }
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

impl MathTransform for AffineTransform {
    fn name(&self) -> &'static str {
        "Affine"
    }

    fn source_dimensions(&self) -> usize {
        self.matrix.ncols() - 1
    }

    fn target_dimensions(&self) -> usize {
        self.matrix.nrows() - 1
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        let src_dim = self.source_dimensions();
        for (r, out) in dst.iter_mut().take(self.target_dimensions()).enumerate() {
            let mut sum = self.matrix[(r, src_dim)];
            for (c, value) in src.iter().take(src_dim).enumerate() {
                sum += self.matrix[(r, c)] * value;
            }
            *out = sum;
        }
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        if !self.matrix.is_square() {
            return Err(CrsError::transform(format!(
                "non-square affine transform ({}D to {}D) has no inverse",
                self.source_dimensions(),
                self.target_dimensions()
            )));
        }
        let inverse = self
            .matrix
            .clone()
            .try_inverse()
            .ok_or_else(|| CrsError::transform("affine matrix is singular"))?;
        Ok(Arc::new(AffineTransform::new(clean_last_row(inverse))?))
    }

    fn is_identity(&self) -> bool {
        self.matrix.is_square() && self.matrix == DMatrix::identity(self.matrix.nrows(), self.matrix.ncols())
    }
}

/// Inversion leaves rounding noise in the homogeneous row; restore it exactly.
fn clean_last_row(mut matrix: DMatrix<f64>) -> DMatrix<f64> {
    let last = matrix.nrows() - 1;
    let cols = matrix.ncols();
    for c in 0..cols {
        matrix[(last, c)] = if c == cols - 1 { 1.0 } else { 0.0 };
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation() {
        let t = AffineTransform::translation(&[30.0, 0.0]);
        assert_eq!(t.transform(&[10.0, 20.0]).unwrap(), vec![40.0, 20.0]);
        assert_eq!(t.source_dimensions(), 2);
        assert!(!t.is_identity());
    }

    #[test]
    fn test_identity() {
        assert!(AffineTransform::identity(3).is_identity());
        assert!(AffineTransform::translation(&[0.0, 0.0]).is_identity());
    }

    #[test]
    fn test_rejects_projective_matrix() {
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, 0.0, 1.0]);
        assert!(AffineTransform::new(m).is_err());
    }

    #[test]
    fn test_inverse() {
        let t = AffineTransform::scale_translate(&[2.0, 4.0], &[1.0, -1.0]).unwrap();
        let inv = t.inverse().unwrap();
        let p = t.transform(&[3.0, 5.0]).unwrap();
        assert_eq!(p, vec![7.0, 19.0]);
        let back = inv.transform(&p).unwrap();
        assert!((back[0] - 3.0).abs() < 1e-12);
        assert!((back[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let t = AffineTransform::scale_translate(&[0.0, 1.0], &[0.0, 0.0]).unwrap();
        assert!(t.inverse().is_err());
    }

    #[test]
    fn test_non_square() {
        // Drops the third ordinate.
        let m = DMatrix::from_row_slice(3, 4, &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let t = AffineTransform::new(m).unwrap();
        assert_eq!(t.source_dimensions(), 3);
        assert_eq!(t.target_dimensions(), 2);
        assert_eq!(t.transform(&[1.0, 2.0, 3.0]).unwrap(), vec![1.0, 2.0]);
        assert!(t.inverse().is_err());
    }
}
