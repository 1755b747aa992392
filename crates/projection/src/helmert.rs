//! Seven-parameter similarity (Helmert / Bursa-Wolf) transforms between
//! geocentric Cartesian systems.

use std::sync::Arc;

use crs_common::{CrsResult, Unit};
use nalgebra::{DMatrix, Matrix4};
use serde::{Deserialize, Serialize};

use crate::affine::AffineTransform;
use crate::transform::{check_point, MathTransform};

/// Bursa-Wolf parameters in the Position Vector convention.
///
/// Translations in metres, rotations in arc-seconds, scale difference in
/// parts per million. Coordinate Frame rotations must be converted to this
/// convention (rotation signs flipped) before they reach this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BursaWolfParameters {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
    pub ppm: f64,
}

impl BursaWolfParameters {
    /// Pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        self.is_translation() && self.dx == 0.0 && self.dy == 0.0 && self.dz == 0.0
    }

    /// No rotation and no scale change.
    pub fn is_translation(&self) -> bool {
        self.ex == 0.0 && self.ey == 0.0 && self.ez == 0.0 && self.ppm == 0.0
    }

    /// Approximate reverse transformation, obtained by negating every term.
    ///
    /// This is the EPSG reversal convention; use the matrix inverse of the
    /// transform for an exact round trip.
    pub fn invert(&self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
            ex: -self.ex,
            ey: -self.ey,
            ez: -self.ez,
            ppm: -self.ppm,
        }
    }

    /// The homogeneous 4×4 matrix using the small-angle approximation.
    pub fn matrix(&self) -> Matrix4<f64> {
        let s = 1.0 + self.ppm * Unit::PartsPerMillion.to_si_factor();
        let rs = Unit::ArcSecond.to_si_factor() * s;
        let (rx, ry, rz) = (self.ex * rs, self.ey * rs, self.ez * rs);
        Matrix4::new(
            s, -rz, ry, self.dx,
            rz, s, -rx, self.dy,
            -ry, rx, s, self.dz,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

/// Geocentric 3-D similarity transform built from [`BursaWolfParameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct HelmertTransform {
    parameters: BursaWolfParameters,
    affine: AffineTransform,
}

impl HelmertTransform {
    pub fn new(parameters: BursaWolfParameters) -> CrsResult<Self> {
        let m = parameters.matrix();
        let affine = AffineTransform::new(DMatrix::from_iterator(4, 4, m.iter().copied()))?;
        Ok(Self { parameters, affine })
    }

    pub fn parameters(&self) -> &BursaWolfParameters {
        &self.parameters
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        self.affine.matrix()
    }
}

impl MathTransform for HelmertTransform {
    fn name(&self) -> &'static str {
        "Helmert"
    }

    fn source_dimensions(&self) -> usize {
        3
    }

    fn target_dimensions(&self) -> usize {
        3
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        self.affine.transform_point(src, dst)
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        self.affine.inverse()
    }

    fn is_identity(&self) -> bool {
        self.parameters.is_identity()
    }
}
