//! Horizontal datum shift by NTv2 grid interpolation.

use std::sync::Arc;

use crs_common::{CrsError, CrsResult};

use crate::grid::Ntv2Grid;
use crate::transform::{check_point, MathTransform};

const MAX_ITERATIONS: usize = 10;
/// Degrees; about 0.1 mm.
const TOLERANCE: f64 = 1e-9;

/// Applies NTv2 shifts to (longitude, latitude) in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Ntv2Transform {
    grid: Arc<Ntv2Grid>,
    inverse: bool,
}

impl Ntv2Transform {
    pub fn new(grid: Arc<Ntv2Grid>) -> Self {
        Self { grid, inverse: false }
    }

    pub fn grid(&self) -> &Arc<Ntv2Grid> {
        &self.grid
    }

    fn apply_shift(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let (dlat, dlon_west) = self.grid.shift(lon, lat).ok_or_else(|| {
            CrsError::transform(format!("point ({}, {}) is outside the NTv2 grid", lon, lat))
        })?;
        Ok((lon - dlon_west / 3600.0, lat + dlat / 3600.0))
    }

    /// Find the source point whose shifted position is `(lon, lat)`.
    fn reverse_shift(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let (mut x, mut y) = (lon, lat);
        for _ in 0..MAX_ITERATIONS {
            let (fx, fy) = self.apply_shift(x, y)?;
            let (ex, ey) = (fx - lon, fy - lat);
            x -= ex;
            y -= ey;
            if ex.abs() < TOLERANCE && ey.abs() < TOLERANCE {
                return Ok((x, y));
            }
        }
        Err(CrsError::transform(format!(
            "inverse NTv2 shift did not converge at ({}, {})",
            lon, lat
        )))
    }
}

impl MathTransform for Ntv2Transform {
    fn name(&self) -> &'static str {
        "NTv2"
    }

    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        let (lon, lat) = if self.inverse {
            self.reverse_shift(src[0], src[1])?
        } else {
            self.apply_shift(src[0], src[1])?
        };
        dst[0] = lon;
        dst[1] = lat;
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(Self {
            grid: Arc::clone(&self.grid),
            inverse: !self.inverse,
        }))
    }
}
