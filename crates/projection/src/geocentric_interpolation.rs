//! France geocentric interpolation (EPSG method 9655), NTF to RGF93.
//!
//! The translation between the two datums varies across France and is
//! tabulated in the IGN grid `gr3df97a.txt`, indexed by RGF93 geographic
//! coordinates. The forward direction first applies a mean translation to
//! find approximately where the point lands in RGF93, then looks up the
//! exact translation there.

use std::sync::Arc;

use crs_common::{CrsError, CrsResult, Ellipsoid};
use tracing::debug;

use crate::geocentric::{geocentric_to_geographic, geographic_to_geocentric};
use crate::grid::{GeocentricGrid, GridLoader};
use crate::transform::{check_point, MathTransform};

/// The only grid file accepted for NTF to RGF93.
pub const RGF93_GRID_FILE: &str = "gr3df97a.txt";

/// Mean NTF to RGF93 translation in metres.
pub const NTF_TO_RGF93_MEAN: [f64; 3] = [-168.0, -60.0, 320.0];

/// Geographic (degrees) to geographic datum change through interpolated
/// geocentric translations.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocentricInterpolationTransform {
    grid: Arc<GeocentricGrid>,
    source: Ellipsoid,
    target: Ellipsoid,
    mean: [f64; 3],
    inverse: bool,
}

impl GeocentricInterpolationTransform {
    pub fn new(grid: Arc<GeocentricGrid>, source: Ellipsoid, target: Ellipsoid, mean: [f64; 3]) -> Self {
        Self {
            grid,
            source,
            target,
            mean,
            inverse: false,
        }
    }

    /// NTF (Clarke 1880 IGN) to RGF93 (GRS 1980) using `gr3df97a.txt`.
    pub fn rgf93(loader: &dyn GridLoader) -> CrsResult<Self> {
        let grid = loader.load_geocentric(RGF93_GRID_FILE)?;
        debug!(columns = grid.columns, rows = grid.rows, "Built NTF to RGF93 transform");
        Ok(Self::new(
            grid,
            Ellipsoid::clarke_1880_ign(),
            Ellipsoid::grs80(),
            NTF_TO_RGF93_MEAN,
        ))
    }

    pub fn grid(&self) -> &Arc<GeocentricGrid> {
        &self.grid
    }

    fn translation(&self, lon: f64, lat: f64) -> CrsResult<[f64; 3]> {
        self.grid.interpolate(lon, lat).ok_or_else(|| {
            CrsError::transform(format!(
                "point ({}, {}) is outside the geocentric translation grid",
                lon, lat
            ))
        })
    }

    fn forward(&self, lon: f64, lat: f64, h: f64) -> CrsResult<[f64; 3]> {
        let xyz = geographic_to_geocentric(&self.source, lon, lat, h);
        let shifted = add(xyz, self.mean);
        let [approx_lon, approx_lat, _] =
            geocentric_to_geographic(&self.target, shifted[0], shifted[1], shifted[2])?;
        let t = self.translation(approx_lon, approx_lat)?;
        let out = add(xyz, t);
        geocentric_to_geographic(&self.target, out[0], out[1], out[2])
    }

    fn reverse(&self, lon: f64, lat: f64, h: f64) -> CrsResult<[f64; 3]> {
        let t = self.translation(lon, lat)?;
        let xyz = geographic_to_geocentric(&self.target, lon, lat, h);
        let out = add(xyz, [-t[0], -t[1], -t[2]]);
        geocentric_to_geographic(&self.source, out[0], out[1], out[2])
    }
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

impl MathTransform for GeocentricInterpolationTransform {
    fn name(&self) -> &'static str {
        "France geocentric interpolation"
    }

    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        let [lon, lat, _] = if self.inverse {
            self.reverse(src[0], src[1], 0.0)?
        } else {
            self.forward(src[0], src[1], 0.0)?
        };
        dst[0] = lon;
        dst[1] = lat;
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(Self {
            inverse: !self.inverse,
            ..self.clone()
        }))
    }
}
