//! Conversion between geographic (longitude, latitude, height) and geocentric
//! Cartesian coordinates on an ellipsoid.

use std::sync::Arc;

use crs_common::{CrsError, CrsResult, Ellipsoid};

use crate::transform::{check_point, MathTransform};

const MAX_ITERATIONS: usize = 20;
const TOLERANCE: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToGeocentric,
    ToGeographic,
}

/// Geographic (degrees, metres) ⇄ geocentric XYZ (metres).
///
/// `geographic_dimensions` is 2 (height taken as zero / dropped) or 3.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocentricTransform {
    ellipsoid: Ellipsoid,
    geographic_dimensions: usize,
    direction: Direction,
}

impl GeocentricTransform {
    pub fn to_geocentric(ellipsoid: Ellipsoid, geographic_dimensions: usize) -> CrsResult<Self> {
        Self::new(ellipsoid, geographic_dimensions, Direction::ToGeocentric)
    }

    pub fn to_geographic(ellipsoid: Ellipsoid, geographic_dimensions: usize) -> CrsResult<Self> {
        Self::new(ellipsoid, geographic_dimensions, Direction::ToGeographic)
    }

    fn new(ellipsoid: Ellipsoid, geographic_dimensions: usize, direction: Direction) -> CrsResult<Self> {
        if !(2..=3).contains(&geographic_dimensions) {
            return Err(CrsError::out_of_range(
                "dim",
                geographic_dimensions as f64,
                Some(2.0),
                Some(3.0),
            ));
        }
        Ok(Self {
            ellipsoid,
            geographic_dimensions,
            direction,
        })
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn geographic_dimensions(&self) -> usize {
        self.geographic_dimensions
    }
}

impl MathTransform for GeocentricTransform {
    fn name(&self) -> &'static str {
        match self.direction {
            Direction::ToGeocentric => "Ellipsoid_To_Geocentric",
            Direction::ToGeographic => "Geocentric_To_Ellipsoid",
        }
    }

    fn source_dimensions(&self) -> usize {
        match self.direction {
            Direction::ToGeocentric => self.geographic_dimensions,
            Direction::ToGeographic => 3,
        }
    }

    fn target_dimensions(&self) -> usize {
        match self.direction {
            Direction::ToGeocentric => 3,
            Direction::ToGeographic => self.geographic_dimensions,
        }
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        match self.direction {
            Direction::ToGeocentric => {
                let h = if self.geographic_dimensions == 3 { src[2] } else { 0.0 };
                let xyz = geographic_to_geocentric(&self.ellipsoid, src[0], src[1], h);
                dst[..3].copy_from_slice(&xyz);
            }
            Direction::ToGeographic => {
                let [lon, lat, h] = geocentric_to_geographic(&self.ellipsoid, src[0], src[1], src[2])?;
                dst[0] = lon;
                dst[1] = lat;
                if self.geographic_dimensions == 3 {
                    dst[2] = h;
                }
            }
        }
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        let direction = match self.direction {
            Direction::ToGeocentric => Direction::ToGeographic,
            Direction::ToGeographic => Direction::ToGeocentric,
        };
        Ok(Arc::new(Self {
            direction,
            ..self.clone()
        }))
    }
}

/// Longitude and latitude in degrees, height in metres.
pub fn geographic_to_geocentric(ellipsoid: &Ellipsoid, lon: f64, lat: f64, h: f64) -> [f64; 3] {
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    let n = ellipsoid.prime_vertical_radius(phi);
    let e2 = ellipsoid.eccentricity_squared();
    let (sin_phi, cos_phi) = phi.sin_cos();
    [
        (n + h) * cos_phi * lambda.cos(),
        (n + h) * cos_phi * lambda.sin(),
        (n * (1.0 - e2) + h) * sin_phi,
    ]
}

/// Returns `[lon, lat, h]` with angles in degrees.
pub fn geocentric_to_geographic(ellipsoid: &Ellipsoid, x: f64, y: f64, z: f64) -> CrsResult<[f64; 3]> {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(CrsError::transform(format!(
            "non-finite geocentric coordinate ({}, {}, {})",
            x, y, z
        )));
    }
    let a = ellipsoid.semi_major;
    let e2 = ellipsoid.eccentricity_squared();
    let p = x.hypot(y);
    let lon = y.atan2(x).to_degrees();

    if p == 0.0 {
        // On the polar axis
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        return Ok([0.0, lat, z.abs() - ellipsoid.semi_minor]);
    }

    let mut phi = z.atan2(p * (1.0 - e2));
    for _ in 0..MAX_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(phi);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let h = p * cos_phi + z * sin_phi - a * a / n;
        let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
        if (next - phi).abs() < TOLERANCE {
            let n = ellipsoid.prime_vertical_radius(next);
            let (sin_phi, cos_phi) = next.sin_cos();
            let h = p * cos_phi + z * sin_phi - a * a / n;
            return Ok([lon, next.to_degrees(), h]);
        }
        phi = next;
    }
    Err(CrsError::transform(format!(
        "geocentric to geographic did not converge for ({}, {}, {})",
        x, y, z
    )))
}
