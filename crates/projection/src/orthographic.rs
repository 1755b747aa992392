//! Orthographic projection (spherical form).
//!
//! A perspective view of the globe from infinite distance. Only the
//! hemisphere facing the viewer can be projected.

use crs_common::{CrsError, CrsResult};

use crate::map::{normalize_longitude, MapProjection, ProjectionParameters};

#[derive(Debug, Clone, PartialEq)]
pub struct Orthographic {
    radius: f64,
    lon0: f64,
    sin_phi0: f64,
    cos_phi0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Orthographic {
    /// The sphere radius is the ellipsoid's semi-major axis.
    pub fn new(params: &ProjectionParameters) -> Self {
        let phi0 = params.latitude_of_origin.to_radians();
        Self {
            radius: params.ellipsoid.semi_major,
            lon0: params.central_meridian.to_radians(),
            sin_phi0: phi0.sin(),
            cos_phi0: phi0.cos(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl MapProjection for Orthographic {
    fn name(&self) -> &'static str {
        "Orthographic"
    }

    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let phi = lat.to_radians();
        let dlon = normalize_longitude(lon.to_radians() - self.lon0);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let cos_c = self.sin_phi0 * sin_phi + self.cos_phi0 * cos_phi * dlon.cos();
        if cos_c < -1e-12 {
            return Err(CrsError::transform(format!(
                "({}, {}) is on the far side of the globe",
                lon, lat
            )));
        }

        let x = self.radius * cos_phi * dlon.sin();
        let y = self.radius * (self.cos_phi0 * sin_phi - self.sin_phi0 * cos_phi * dlon.cos());
        Ok((self.false_easting + x, self.false_northing + y))
    }

    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)> {
        let x = easting - self.false_easting;
        let y = northing - self.false_northing;
        let rho = x.hypot(y);
        if rho > self.radius * (1.0 + 1e-12) {
            return Err(CrsError::transform(format!(
                "({}, {}) lies outside the projected disc",
                easting, northing
            )));
        }
        if rho == 0.0 {
            return Ok((
                self.lon0.to_degrees(),
                self.sin_phi0.atan2(self.cos_phi0).to_degrees(),
            ));
        }

        let c = (rho / self.radius).min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let phi = (cos_c * self.sin_phi0 + y * sin_c * self.cos_phi0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (x * sin_c).atan2(rho * cos_c * self.cos_phi0 - y * sin_c * self.sin_phi0);
        Ok((normalize_longitude(lon).to_degrees(), phi.to_degrees()))
    }
}
