//! American Polyconic projection (ellipsoidal, EPSG 9818).

use crs_common::CrsResult;

use crate::map::{normalize_degrees, normalize_longitude, MapProjection, ProjectionParameters};
use crate::solve::newton_inverse;

#[derive(Debug, Clone, PartialEq)]
pub struct Polyconic {
    a: f64,
    e2: f64,
    lon0: f64,
    /// Meridional arc at the latitude of origin.
    m0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Polyconic {
    pub fn new(params: &ProjectionParameters) -> Self {
        let a = params.ellipsoid.semi_major;
        let e2 = params.ellipsoid.eccentricity_squared();
        Self {
            a,
            e2,
            lon0: params.central_meridian.to_radians(),
            m0: meridional_arc(a, e2, params.latitude_of_origin.to_radians()),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

/// Distance along the meridian from the equator to latitude `phi` (radians).
fn meridional_arc(a: f64, e2: f64, phi: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

impl MapProjection for Polyconic {
    fn name(&self) -> &'static str {
        "Polyconic"
    }

    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let phi = lat.to_radians();
        let dlon = normalize_longitude(lon.to_radians() - self.lon0);

        if phi.abs() < 1e-12 {
            return Ok((
                self.false_easting + self.a * dlon,
                self.false_northing - self.m0,
            ));
        }

        let sin_phi = phi.sin();
        let nu = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let l = dlon * sin_phi;
        let nu_cot = nu / phi.tan();
        let x = nu_cot * l.sin();
        let y = meridional_arc(self.a, self.e2, phi) - self.m0 + nu_cot * (1.0 - l.cos());
        Ok((self.false_easting + x, self.false_northing + y))
    }

    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)> {
        let guess_lon = (self.lon0 + (easting - self.false_easting) / self.a).to_degrees();
        let guess_lat = ((northing - self.false_northing + self.m0) / self.a).to_degrees();
        let (lon, lat) = newton_inverse(
            |lon, lat| self.project(lon, lat),
            (easting, northing),
            (guess_lon, guess_lat),
        )?;
        Ok((normalize_degrees(lon), lat))
    }
}
