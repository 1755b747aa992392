//! Lambert Conic Conformal projection (ellipsoidal).
//!
//! Maps a cone tangent (1SP) or secant (2SP) to the ellipsoid onto a plane.
//!
//! - 1SP (EPSG 9801): natural origin latitude, which is also the single
//!   standard parallel, with a scale factor there.
//! - 2SP (EPSG 9802): two standard parallels with a false origin, scale 1
//!   on both parallels.

use std::f64::consts::PI;

use crs_common::{CrsError, CrsResult, Ellipsoid};

use crate::map::{conformal_t, normalize_longitude, MapProjection, ProjectionParameters};

const MAX_ITERATIONS: usize = 15;

/// Lambert Conformal Conic projection with precomputed cone constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Semi-major axis (meters)
    a: f64,
    /// First eccentricity
    e: f64,
    /// Central meridian in radians
    lon0: f64,
    /// Cone constant (n)
    n: f64,
    /// a · F · k0
    af: f64,
    /// Radius at the origin latitude
    rho0: f64,
    false_easting: f64,
    false_northing: f64,
}

/// m(φ) = cos φ / √(1 − e² sin² φ)
fn m(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    phi.cos() / (1.0 - es * es).sqrt()
}

impl LambertConformal {
    /// Lambert Conic Conformal (1SP).
    ///
    /// `latitude_of_origin` doubles as the standard parallel and must not be 0.
    pub fn one_standard_parallel(params: &ProjectionParameters) -> CrsResult<Self> {
        let phi0 = params.latitude_of_origin.to_radians();
        if phi0.abs() < 1e-10 {
            return Err(CrsError::unsupported(
                "Lambert 1SP with latitude of origin 0 degenerates to Mercator",
            ));
        }
        let e = params.ellipsoid.eccentricity();
        let n = phi0.sin();
        let f = m(phi0, e) / (n * conformal_t(phi0, e).powf(n));
        Ok(Self::from_constants(
            &params.ellipsoid,
            params.central_meridian,
            phi0,
            n,
            f * params.scale_factor,
            params.false_easting,
            params.false_northing,
        ))
    }

    /// Lambert Conic Conformal (2SP).
    ///
    /// `params.latitude_of_origin` and `params.central_meridian` locate the
    /// false origin; `params.scale_factor` is ignored.
    pub fn two_standard_parallels(
        params: &ProjectionParameters,
        standard_parallel_1: f64,
        standard_parallel_2: f64,
    ) -> CrsResult<Self> {
        let phi1 = standard_parallel_1.to_radians();
        let phi2 = standard_parallel_2.to_radians();
        let phi_f = params.latitude_of_origin.to_radians();
        let e = params.ellipsoid.eccentricity();

        let n = if (phi1 - phi2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            phi1.sin()
        } else {
            // Secant cone (two standard parallels)
            (m(phi1, e).ln() - m(phi2, e).ln()) / (conformal_t(phi1, e).ln() - conformal_t(phi2, e).ln())
        };
        if !n.is_finite() || n.abs() < 1e-10 {
            return Err(CrsError::unsupported(format!(
                "standard parallels {} and {} do not define a cone",
                standard_parallel_1, standard_parallel_2
            )));
        }
        let f = m(phi1, e) / (n * conformal_t(phi1, e).powf(n));
        Ok(Self::from_constants(
            &params.ellipsoid,
            params.central_meridian,
            phi_f,
            n,
            f,
            params.false_easting,
            params.false_northing,
        ))
    }

    fn from_constants(
        ellipsoid: &Ellipsoid,
        central_meridian: f64,
        phi0: f64,
        n: f64,
        f: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e = ellipsoid.eccentricity();
        let af = ellipsoid.semi_major * f;
        Self {
            a: ellipsoid.semi_major,
            e,
            lon0: central_meridian.to_radians(),
            n,
            af,
            rho0: af * conformal_t(phi0, e).powf(n),
            false_easting,
            false_northing,
        }
    }

    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl MapProjection for LambertConformal {
    fn name(&self) -> &'static str {
        "Lambert_Conformal_Conic"
    }

    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let phi = lat.to_radians();
        // The pole opposite the cone apex maps to infinity.
        if (phi + PI / 2.0 * self.n.signum()).abs() < 1e-12 {
            return Err(CrsError::transform(format!(
                "latitude {} cannot be represented in this Lambert cone",
                lat
            )));
        }

        // Normalize longitude difference to [-π, π]
        let dlon = normalize_longitude(lon.to_radians() - self.lon0);

        let rho = self.af * conformal_t(phi, self.e).powf(self.n);
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();
        Ok((x, y))
    }

    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)> {
        let sign = self.n.signum();
        let dx = easting - self.false_easting;
        let dy = self.rho0 - (northing - self.false_northing);

        let rho = sign * (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);
        let t = (rho / self.af).powf(1.0 / self.n);

        let lon = self.lon0 + theta / self.n;

        let mut phi = PI / 2.0 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let es = self.e * phi.sin();
            let next = PI / 2.0 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            if (next - phi).abs() < 1e-14 {
                phi = next;
                break;
            }
            phi = next;
        }

        if !phi.is_finite() {
            return Err(CrsError::transform(format!(
                "({}, {}) has no Lambert inverse (semi-major {})",
                easting, northing, self.a
            )));
        }
        Ok((normalize_longitude(lon).to_degrees(), phi.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clarke_1866() -> Ellipsoid {
        Ellipsoid::from_inverse_flattening(6378206.4, 294.9786982)
    }

    const US_FOOT: f64 = 0.3048006096012192;

    #[test]
    fn test_1sp_jamaica() {
        // EPSG Guidance Note 7-2 example, JAD69 / Jamaica National Grid
        let params = ProjectionParameters::new(clarke_1866())
            .origin(-77.0, 18.0)
            .false_origin(250000.0, 150000.0);
        let proj = LambertConformal::one_standard_parallel(&params).unwrap();
        let lat = 17.0 + 55.0 / 60.0 + 55.80 / 3600.0;
        let lon = -(76.0 + 56.0 / 60.0 + 37.26 / 3600.0);
        let (x, y) = proj.project(lon, lat).unwrap();
        assert!((x - 255966.58).abs() < 0.01, "easting {}", x);
        assert!((y - 142493.51).abs() < 0.01, "northing {}", y);

        let (lon2, lat2) = proj.unproject(x, y).unwrap();
        assert!((lon2 - lon).abs() < 1e-9);
        assert!((lat2 - lat).abs() < 1e-9);
    }

    #[test]
    fn test_2sp_texas() {
        // EPSG Guidance Note 7-2 example, NAD27 / Texas South Central
        let params = ProjectionParameters::new(clarke_1866())
            .origin(-99.0, 27.0 + 50.0 / 60.0)
            .false_origin(2000000.0 * US_FOOT, 0.0);
        let proj =
            LambertConformal::two_standard_parallels(&params, 28.0 + 23.0 / 60.0, 30.0 + 17.0 / 60.0)
                .unwrap();
        let (x, y) = proj.project(-96.0, 28.5).unwrap();
        assert!((x / US_FOOT - 2963503.91).abs() < 0.01, "easting {}", x / US_FOOT);
        assert!((y / US_FOOT - 254759.80).abs() < 0.01, "northing {}", y / US_FOOT);
    }

    #[test]
    fn test_southern_cone_roundtrip() {
        let params = ProjectionParameters::new(Ellipsoid::wgs84()).origin(135.0, -20.0);
        let proj = LambertConformal::two_standard_parallels(&params, -18.0, -36.0).unwrap();
        assert!(proj.cone_constant() < 0.0);
        let (x, y) = proj.project(140.0, -30.0).unwrap();
        let (lon, lat) = proj.unproject(x, y).unwrap();
        assert!((lon - 140.0).abs() < 1e-9);
        assert!((lat + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_cones() {
        let params = ProjectionParameters::new(Ellipsoid::wgs84());
        assert!(LambertConformal::one_standard_parallel(&params).is_err());
        assert!(LambertConformal::two_standard_parallels(&params, 30.0, -30.0).is_err());
    }

    #[test]
    fn test_opposite_pole() {
        let params = ProjectionParameters::new(Ellipsoid::wgs84()).origin(0.0, 45.0);
        let proj = LambertConformal::one_standard_parallel(&params).unwrap();
        assert!(proj.project(0.0, -90.0).is_err());
        assert!(proj.project(0.0, 90.0).is_ok());
    }
}
