//! Stereographic projections.
//!
//! - [`Stereographic`]: oblique stereographic on a sphere of radius
//!   `semi_major`, as used by OGC/ESRI `Stereographic`.
//! - [`PolarStereographic`]: ellipsoidal polar stereographic, variant A
//!   (EPSG 9810), with scale factor at the pole.

use std::f64::consts::PI;

use crs_common::{CrsError, CrsResult};

use crate::map::{conformal_t, normalize_longitude, MapProjection, ProjectionParameters};

#[derive(Debug, Clone, PartialEq)]
pub struct Stereographic {
    radius: f64,
    k0: f64,
    lon0: f64,
    sin_phi0: f64,
    cos_phi0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Stereographic {
    pub fn new(params: &ProjectionParameters) -> Self {
        let phi0 = params.latitude_of_origin.to_radians();
        Self {
            radius: params.ellipsoid.semi_major,
            k0: params.scale_factor,
            lon0: params.central_meridian.to_radians(),
            sin_phi0: phi0.sin(),
            cos_phi0: phi0.cos(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl MapProjection for Stereographic {
    fn name(&self) -> &'static str {
        "Stereographic"
    }

    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let phi = lat.to_radians();
        let dlon = normalize_longitude(lon.to_radians() - self.lon0);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let denom = 1.0 + self.sin_phi0 * sin_phi + self.cos_phi0 * cos_phi * dlon.cos();
        if denom < 1e-12 {
            return Err(CrsError::transform(format!(
                "({}, {}) is the antipode of the projection centre",
                lon, lat
            )));
        }
        let k = 2.0 * self.k0 / denom;
        let x = self.radius * k * cos_phi * dlon.sin();
        let y = self.radius * k * (self.cos_phi0 * sin_phi - self.sin_phi0 * cos_phi * dlon.cos());
        Ok((self.false_easting + x, self.false_northing + y))
    }

    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)> {
        let x = easting - self.false_easting;
        let y = northing - self.false_northing;
        let rho = x.hypot(y);
        if rho == 0.0 {
            return Ok((
                self.lon0.to_degrees(),
                self.sin_phi0.atan2(self.cos_phi0).to_degrees(),
            ));
        }

        let c = 2.0 * (rho / (2.0 * self.radius * self.k0)).atan();
        let (sin_c, cos_c) = c.sin_cos();
        let phi = (cos_c * self.sin_phi0 + y * sin_c * self.cos_phi0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (x * sin_c).atan2(rho * self.cos_phi0 * cos_c - y * self.sin_phi0 * sin_c);
        Ok((normalize_longitude(lon).to_degrees(), phi.to_degrees()))
    }
}

/// Polar stereographic, variant A.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographic {
    e: f64,
    lon0: f64,
    north: bool,
    /// 2 a k0 / √((1+e)^(1+e) (1−e)^(1−e))
    scale: f64,
    false_easting: f64,
    false_northing: f64,
}

impl PolarStereographic {
    /// `params.latitude_of_origin` must be +90 or -90.
    pub fn new(params: &ProjectionParameters) -> CrsResult<Self> {
        let north = if params.latitude_of_origin == 90.0 {
            true
        } else if params.latitude_of_origin == -90.0 {
            false
        } else {
            return Err(CrsError::out_of_range(
                "latitude_of_origin",
                params.latitude_of_origin,
                Some(-90.0),
                Some(90.0),
            ));
        };
        let a = params.ellipsoid.semi_major;
        let e = params.ellipsoid.eccentricity();
        let scale = 2.0 * a * params.scale_factor
            / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
        Ok(Self {
            e,
            lon0: params.central_meridian.to_radians(),
            north,
            scale,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        })
    }

    pub fn is_north(&self) -> bool {
        self.north
    }
}

impl MapProjection for PolarStereographic {
    fn name(&self) -> &'static str {
        "Polar_Stereographic"
    }

    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)> {
        let polar_lat = if self.north { lat } else { -lat };
        if polar_lat <= -90.0 + 1e-10 {
            return Err(CrsError::transform(format!(
                "latitude {} is the pole opposite the projection centre",
                lat
            )));
        }
        let dlon = normalize_longitude(lon.to_radians() - self.lon0);
        // South pole case mirrors the north pole formulas.
        let t = conformal_t(polar_lat.to_radians(), self.e);
        let rho = self.scale * t;
        let x = self.false_easting + rho * dlon.sin();
        let y = if self.north {
            self.false_northing - rho * dlon.cos()
        } else {
            self.false_northing + rho * dlon.cos()
        };
        Ok((x, y))
    }

    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)> {
        let dx = easting - self.false_easting;
        let dy = northing - self.false_northing;
        let rho = dx.hypot(dy);
        let t = rho / self.scale;

        let chi = PI / 2.0 - 2.0 * t.atan();
        let e2 = self.e * self.e;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e4 * e4;
        let phi = chi
            + (e2 / 2.0 + 5.0 * e4 / 24.0 + e6 / 12.0 + 13.0 * e8 / 360.0) * (2.0 * chi).sin()
            + (7.0 * e4 / 48.0 + 29.0 * e6 / 240.0 + 811.0 * e8 / 11520.0) * (4.0 * chi).sin()
            + (7.0 * e6 / 120.0 + 81.0 * e8 / 1120.0) * (6.0 * chi).sin()
            + (4279.0 * e8 / 161280.0) * (8.0 * chi).sin();

        let (phi, lon) = if self.north {
            (phi, self.lon0 + dx.atan2(-dy))
        } else {
            (-phi, self.lon0 + dx.atan2(dy))
        };
        Ok((normalize_longitude(lon).to_degrees(), phi.to_degrees()))
    }
}
