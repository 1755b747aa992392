//! Shared plumbing for map projections.
//!
//! A [`MapProjection`] knows how to go from geographic (longitude, latitude
//! in degrees) to projected (easting, northing in metres) and back.
//! [`ProjectionTransform`] wraps one as a two-dimensional [`MathTransform`].

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult, Ellipsoid};

use crate::transform::{check_point, MathTransform};

/// Forward and inverse equations of a map projection.
pub trait MapProjection: fmt::Debug + Clone + Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Geographic degrees to projected metres.
    fn project(&self, lon: f64, lat: f64) -> CrsResult<(f64, f64)>;

    /// Projected metres to geographic degrees.
    fn unproject(&self, easting: f64, northing: f64) -> CrsResult<(f64, f64)>;
}

/// Parameters common to most projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParameters {
    pub ellipsoid: Ellipsoid,
    /// Degrees.
    pub central_meridian: f64,
    /// Degrees.
    pub latitude_of_origin: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl ProjectionParameters {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            central_meridian: 0.0,
            latitude_of_origin: 0.0,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }

    pub fn origin(mut self, central_meridian: f64, latitude_of_origin: f64) -> Self {
        self.central_meridian = central_meridian;
        self.latitude_of_origin = latitude_of_origin;
        self
    }

    pub fn false_origin(mut self, false_easting: f64, false_northing: f64) -> Self {
        self.false_easting = false_easting;
        self.false_northing = false_northing;
        self
    }

    pub fn scale(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Wrap a longitude difference in radians to [-π, π].
pub(crate) fn normalize_longitude(mut dlon: f64) -> f64 {
    while dlon > PI {
        dlon -= 2.0 * PI;
    }
    while dlon < -PI {
        dlon += 2.0 * PI;
    }
    dlon
}

/// Wrap a longitude in degrees to [-180, 180].
pub(crate) fn normalize_degrees(lon: f64) -> f64 {
    normalize_longitude(lon.to_radians()).to_degrees()
}

pub(crate) fn check_latitude(lat: f64) -> CrsResult<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CrsError::transform(format!("latitude {} is outside [-90, 90]", lat)));
    }
    Ok(())
}

/// Conformal latitude helper `t(φ)` shared by Lambert and polar stereographic.
pub(crate) fn conformal_t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (PI / 4.0 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

/// A map projection as a 2-D math transform.
#[derive(Debug, Clone)]
pub struct ProjectionTransform<P: MapProjection> {
    projection: P,
    inverse: bool,
}

impl<P: MapProjection> ProjectionTransform<P> {
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            inverse: false,
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }
}

impl<P: MapProjection> MathTransform for ProjectionTransform<P> {
    fn name(&self) -> &'static str {
        self.projection.name()
    }

    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        let (a, b) = if self.inverse {
            self.projection.unproject(src[0], src[1])?
        } else {
            check_latitude(src[1])?;
            self.projection.project(src[0], src[1])?
        };
        if !(a.is_finite() && b.is_finite()) {
            return Err(CrsError::transform(format!(
                "{} is undefined at ({}, {})",
                self.projection.name(),
                src[0],
                src[1]
            )));
        }
        dst[0] = a;
        dst[1] = b;
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(Self {
            projection: self.projection.clone(),
            inverse: !self.inverse,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude() {
        assert!((normalize_longitude(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_degrees(190.0) + 170.0).abs() < 1e-9);
        assert!((normalize_degrees(-540.0).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_latitude() {
        assert!(check_latitude(90.0).is_ok());
        assert!(check_latitude(90.5).is_err());
        assert!(check_latitude(f64::NAN).is_err());
    }
}
