//! Reference ellipsoids.

use serde::{Deserialize, Serialize};

use crate::error::{CrsError, CrsResult};

/// An ellipsoid of revolution given by its two semi-axes in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub semi_major: f64,
    pub semi_minor: f64,
}

impl Ellipsoid {
    /// Create an ellipsoid, rejecting non-positive or inverted axes.
    pub fn from_axes(semi_major: f64, semi_minor: f64) -> CrsResult<Self> {
        if !(semi_major > 0.0) || !semi_major.is_finite() {
            return Err(CrsError::out_of_open_range("semi_major", semi_major, 0.0, None));
        }
        if !(semi_minor > 0.0) || semi_minor > semi_major {
            return Err(CrsError::out_of_open_range(
                "semi_minor",
                semi_minor,
                0.0,
                Some(semi_major),
            ));
        }
        Ok(Self {
            semi_major,
            semi_minor,
        })
    }

    /// Create an ellipsoid from semi-major axis and inverse flattening.
    pub fn from_inverse_flattening(semi_major: f64, inverse_flattening: f64) -> Self {
        Self {
            semi_major,
            semi_minor: semi_major * (1.0 - 1.0 / inverse_flattening),
        }
    }

    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            semi_minor: radius,
        }
    }

    pub fn wgs84() -> Self {
        Self::from_inverse_flattening(6378137.0, 298.257223563)
    }

    pub fn grs80() -> Self {
        Self::from_inverse_flattening(6378137.0, 298.257222101)
    }

    /// Clarke 1880 (IGN), the ellipsoid of the French NTF datum.
    pub fn clarke_1880_ign() -> Self {
        Self {
            semi_major: 6378249.2,
            semi_minor: 6356515.0,
        }
    }

    pub fn is_sphere(&self) -> bool {
        self.semi_major == self.semi_minor
    }

    pub fn flattening(&self) -> f64 {
        (self.semi_major - self.semi_minor) / self.semi_major
    }

    /// First eccentricity squared, e² = (a² − b²) / a².
    pub fn eccentricity_squared(&self) -> f64 {
        let a2 = self.semi_major * self.semi_major;
        (a2 - self.semi_minor * self.semi_minor) / a2
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Radius of curvature in the prime vertical at latitude `phi` (radians).
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        self.semi_major / (1.0 - self.eccentricity_squared() * s * s).sqrt()
    }
}
