//! Built-in transform providers.

mod affine;
mod bursa_wolf;
mod geocentric;
mod grid;
mod projections;
mod transfer;

use std::sync::Arc;

use crs_common::CrsResult;
use projection::GridLoader;

use crate::provider::TransformProvider;

pub use affine::{AffineProvider, LongitudeRotationProvider};
pub use bursa_wolf::{BursaWolfFill, GeocentricAffineProvider};
pub use geocentric::{ConversionDirection, GeocentricConversionProvider};
pub use grid::{Ntv2Provider, Rgf93Provider};
pub use projections::{ProjectionMethod, ProjectionProvider};
pub use transfer::{ExponentialProvider, LogarithmicProvider};

/// Every built-in provider, in registration order.
///
/// Grid-based providers share `loader`.
pub fn builtin(loader: Arc<dyn GridLoader>) -> CrsResult<Vec<Arc<dyn TransformProvider>>> {
    let mut providers: Vec<Arc<dyn TransformProvider>> = vec![
        Arc::new(GeocentricAffineProvider::position_vector()?),
        Arc::new(GeocentricAffineProvider::coordinate_frame_rotation()?),
        Arc::new(GeocentricAffineProvider::geocentric_translation()?),
        Arc::new(GeocentricConversionProvider::to_geocentric()?),
        Arc::new(GeocentricConversionProvider::to_geographic()?),
        Arc::new(Ntv2Provider::new(Arc::clone(&loader))?),
        Arc::new(Rgf93Provider::new(loader)?),
        Arc::new(LongitudeRotationProvider::new()?),
        Arc::new(AffineProvider::new()?),
        Arc::new(LogarithmicProvider::new()?),
        Arc::new(ExponentialProvider::new()?),
    ];
    for method in ProjectionMethod::ALL {
        providers.push(Arc::new(ProjectionProvider::new(method)?));
    }
    Ok(providers)
}
