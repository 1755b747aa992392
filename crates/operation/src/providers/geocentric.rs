//! Geographic/geocentric conversions (EPSG:9602) in both directions.

use std::sync::Arc;

use crs_common::{Authority, CrsResult, Ellipsoid, OperationIdentifier};
use crs_parameter::{universal, ParameterGroupDescriptor, ParameterValueGroup};
use projection::GeocentricTransform;
use tracing::debug;

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::{Epsg, Esri, Ogc};

/// Which way a [`GeocentricConversionProvider`] converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    ToGeocentric,
    ToGeographic,
}

/// Geographic (longitude, latitude[, height]) to geocentric XYZ, or back.
///
/// The declared method is 3D to 3D. `dim = 2` selects the 2D geographic
/// variant, reported through [`ProvidedTransform::method`].
#[derive(Debug)]
pub struct GeocentricConversionProvider {
    direction: ConversionDirection,
    variants: DimensionVariants,
}

impl GeocentricConversionProvider {
    pub fn to_geocentric() -> CrsResult<Self> {
        let declared = ParameterGroupDescriptor::builder(Ogc, "Ellipsoid_To_Geocentric")
            .identifier(OperationIdentifier::epsg(9602))
            .alias(Epsg, "Geographic/geocentric conversions")
            .alias(Esri, "Geographic_To_Geocentric")
            .parameters([universal::semi_major()?, universal::semi_minor()?, universal::dim(3)?])
            .dimensions(3, 3)
            .build()?;
        Ok(Self {
            direction: ConversionDirection::ToGeocentric,
            variants: DimensionVariants::new(declared).with_variant(2, 3),
        })
    }

    pub fn to_geographic() -> CrsResult<Self> {
        let declared = ParameterGroupDescriptor::builder(Ogc, "Geocentric_To_Ellipsoid")
            .alias(Esri, "Geocentric_To_Geographic")
            .parameters([universal::semi_major()?, universal::semi_minor()?, universal::dim(3)?])
            .dimensions(3, 3)
            .build()?;
        Ok(Self {
            direction: ConversionDirection::ToGeographic,
            variants: DimensionVariants::new(declared).with_variant(3, 2),
        })
    }

    pub fn direction(&self) -> ConversionDirection {
        self.direction
    }
}

impl TransformProvider for GeocentricConversionProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Conversion
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let ellipsoid = Ellipsoid::from_axes(values.real("semi_major")?, values.real("semi_minor")?)?;
        let dim = values.integer("dim")? as usize;
        let transform = match self.direction {
            ConversionDirection::ToGeocentric => GeocentricTransform::to_geocentric(ellipsoid, dim)?,
            ConversionDirection::ToGeographic => GeocentricTransform::to_geographic(ellipsoid, dim)?,
        };
        debug!(method = self.name(), dim, "Created geocentric conversion");
        self.variants.provide(Arc::new(transform))
    }
}
