//! Seven-parameter datum shifts between geocentric frames.
//!
//! Position Vector, Coordinate Frame Rotation and Geocentric Translations
//! share one provider. They differ only in how the parameter group is read
//! into [`BursaWolfParameters`], which always carry the position-vector
//! sign convention.

use std::sync::Arc;

use crs_common::{Authority, CrsError, CrsResult, Ellipsoid, OperationIdentifier};
use crs_parameter::{universal, ParameterDescriptor, ParameterGroupDescriptor, ParameterValueGroup};
use projection::{
    concatenate, BursaWolfParameters, GeocentricTransform, HelmertTransform, MathTransform,
};
use tracing::debug;

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::{Epsg, Esri, GeoTiff, Ogc, Proj4};

/// How a parameter group maps onto position-vector Bursa-Wolf terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BursaWolfFill {
    /// All seven terms copied as given.
    PositionVector,
    /// All seven terms copied, then the rotations negated.
    CoordinateFrameRotation,
    /// Translations only; rotations and scale difference are zero.
    GeocentricTranslation,
}

impl BursaWolfFill {
    /// Read the Bursa-Wolf terms from `values`.
    pub fn fill(&self, values: &ParameterValueGroup) -> CrsResult<BursaWolfParameters> {
        let mut params = BursaWolfParameters::translation(
            values.real("dx")?,
            values.real("dy")?,
            values.real("dz")?,
        );
        match self {
            BursaWolfFill::GeocentricTranslation => {}
            BursaWolfFill::PositionVector | BursaWolfFill::CoordinateFrameRotation => {
                params.ex = values.real("ex")?;
                params.ey = values.real("ey")?;
                params.ez = values.real("ez")?;
                params.ppm = values.real("ppm")?;
                if *self == BursaWolfFill::CoordinateFrameRotation {
                    params.ex = -params.ex;
                    params.ey = -params.ey;
                    params.ez = -params.ez;
                }
            }
        }
        Ok(params)
    }

    fn has_rotations(&self) -> bool {
        *self != BursaWolfFill::GeocentricTranslation
    }
}

/// Provider for the geocentric affine family, parameterized by its fill strategy.
///
/// Without ellipsoid axes the transform works on geocentric coordinates
/// (3D to 3D). With all four axes it works on geographic coordinates of
/// `src_dim` and `tgt_dim` dimensions.
#[derive(Debug)]
pub struct GeocentricAffineProvider {
    fill: BursaWolfFill,
    variants: DimensionVariants,
}

impl GeocentricAffineProvider {
    pub fn position_vector() -> CrsResult<Self> {
        let group = ParameterGroupDescriptor::builder(Epsg, "Position Vector transformation (geog2D domain)")
            .identifier(OperationIdentifier::epsg(9606))
            .identifier(OperationIdentifier::epsg(1033))
            .alias(Ogc, "Position_Vector")
            .alias(Esri, "Position_Vector")
            .alias(Epsg, "Position Vector 7-param. transformation")
            .alias(Epsg, "Position Vector transformation (geocentric domain)")
            .alias(Proj4, "towgs84")
            .alias(Ogc, "Bursa_Wolf");
        Self::new(BursaWolfFill::PositionVector, group)
    }

    pub fn coordinate_frame_rotation() -> CrsResult<Self> {
        let group = ParameterGroupDescriptor::builder(Epsg, "Coordinate Frame rotation (geog2D domain)")
            .identifier(OperationIdentifier::epsg(9607))
            .identifier(OperationIdentifier::epsg(1032))
            .alias(Ogc, "Coordinate_Frame")
            .alias(Esri, "Coordinate_Frame")
            .alias(Epsg, "Coordinate Frame rotation")
            .alias(Epsg, "Coordinate Frame rotation (geocentric domain)");
        Self::new(BursaWolfFill::CoordinateFrameRotation, group)
    }

    pub fn geocentric_translation() -> CrsResult<Self> {
        let group = ParameterGroupDescriptor::builder(Epsg, "Geocentric translations (geog2D domain)")
            .identifier(OperationIdentifier::epsg(9603))
            .identifier(OperationIdentifier::epsg(1031))
            .alias(Ogc, "Geocentric_Translation")
            .alias(Esri, "Geocentric_Translation")
            .alias(Epsg, "Geocentric translations")
            .alias(Epsg, "Geocentric translations (geocentric domain)")
            .alias(GeoTiff, "CT_GeocentricTranslation");
        Self::new(BursaWolfFill::GeocentricTranslation, group)
    }

    fn new(fill: BursaWolfFill, group: crs_parameter::GroupBuilder) -> CrsResult<Self> {
        let declared = group
            .parameters(Self::parameters(fill)?)
            .dimensions(2, 2)
            .build()?;
        let variants = DimensionVariants::new(declared)
            .with_variant(2, 3)
            .with_variant(3, 2)
            .with_variant(3, 3);
        Ok(Self { fill, variants })
    }

    fn parameters(fill: BursaWolfFill) -> CrsResult<Vec<ParameterDescriptor>> {
        let mut params = vec![
            universal::translation('x')?,
            universal::translation('y')?,
            universal::translation('z')?,
        ];
        if fill.has_rotations() {
            params.push(universal::rotation('x')?);
            params.push(universal::rotation('y')?);
            params.push(universal::rotation('z')?);
            params.push(universal::scale_difference()?);
        }
        params.push(universal::semi_major()?.renamed(Ogc, "src_semi_major").optional());
        params.push(universal::semi_minor()?.renamed(Ogc, "src_semi_minor").optional());
        params.push(universal::semi_major()?.renamed(Ogc, "tgt_semi_major").optional());
        params.push(universal::semi_minor()?.renamed(Ogc, "tgt_semi_minor").optional());
        params.push(universal::src_dim()?);
        params.push(universal::tgt_dim()?);
        Ok(params)
    }

    pub fn fill(&self) -> BursaWolfFill {
        self.fill
    }

    pub fn variants(&self) -> &DimensionVariants {
        &self.variants
    }

    /// Source and target ellipsoids, when all four axes are given.
    fn ellipsoids(values: &ParameterValueGroup) -> CrsResult<Option<(Ellipsoid, Ellipsoid)>> {
        let axes = [
            values.optional_real("src_semi_major")?,
            values.optional_real("src_semi_minor")?,
            values.optional_real("tgt_semi_major")?,
            values.optional_real("tgt_semi_minor")?,
        ];
        match axes {
            [None, None, None, None] => Ok(None),
            [Some(sa), Some(sb), Some(ta), Some(tb)] => Ok(Some((
                Ellipsoid::from_axes(sa, sb)?,
                Ellipsoid::from_axes(ta, tb)?,
            ))),
            _ => Err(CrsError::unsupported(
                "source and target ellipsoids need all four semi-axes, or none for geocentric coordinates",
            )),
        }
    }
}

impl TransformProvider for GeocentricAffineProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Transformation
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let params = self.fill.fill(values)?;
        let helmert: Arc<dyn MathTransform> = Arc::new(HelmertTransform::new(params)?);

        let transform = match Self::ellipsoids(values)? {
            None => {
                if values.is_explicit("src_dim")? || values.is_explicit("tgt_dim")? {
                    return Err(CrsError::unsupported(
                        "src_dim and tgt_dim apply to geographic coordinates and need ellipsoid axes",
                    ));
                }
                helmert
            }
            Some((source, target)) => {
                let src_dim = values.integer("src_dim")? as usize;
                let tgt_dim = values.integer("tgt_dim")? as usize;
                let steps: Vec<Arc<dyn MathTransform>> = vec![
                    Arc::new(GeocentricTransform::to_geocentric(source, src_dim)?),
                    helmert,
                    Arc::new(GeocentricTransform::to_geographic(target, tgt_dim)?),
                ];
                concatenate(steps)?
            }
        };

        debug!(
            method = self.name(),
            source_dim = transform.source_dimensions(),
            target_dim = transform.target_dimensions(),
            "Created datum shift"
        );
        self.variants.provide(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(provider: &GeocentricAffineProvider) -> ParameterValueGroup {
        provider
            .create_value()
            .with("dx", 1.0)
            .and_then(|v| v.with("dy", 2.0))
            .and_then(|v| v.with("dz", 3.0))
            .unwrap()
    }

    #[test]
    fn test_geocentric_translation_has_no_rotation_parameters() {
        let provider = GeocentricAffineProvider::geocentric_translation().unwrap();
        let names: Vec<&str> = provider
            .descriptor()
            .parameters()
            .iter()
            .map(|p| p.primary_name())
            .collect();
        assert!(names.contains(&"dx"));
        assert!(!names.contains(&"ex"));
        assert!(!names.contains(&"ppm"));
    }

    #[test]
    fn test_translation_fill() {
        let provider = GeocentricAffineProvider::geocentric_translation().unwrap();
        let params = provider.fill().fill(&values(&provider)).unwrap();
        assert_eq!(params, BursaWolfParameters::translation(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_coordinate_frame_negates_rotations_only() {
        let provider = GeocentricAffineProvider::coordinate_frame_rotation().unwrap();
        let mut v = values(&provider);
        v.set("ex", 0.5).unwrap().set("ez", -1.5).unwrap().set("ppm", 2.0).unwrap();
        let params = provider.fill().fill(&v).unwrap();
        assert_eq!((params.dx, params.dy, params.dz), (1.0, 2.0, 3.0));
        assert_eq!((params.ex, params.ey, params.ez), (-0.5, 0.0, 1.5));
        assert_eq!(params.ppm, 2.0);
    }

    #[test]
    fn test_partial_axes_rejected() {
        let provider = GeocentricAffineProvider::position_vector().unwrap();
        let v = values(&provider).with("src_semi_major", 6378137.0).unwrap();
        let err = provider.create_transform(&v).unwrap_err();
        assert_eq!(err.code(), "UnsupportedConfiguration");
    }

    #[test]
    fn test_dimensions_without_axes_rejected() {
        let provider = GeocentricAffineProvider::position_vector().unwrap();
        let v = values(&provider).with("tgt_dim", 3).unwrap();
        let err = provider.create_transform(&v).unwrap_err();
        assert_eq!(err.code(), "UnsupportedConfiguration");
    }

    #[test]
    fn test_geocentric_result_is_complement() {
        let provider = GeocentricAffineProvider::position_vector().unwrap();
        let provided = provider.create_transform(&values(&provider)).unwrap();
        assert_eq!((provided.source_dimensions(), provided.target_dimensions()), (3, 3));
        assert!(provided.is_complement());
        assert_eq!(provided.method.primary_name(), provider.name());
    }
}
