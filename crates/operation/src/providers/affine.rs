//! Affine operations: general parametric affine and longitude rotation.

use std::sync::Arc;

use crs_common::{Authority, CrsError, CrsResult, OperationIdentifier, Unit};
use crs_parameter::{ParameterDescriptor, ParameterGroupDescriptor, ParameterValueGroup};
use nalgebra::DMatrix;
use projection::AffineTransform;
use tracing::debug;

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::{Epsg, Esri, Ogc};

/// Largest matrix size accepted, for 3D coordinates.
const MAX_SIZE: usize = 4;

/// EPSG names of the 2D matrix elements.
const EPSG_ELEMENTS: [(usize, usize, &str); 6] = [
    (0, 0, "A1"),
    (0, 1, "A2"),
    (0, 2, "A0"),
    (1, 0, "B1"),
    (1, 1, "B2"),
    (1, 2, "B0"),
];

fn element_name(row: usize, col: usize) -> String {
    format!("elt_{}_{}", row, col)
}

/// Affine parametric transformation (EPSG:9624).
///
/// The matrix has `num_row` × `num_col` elements in homogeneous form, so a
/// 3×3 matrix maps 2D to 2D. Elements left unset take the identity value
/// for the requested size.
#[derive(Debug)]
pub struct AffineProvider {
    variants: DimensionVariants,
}

impl AffineProvider {
    pub fn new() -> CrsResult<Self> {
        let size = |name: &str| {
            ParameterDescriptor::integer(Ogc, name)
                .range(2.0, MAX_SIZE as f64)
                .default_value(3)
                .build()
        };
        let mut builder = ParameterGroupDescriptor::builder(Epsg, "Affine parametric transformation")
            .identifier(OperationIdentifier::epsg(9624))
            .alias(Ogc, "Affine")
            .alias(Esri, "Affine")
            .parameter(size("num_row")?)
            .parameter(size("num_col")?)
            .dimensions(2, 2);

        for row in 0..MAX_SIZE {
            for col in 0..MAX_SIZE {
                let mut element = ParameterDescriptor::real(Ogc, &element_name(row, col))
                    .default_value(if row == col { 1.0 } else { 0.0 });
                if let Some((_, _, epsg)) = EPSG_ELEMENTS.iter().find(|(r, c, _)| (*r, *c) == (row, col)) {
                    element = element.alias(Epsg, epsg);
                }
                builder = builder.parameter(element.build()?);
            }
        }

        let mut variants = DimensionVariants::new(builder.build()?);
        for source in 1..MAX_SIZE {
            for target in 1..MAX_SIZE {
                variants = variants.with_variant(source, target);
            }
        }
        Ok(Self { variants })
    }

    fn matrix(values: &ParameterValueGroup) -> CrsResult<DMatrix<f64>> {
        let rows = values.integer("num_row")? as usize;
        let cols = values.integer("num_col")? as usize;
        let mut matrix = DMatrix::zeros(rows, cols);
        for row in 0..MAX_SIZE {
            for col in 0..MAX_SIZE {
                let name = element_name(row, col);
                let explicit = values.is_explicit(&name)?;
                if row >= rows || col >= cols {
                    if explicit {
                        return Err(CrsError::unsupported(format!(
                            "{} lies outside a {}x{} matrix",
                            name, rows, cols
                        )));
                    }
                    continue;
                }
                matrix[(row, col)] = if explicit {
                    values.real(&name)?
                } else if row == rows - 1 {
                    if col == cols - 1 { 1.0 } else { 0.0 }
                } else if row == col && col < cols - 1 {
                    1.0
                } else {
                    0.0
                };
            }
        }
        Ok(matrix)
    }
}

impl TransformProvider for AffineProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Conversion
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let transform = AffineTransform::new(Self::matrix(values)?)?;
        debug!(
            rows = transform.matrix().nrows(),
            cols = transform.matrix().ncols(),
            "Created affine transform"
        );
        self.variants.provide(Arc::new(transform))
    }
}

/// Longitude rotation (EPSG:9601): adds a fixed offset to longitudes.
#[derive(Debug)]
pub struct LongitudeRotationProvider {
    variants: DimensionVariants,
}

impl LongitudeRotationProvider {
    pub const OFFSET: &'static str = "Longitude offset";

    pub fn new() -> CrsResult<Self> {
        let offset = ParameterDescriptor::real(Epsg, Self::OFFSET)
            .alias(Ogc, "offset")
            .range(-180.0, 180.0)
            .unit(Unit::Degree)
            .build()?;
        let declared = ParameterGroupDescriptor::builder(Epsg, "Longitude rotation")
            .identifier(OperationIdentifier::epsg(9601))
            .alias(Ogc, "Longitude_Rotation")
            .alias(Esri, "Longitude_Rotation")
            .parameter(offset)
            .dimensions(2, 2)
            .build()?;
        Ok(Self {
            variants: DimensionVariants::new(declared),
        })
    }
}

impl TransformProvider for LongitudeRotationProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Transformation
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let offset = values.real(Self::OFFSET)?;
        self.variants
            .provide(Arc::new(AffineTransform::translation(&[offset, 0.0])))
    }
}
