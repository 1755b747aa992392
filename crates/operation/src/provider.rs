//! The transform provider capability and dimension variants.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult};
use crs_parameter::{ParameterGroupDescriptor, ParameterValueGroup};
use projection::MathTransform;
use serde::{Deserialize, Serialize};

/// Broad category of a coordinate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Exact mapping defined by parameters, no datum change.
    Conversion,
    /// Datum change with empirically derived parameters.
    Transformation,
    /// Map projection from geographic to projected coordinates.
    Projection,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Conversion => "conversion",
            OperationKind::Transformation => "transformation",
            OperationKind::Projection => "projection",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transform together with the operation method that describes it.
#[derive(Debug, Clone)]
pub struct ProvidedTransform {
    pub transform: Arc<dyn MathTransform>,
    /// The provider's declared descriptor, or the dimension variant matching
    /// the transform when they differ.
    pub method: Arc<ParameterGroupDescriptor>,
    complement: bool,
}

impl ProvidedTransform {
    pub fn is_complement(&self) -> bool {
        self.complement
    }

    pub fn source_dimensions(&self) -> usize {
        self.transform.source_dimensions()
    }

    pub fn target_dimensions(&self) -> usize {
        self.transform.target_dimensions()
    }
}

/// Creates transforms for one operation method.
///
/// Implementations are immutable after construction and shared behind
/// `Arc<dyn TransformProvider>`. `create_transform` may be called
/// concurrently.
///
/// # Errors
///
/// `create_transform` fails with:
/// - `ParameterNotFound` when a mandatory parameter has no value and no default
/// - `ParameterOutOfRange` when a value is outside its bounds
/// - `UnsupportedConfiguration` when parameters contradict each other, the
///   requested dimensions have no variant, or `values` belongs to another method
/// - `ResourceUnavailable` when a grid file cannot be located or read
pub trait TransformProvider: Send + Sync + fmt::Debug {
    /// The declared parameter group of this method.
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor>;

    fn kind(&self) -> OperationKind;

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform>;

    /// The primary name of the method.
    fn name(&self) -> &str {
        self.descriptor().primary_name()
    }

    /// An empty value group for this method.
    fn create_value(&self) -> ParameterValueGroup {
        self.descriptor().create_value()
    }
}

/// Descriptors of one method keyed by `(source, target)` dimensions.
///
/// Built once by the owning provider's constructor and never modified.
#[derive(Debug, Clone)]
pub struct DimensionVariants {
    declared: Arc<ParameterGroupDescriptor>,
    variants: BTreeMap<(usize, usize), Arc<ParameterGroupDescriptor>>,
}

impl DimensionVariants {
    /// A table holding only the declared descriptor.
    pub fn new(declared: ParameterGroupDescriptor) -> Self {
        let key = (declared.source_dimensions(), declared.target_dimensions());
        let declared = Arc::new(declared);
        let mut variants = BTreeMap::new();
        variants.insert(key, Arc::clone(&declared));
        Self { declared, variants }
    }

    /// Add a variant of the declared descriptor with other dimensions.
    pub fn with_variant(mut self, source: usize, target: usize) -> Self {
        self.variants
            .entry((source, target))
            .or_insert_with(|| Arc::new(self.declared.with_dimensions(source, target)));
        self
    }

    pub fn declared(&self) -> &Arc<ParameterGroupDescriptor> {
        &self.declared
    }

    pub fn keys(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.variants.keys().copied()
    }

    pub fn get(&self, source: usize, target: usize) -> CrsResult<&Arc<ParameterGroupDescriptor>> {
        self.variants.get(&(source, target)).ok_or_else(|| {
            CrsError::unsupported(format!(
                "{} has no {}D to {}D variant",
                self.declared.primary_name(),
                source,
                target
            ))
        })
    }

    /// Pair `transform` with the variant matching its dimensions.
    pub fn provide(&self, transform: Arc<dyn MathTransform>) -> CrsResult<ProvidedTransform> {
        let method = Arc::clone(self.get(transform.source_dimensions(), transform.target_dimensions())?);
        let complement = !Arc::ptr_eq(&method, &self.declared);
        Ok(ProvidedTransform {
            transform,
            method,
            complement,
        })
    }

    /// Check that `values` was created from one of the descriptors in this
    /// table and that every mandatory parameter resolves.
    pub fn check_values(&self, values: &ParameterValueGroup) -> CrsResult<()> {
        let group = values.descriptor();
        let known = self.variants.values().any(|v| {
            Arc::ptr_eq(v, group) || (v.name() == group.name() && v.parameters() == group.parameters())
        });
        if !known {
            return Err(CrsError::unsupported(format!(
                "value group of '{}' cannot configure '{}'",
                group.primary_name(),
                self.declared.primary_name()
            )));
        }
        values.check_mandatory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::Authority;
    use projection::AffineTransform;

    fn variants() -> DimensionVariants {
        let group = ParameterGroupDescriptor::builder(Authority::Ogc, "Ellipsoid_To_Geocentric")
            .dimensions(3, 3)
            .build()
            .unwrap();
        DimensionVariants::new(group).with_variant(2, 3)
    }

    #[test]
    fn test_declared_is_not_complement() {
        let table = variants();
        let provided = table.provide(Arc::new(AffineTransform::identity(3))).unwrap();
        assert!(!provided.is_complement());
        assert!(Arc::ptr_eq(&provided.method, table.declared()));
    }

    #[test]
    fn test_variant_is_complement() {
        let table = variants();
        let mut matrix = nalgebra::DMatrix::zeros(4, 3);
        matrix[(0, 0)] = 1.0;
        matrix[(1, 1)] = 1.0;
        matrix[(3, 2)] = 1.0;
        let provided = table
            .provide(Arc::new(AffineTransform::new(matrix).unwrap()))
            .unwrap();
        assert!(provided.is_complement());
        assert_eq!(provided.method.source_dimensions(), 2);
        assert_eq!(provided.method.target_dimensions(), 3);
    }

    #[test]
    fn test_unknown_dimensions() {
        let err = variants().get(3, 2).unwrap_err();
        assert_eq!(err.code(), "UnsupportedConfiguration");
    }

    #[test]
    fn test_variants_built_once() {
        let table = variants();
        let a = table.get(2, 3).unwrap();
        let b = table.get(2, 3).unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec![(2, 3), (3, 3)]);
    }

    #[test]
    fn test_foreign_values_rejected() {
        let other = Arc::new(
            ParameterGroupDescriptor::builder(Authority::Ogc, "Affine")
                .build()
                .unwrap(),
        );
        let err = variants().check_values(&other.create_value()).unwrap_err();
        assert_eq!(err.code(), "UnsupportedConfiguration");
    }
}
