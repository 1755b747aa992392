//! Logarithmic and exponential transfer functions on one ordinate.

use std::sync::Arc;

use crs_common::{Authority, CrsResult, Unit};
use crs_parameter::{ParameterDescriptor, ParameterGroupDescriptor, ParameterValueGroup};
use projection::TransferFunction;
use tracing::debug;

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::Internal;

fn base() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Internal, "base")
        .greater_than(0.0)
        .default_value(10.0)
        .unit(Unit::Unity)
        .build()
}

/// `y = log_base(x) + offset`.
#[derive(Debug)]
pub struct LogarithmicProvider {
    variants: DimensionVariants,
}

impl LogarithmicProvider {
    pub fn new() -> CrsResult<Self> {
        let offset = ParameterDescriptor::real(Internal, "offset")
            .default_value(0.0)
            .build()?;
        let declared = ParameterGroupDescriptor::builder(Internal, "Logarithmic")
            .parameters([base()?, offset])
            .dimensions(1, 1)
            .build()?;
        Ok(Self {
            variants: DimensionVariants::new(declared),
        })
    }
}

impl TransformProvider for LogarithmicProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Conversion
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let base = values.real("base")?;
        let offset = values.real("offset")?;
        let transform = TransferFunction::logarithmic(base, offset)?;
        debug!(base, offset, "Created logarithmic transfer function");
        self.variants.provide(Arc::new(transform))
    }
}

/// `y = scale · base^x`, the inverse family of [`LogarithmicProvider`].
#[derive(Debug)]
pub struct ExponentialProvider {
    variants: DimensionVariants,
}

impl ExponentialProvider {
    pub fn new() -> CrsResult<Self> {
        let scale = ParameterDescriptor::real(Internal, "scale")
            .default_value(1.0)
            .build()?;
        let declared = ParameterGroupDescriptor::builder(Internal, "Exponential")
            .parameters([base()?, scale])
            .dimensions(1, 1)
            .build()?;
        Ok(Self {
            variants: DimensionVariants::new(declared),
        })
    }
}

impl TransformProvider for ExponentialProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Conversion
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let transform = TransferFunction::exponential(values.real("base")?, values.real("scale")?)?;
        self.variants.provide(Arc::new(transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logarithm_is_base_ten() {
        let provider = LogarithmicProvider::new().unwrap();
        let provided = provider.create_transform(&provider.create_value()).unwrap();
        let out = provided.transform.transform(&[1000.0]).unwrap();
        assert!((out[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_scale() {
        let provider = ExponentialProvider::new().unwrap();
        let values = provider
            .create_value()
            .with("base", 2.0)
            .and_then(|v| v.with("scale", 3.0))
            .unwrap();
        let out = provider.create_transform(&values).unwrap().transform.transform(&[4.0]).unwrap();
        assert!((out[0] - 48.0).abs() < 1e-12);
    }
}
