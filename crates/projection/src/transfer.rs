//! One-dimensional transfer functions (logarithmic and exponential).

use std::sync::Arc;

use crs_common::{CrsError, CrsResult};

use crate::transform::{check_point, MathTransform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferKind {
    /// `y = log_base(x) + offset`
    Logarithmic { base: f64, offset: f64 },
    /// `y = scale · base^x`
    Exponential { base: f64, scale: f64 },
}

/// A 1-D transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferFunction {
    kind: TransferKind,
}

impl TransferFunction {
    /// `base` must be strictly positive and different from 1.
    pub fn logarithmic(base: f64, offset: f64) -> CrsResult<Self> {
        check_base(base)?;
        if !offset.is_finite() {
            return Err(CrsError::invalid_value("offset", "offset must be finite"));
        }
        Ok(Self {
            kind: TransferKind::Logarithmic { base, offset },
        })
    }

    /// `base` must be strictly positive and different from 1.
    pub fn exponential(base: f64, scale: f64) -> CrsResult<Self> {
        check_base(base)?;
        if !scale.is_finite() {
            return Err(CrsError::invalid_value("scale", "scale must be finite"));
        }
        Ok(Self {
            kind: TransferKind::Exponential { base, scale },
        })
    }

    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    /// Evaluate the function. Logarithms of non-positive values give NaN.
    pub fn apply(&self, x: f64) -> f64 {
        match self.kind {
            TransferKind::Logarithmic { base, offset } => x.ln() / base.ln() + offset,
            TransferKind::Exponential { base, scale } => scale * base.powf(x),
        }
    }
}

fn check_base(base: f64) -> CrsResult<()> {
    if !(base > 0.0) || !base.is_finite() {
        return Err(CrsError::out_of_open_range("base", base, 0.0, None));
    }
    // log_1 is undefined
    if base == 1.0 {
        return Err(CrsError::out_of_open_range("base", base, 0.0, None).excluding(1.0));
    }
    Ok(())
}

impl MathTransform for TransferFunction {
    fn name(&self) -> &'static str {
        match self.kind {
            TransferKind::Logarithmic { .. } => "Logarithmic",
            TransferKind::Exponential { .. } => "Exponential",
        }
    }

    fn source_dimensions(&self) -> usize {
        1
    }

    fn target_dimensions(&self) -> usize {
        1
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        dst[0] = self.apply(src[0]);
        Ok(())
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        let inverse = match self.kind {
            // base^(y - offset) = base^-offset · base^y
            TransferKind::Logarithmic { base, offset } => {
                TransferFunction::exponential(base, base.powf(-offset))?
            }
            // log_base(y / scale) = log_base(y) - log_base(scale)
            TransferKind::Exponential { base, scale } => {
                if !(scale > 0.0) {
                    return Err(CrsError::transform(format!(
                        "exponential with scale {} has no logarithmic inverse",
                        scale
                    )));
                }
                TransferFunction::logarithmic(base, -(scale.ln() / base.ln()))?
            }
        };
        Ok(Arc::new(inverse))
    }

    fn is_identity(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log10_of_100() {
        let f = TransferFunction::logarithmic(10.0, 0.0).unwrap();
        assert!((f.transform(&[100.0]).unwrap()[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset() {
        let f = TransferFunction::logarithmic(2.0, 3.0).unwrap();
        assert!((f.apply(8.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_bases() {
        for base in [0.0, -5.0, f64::NAN] {
            let err = TransferFunction::logarithmic(base, 0.0).unwrap_err();
            assert_eq!(err.code(), "ParameterOutOfRange", "base {}", base);
        }
        let err = TransferFunction::logarithmic(1.0, 0.0).unwrap_err();
        assert_eq!(err.code(), "ParameterOutOfRange");
        assert!(err.to_string().contains("(0, inf) excluding 1"), "{}", err);
    }

    #[test]
    fn test_log_of_negative_is_nan() {
        let f = TransferFunction::logarithmic(10.0, 0.0).unwrap();
        assert!(f.apply(-1.0).is_nan());
    }

    #[test]
    fn test_inverse_roundtrip() {
        let f = TransferFunction::logarithmic(10.0, 1.5).unwrap();
        let inv = f.inverse().unwrap();
        assert_eq!(inv.name(), "Exponential");
        let y = f.apply(250.0);
        assert!((inv.transform(&[y]).unwrap()[0] - 250.0).abs() < 1e-9);

        let back = inv.inverse().unwrap();
        assert!((back.transform(&[250.0]).unwrap()[0] - y).abs() < 1e-12);
    }
}
