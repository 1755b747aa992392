//! The math transform abstraction and transform concatenation.

use std::fmt;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult};

/// A coordinate mapping between a fixed source and target dimension.
///
/// Points are passed as packed ordinate slices. Implementations are immutable
/// and may be shared across threads.
pub trait MathTransform: Send + Sync + fmt::Debug {
    /// Short human-readable name of the transform kind.
    fn name(&self) -> &'static str;

    fn source_dimensions(&self) -> usize;

    fn target_dimensions(&self) -> usize;

    /// Transform one point. `src` holds at least `source_dimensions()` ordinates,
    /// `dst` room for at least `target_dimensions()`.
    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()>;

    /// The inverse mapping.
    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>>;

    fn is_identity(&self) -> bool {
        false
    }

    /// Transform one point into a freshly allocated vector.
    fn transform(&self, src: &[f64]) -> CrsResult<Vec<f64>> {
        let mut dst = vec![0.0; self.target_dimensions()];
        self.transform_point(src, &mut dst)?;
        Ok(dst)
    }

    /// Transform packed points, appending the results to `dst`.
    ///
    /// Fails on the first point that cannot be transformed; `dst` then holds
    /// the points converted so far.
    fn transform_points(&self, src: &[f64], dst: &mut Vec<f64>) -> CrsResult<()> {
        let src_dim = self.source_dimensions();
        let tgt_dim = self.target_dimensions();
        if src.len() % src_dim != 0 {
            return Err(CrsError::transform(format!(
                "{} ordinates is not a multiple of the source dimension {}",
                src.len(),
                src_dim
            )));
        }
        let mut buffer = vec![0.0; tgt_dim];
        for point in src.chunks_exact(src_dim) {
            self.transform_point(point, &mut buffer)?;
            dst.extend_from_slice(&buffer);
        }
        Ok(())
    }
}

/// Check slice lengths against a transform's dimensions.
pub(crate) fn check_point(
    transform: &dyn MathTransform,
    src: &[f64],
    dst: &[f64],
) -> CrsResult<()> {
    if src.len() < transform.source_dimensions() || dst.len() < transform.target_dimensions() {
        return Err(CrsError::transform(format!(
            "{} expects {} source and {} target ordinates, got {} and {}",
            transform.name(),
            transform.source_dimensions(),
            transform.target_dimensions(),
            src.len(),
            dst.len()
        )));
    }
    Ok(())
}

/// Two transforms applied in sequence.
#[derive(Debug, Clone)]
pub struct ConcatenatedTransform {
    first: Arc<dyn MathTransform>,
    second: Arc<dyn MathTransform>,
}

impl ConcatenatedTransform {
    pub fn new(first: Arc<dyn MathTransform>, second: Arc<dyn MathTransform>) -> CrsResult<Self> {
        if first.target_dimensions() != second.source_dimensions() {
            return Err(CrsError::unsupported(format!(
                "cannot chain {} ({}D output) with {} ({}D input)",
                first.name(),
                first.target_dimensions(),
                second.name(),
                second.source_dimensions()
            )));
        }
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &Arc<dyn MathTransform> {
        &self.first
    }

    pub fn second(&self) -> &Arc<dyn MathTransform> {
        &self.second
    }
}

impl MathTransform for ConcatenatedTransform {
    fn name(&self) -> &'static str {
        "Concatenated"
    }

    fn source_dimensions(&self) -> usize {
        self.first.source_dimensions()
    }

    fn target_dimensions(&self) -> usize {
        self.second.target_dimensions()
    }

    fn transform_point(&self, src: &[f64], dst: &mut [f64]) -> CrsResult<()> {
        check_point(self, src, dst)?;
        let mut middle = vec![0.0; self.first.target_dimensions()];
        self.first.transform_point(src, &mut middle)?;
        self.second.transform_point(&middle, dst)
    }

    fn inverse(&self) -> CrsResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(ConcatenatedTransform::new(
            self.second.inverse()?,
            self.first.inverse()?,
        )?))
    }

    fn is_identity(&self) -> bool {
        self.first.is_identity() && self.second.is_identity()
    }
}

/// Chain transforms left to right, dropping identity steps of matching dimension.
pub fn concatenate(steps: Vec<Arc<dyn MathTransform>>) -> CrsResult<Arc<dyn MathTransform>> {
    let mut result: Option<Arc<dyn MathTransform>> = None;
    for step in steps {
        result = Some(match result {
            None => step,
            Some(previous) => {
                if previous.target_dimensions() != step.source_dimensions() {
                    return Err(CrsError::unsupported(format!(
                        "cannot chain {}D output with {}D input",
                        previous.target_dimensions(),
                        step.source_dimensions()
                    )));
                }
                if is_square_identity(step.as_ref()) {
                    previous
                } else if is_square_identity(previous.as_ref()) {
                    step
                } else {
                    Arc::new(ConcatenatedTransform::new(previous, step)?)
                }
            }
        });
    }
    result.ok_or_else(|| CrsError::unsupported("nothing to concatenate"))
}

fn is_square_identity(transform: &dyn MathTransform) -> bool {
    transform.is_identity() && transform.source_dimensions() == transform.target_dimensions()
}
