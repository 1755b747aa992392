//! Datum shift grids: file formats, interpolation and loading.

pub mod gr3d;
pub mod interpolation;
pub mod loader;
pub mod ntv2;

use crs_common::CrsError;
use thiserror::Error;

pub use gr3d::GeocentricGrid;
pub use loader::{FileGridLoader, GridLoader};
pub use ntv2::{Ntv2Grid, Ntv2SubGrid};

/// Errors raised while decoding a grid file.
#[derive(Error, Debug)]
pub enum GridError {
    /// The file ended before a complete record could be read.
    #[error("truncated grid file: {0}")]
    Truncated(String),

    /// A header record is missing or has an unexpected value.
    #[error("invalid grid header: {0}")]
    InvalidHeader(String),

    /// A data record could not be decoded.
    #[error("invalid grid record at {location}: {message}")]
    InvalidRecord { location: String, message: String },

    /// IO error while reading the file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    pub fn truncated(msg: impl Into<String>) -> Self {
        Self::Truncated(msg.into())
    }

    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    pub fn invalid_record(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl From<GridError> for CrsError {
    fn from(err: GridError) -> Self {
        CrsError::resource_unavailable("grid", err.to_string())
    }
}

/// Most nodes a single grid or sub-grid may declare.
pub const MAX_GRID_NODES: usize = 1 << 24;

/// Nodes along one axis when `extent` is sampled every `step`.
///
/// `None` when the count is not finite or exceeds [`MAX_GRID_NODES`].
pub(crate) fn axis_nodes(extent: f64, step: f64) -> Option<usize> {
    let intervals = (extent / step).round();
    if !intervals.is_finite() || intervals < 0.0 || intervals >= MAX_GRID_NODES as f64 {
        return None;
    }
    (intervals as usize).checked_add(1)
}

/// `columns * rows`, capped at [`MAX_GRID_NODES`].
pub(crate) fn node_count(columns: usize, rows: usize) -> Option<usize> {
    columns.checked_mul(rows).filter(|n| *n <= MAX_GRID_NODES)
}

/// Result type for grid decoding.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_nodes() {
        assert_eq!(axis_nodes(3600.0, 3600.0), Some(2));
        assert_eq!(axis_nodes(1.0, 0.1), Some(11));
        assert_eq!(axis_nodes(3600.0, 1e-300), None);
        assert_eq!(axis_nodes(f64::NAN, 1.0), None);
        assert_eq!(axis_nodes(f64::INFINITY, 1.0), None);
    }

    #[test]
    fn test_node_count() {
        assert_eq!(node_count(2, 2), Some(4));
        assert_eq!(node_count(MAX_GRID_NODES, 2), None);
        assert_eq!(node_count(usize::MAX, usize::MAX), None);
    }
}
