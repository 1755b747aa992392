//! Coordinate transforms: map projections, datum shifts and the affine and
//! transfer-function steps used to chain them.
//!
//! Every transform implements [`MathTransform`] and is shared as
//! `Arc<dyn MathTransform>`. Geographic coordinates are (longitude, latitude)
//! in degrees, optionally followed by ellipsoidal height in metres.

pub mod affine;
pub mod geocentric;
pub mod geocentric_interpolation;
pub mod grid;
pub mod grid_shift;
pub mod helmert;
pub mod lambert;
pub mod map;
pub mod orthographic;
pub mod polyconic;
pub mod solve;
pub mod stereographic;
pub mod transfer;
pub mod transform;

pub use affine::AffineTransform;
pub use geocentric::GeocentricTransform;
pub use geocentric_interpolation::{GeocentricInterpolationTransform, RGF93_GRID_FILE};
pub use grid::{FileGridLoader, GeocentricGrid, GridLoader, Ntv2Grid};
pub use grid_shift::Ntv2Transform;
pub use helmert::{BursaWolfParameters, HelmertTransform};
pub use lambert::LambertConformal;
pub use map::{MapProjection, ProjectionParameters, ProjectionTransform};
pub use orthographic::Orthographic;
pub use polyconic::Polyconic;
pub use stereographic::{PolarStereographic, Stereographic};
pub use transfer::{TransferFunction, TransferKind};
pub use transform::{concatenate, ConcatenatedTransform, MathTransform};
