//! Common types shared by the coordinate-operation crates.

pub mod ellipsoid;
pub mod error;
pub mod identifier;
pub mod units;

pub use ellipsoid::Ellipsoid;
pub use error::{CrsError, CrsResult};
pub use identifier::{Authority, IdentifierParseError, NamedIdentifier, OperationIdentifier};
pub use units::Unit;
