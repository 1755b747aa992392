//! Parameter descriptors and value groups for coordinate operations.
//!
//! ```text
//! ParameterGroupDescriptor ──create_value()──► ParameterValueGroup
//!   ├─ identifiers (EPSG:9607, ...)               ├─ explicit values only
//!   ├─ names + aliases per authority              └─ defaults resolved on read
//!   └─ ParameterDescriptor × n
//!        ├─ kind, bounds, unit, default
//!        └─ select(names) → same bounds, other names
//! ```

pub mod descriptor;
pub mod group;
pub mod universal;
pub mod value;

pub use descriptor::{ParameterBuilder, ParameterDescriptor, ValueKind};
pub use group::{GroupBuilder, ParameterGroupDescriptor};
pub use value::{ParameterValue, ParameterValueGroup};
