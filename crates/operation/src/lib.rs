//! Coordinate-operation providers and the registry that finds them.
//!
//! ```text
//! OperationRegistry ──find("EPSG:9607")──► Arc<dyn TransformProvider>
//!                                             │ descriptor() ─► ParameterGroupDescriptor
//!                                             │ create_value() ─► ParameterValueGroup
//!                                             └ create_transform(values)
//!                                                  └► ProvidedTransform { transform, method }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use operation::{OperationRegistry, RegistryConfig};
//!
//! let registry = OperationRegistry::new(RegistryConfig::from_env())?;
//! let provider = registry.find("Longitude rotation")?;
//! let values = provider.create_value().with("Longitude offset", 2.337229)?;
//! let provided = provider.create_transform(&values)?;
//! let paris = provided.transform.transform(&[0.0, 48.8])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod provider;
pub mod providers;
pub mod registry;

pub use config::{ConfigError, RegistryConfig};
pub use provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};
pub use providers::BursaWolfFill;
pub use registry::{OperationRegistry, RegistryError};
