//! The operation registry: every provider indexed by name and code.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult, OperationIdentifier};
use crs_parameter::ParameterValueGroup;
use projection::{FileGridLoader, GridLoader};
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, RegistryConfig};
use crate::provider::{ProvidedTransform, TransformProvider};
use crate::providers;

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build provider: {0}")]
    Provider(#[from] CrsError),
}

#[derive(Debug, Clone)]
struct IndexEntry {
    /// The name or `AUTHORITY:CODE` as published.
    key: String,
    provider: usize,
    deprecated: bool,
}

/// Immutable set of transform providers, built once and shared by reference.
///
/// Lookup keys are operation names, aliases under any authority and
/// `AUTHORITY:CODE` identifiers. Exact spelling wins over a match that
/// ignores case. Deprecated names and codes only match when the
/// configuration allows them or through
/// [`find_including_deprecated`](Self::find_including_deprecated).
pub struct OperationRegistry {
    config: RegistryConfig,
    providers: Vec<Arc<dyn TransformProvider>>,
    /// Keyed by lower-cased name or identifier.
    index: HashMap<String, Vec<IndexEntry>>,
}

impl OperationRegistry {
    /// Build the built-in providers with a file grid loader from `config`.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        let loader = FileGridLoader::new(config.grid_directories.clone(), config.cache_capacity()?);
        Self::with_loader(config, Arc::new(loader))
    }

    /// Build the built-in providers around an injected grid loader.
    pub fn with_loader(config: RegistryConfig, loader: Arc<dyn GridLoader>) -> Result<Self, RegistryError> {
        config.validate()?;
        let providers = providers::builtin(loader)?;
        Ok(Self::with_providers(config, providers))
    }

    /// Index an explicit provider list. Earlier providers win key collisions.
    pub fn with_providers(config: RegistryConfig, providers: Vec<Arc<dyn TransformProvider>>) -> Self {
        let mut index: HashMap<String, Vec<IndexEntry>> = HashMap::new();
        for (position, provider) in providers.iter().enumerate() {
            let group = provider.descriptor();
            let names = group.all_names().map(|n| (n.name.clone(), n.deprecated));
            let codes = group
                .identifiers()
                .iter()
                .map(|id| (id.to_string(), id.is_deprecated()));
            for (key, deprecated) in names.chain(codes) {
                let entries = index.entry(key.to_lowercase()).or_default();
                if entries.iter().any(|e| e.provider == position && e.key == key) {
                    continue;
                }
                if let Some(existing) = entries.iter().find(|e| e.provider != position) {
                    debug!(
                        key = %key,
                        kept = providers[existing.provider].name(),
                        shadowed = provider.name(),
                        "Operation key registered twice"
                    );
                }
                entries.push(IndexEntry {
                    key,
                    provider: position,
                    deprecated,
                });
            }
        }

        debug!(
            providers = providers.len(),
            keys = index.len(),
            include_deprecated = config.include_deprecated,
            "Built operation registry"
        );
        Self {
            config,
            providers,
            index,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Providers in registration order.
    pub fn providers(&self) -> &[Arc<dyn TransformProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Find a provider by name, alias or `AUTHORITY:CODE`.
    pub fn find(&self, name: &str) -> CrsResult<Arc<dyn TransformProvider>> {
        self.lookup(name, self.config.include_deprecated)
    }

    /// Like [`find`](Self::find), also matching deprecated names and codes.
    pub fn find_including_deprecated(&self, name: &str) -> CrsResult<Arc<dyn TransformProvider>> {
        self.lookup(name, true)
    }

    /// Find the provider called `name` and create a transform from `values`.
    pub fn create_transform(&self, name: &str, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.find(name)?.create_transform(values)
    }

    fn lookup(&self, name: &str, include_deprecated: bool) -> CrsResult<Arc<dyn TransformProvider>> {
        let key = normalize_key(name);
        let candidates: Vec<&IndexEntry> = self
            .index
            .get(&key.to_lowercase())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| include_deprecated || !e.deprecated)
                    .collect()
            })
            .unwrap_or_default();

        candidates
            .iter()
            .find(|e| e.key == key)
            .or_else(|| candidates.first())
            .map(|e| Arc::clone(&self.providers[e.provider]))
            .ok_or_else(|| CrsError::OperationNotFound(name.to_string()))
    }
}

/// Trim, and spell `authority:code` the way identifiers are indexed.
fn normalize_key(name: &str) -> String {
    let name = name.trim();
    match OperationIdentifier::parse(name) {
        Ok(id) => id.to_string(),
        Err(_) => name.to_string(),
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("config", &self.config)
            .field("providers", &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" epsg:9607 "), "EPSG:9607");
        assert_eq!(normalize_key("Longitude rotation"), "Longitude rotation");
        assert_eq!(normalize_key("unknown:thing"), "unknown:thing");
    }

    #[test]
    fn test_empty_registry() {
        let registry = OperationRegistry::with_providers(RegistryConfig::default(), Vec::new());
        assert!(registry.is_empty());
        let err = registry.find("Affine").unwrap_err();
        assert_eq!(err.code(), "OperationNotFound");
    }
}
