//! Parameter group descriptors: the parameter list of one coordinate operation.

use std::sync::Arc;

use crs_common::{Authority, CrsError, CrsResult, NamedIdentifier, OperationIdentifier};

use crate::descriptor::ParameterDescriptor;
use crate::value::ParameterValueGroup;

/// The identifiers, names, parameters and dimensions of one operation method.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroupDescriptor {
    name: NamedIdentifier,
    aliases: Vec<NamedIdentifier>,
    identifiers: Vec<OperationIdentifier>,
    parameters: Vec<ParameterDescriptor>,
    source_dimensions: usize,
    target_dimensions: usize,
}

impl ParameterGroupDescriptor {
    pub fn builder(authority: Authority, name: &str) -> GroupBuilder {
        GroupBuilder {
            group: ParameterGroupDescriptor {
                name: NamedIdentifier::new(authority, name),
                aliases: Vec::new(),
                identifiers: Vec::new(),
                parameters: Vec::new(),
                source_dimensions: 2,
                target_dimensions: 2,
            },
        }
    }

    pub fn name(&self) -> &NamedIdentifier {
        &self.name
    }

    pub fn primary_name(&self) -> &str {
        &self.name.name
    }

    pub fn aliases(&self) -> &[NamedIdentifier] {
        &self.aliases
    }

    pub fn identifiers(&self) -> &[OperationIdentifier] {
        &self.identifiers
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn source_dimensions(&self) -> usize {
        self.source_dimensions
    }

    pub fn target_dimensions(&self) -> usize {
        self.target_dimensions
    }

    /// The first identifier that is not deprecated.
    pub fn canonical_identifier(&self) -> Option<&OperationIdentifier> {
        self.identifiers.iter().find(|id| !id.is_deprecated())
    }

    /// The first non-deprecated identifier under `authority`.
    pub fn identifier(&self, authority: Authority) -> Option<&OperationIdentifier> {
        self.identifiers
            .iter()
            .find(|id| id.authority == authority && !id.is_deprecated())
    }

    /// Primary name followed by every alias.
    pub fn all_names(&self) -> impl Iterator<Item = &NamedIdentifier> {
        std::iter::once(&self.name).chain(self.aliases.iter())
    }

    /// Exact match against the primary name, then the aliases.
    pub fn is_named(&self, name: &str) -> bool {
        self.all_names().any(|n| n.name == name)
    }

    /// Index of the parameter called `name`.
    ///
    /// Exact primary names are tried first across all parameters, then exact
    /// aliases, then both again ignoring ASCII case.
    pub fn index_of(&self, name: &str) -> CrsResult<usize> {
        let passes: [&dyn Fn(&ParameterDescriptor) -> bool; 3] = [
            &|p| p.primary_name() == name,
            &|p| p.is_named(name),
            &|p| p.is_named_ignore_case(name),
        ];
        for matches in passes {
            if let Some(index) = self.parameters.iter().position(|p| matches(p)) {
                return Ok(index);
            }
        }
        Err(CrsError::parameter_not_found(name, self.primary_name()))
    }

    /// The descriptor of the parameter called `name`.
    pub fn descriptor(&self, name: &str) -> CrsResult<&ParameterDescriptor> {
        self.index_of(name).map(|i| &self.parameters[i])
    }

    /// An empty value group bound to this descriptor.
    pub fn create_value(self: &Arc<Self>) -> ParameterValueGroup {
        ParameterValueGroup::new(Arc::clone(self))
    }

    /// A copy of this descriptor declaring other dimensions, used for dimension variants.
    pub fn with_dimensions(&self, source: usize, target: usize) -> ParameterGroupDescriptor {
        ParameterGroupDescriptor {
            source_dimensions: source,
            target_dimensions: target,
            ..self.clone()
        }
    }
}

/// Builder for [`ParameterGroupDescriptor`].
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    group: ParameterGroupDescriptor,
}

impl GroupBuilder {
    pub fn identifier(mut self, id: OperationIdentifier) -> Self {
        self.group.identifiers.push(id);
        self
    }

    pub fn alias(mut self, authority: Authority, name: &str) -> Self {
        if !self.group.is_named(name) {
            self.group.aliases.push(NamedIdentifier::new(authority, name));
        }
        self
    }

    pub fn deprecated_alias(mut self, authority: Authority, name: &str) -> Self {
        if !self.group.is_named(name) {
            self.group.aliases.push(NamedIdentifier::deprecated(authority, name));
        }
        self
    }

    pub fn dimensions(mut self, source: usize, target: usize) -> Self {
        self.group.source_dimensions = source;
        self.group.target_dimensions = target;
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.group.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.group.parameters.extend(parameters);
        self
    }

    /// Validate and return the group.
    ///
    /// Two parameters may not share a name, and dimensions must be non-zero.
    pub fn build(self) -> CrsResult<ParameterGroupDescriptor> {
        let group = self.group;
        if group.source_dimensions == 0 || group.target_dimensions == 0 {
            return Err(CrsError::unsupported(format!(
                "{} declares zero dimensions",
                group.primary_name()
            )));
        }
        for (i, param) in group.parameters.iter().enumerate() {
            for other in &group.parameters[i + 1..] {
                if let Some(clash) = param.all_names().find(|n| other.is_named(&n.name)) {
                    return Err(CrsError::unsupported(format!(
                        "{}: parameters '{}' and '{}' share the name '{}'",
                        group.primary_name(),
                        param.primary_name(),
                        other.primary_name(),
                        clash.name
                    )));
                }
            }
        }
        Ok(group)
    }
}
