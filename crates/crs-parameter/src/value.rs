//! Parameter values and value groups.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult};
use serde::{Deserialize, Serialize};

use crate::descriptor::ParameterDescriptor;
use crate::group::ParameterGroupDescriptor;

/// A concrete parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ParameterValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::Real(_) => "real",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Text(_) => "text",
        }
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Real(v) => Some(*v),
            ParameterValue::Integer(v) => Some(*v as f64),
            ParameterValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Real(v) => write!(f, "{}", v),
            ParameterValue::Integer(v) => write!(f, "{}", v),
            ParameterValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Real(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Integer(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Integer(v as i64)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::Text(v)
    }
}

/// Values bound to a [`ParameterGroupDescriptor`].
///
/// Only explicitly supplied values are stored. Defaults are resolved when a
/// value is read, never when the group is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValueGroup {
    descriptor: Arc<ParameterGroupDescriptor>,
    /// Keyed by the parameter's index in the descriptor.
    values: BTreeMap<usize, ParameterValue>,
}

impl ParameterValueGroup {
    pub fn new(descriptor: Arc<ParameterGroupDescriptor>) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        &self.descriptor
    }

    /// Set a value by primary name or alias, validating kind and bounds.
    pub fn set(&mut self, name: &str, value: impl Into<ParameterValue>) -> CrsResult<&mut Self> {
        let index = self.descriptor.index_of(name)?;
        let param = &self.descriptor.parameters()[index];
        let value = param.validate(value.into())?;
        self.values.insert(index, value);
        Ok(self)
    }

    /// Consuming variant of [`set`](Self::set) for chained construction.
    pub fn with(mut self, name: &str, value: impl Into<ParameterValue>) -> CrsResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Parse `text` with the parameter's kind, then set it.
    pub fn set_text(&mut self, name: &str, text: &str) -> CrsResult<&mut Self> {
        let index = self.descriptor.index_of(name)?;
        let value = self.descriptor.parameters()[index].parse_value(text)?;
        self.values.insert(index, value);
        Ok(self)
    }

    /// Remove an explicit value so the default applies again.
    pub fn unset(&mut self, name: &str) -> CrsResult<Option<ParameterValue>> {
        let index = self.descriptor.index_of(name)?;
        Ok(self.values.remove(&index))
    }

    pub fn is_explicit(&self, name: &str) -> CrsResult<bool> {
        let index = self.descriptor.index_of(name)?;
        Ok(self.values.contains_key(&index))
    }

    /// The explicit value, or the default, or `None` when neither exists.
    pub fn value(&self, name: &str) -> CrsResult<Option<ParameterValue>> {
        let index = self.descriptor.index_of(name)?;
        Ok(self.resolve(index).cloned())
    }

    /// A real value; missing without default is `ParameterNotFound`.
    pub fn real(&self, name: &str) -> CrsResult<f64> {
        let (param, value) = self.required(name)?;
        value.as_f64().ok_or_else(|| CrsError::InvalidParameterType {
            name: param.primary_name().to_string(),
            expected: "real",
            actual: value.kind_name(),
        })
    }

    /// A real value that may legitimately be absent.
    pub fn optional_real(&self, name: &str) -> CrsResult<Option<f64>> {
        match self.value(name)? {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| CrsError::InvalidParameterType {
                name: name.to_string(),
                expected: "real",
                actual: v.kind_name(),
            }),
        }
    }

    pub fn integer(&self, name: &str) -> CrsResult<i64> {
        let (param, value) = self.required(name)?;
        value.as_i64().ok_or_else(|| CrsError::InvalidParameterType {
            name: param.primary_name().to_string(),
            expected: "integer",
            actual: value.kind_name(),
        })
    }

    pub fn text(&self, name: &str) -> CrsResult<String> {
        let (param, value) = self.required(name)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CrsError::InvalidParameterType {
                name: param.primary_name().to_string(),
                expected: "text",
                actual: value.kind_name(),
            })
    }

    /// Explicit values in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterDescriptor, &ParameterValue)> {
        self.values
            .iter()
            .map(|(index, value)| (&self.descriptor.parameters()[*index], value))
    }

    /// Every parameter with its effective value (explicit or default), in descriptor order.
    pub fn resolved(&self) -> Vec<(&ParameterDescriptor, Option<&ParameterValue>)> {
        self.descriptor
            .parameters()
            .iter()
            .enumerate()
            .map(|(index, param)| (param, self.resolve(index)))
            .collect()
    }

    /// Fail on the first mandatory parameter that has neither a value nor a default.
    pub fn check_mandatory(&self) -> CrsResult<()> {
        for (index, param) in self.descriptor.parameters().iter().enumerate() {
            if param.is_mandatory() && self.resolve(index).is_none() {
                return Err(CrsError::parameter_not_found(
                    param.primary_name(),
                    self.descriptor.primary_name(),
                ));
            }
        }
        Ok(())
    }

    fn resolve(&self, index: usize) -> Option<&ParameterValue> {
        self.values
            .get(&index)
            .or_else(|| self.descriptor.parameters()[index].default_value())
    }

    fn required(&self, name: &str) -> CrsResult<(&ParameterDescriptor, &ParameterValue)> {
        let index = self.descriptor.index_of(name)?;
        let param = &self.descriptor.parameters()[index];
        let value = self.resolve(index).ok_or_else(|| {
            CrsError::parameter_not_found(param.primary_name(), self.descriptor.primary_name())
        })?;
        Ok((param, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::{Authority, OperationIdentifier, Unit};

    fn longitude_rotation() -> Arc<ParameterGroupDescriptor> {
        let offset = ParameterDescriptor::real(Authority::Epsg, "Longitude offset")
            .alias(Authority::Ogc, "offset")
            .range(-180.0, 180.0)
            .unit(Unit::Degree)
            .build()
            .unwrap();
        let scale = ParameterDescriptor::real(Authority::Internal, "scale")
            .default_value(1.0)
            .build()
            .unwrap();
        Arc::new(
            ParameterGroupDescriptor::builder(Authority::Epsg, "Longitude rotation")
                .identifier(OperationIdentifier::epsg(9601))
                .dimensions(2, 2)
                .parameter(offset)
                .parameter(scale)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_missing_mandatory_without_default() {
        let group = ParameterValueGroup::new(longitude_rotation());
        let err = group.real("offset").unwrap_err();
        assert!(matches!(err, CrsError::ParameterNotFound { .. }));
        assert!(group.check_mandatory().is_err());
    }

    #[test]
    fn test_lazy_default() {
        let mut group = ParameterValueGroup::new(longitude_rotation());
        assert!(!group.is_explicit("scale").unwrap());
        assert_eq!(group.real("scale").unwrap(), 1.0);
        assert_eq!(group.iter().count(), 0);

        group.set("scale", 2.0).unwrap();
        assert_eq!(group.real("scale").unwrap(), 2.0);
        group.unset("scale").unwrap();
        assert_eq!(group.real("scale").unwrap(), 1.0);
    }

    #[test]
    fn test_set_by_alias() {
        let group = ParameterValueGroup::new(longitude_rotation())
            .with("offset", 30.0)
            .unwrap();
        assert_eq!(group.real("Longitude offset").unwrap(), 30.0);
        let (param, value) = group.iter().next().unwrap();
        assert_eq!(param.primary_name(), "Longitude offset");
        assert_eq!(value, &ParameterValue::Real(30.0));
    }

    #[test]
    fn test_set_out_of_range_keeps_previous() {
        let mut group = ParameterValueGroup::new(longitude_rotation());
        group.set("offset", 10.0).unwrap();
        assert!(group.set("offset", 400.0).is_err());
        assert_eq!(group.real("offset").unwrap(), 10.0);
    }

    #[test]
    fn test_unknown_parameter() {
        let mut group = ParameterValueGroup::new(longitude_rotation());
        let err = group.set("dx", 1.0).unwrap_err();
        assert!(matches!(err, CrsError::ParameterNotFound { .. }));
    }

    #[test]
    fn test_text_accessor_type_mismatch() {
        let group = ParameterValueGroup::new(longitude_rotation())
            .with("offset", 1.0)
            .unwrap();
        assert!(matches!(
            group.text("offset"),
            Err(CrsError::InvalidParameterType { .. })
        ));
    }

    #[test]
    fn test_resolved_lists_all_parameters() {
        let group = ParameterValueGroup::new(longitude_rotation());
        let resolved = group.resolved();
        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].1.is_none());
        assert_eq!(resolved[1].1, Some(&ParameterValue::Real(1.0)));
    }
}
