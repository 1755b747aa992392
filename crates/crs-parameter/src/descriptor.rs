//! Descriptors for single operation parameters.
//!
//! A descriptor carries one primary name plus aliases under several naming
//! authorities, the value kind, optional numeric bounds, an optional default
//! and the unit of the value. Descriptors are immutable once built; the
//! [`ParameterDescriptor::select`] operation derives a new descriptor with a
//! different name set but the same bounds, unit and default.

use crs_common::{Authority, CrsError, CrsResult, NamedIdentifier, Unit};
use serde::{Deserialize, Serialize};

use crate::value::ParameterValue;

/// The kind of value a parameter accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    Real,
    Integer,
    Text,
    /// A text value restricted to the listed options (compared ignoring case).
    Choice(Vec<String>),
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Real => "real",
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
            ValueKind::Choice(_) => "choice",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Real | ValueKind::Integer)
    }
}

/// Describes one named, typed and optionally bounded parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: NamedIdentifier,
    aliases: Vec<NamedIdentifier>,
    kind: ValueKind,
    min: Option<f64>,
    max: Option<f64>,
    min_exclusive: bool,
    default: Option<ParameterValue>,
    unit: Unit,
    mandatory: bool,
}

impl ParameterDescriptor {
    /// Start building a real-valued parameter.
    pub fn real(authority: Authority, name: &str) -> ParameterBuilder {
        ParameterBuilder::new(ValueKind::Real, NamedIdentifier::new(authority, name))
    }

    /// Start building an integer-valued parameter.
    pub fn integer(authority: Authority, name: &str) -> ParameterBuilder {
        ParameterBuilder::new(ValueKind::Integer, NamedIdentifier::new(authority, name)).unit(Unit::None)
    }

    /// Start building a free-text parameter (file names and the like).
    pub fn text(authority: Authority, name: &str) -> ParameterBuilder {
        ParameterBuilder::new(ValueKind::Text, NamedIdentifier::new(authority, name)).unit(Unit::None)
    }

    /// Start building a parameter restricted to a fixed set of text values.
    pub fn choice(authority: Authority, name: &str, options: &[&str]) -> ParameterBuilder {
        let options = options.iter().map(|s| s.to_string()).collect();
        ParameterBuilder::new(ValueKind::Choice(options), NamedIdentifier::new(authority, name))
            .unit(Unit::None)
    }

    pub fn name(&self) -> &NamedIdentifier {
        &self.name
    }

    /// The primary name as a plain string.
    pub fn primary_name(&self) -> &str {
        &self.name.name
    }

    pub fn aliases(&self) -> &[NamedIdentifier] {
        &self.aliases
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Whether the lower bound excludes its own value (`base > 0`).
    pub fn is_min_exclusive(&self) -> bool {
        self.min_exclusive
    }

    pub fn default_value(&self) -> Option<&ParameterValue> {
        self.default.as_ref()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Primary name followed by every alias.
    pub fn all_names(&self) -> impl Iterator<Item = &NamedIdentifier> {
        std::iter::once(&self.name).chain(self.aliases.iter())
    }

    /// Exact match against the primary name, then the aliases.
    pub fn is_named(&self, name: &str) -> bool {
        self.all_names().any(|n| n.name == name)
    }

    /// Match ignoring ASCII case.
    pub fn is_named_ignore_case(&self, name: &str) -> bool {
        self.all_names().any(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// The name this parameter carries under `authority`, skipping deprecated names.
    pub fn name_for(&self, authority: Authority) -> Option<&str> {
        self.all_names()
            .find(|n| n.authority == authority && !n.deprecated)
            .map(|n| n.name.as_str())
    }

    /// Derive a descriptor exposing only the listed names.
    ///
    /// Names are taken from this descriptor's family in the order given; the
    /// first becomes the primary name. A name absent from the family is
    /// added under [`Authority::Internal`]. Kind, bounds, unit, default and
    /// the mandatory flag are shared with `self`.
    pub fn select(&self, names: &[&str]) -> ParameterDescriptor {
        let mut selected: Vec<NamedIdentifier> = Vec::with_capacity(names.len());
        for wanted in names {
            if selected.iter().any(|n| n.name == *wanted) {
                continue;
            }
            let found = self
                .all_names()
                .find(|n| n.name == *wanted)
                .cloned()
                .unwrap_or_else(|| NamedIdentifier::new(Authority::Internal, *wanted));
            selected.push(found);
        }

        if selected.is_empty() {
            return self.clone();
        }

        let name = selected.remove(0);
        ParameterDescriptor {
            name,
            aliases: selected,
            ..self.clone()
        }
    }

    /// Same bounds and unit under a new primary name, without aliases.
    pub fn renamed(&self, authority: Authority, name: &str) -> ParameterDescriptor {
        ParameterDescriptor {
            name: NamedIdentifier::new(authority, name),
            aliases: Vec::new(),
            ..self.clone()
        }
    }

    /// Add one alias to a copy of this descriptor.
    pub fn with_alias(&self, authority: Authority, name: &str) -> ParameterDescriptor {
        let mut copy = self.clone();
        if !copy.is_named(name) {
            copy.aliases.push(NamedIdentifier::new(authority, name));
        }
        copy
    }

    /// A copy that may be left unset without falling back to a default.
    pub fn optional(&self) -> ParameterDescriptor {
        ParameterDescriptor {
            mandatory: false,
            default: None,
            ..self.clone()
        }
    }

    /// A copy with another default value, validated against kind and bounds.
    pub fn with_default(&self, value: impl Into<ParameterValue>) -> CrsResult<ParameterDescriptor> {
        let mut copy = self.clone();
        copy.default = Some(copy.validate(value.into())?);
        Ok(copy)
    }

    /// A copy without default value.
    pub fn without_default(&self) -> ParameterDescriptor {
        ParameterDescriptor {
            default: None,
            ..self.clone()
        }
    }

    /// Check `value` against the kind and bounds, returning its normalized form.
    ///
    /// Integers are accepted by real parameters. Reals with no fractional
    /// part are accepted by integer parameters. Choice values are returned
    /// with the spelling of the matching option.
    pub fn validate(&self, value: ParameterValue) -> CrsResult<ParameterValue> {
        let value = match (&self.kind, value) {
            (ValueKind::Real, ParameterValue::Real(v)) => ParameterValue::Real(v),
            (ValueKind::Real, ParameterValue::Integer(v)) => ParameterValue::Real(v as f64),
            (ValueKind::Integer, ParameterValue::Integer(v)) => ParameterValue::Integer(v),
            (ValueKind::Integer, ParameterValue::Real(v)) if v.fract() == 0.0 && v.is_finite() => {
                ParameterValue::Integer(v as i64)
            }
            (ValueKind::Text, ParameterValue::Text(s)) => ParameterValue::Text(s),
            (ValueKind::Choice(options), ParameterValue::Text(s)) => {
                match options.iter().find(|o| o.eq_ignore_ascii_case(&s)) {
                    Some(option) => ParameterValue::Text(option.clone()),
                    None => {
                        return Err(CrsError::invalid_value(
                            self.primary_name(),
                            format!("'{}' is not one of {:?}", s, options),
                        ))
                    }
                }
            }
            (kind, other) => {
                return Err(CrsError::InvalidParameterType {
                    name: self.primary_name().to_string(),
                    expected: kind.as_str(),
                    actual: other.kind_name(),
                })
            }
        };

        if let Some(v) = value.as_f64() {
            if v.is_nan() {
                return Err(CrsError::invalid_value(self.primary_name(), "value is NaN"));
            }
            if !self.in_range(v) {
                return Err(match self.min {
                    Some(min) if self.min_exclusive => {
                        CrsError::out_of_open_range(self.primary_name(), v, min, self.max)
                    }
                    _ => CrsError::out_of_range(self.primary_name(), v, self.min, self.max),
                });
            }
        }
        Ok(value)
    }

    /// Parse a textual value according to the parameter kind.
    pub fn parse_value(&self, text: &str) -> CrsResult<ParameterValue> {
        let text = text.trim();
        let value = match self.kind {
            ValueKind::Real => text
                .parse::<f64>()
                .map(ParameterValue::Real)
                .map_err(|_| CrsError::invalid_value(self.primary_name(), format!("'{}' is not a number", text)))?,
            ValueKind::Integer => text
                .parse::<i64>()
                .map(ParameterValue::Integer)
                .map_err(|_| CrsError::invalid_value(self.primary_name(), format!("'{}' is not an integer", text)))?,
            ValueKind::Text | ValueKind::Choice(_) => ParameterValue::Text(text.to_string()),
        };
        self.validate(value)
    }

    fn in_range(&self, v: f64) -> bool {
        let above_min = match self.min {
            Some(min) if self.min_exclusive => v > min,
            Some(min) => v >= min,
            None => true,
        };
        let below_max = self.max.map_or(true, |max| v <= max);
        above_min && below_max
    }
}

/// Builder for [`ParameterDescriptor`].
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    descriptor: ParameterDescriptor,
}

impl ParameterBuilder {
    fn new(kind: ValueKind, name: NamedIdentifier) -> Self {
        Self {
            descriptor: ParameterDescriptor {
                name,
                aliases: Vec::new(),
                kind,
                min: None,
                max: None,
                min_exclusive: false,
                default: None,
                unit: Unit::Unity,
                mandatory: true,
            },
        }
    }

    pub fn alias(mut self, authority: Authority, name: &str) -> Self {
        if !self.descriptor.is_named(name) {
            self.descriptor.aliases.push(NamedIdentifier::new(authority, name));
        }
        self
    }

    /// An alias accepted on lookup but never reported by [`ParameterDescriptor::name_for`].
    pub fn deprecated_alias(mut self, authority: Authority, name: &str) -> Self {
        if !self.descriptor.is_named(name) {
            self.descriptor
                .aliases
                .push(NamedIdentifier::deprecated(authority, name));
        }
        self
    }

    /// Inclusive range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.descriptor.min = Some(min);
        self.descriptor.max = Some(max);
        self.descriptor.min_exclusive = false;
        self
    }

    /// Strict lower bound, no upper bound.
    pub fn greater_than(mut self, min: f64) -> Self {
        self.descriptor.min = Some(min);
        self.descriptor.max = None;
        self.descriptor.min_exclusive = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<ParameterValue>) -> Self {
        self.descriptor.default = Some(value.into());
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.descriptor.unit = unit;
        self
    }

    pub fn optional(mut self) -> Self {
        self.descriptor.mandatory = false;
        self
    }

    /// Validate and return the descriptor.
    ///
    /// The default, when present, must conform to the kind and lie within the bounds.
    pub fn build(self) -> CrsResult<ParameterDescriptor> {
        let mut descriptor = self.descriptor;
        if let (Some(min), Some(max)) = (descriptor.min, descriptor.max) {
            if min > max {
                return Err(CrsError::invalid_value(
                    descriptor.primary_name(),
                    format!("minimum {} exceeds maximum {}", min, max),
                ));
            }
        }
        if !descriptor.kind.is_numeric() && (descriptor.min.is_some() || descriptor.max.is_some()) {
            return Err(CrsError::invalid_value(
                descriptor.primary_name(),
                "bounds are only allowed on numeric parameters",
            ));
        }
        if let Some(default) = descriptor.default.take() {
            descriptor.default = Some(descriptor.validate(default)?);
        }
        Ok(descriptor)
    }
}
