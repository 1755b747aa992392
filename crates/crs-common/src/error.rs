//! Error types shared by the parameter, transform and operation crates.

use thiserror::Error;

/// Result type alias using CrsError.
pub type CrsResult<T> = Result<T, CrsError>;

/// Primary error type for coordinate operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrsError {
    // === Parameter Errors ===
    #[error("Parameter not found: '{name}' in group '{group}'")]
    ParameterNotFound { name: String, group: String },

    #[error(
        "Value {value} of parameter '{name}' is outside the range {}",
        describe_range(.min, .max, .min_exclusive, .excluded)
    )]
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
        min_exclusive: bool,
        /// A single value inside the bounds that is still not allowed.
        excluded: Option<f64>,
    },

    #[error("Parameter '{name}' expects a {expected} value, got {actual}")]
    InvalidParameterType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameterValue { name: String, message: String },

    // === Resource Errors ===
    #[error("Cannot read resource '{resource}': {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    // === Operation Errors ===
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("No coordinate operation registered for '{0}'")]
    OperationNotFound(String),

    #[error("Transform error: {0}")]
    Transform(String),
}

/// Interval notation, e.g. `(0, inf)` or `[-180, 180]`.
fn describe_range(min: &f64, max: &f64, min_exclusive: &bool, excluded: &Option<f64>) -> String {
    let open = if *min_exclusive || min.is_infinite() { '(' } else { '[' };
    let close = if max.is_infinite() { ')' } else { ']' };
    let mut text = format!("{}{}, {}{}", open, min, max, close);
    if let Some(point) = excluded {
        text.push_str(&format!(" excluding {}", point));
    }
    text
}

impl CrsError {
    /// Create a ParameterNotFound error.
    pub fn parameter_not_found(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::ParameterNotFound {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Create a ParameterOutOfRange error. Unbounded sides are reported as infinities.
    pub fn out_of_range(name: impl Into<String>, value: f64, min: Option<f64>, max: Option<f64>) -> Self {
        Self::ParameterOutOfRange {
            name: name.into(),
            value,
            min: min.unwrap_or(f64::NEG_INFINITY),
            max: max.unwrap_or(f64::INFINITY),
            min_exclusive: false,
            excluded: None,
        }
    }

    /// Create a ParameterOutOfRange error for a range whose minimum is excluded.
    pub fn out_of_open_range(name: impl Into<String>, value: f64, min: f64, max: Option<f64>) -> Self {
        Self::ParameterOutOfRange {
            name: name.into(),
            value,
            min,
            max: max.unwrap_or(f64::INFINITY),
            min_exclusive: true,
            excluded: None,
        }
    }

    /// Mark `point` as disallowed inside the reported range.
    pub fn excluding(self, point: f64) -> Self {
        match self {
            Self::ParameterOutOfRange {
                name,
                value,
                min,
                max,
                min_exclusive,
                ..
            } => Self::ParameterOutOfRange {
                name,
                value,
                min,
                max,
                min_exclusive,
                excluded: Some(point),
            },
            other => other,
        }
    }

    /// Create an InvalidParameterValue error.
    pub fn invalid_value(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a ResourceUnavailable error.
    pub fn resource_unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedConfiguration error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(msg.into())
    }

    /// Create a Transform error.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Short machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            CrsError::ParameterNotFound { .. } => "ParameterNotFound",
            CrsError::ParameterOutOfRange { .. } => "ParameterOutOfRange",
            CrsError::InvalidParameterType { .. } => "InvalidParameterType",
            CrsError::InvalidParameterValue { .. } => "InvalidParameterValue",
            CrsError::ResourceUnavailable { .. } => "ResourceUnavailable",
            CrsError::UnsupportedConfiguration(_) => "UnsupportedConfiguration",
            CrsError::OperationNotFound(_) => "OperationNotFound",
            CrsError::Transform(_) => "TransformFailure",
        }
    }

    /// Whether a caller may reasonably retry with a different input or resource.
    ///
    /// Only resource failures qualify; everything else is a defect in the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CrsError::ResourceUnavailable { .. })
    }
}

impl From<std::io::Error> for CrsError {
    fn from(err: std::io::Error) -> Self {
        CrsError::ResourceUnavailable {
            resource: String::from("<io>"),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CrsError::parameter_not_found("offset", "Longitude rotation").code(),
            "ParameterNotFound"
        );
        assert_eq!(CrsError::unsupported("dim=4").code(), "UnsupportedConfiguration");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = CrsError::out_of_range("base", -5.0, Some(0.0), None);
        let msg = err.to_string();
        assert!(msg.contains("base"));
        assert!(msg.contains("-5"));
        assert!(msg.contains("inf"));
    }

    #[test]
    fn test_range_notation() {
        let closed = CrsError::out_of_range("Longitude offset", 200.0, Some(-180.0), Some(180.0));
        assert!(closed.to_string().ends_with("[-180, 180]"), "{}", closed);

        let open = CrsError::out_of_open_range("base", 0.0, 0.0, None);
        assert!(open.to_string().ends_with("(0, inf)"), "{}", open);

        let one = CrsError::out_of_open_range("base", 1.0, 0.0, None).excluding(1.0);
        assert!(one.to_string().ends_with("(0, inf) excluding 1"), "{}", one);
        assert_eq!(one.code(), "ParameterOutOfRange");
    }

    #[test]
    fn test_only_resources_are_recoverable() {
        assert!(CrsError::resource_unavailable("ntv2_0.gsb", "missing").is_recoverable());
        assert!(!CrsError::parameter_not_found("dx", "Helmert").is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CrsError = io.into();
        assert!(matches!(err, CrsError::ResourceUnavailable { .. }));
    }
}
