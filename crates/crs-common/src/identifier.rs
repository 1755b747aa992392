//! Identifiers and names published by naming authorities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Naming authorities that publish operation and parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Authority {
    /// EPSG geodetic parameter registry
    Epsg,
    /// Open Geospatial Consortium (WKT 1 names)
    Ogc,
    /// ESRI projection engine names
    Esri,
    /// GeoTIFF key names
    GeoTiff,
    /// PROJ.4 parameter names (`+lat_0`, `+towgs84`, ...)
    Proj4,
    /// Names defined by this library
    Internal,
}

impl Authority {
    /// All authorities, in display order.
    pub const ALL: [Authority; 6] = [
        Authority::Epsg,
        Authority::Ogc,
        Authority::Esri,
        Authority::GeoTiff,
        Authority::Proj4,
        Authority::Internal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Epsg => "EPSG",
            Authority::Ogc => "OGC",
            Authority::Esri => "ESRI",
            Authority::GeoTiff => "GeoTIFF",
            Authority::Proj4 => "PROJ4",
            Authority::Internal => "Internal",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = IdentifierParseError;

    /// Parse an authority name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EPSG" => Ok(Authority::Epsg),
            "OGC" => Ok(Authority::Ogc),
            "ESRI" => Ok(Authority::Esri),
            "GEOTIFF" => Ok(Authority::GeoTiff),
            "PROJ4" | "PROJ" => Ok(Authority::Proj4),
            "INTERNAL" => Ok(Authority::Internal),
            _ => Err(IdentifierParseError::UnknownAuthority(s.to_string())),
        }
    }
}

/// A code assigned to an operation by an authority, e.g. `EPSG:9607`.
///
/// A non-zero `superseded_by` marks the code as deprecated in favour of
/// another code from the same authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationIdentifier {
    pub authority: Authority,
    pub code: String,
    pub superseded_by: u32,
}

impl OperationIdentifier {
    pub fn new(authority: Authority, code: impl Into<String>) -> Self {
        Self {
            authority,
            code: code.into(),
            superseded_by: 0,
        }
    }

    /// Shorthand for an EPSG code.
    pub fn epsg(code: u32) -> Self {
        Self::new(Authority::Epsg, code.to_string())
    }

    /// An identifier replaced by `superseded_by` (0 means not superseded).
    pub fn deprecated(authority: Authority, code: impl Into<String>, superseded_by: u32) -> Self {
        Self {
            authority,
            code: code.into(),
            superseded_by,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.superseded_by != 0
    }

    /// Parse the `AUTHORITY:CODE` form. Authority matching ignores case.
    pub fn parse(s: &str) -> Result<Self, IdentifierParseError> {
        let (authority, code) = s
            .split_once(':')
            .ok_or_else(|| IdentifierParseError::InvalidFormat(s.to_string()))?;
        let code = code.trim();
        if code.is_empty() {
            return Err(IdentifierParseError::InvalidFormat(s.to_string()));
        }
        Ok(Self::new(authority.trim().parse()?, code))
    }

    /// Whether this identifier matches `other` on authority and code, ignoring deprecation.
    pub fn same_code(&self, other: &OperationIdentifier) -> bool {
        self.authority == other.authority && self.code.eq_ignore_ascii_case(&other.code)
    }
}

impl fmt::Display for OperationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// A name in the namespace of an authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedIdentifier {
    pub authority: Authority,
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
}

impl NamedIdentifier {
    pub fn new(authority: Authority, name: impl Into<String>) -> Self {
        Self {
            authority,
            name: name.into(),
            deprecated: false,
        }
    }

    /// A name still recognised on input but no longer emitted.
    pub fn deprecated(authority: Authority, name: impl Into<String>) -> Self {
        Self {
            authority,
            name: name.into(),
            deprecated: true,
        }
    }
}

impl fmt::Display for NamedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentifierParseError {
    #[error("Unknown authority: {0}")]
    UnknownAuthority(String),

    #[error("Expected AUTHORITY:CODE, got '{0}'")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authority() {
        assert_eq!("epsg".parse::<Authority>().unwrap(), Authority::Epsg);
        assert_eq!("GeoTIFF".parse::<Authority>().unwrap(), Authority::GeoTiff);
        assert_eq!("proj".parse::<Authority>().unwrap(), Authority::Proj4);
        assert!("IAU".parse::<Authority>().is_err());
    }

    #[test]
    fn test_deprecated_identifier() {
        let id = OperationIdentifier::deprecated(Authority::Epsg, "9622", 9607);
        assert!(id.is_deprecated());

        let id = OperationIdentifier::deprecated(Authority::Epsg, "9607", 0);
        assert!(!id.is_deprecated());
    }

    #[test]
    fn test_parse_identifier() {
        let id = OperationIdentifier::parse("EPSG:9607").unwrap();
        assert_eq!(id, OperationIdentifier::epsg(9607));
        assert_eq!(id.to_string(), "EPSG:9607");

        let id = OperationIdentifier::parse("esri : Coordinate_Frame").unwrap();
        assert_eq!(id.authority, Authority::Esri);
        assert_eq!(id.code, "Coordinate_Frame");

        assert!(OperationIdentifier::parse("9607").is_err());
        assert!(OperationIdentifier::parse("EPSG:").is_err());
    }
}
