//! Tests for parameter lookup and value groups built from shared templates.

use std::sync::Arc;

use crs_common::{Authority, CrsError, OperationIdentifier};
use crs_parameter::{universal, ParameterGroupDescriptor, ParameterValue, ParameterValueGroup};

fn lambert_2sp() -> Arc<ParameterGroupDescriptor> {
    let group = ParameterGroupDescriptor::builder(Authority::Epsg, "Lambert Conic Conformal (2SP)")
        .identifier(OperationIdentifier::epsg(9802))
        .alias(Authority::Ogc, "Lambert_Conformal_Conic_2SP")
        .parameter(universal::semi_major().unwrap())
        .parameter(universal::semi_minor().unwrap())
        .parameter(
            universal::latitude_of_origin()
                .unwrap()
                .select(&["latitude_of_origin", "Latitude of false origin", "lat_0"]),
        )
        .parameter(
            universal::central_meridian()
                .unwrap()
                .select(&["central_meridian", "Longitude of false origin", "lon_0"]),
        )
        .parameter(universal::standard_parallel_1().unwrap())
        .parameter(universal::standard_parallel_2().unwrap())
        .parameter(
            universal::false_easting()
                .unwrap()
                .select(&["false_easting", "Easting at false origin", "x_0"]),
        )
        .parameter(
            universal::false_northing()
                .unwrap()
                .select(&["false_northing", "Northing at false origin", "y_0"]),
        )
        .build()
        .unwrap();
    Arc::new(group)
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_lookup_by_each_authority() {
    let group = lambert_2sp();
    for name in ["latitude_of_origin", "Latitude of false origin", "lat_0"] {
        assert_eq!(group.descriptor(name).unwrap().primary_name(), "latitude_of_origin");
    }
    assert_eq!(group.descriptor("a").unwrap().primary_name(), "semi_major");
    assert_eq!(group.descriptor("StdParallel2").unwrap().primary_name(), "standard_parallel_2");
}

#[test]
fn test_names_dropped_by_select_are_not_found() {
    let group = lambert_2sp();
    assert!(matches!(
        group.descriptor("NatOriginLat"),
        Err(CrsError::ParameterNotFound { .. })
    ));
}

#[test]
fn test_parameter_order_preserved() {
    let names: Vec<_> = lambert_2sp()
        .parameters()
        .iter()
        .map(|p| p.primary_name().to_string())
        .collect();
    assert_eq!(names[0], "semi_major");
    assert_eq!(names[7], "false_northing");
}

// ============================================================================
// Value groups
// ============================================================================

#[test]
fn test_values_resolve_defaults_lazily() {
    let values = lambert_2sp()
        .create_value()
        .with("semi_major", 6378137.0)
        .unwrap()
        .with("b", 6356752.314)
        .unwrap()
        .with("lat_1", 33.0)
        .unwrap();

    assert_eq!(values.real("false_easting").unwrap(), 0.0);
    assert_eq!(values.optional_real("standard_parallel_2").unwrap(), None);
    assert_eq!(values.iter().count(), 3);
}

#[test]
fn test_missing_semi_axis_is_parameter_not_found() {
    let values = lambert_2sp().create_value();
    let err = values.real("semi_major").unwrap_err();
    assert_eq!(err.code(), "ParameterNotFound");
}

#[test]
fn test_semi_major_must_be_positive() {
    let mut values = lambert_2sp().create_value();
    let err = values.set("semi_major", 0.0).unwrap_err();
    assert!(matches!(err, CrsError::ParameterOutOfRange { .. }));
}

#[test]
fn test_set_text_parses_with_kind() {
    let mut values = lambert_2sp().create_value();
    values.set_text("lat_1", "45.5").unwrap();
    assert_eq!(values.real("standard_parallel_1").unwrap(), 45.5);
    assert!(values.set_text("lat_1", "north").is_err());
}

#[test]
fn test_groups_for_same_descriptor_compare_equal() {
    let descriptor = lambert_2sp();
    let a = ParameterValueGroup::new(descriptor.clone()).with("lat_1", 10.0).unwrap();
    let b = descriptor.create_value().with("standard_parallel_1", 10).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_parameter_value_untagged_json() {
    let values: Vec<ParameterValue> = serde_json::from_str(r#"[3, 2.5, "gr3df97a.txt"]"#).unwrap();
    assert_eq!(values[0], ParameterValue::Integer(3));
    assert_eq!(values[1], ParameterValue::Real(2.5));
    assert_eq!(values[2], ParameterValue::from("gr3df97a.txt"));
}
