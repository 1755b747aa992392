//! Provider behaviour through the public registry interface.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use crs_common::{CrsError, CrsResult};
use crs_parameter::ParameterValueGroup;
use operation::providers::GeocentricAffineProvider;
use operation::{BursaWolfFill, OperationRegistry, RegistryConfig, TransformProvider};
use projection::{FileGridLoader, GeocentricInterpolationTransform, MathTransform};
use test_utils::fixtures::{bursa_wolf, ellipsoids, points};
use test_utils::{assert_approx_eq, assert_points_approx_eq, grid_directory};

fn registry(dir: &Path) -> (OperationRegistry, Arc<FileGridLoader>) {
    let loader = Arc::new(FileGridLoader::new(
        vec![dir.to_path_buf()],
        NonZeroUsize::new(4).unwrap(),
    ));
    let config = RegistryConfig {
        grid_directories: vec![dir.to_path_buf()],
        ..Default::default()
    };
    let registry = OperationRegistry::with_loader(config, loader.clone()).unwrap();
    (registry, loader)
}

fn seven_parameters(provider: &dyn TransformProvider, terms: [f64; 7]) -> ParameterValueGroup {
    let mut values = provider.create_value();
    for (name, value) in bursa_wolf::NAMES.iter().zip(terms) {
        values.set(name, value).unwrap();
    }
    values
}

fn with_ellipsoids(mut values: ParameterValueGroup, source: (f64, f64), target: (f64, f64)) -> ParameterValueGroup {
    values
        .set("src_semi_major", source.0)
        .unwrap()
        .set("src_semi_minor", source.1)
        .unwrap()
        .set("tgt_semi_major", target.0)
        .unwrap()
        .set("tgt_semi_minor", target.1)
        .unwrap();
    values
}

// ============================================================================
// Bursa-Wolf fill
// ============================================================================

#[test]
fn test_coordinate_frame_negates_position_vector_rotations() {
    let pv = GeocentricAffineProvider::position_vector().unwrap();
    let cf = GeocentricAffineProvider::coordinate_frame_rotation().unwrap();
    let terms = bursa_wolf::ETRS89_TO_OSGB36;

    let a = BursaWolfFill::PositionVector.fill(&seven_parameters(&pv, terms)).unwrap();
    let b = BursaWolfFill::CoordinateFrameRotation
        .fill(&seven_parameters(&cf, terms))
        .unwrap();

    assert_eq!((a.ex, a.ey, a.ez), (-b.ex, -b.ey, -b.ez));
    assert_eq!((a.dx, a.dy, a.dz, a.ppm), (b.dx, b.dy, b.dz, b.ppm));
}

#[test]
fn test_coordinate_frame_equals_position_vector_with_opposite_rotations() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let pv = registry.find("EPSG:9606").unwrap();
    let cf = registry.find("EPSG:9607").unwrap();

    let mut opposite = bursa_wolf::ETRS89_TO_OSGB36;
    for term in &mut opposite[3..6] {
        *term = -*term;
    }
    let a = pv.create_transform(&seven_parameters(pv.as_ref(), bursa_wolf::ETRS89_TO_OSGB36)).unwrap();
    let b = cf.create_transform(&seven_parameters(cf.as_ref(), opposite)).unwrap();

    let point = [3909833.018, -147057.366, 5020332.436];
    let pa = a.transform.transform(&point).unwrap();
    let pb = b.transform.transform(&point).unwrap();
    assert_points_approx_eq!(&pa, &pb, 1e-6);
}

#[test]
fn test_geocentric_translation_ignores_rotation_and_scale() {
    let provider = GeocentricAffineProvider::geocentric_translation().unwrap();
    let mut values = provider.create_value();
    values.set("dx", -168.0).unwrap().set("dy", -60.0).unwrap().set("dz", 320.0).unwrap();

    let params = BursaWolfFill::GeocentricTranslation.fill(&values).unwrap();
    assert_eq!((params.ex, params.ey, params.ez, params.ppm), (0.0, 0.0, 0.0, 0.0));
    assert!(params.is_translation());

    // Rotation parameters are not part of the method
    let err = values.set("ex", 1.0).unwrap_err();
    assert!(matches!(err, CrsError::ParameterNotFound { .. }));

    let provided = provider.create_transform(&values).unwrap();
    let out = provided.transform.transform(&[1000.0, 2000.0, 3000.0]).unwrap();
    assert_points_approx_eq!(&out, &[832.0, 1940.0, 3320.0], 1e-9);
}

#[test]
fn test_datum_shift_between_ellipsoids() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("Position_Vector").unwrap();
    let values = seven_parameters(provider.as_ref(), bursa_wolf::WGS72_TO_WGS84);
    let wgs72 = (6378135.0, 6378135.0 * (1.0 - 1.0 / 298.26));
    let values = with_ellipsoids(values, wgs72, ellipsoids::WGS84);

    let provided = provider.create_transform(&values).unwrap();
    assert!(!provided.is_complement());
    assert_eq!((provided.source_dimensions(), provided.target_dimensions()), (2, 2));

    let out = provided.transform.transform(&[4.0, 55.0]).unwrap();
    assert_approx_eq!(out[0], 4.0, 1e-3);
    assert_approx_eq!(out[1], 55.0, 1e-3);
}

#[test]
fn test_datum_shift_dimension_variants() {
    let provider = GeocentricAffineProvider::position_vector().unwrap();
    let values = seven_parameters(&provider, bursa_wolf::WGS72_TO_WGS84);
    let mut values = with_ellipsoids(values, ellipsoids::WGS84, ellipsoids::GRS80);
    values.set("src_dim", 3).unwrap();

    let provided = provider.create_transform(&values).unwrap();
    assert!(provided.is_complement());
    assert_eq!(provided.method.source_dimensions(), 3);
    assert_eq!(provided.method.target_dimensions(), 2);
    assert_eq!(provided.method.primary_name(), provider.descriptor().primary_name());
}

// ============================================================================
// Logarithmic and longitude rotation
// ============================================================================

#[test]
fn test_logarithmic_base_ten() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("Logarithmic").unwrap();
    let values = provider
        .create_value()
        .with("base", 10.0)
        .and_then(|v| v.with("offset", 0.0))
        .unwrap();
    let out = provider.create_transform(&values).unwrap().transform.transform(&[100.0]).unwrap();
    assert_approx_eq!(out[0], 2.0, 1e-12);
}

#[test]
fn test_logarithmic_rejects_non_positive_base() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("Logarithmic").unwrap();
    for base in [0.0, -5.0] {
        let err = provider.create_value().with("base", base).unwrap_err();
        assert_eq!(err.code(), "ParameterOutOfRange", "base {}", base);
        assert!(err.to_string().contains("(0, inf)"), "{}", err);
    }
    let values = provider.create_value().with("base", 1.0).unwrap();
    let err = provider.create_transform(&values).unwrap_err();
    assert_eq!(err.code(), "ParameterOutOfRange");
    assert!(err.to_string().contains("excluding 1"), "{}", err);
}

#[test]
fn test_longitude_rotation() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("EPSG:9601").unwrap();
    let values = provider.create_value().with("Longitude offset", 30.0).unwrap();
    let out = provider.create_transform(&values).unwrap().transform.transform(&[10.0, 20.0]).unwrap();
    assert_points_approx_eq!(&out, &[40.0, 20.0], 1e-12);
}

#[test]
fn test_longitude_rotation_requires_offset() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("Longitude rotation").unwrap();
    let err = provider.create_transform(&provider.create_value()).unwrap_err();
    assert!(matches!(err, CrsError::ParameterNotFound { .. }));

    let err = provider.create_value().with("Longitude offset", 200.0).unwrap_err();
    assert_eq!(err.code(), "ParameterOutOfRange");
}

// ============================================================================
// Grid-based providers
// ============================================================================

#[test]
fn test_rgf93_default_file_matches_direct_construction() {
    let dir = grid_directory().unwrap();
    let (registry, loader) = registry(dir.path());
    let provider = registry.find("France geocentric interpolation").unwrap();
    let provided = provider.create_transform(&provider.create_value()).unwrap();
    let direct = GeocentricInterpolationTransform::rgf93(loader.as_ref()).unwrap();

    let (lon, lat) = points::PARIS;
    let a = provided.transform.transform(&[lon, lat]).unwrap();
    let b = direct.transform(&[lon, lat]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_rgf93_other_file_is_resource_unavailable() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("EPSG:9655").unwrap();
    let values = provider
        .create_value()
        .with("Geocentric translation file", "ntv2_test.gsb")
        .unwrap();
    let err = provider.create_transform(&values).unwrap_err();
    assert!(matches!(err, CrsError::ResourceUnavailable { .. }));
}

#[test]
fn test_rgf93_missing_grid() {
    let empty = tempfile::tempdir().unwrap();
    let (registry, _) = registry(empty.path());
    let provider = registry.find("EPSG:9655").unwrap();
    let err = provider.create_transform(&provider.create_value()).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_ntv2_loads_through_registry() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let provider = registry.find("NTv2").unwrap();

    let err = provider.create_transform(&provider.create_value()).unwrap_err();
    assert!(matches!(err, CrsError::ParameterNotFound { .. }));

    let values = provider
        .create_value()
        .with("Latitude and longitude difference file", "ntv2_test.gsb")
        .unwrap();
    let provided = provider.create_transform(&values).unwrap();
    let (lon, lat) = points::BREST;
    let out = provided.transform.transform(&[lon, lat]).unwrap();
    assert!(out[0] > lon && out[1] > lat);

    let values = provider
        .create_value()
        .with("Latitude and longitude difference file", "missing.gsb")
        .unwrap();
    let err = provider.create_transform(&values).unwrap_err();
    assert_eq!(err.code(), "ResourceUnavailable");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_create_transform_is_deterministic() {
    let dir = grid_directory().unwrap();
    let (registry, _) = registry(dir.path());
    let samples = [[2.0, 45.0], [-3.5, 50.0], [7.5, 42.0]];

    for provider in registry.providers() {
        let values = sample_values(provider.as_ref());
        let (a, b) = match (provider.create_transform(&values), provider.create_transform(&values)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(a), Err(b)) => {
                assert_eq!(a, b, "{}", provider.name());
                continue;
            }
            _ => panic!("{} gave different outcomes", provider.name()),
        };
        assert_eq!(a.source_dimensions(), b.source_dimensions());
        assert!(Arc::ptr_eq(&a.method, &b.method));
        for sample in samples {
            let input = &sample[..a.source_dimensions().min(2)];
            let mut padded = input.to_vec();
            padded.resize(a.source_dimensions(), 0.0);
            // Bitwise so that NaN outside a 1-D domain still compares equal
            let bits = |r: CrsResult<Vec<f64>>| r.map(|v| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>());
            let ra = bits(a.transform.transform(&padded));
            let rb = bits(b.transform.transform(&padded));
            assert_eq!(ra, rb, "{}", provider.name());
        }
    }
}

/// Values that every built-in method accepts.
fn sample_values(provider: &dyn TransformProvider) -> ParameterValueGroup {
    let mut values = provider.create_value();
    let group = provider.descriptor();
    let mut set = |name: &str, value: f64| {
        if group.descriptor(name).is_ok() {
            values.set(name, value).unwrap();
        }
    };
    set("semi_major", ellipsoids::WGS84.0);
    set("semi_minor", ellipsoids::WGS84.1);
    set("standard_parallel_1", 44.0);
    set("standard_parallel_2", 49.0);
    set("latitude_of_origin", if provider.name() == "Polar_Stereographic" { 90.0 } else { 46.5 });
    set("Longitude offset", 2.337229);
    set("dx", 10.0);
    if group.descriptor("Latitude and longitude difference file").is_ok() {
        values
            .set("Latitude and longitude difference file", "ntv2_test.gsb")
            .unwrap();
    }
    values
}
