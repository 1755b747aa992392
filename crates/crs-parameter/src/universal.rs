//! Parameter templates shared across operation methods.
//!
//! Each template carries the complete alias family known for a parameter
//! across OGC, EPSG, ESRI, GeoTIFF and PROJ.4. Operation methods narrow a
//! template to the names they publish with [`ParameterDescriptor::select`],
//! reusing the bounds, unit and default of the template.
//!
//! Templates are built on demand; nothing here is a process-wide static.

use crs_common::{Authority, CrsResult, Unit};

use crate::descriptor::ParameterDescriptor;

use Authority::{Epsg, Esri, GeoTiff, Ogc, Proj4};

/// Semi-major axis of the ellipsoid.
pub fn semi_major() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "semi_major")
        .alias(Epsg, "Semi-major axis")
        .alias(Esri, "Semi_Major")
        .alias(GeoTiff, "SemiMajor")
        .alias(Proj4, "a")
        .greater_than(0.0)
        .unit(Unit::Metre)
        .build()
}

/// Semi-minor axis of the ellipsoid.
pub fn semi_minor() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "semi_minor")
        .alias(Epsg, "Semi-minor axis")
        .alias(Esri, "Semi_Minor")
        .alias(GeoTiff, "SemiMinor")
        .alias(Proj4, "b")
        .greater_than(0.0)
        .unit(Unit::Metre)
        .build()
}

/// Longitude of the projection origin.
pub fn central_meridian() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "central_meridian")
        .alias(Epsg, "Longitude of natural origin")
        .alias(Epsg, "Longitude of false origin")
        .alias(Epsg, "Longitude of origin")
        .alias(Ogc, "longitude_of_center")
        .alias(Ogc, "longitude_of_origin")
        .alias(Esri, "Central_Meridian")
        .alias(Esri, "Longitude_Of_Center")
        .alias(Esri, "Longitude_Of_Origin")
        .alias(GeoTiff, "NatOriginLong")
        .alias(GeoTiff, "FalseOriginLong")
        .alias(GeoTiff, "ProjCenterLong")
        .alias(GeoTiff, "StraightVertPoleLong")
        .alias(Proj4, "lon_0")
        .range(-180.0, 180.0)
        .default_value(0.0)
        .unit(Unit::Degree)
        .build()
}

/// Latitude of the projection origin.
pub fn latitude_of_origin() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "latitude_of_origin")
        .alias(Epsg, "Latitude of natural origin")
        .alias(Epsg, "Latitude of false origin")
        .alias(Ogc, "latitude_of_center")
        .alias(Esri, "Latitude_Of_Origin")
        .alias(Esri, "Latitude_Of_Center")
        .alias(GeoTiff, "NatOriginLat")
        .alias(GeoTiff, "FalseOriginLat")
        .alias(GeoTiff, "CenterLat")
        .alias(Proj4, "lat_0")
        .range(-90.0, 90.0)
        .default_value(0.0)
        .unit(Unit::Degree)
        .build()
}

/// Scale factor at the natural origin.
pub fn scale_factor() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "scale_factor")
        .alias(Epsg, "Scale factor at natural origin")
        .alias(Esri, "Scale_Factor")
        .alias(GeoTiff, "ScaleAtNatOrigin")
        .alias(GeoTiff, "ScaleAtCenter")
        .alias(Proj4, "k")
        .greater_than(0.0)
        .default_value(1.0)
        .unit(Unit::Unity)
        .build()
}

pub fn false_easting() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "false_easting")
        .alias(Epsg, "False easting")
        .alias(Epsg, "Easting at false origin")
        .alias(Esri, "False_Easting")
        .alias(GeoTiff, "FalseEasting")
        .alias(GeoTiff, "FalseOriginEasting")
        .alias(Proj4, "x_0")
        .default_value(0.0)
        .unit(Unit::Metre)
        .build()
}

pub fn false_northing() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "false_northing")
        .alias(Epsg, "False northing")
        .alias(Epsg, "Northing at false origin")
        .alias(Esri, "False_Northing")
        .alias(GeoTiff, "FalseNorthing")
        .alias(GeoTiff, "FalseOriginNorthing")
        .alias(Proj4, "y_0")
        .default_value(0.0)
        .unit(Unit::Metre)
        .build()
}

/// First standard parallel. No default: a secant cone needs explicit parallels.
pub fn standard_parallel_1() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "standard_parallel_1")
        .alias(Epsg, "Latitude of 1st standard parallel")
        .alias(Esri, "Standard_Parallel_1")
        .alias(GeoTiff, "StdParallel1")
        .alias(Proj4, "lat_1")
        .range(-90.0, 90.0)
        .unit(Unit::Degree)
        .build()
}

/// Second standard parallel, optional; methods fall back to the first parallel.
pub fn standard_parallel_2() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "standard_parallel_2")
        .alias(Epsg, "Latitude of 2nd standard parallel")
        .alias(Esri, "Standard_Parallel_2")
        .alias(GeoTiff, "StdParallel2")
        .alias(Proj4, "lat_2")
        .range(-90.0, 90.0)
        .unit(Unit::Degree)
        .optional()
        .build()
}

/// Number of geographic dimensions (2 or 3) of a conversion end-point.
pub fn dim(default: i64) -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::integer(Ogc, "dim")
        .range(2.0, 3.0)
        .default_value(default)
        .build()
}

/// Number of source dimensions of a datum shift applied to geographic coordinates.
pub fn src_dim() -> CrsResult<ParameterDescriptor> {
    Ok(dim(2)?.renamed(Ogc, "src_dim"))
}

/// Number of target dimensions of a datum shift applied to geographic coordinates.
pub fn tgt_dim() -> CrsResult<ParameterDescriptor> {
    Ok(dim(2)?.renamed(Ogc, "tgt_dim"))
}

/// Translation along one geocentric axis (`axis` is 'x', 'y' or 'z').
pub fn translation(axis: char) -> CrsResult<ParameterDescriptor> {
    let upper = axis.to_ascii_uppercase();
    ParameterDescriptor::real(Ogc, &format!("d{}", axis))
        .alias(Epsg, &format!("{}-axis translation", upper))
        .alias(Esri, &format!("{}_Axis_Translation", upper))
        .default_value(0.0)
        .unit(Unit::Metre)
        .build()
}

/// Rotation about one geocentric axis, in arc-seconds.
pub fn rotation(axis: char) -> CrsResult<ParameterDescriptor> {
    let upper = axis.to_ascii_uppercase();
    ParameterDescriptor::real(Ogc, &format!("e{}", axis))
        .alias(Epsg, &format!("{}-axis rotation", upper))
        .alias(Esri, &format!("{}_Axis_Rotation", upper))
        .range(-648000.0, 648000.0)
        .default_value(0.0)
        .unit(Unit::ArcSecond)
        .build()
}

/// Scale difference of a similarity transform, in parts per million.
pub fn scale_difference() -> CrsResult<ParameterDescriptor> {
    ParameterDescriptor::real(Ogc, "ppm")
        .alias(Epsg, "Scale difference")
        .alias(Esri, "Scale_Difference")
        .default_value(0.0)
        .unit(Unit::PartsPerMillion)
        .build()
}
