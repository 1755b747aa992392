//! Map projection providers.
//!
//! Each method publishes the universal parameters under its own EPSG names
//! (selected from the shared alias families) and builds a
//! [`ProjectionTransform`] over the matching [`MapProjection`].

use std::sync::Arc;

use crs_common::{Authority, CrsResult, Ellipsoid, OperationIdentifier};
use crs_parameter::{universal, ParameterDescriptor, ParameterGroupDescriptor, ParameterValueGroup};
use projection::{
    LambertConformal, MapProjection, MathTransform, Orthographic, PolarStereographic, Polyconic,
    ProjectionParameters, ProjectionTransform, Stereographic,
};
use tracing::debug;

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::{Epsg, Esri, GeoTiff, Ogc};

/// The map projections known to [`ProjectionProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMethod {
    LambertConformal1SP,
    LambertConformal2SP,
    Orthographic,
    Polyconic,
    Stereographic,
    PolarStereographic,
}

impl ProjectionMethod {
    pub const ALL: [ProjectionMethod; 6] = [
        ProjectionMethod::LambertConformal1SP,
        ProjectionMethod::LambertConformal2SP,
        ProjectionMethod::Orthographic,
        ProjectionMethod::Polyconic,
        ProjectionMethod::Stereographic,
        ProjectionMethod::PolarStereographic,
    ];

    fn descriptor(&self) -> CrsResult<ParameterGroupDescriptor> {
        let ogc = |name: &str| ParameterGroupDescriptor::builder(Ogc, name);
        let group = match self {
            ProjectionMethod::LambertConformal1SP => ogc("Lambert_Conformal_Conic_1SP")
                .identifier(OperationIdentifier::epsg(9801))
                .identifier(OperationIdentifier::new(GeoTiff, "9"))
                .alias(Epsg, "Lambert Conic Conformal (1SP)")
                .alias(GeoTiff, "CT_LambertConfConic_1SP")
                .deprecated_alias(GeoTiff, "CT_LambertConfConic_Helmert")
                .parameters(natural_origin(true)?),
            ProjectionMethod::LambertConformal2SP => ogc("Lambert_Conformal_Conic_2SP")
                .identifier(OperationIdentifier::epsg(9802))
                .identifier(OperationIdentifier::new(GeoTiff, "8"))
                .alias(Epsg, "Lambert Conic Conformal (2SP)")
                .alias(Esri, "Lambert_Conformal_Conic")
                .alias(GeoTiff, "CT_LambertConfConic_2SP")
                .deprecated_alias(GeoTiff, "CT_LambertConfConic")
                .parameters(false_origin()?),
            ProjectionMethod::Orthographic => ogc("Orthographic")
                .identifier(OperationIdentifier::epsg(9840))
                .identifier(OperationIdentifier::new(GeoTiff, "21"))
                .alias(Esri, "Orthographic")
                .alias(GeoTiff, "CT_Orthographic")
                .parameters(natural_origin(false)?),
            ProjectionMethod::Polyconic => ogc("Polyconic")
                .identifier(OperationIdentifier::epsg(9818))
                .identifier(OperationIdentifier::new(GeoTiff, "22"))
                .alias(Epsg, "American Polyconic")
                .alias(Esri, "Polyconic")
                .alias(GeoTiff, "CT_Polyconic")
                .parameters(natural_origin(false)?),
            ProjectionMethod::Stereographic => ogc("Stereographic")
                .identifier(OperationIdentifier::new(GeoTiff, "14"))
                .alias(Esri, "Stereographic")
                .alias(GeoTiff, "CT_Stereographic")
                .parameters(natural_origin(true)?),
            ProjectionMethod::PolarStereographic => ogc("Polar_Stereographic")
                .identifier(OperationIdentifier::epsg(9810))
                .identifier(OperationIdentifier::new(GeoTiff, "15"))
                .alias(Epsg, "Polar Stereographic (variant A)")
                .deprecated_alias(Epsg, "Polar Stereographic")
                .alias(GeoTiff, "CT_PolarStereographic")
                .parameters(polar_origin()?),
        };
        group.dimensions(2, 2).build()
    }

    fn projection(&self, values: &ParameterValueGroup) -> CrsResult<Arc<dyn MathTransform>> {
        let params = projection_parameters(values)?;
        Ok(match self {
            ProjectionMethod::LambertConformal1SP => wrap(LambertConformal::one_standard_parallel(&params)?),
            ProjectionMethod::LambertConformal2SP => {
                let sp1 = values.real("standard_parallel_1")?;
                let sp2 = values.optional_real("standard_parallel_2")?.unwrap_or(sp1);
                wrap(LambertConformal::two_standard_parallels(&params, sp1, sp2)?)
            }
            ProjectionMethod::Orthographic => wrap(Orthographic::new(&params)),
            ProjectionMethod::Polyconic => wrap(Polyconic::new(&params)),
            ProjectionMethod::Stereographic => wrap(Stereographic::new(&params)),
            ProjectionMethod::PolarStereographic => wrap(PolarStereographic::new(&params)?),
        })
    }
}

fn wrap<P: MapProjection>(projection: P) -> Arc<dyn MathTransform> {
    Arc::new(ProjectionTransform::new(projection))
}

fn axes() -> CrsResult<[ParameterDescriptor; 2]> {
    Ok([universal::semi_major()?, universal::semi_minor()?])
}

/// Parameters of methods defined at a natural origin.
fn natural_origin(with_scale: bool) -> CrsResult<Vec<ParameterDescriptor>> {
    let mut params = Vec::from(axes()?);
    params.push(universal::latitude_of_origin()?.select(&[
        "latitude_of_origin",
        "Latitude of natural origin",
        "Latitude_Of_Origin",
        "NatOriginLat",
        "lat_0",
    ]));
    params.push(universal::central_meridian()?.select(&[
        "central_meridian",
        "Longitude of natural origin",
        "Central_Meridian",
        "NatOriginLong",
        "lon_0",
    ]));
    if with_scale {
        params.push(universal::scale_factor()?.select(&[
            "scale_factor",
            "Scale factor at natural origin",
            "Scale_Factor",
            "ScaleAtNatOrigin",
            "k",
        ]));
    }
    params.push(universal::false_easting()?.select(&[
        "false_easting",
        "False easting",
        "False_Easting",
        "FalseEasting",
        "x_0",
    ]));
    params.push(universal::false_northing()?.select(&[
        "false_northing",
        "False northing",
        "False_Northing",
        "FalseNorthing",
        "y_0",
    ]));
    Ok(params)
}

/// Parameters of the two-parallel Lambert cone, named after the false origin.
fn false_origin() -> CrsResult<Vec<ParameterDescriptor>> {
    let mut params = Vec::from(axes()?);
    params.push(universal::latitude_of_origin()?.select(&[
        "latitude_of_origin",
        "Latitude of false origin",
        "Latitude_Of_Origin",
        "FalseOriginLat",
        "lat_0",
    ]));
    params.push(universal::central_meridian()?.select(&[
        "central_meridian",
        "Longitude of false origin",
        "Central_Meridian",
        "FalseOriginLong",
        "lon_0",
    ]));
    params.push(universal::standard_parallel_1()?);
    params.push(universal::standard_parallel_2()?);
    params.push(universal::false_easting()?.select(&[
        "false_easting",
        "Easting at false origin",
        "False_Easting",
        "FalseOriginEasting",
        "x_0",
    ]));
    params.push(universal::false_northing()?.select(&[
        "false_northing",
        "Northing at false origin",
        "False_Northing",
        "FalseOriginNorthing",
        "y_0",
    ]));
    Ok(params)
}

/// Natural-origin parameters with the latitude defaulting to the north pole.
fn polar_origin() -> CrsResult<Vec<ParameterDescriptor>> {
    let mut params = natural_origin(true)?;
    if let Some(lat) = params.iter_mut().find(|p| p.primary_name() == "latitude_of_origin") {
        *lat = lat.with_default(90.0)?;
    }
    Ok(params)
}

fn projection_parameters(values: &ParameterValueGroup) -> CrsResult<ProjectionParameters> {
    let ellipsoid = Ellipsoid::from_axes(values.real("semi_major")?, values.real("semi_minor")?)?;
    let scale = if values.descriptor().descriptor("scale_factor").is_ok() {
        values.real("scale_factor")?
    } else {
        1.0
    };
    Ok(ProjectionParameters::new(ellipsoid)
        .origin(values.real("central_meridian")?, values.real("latitude_of_origin")?)
        .scale(scale)
        .false_origin(values.real("false_easting")?, values.real("false_northing")?))
}

/// Provider for one [`ProjectionMethod`].
#[derive(Debug)]
pub struct ProjectionProvider {
    method: ProjectionMethod,
    variants: DimensionVariants,
}

impl ProjectionProvider {
    pub fn new(method: ProjectionMethod) -> CrsResult<Self> {
        Ok(Self {
            method,
            variants: DimensionVariants::new(method.descriptor()?),
        })
    }

    pub fn method(&self) -> ProjectionMethod {
        self.method
    }
}

impl TransformProvider for ProjectionProvider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Projection
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let transform = self.method.projection(values)?;
        debug!(method = self.name(), "Created map projection");
        self.variants.provide(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_method_builds() {
        for method in ProjectionMethod::ALL {
            let provider = ProjectionProvider::new(method).unwrap();
            assert_eq!(provider.descriptor().source_dimensions(), 2);
            assert_eq!(provider.kind(), OperationKind::Projection);
        }
    }

    #[test]
    fn test_lambert_2sp_epsg_names() {
        let provider = ProjectionProvider::new(ProjectionMethod::LambertConformal2SP).unwrap();
        let group = provider.descriptor();
        let lat = group.descriptor("Latitude of false origin").unwrap();
        assert_eq!(lat.primary_name(), "latitude_of_origin");
        assert!(group.descriptor("Latitude of natural origin").is_err());
        assert_eq!(
            group.descriptor("x_0").unwrap().name_for(Epsg),
            Some("Easting at false origin")
        );
    }

    #[test]
    fn test_orthographic_has_no_scale() {
        let provider = ProjectionProvider::new(ProjectionMethod::Orthographic).unwrap();
        let err = provider.descriptor().descriptor("scale_factor").unwrap_err();
        assert_eq!(err.code(), "ParameterNotFound");
    }

    #[test]
    fn test_polar_latitude_defaults_to_north_pole() {
        let provider = ProjectionProvider::new(ProjectionMethod::PolarStereographic).unwrap();
        let values = provider.create_value();
        assert_eq!(values.real("latitude_of_origin").unwrap(), 90.0);
    }

    #[test]
    fn test_polar_rejects_oblique_origin() {
        let provider = ProjectionProvider::new(ProjectionMethod::PolarStereographic).unwrap();
        let values = provider
            .create_value()
            .with("semi_major", 6378137.0)
            .and_then(|v| v.with("semi_minor", 6356752.314245179))
            .and_then(|v| v.with("latitude_of_origin", 60.0))
            .unwrap();
        let err = provider.create_transform(&values).unwrap_err();
        assert_eq!(err.code(), "ParameterOutOfRange");
    }

    #[test]
    fn test_lambert_2sp_requires_first_parallel() {
        let provider = ProjectionProvider::new(ProjectionMethod::LambertConformal2SP).unwrap();
        let values = provider
            .create_value()
            .with("semi_major", 6378137.0)
            .and_then(|v| v.with("semi_minor", 6356752.314245179))
            .unwrap();
        let err = provider.create_transform(&values).unwrap_err();
        assert_eq!(err.code(), "ParameterNotFound");
    }
}
