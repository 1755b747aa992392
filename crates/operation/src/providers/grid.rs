//! Grid-based datum shifts: NTv2 and France geocentric interpolation.

use std::sync::Arc;

use crs_common::{Authority, CrsError, CrsResult, OperationIdentifier};
use crs_parameter::{ParameterDescriptor, ParameterGroupDescriptor, ParameterValueGroup};
use projection::{GeocentricInterpolationTransform, GridLoader, Ntv2Transform, RGF93_GRID_FILE};
use tracing::{debug, warn};

use crate::provider::{DimensionVariants, OperationKind, ProvidedTransform, TransformProvider};

use Authority::{Epsg, Internal, Ogc, Proj4};

/// NTv2 horizontal shift grid (EPSG:9615).
#[derive(Debug)]
pub struct Ntv2Provider {
    variants: DimensionVariants,
    loader: Arc<dyn GridLoader>,
}

impl Ntv2Provider {
    pub const FILE_PARAMETER: &'static str = "Latitude and longitude difference file";

    pub fn new(loader: Arc<dyn GridLoader>) -> CrsResult<Self> {
        let file = ParameterDescriptor::text(Epsg, Self::FILE_PARAMETER)
            .alias(Proj4, "nadgrids")
            .build()?;
        let declared = ParameterGroupDescriptor::builder(Epsg, "NTv2")
            .identifier(OperationIdentifier::epsg(9615))
            .alias(Ogc, "NTv2")
            .parameter(file)
            .dimensions(2, 2)
            .build()?;
        Ok(Self {
            variants: DimensionVariants::new(declared),
            loader,
        })
    }
}

impl TransformProvider for Ntv2Provider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Transformation
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let file = values.text(Self::FILE_PARAMETER)?;
        let grid = self.loader.load_ntv2(&file).map_err(|err| {
            warn!(file = %file, error = %err, "NTv2 grid unavailable");
            err
        })?;
        debug!(file = %file, sub_grids = grid.sub_grids.len(), "Created NTv2 transform");
        self.variants.provide(Arc::new(Ntv2Transform::new(grid)))
    }
}

/// NTF to RGF93 through the IGN geocentric translation grid (EPSG:9655).
///
/// Only the published grid file name is accepted.
#[derive(Debug)]
pub struct Rgf93Provider {
    variants: DimensionVariants,
    loader: Arc<dyn GridLoader>,
}

impl Rgf93Provider {
    pub const FILE_PARAMETER: &'static str = "Geocentric translation file";

    pub fn new(loader: Arc<dyn GridLoader>) -> CrsResult<Self> {
        let file = ParameterDescriptor::text(Epsg, Self::FILE_PARAMETER)
            .default_value(RGF93_GRID_FILE)
            .build()?;
        let declared = ParameterGroupDescriptor::builder(Epsg, "France geocentric interpolation")
            .identifier(OperationIdentifier::epsg(9655))
            .alias(Internal, "RGF93")
            .parameter(file)
            .dimensions(2, 2)
            .build()?;
        Ok(Self {
            variants: DimensionVariants::new(declared),
            loader,
        })
    }
}

impl TransformProvider for Rgf93Provider {
    fn descriptor(&self) -> &Arc<ParameterGroupDescriptor> {
        self.variants.declared()
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Transformation
    }

    fn create_transform(&self, values: &ParameterValueGroup) -> CrsResult<ProvidedTransform> {
        self.variants.check_values(values)?;
        let file = values.text(Self::FILE_PARAMETER)?;
        if file != RGF93_GRID_FILE {
            warn!(file = %file, "Unsupported geocentric translation file");
            return Err(CrsError::resource_unavailable(
                file,
                format!("only {} is supported", RGF93_GRID_FILE),
            ));
        }
        let transform = GeocentricInterpolationTransform::rgf93(self.loader.as_ref())?;
        debug!(file = %file, "Created France geocentric interpolation");
        self.variants.provide(Arc::new(transform))
    }
}
