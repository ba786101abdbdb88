//! Hydro service over `input/hydro/hydro.ini` and the per-area prepro files.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::model::hydro::{HydroMatrixName, HydroProperties, HydroPropertiesUpdate, InflowStructure};
use crate::model::matrix::Matrix;
use crate::service::HydroService;
use crate::utils::error::{Result, StudyError};

use super::ini::{read_ini, write_ini};
use super::matrix::{read_matrix, write_matrix};
use super::models;
use super::LocalContext;

pub struct HydroLocalService {
    context: Arc<LocalContext>,
}

impl HydroLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl HydroService for HydroLocalService {
    async fn update_hydro_properties(
        &self,
        area_id: &str,
        update: &HydroPropertiesUpdate,
    ) -> Result<HydroProperties> {
        let error = |cause: String| StudyError::HydroPropertiesUpdate {
            area_id: area_id.to_string(),
            cause,
        };
        let path = self.context.paths.hydro_ini();
        let mut ini = read_ini(&path)?;
        let current = models::hydro_properties_from_ini(&ini, area_id, self.context.version)
            .map_err(|cause| error(cause))?;
        let updated = current.from_update(update);
        models::hydro_properties_to_ini(&mut ini, area_id, &updated, self.context.version)
            .map_err(|cause| error(cause))?;
        write_ini(&path, &ini)?;
        debug!(area_id, "updated hydro properties");
        Ok(updated)
    }

    async fn update_inflow_structure(
        &self,
        area_id: &str,
        inflow_structure: &InflowStructure,
    ) -> Result<()> {
        write_ini(
            &self.context.paths.hydro_prepro_ini(area_id),
            &models::inflow_structure_to_ini(inflow_structure),
        )
        .map_err(|err| StudyError::HydroInflowStructureUpdate {
            area_id: area_id.to_string(),
            cause: err.to_string(),
        })?;
        debug!(area_id, "updated inflow structure");
        Ok(())
    }

    async fn get_hydro_matrix(&self, area_id: &str, matrix: HydroMatrixName) -> Result<Matrix> {
        read_matrix(&self.context.paths.hydro_matrix(area_id, matrix))
    }

    async fn set_hydro_matrix(
        &self,
        area_id: &str,
        matrix: HydroMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(&self.context.paths.hydro_matrix(area_id, matrix), series)
    }
}
