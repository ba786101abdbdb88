//! Hydro service over the web API hydro forms, series through `raw`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::model::hydro::{
    HydroMatrixName, HydroProperties, HydroPropertiesUpdate, InflowStructure,
};
use crate::model::matrix::Matrix;
use crate::service::HydroService;
use crate::utils::error::{Result, StudyError};

use super::models::InflowStructureDto;
use super::ApiContext;

fn hydro_form_url(context: &ApiContext, area_id: &str) -> String {
    context.study_url(&format!("areas/{area_id}/hydro/form"))
}

fn inflow_structure_url(context: &ApiContext, area_id: &str) -> String {
    context.study_url(&format!("areas/{area_id}/hydro/inflow-structure/form"))
}

pub(super) async fn read_hydro_properties(
    context: &ApiContext,
    area_id: &str,
) -> Result<HydroProperties> {
    context
        .get_json(&hydro_form_url(context, area_id))
        .await
        .map_err(|err| StudyError::HydroPropertiesRead {
            area_id: area_id.to_string(),
            cause: err.to_string(),
        })
}

pub(super) async fn read_inflow_structure(
    context: &ApiContext,
    area_id: &str,
) -> Result<InflowStructure> {
    let dto: InflowStructureDto = context
        .get_json(&inflow_structure_url(context, area_id))
        .await
        .map_err(|err| StudyError::HydroPropertiesRead {
            area_id: area_id.to_string(),
            cause: err.to_string(),
        })?;
    Ok(InflowStructure {
        intermonthly_correlation: dto.inter_monthly_correlation,
    })
}

pub struct HydroApiService {
    context: Arc<ApiContext>,
}

impl HydroApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn matrix_path(area_id: &str, matrix: HydroMatrixName) -> String {
        match matrix {
            HydroMatrixName::MaxPower => {
                format!("input/hydro/common/capacity/maxpower_{area_id}")
            }
            HydroMatrixName::Reservoir => {
                format!("input/hydro/common/capacity/reservoir_{area_id}")
            }
            HydroMatrixName::InflowPattern => {
                format!("input/hydro/common/capacity/inflowPattern_{area_id}")
            }
            HydroMatrixName::CreditModulations => {
                format!("input/hydro/common/capacity/creditmodulations_{area_id}")
            }
            HydroMatrixName::WaterValues => {
                format!("input/hydro/common/capacity/waterValues_{area_id}")
            }
            HydroMatrixName::RorSeries => format!("input/hydro/series/{area_id}/ror"),
            HydroMatrixName::ModSeries => format!("input/hydro/series/{area_id}/mod"),
            HydroMatrixName::MinGen => format!("input/hydro/series/{area_id}/mingen"),
            HydroMatrixName::Energy => format!("input/hydro/prepro/{area_id}/energy"),
        }
    }
}

#[async_trait]
impl HydroService for HydroApiService {
    async fn update_hydro_properties(
        &self,
        area_id: &str,
        update: &HydroPropertiesUpdate,
    ) -> Result<HydroProperties> {
        let error = |cause: String| StudyError::HydroPropertiesUpdate {
            area_id: area_id.to_string(),
            cause,
        };
        let current = read_hydro_properties(&self.context, area_id)
            .await
            .map_err(|err| error(err.to_string()))?;
        let updated = current.from_update(update);
        self.context
            .wrapper
            .put_json(&hydro_form_url(&self.context, area_id), &updated)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, "updated hydro properties");
        Ok(updated)
    }

    async fn update_inflow_structure(
        &self,
        area_id: &str,
        inflow_structure: &InflowStructure,
    ) -> Result<()> {
        let body = InflowStructureDto {
            inter_monthly_correlation: inflow_structure.intermonthly_correlation,
        };
        self.context
            .wrapper
            .put_json(&inflow_structure_url(&self.context, area_id), &body)
            .await
            .map_err(|err| StudyError::HydroInflowStructureUpdate {
                area_id: area_id.to_string(),
                cause: err.to_string(),
            })?;
        debug!(area_id, "updated inflow structure");
        Ok(())
    }

    async fn get_hydro_matrix(&self, area_id: &str, matrix: HydroMatrixName) -> Result<Matrix> {
        self.context
            .download_matrix(&Self::matrix_path(area_id, matrix))
            .await
    }

    async fn set_hydro_matrix(
        &self,
        area_id: &str,
        matrix: HydroMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .upload_matrix(&Self::matrix_path(area_id, matrix), series)
            .await
    }
}
