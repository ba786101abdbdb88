//! Thermal, renewable and short-term storage services over the web API.
//!
//! Scalar properties go through the table-mode endpoints (storages also have
//! a dedicated PATCH route), series through `raw` except for storages which
//! have their own series endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::matrix::Matrix;
use crate::model::renewable::{RenewableClusterProperties, RenewableClusterPropertiesUpdate};
use crate::model::st_storage::{STStorageMatrixName, STStorageProperties, STStoragePropertiesUpdate};
use crate::model::thermal::{
    ThermalClusterMatrixName, ThermalClusterProperties, ThermalClusterPropertiesUpdate,
};
use crate::service::{RenewableService, STStorageService, ThermalService};
use crate::utils::error::{Result, StudyError};

use super::models::MatrixFrameDto;
use super::ApiContext;

/// Downloads a whole table-mode table, keyed `area_id / cluster_id`.
pub(super) async fn read_table<T: DeserializeOwned>(
    context: &ApiContext,
    table: &str,
) -> Result<BTreeMap<String, T>> {
    context
        .get_json(&context.study_url(&format!("table-mode/{table}")))
        .await
}

/// Sends one row to a table-mode table and returns the stored properties of
/// that row. The response carries the full table.
async fn update_table_row<T: DeserializeOwned>(
    context: &ApiContext,
    table: &str,
    area_id: &str,
    cluster_id: &str,
    update: &impl serde::Serialize,
) -> std::result::Result<T, String> {
    let key = format!("{area_id} / {cluster_id}");
    let body = BTreeMap::from([(key.clone(), update)]);
    let mut response: BTreeMap<String, T> = context
        .put_for_json(&context.study_url(&format!("table-mode/{table}")), &body)
        .await
        .map_err(|err| err.to_string())?;
    response
        .remove(&key)
        .ok_or_else(|| "cluster does not exist".to_string())
}

pub struct ThermalApiService {
    context: Arc<ApiContext>,
}

impl ThermalApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn matrix_path(area_id: &str, cluster_id: &str, matrix: ThermalClusterMatrixName) -> String {
        match matrix {
            ThermalClusterMatrixName::PreproData | ThermalClusterMatrixName::PreproModulation => {
                format!("input/thermal/prepro/{area_id}/{cluster_id}/{}", matrix.as_str())
            }
            _ => format!("input/thermal/series/{area_id}/{cluster_id}/{}", matrix.as_str()),
        }
    }
}

#[async_trait]
impl ThermalService for ThermalApiService {
    async fn update_thermal_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &ThermalClusterPropertiesUpdate,
    ) -> Result<ThermalClusterProperties> {
        let updated = update_table_row(&self.context, "thermals", area_id, cluster_id, update)
            .await
            .map_err(|cause| StudyError::ThermalPropertiesUpdate {
                name: cluster_id.to_string(),
                area_id: area_id.to_string(),
                cause,
            })?;
        debug!(area_id, cluster_id, "updated thermal cluster properties");
        Ok(updated)
    }

    async fn get_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
    ) -> Result<Matrix> {
        self.context
            .download_matrix(&Self::matrix_path(area_id, cluster_id, matrix))
            .await
    }

    async fn set_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .upload_matrix(&Self::matrix_path(area_id, cluster_id, matrix), series)
            .await
    }
}

pub struct RenewableApiService {
    context: Arc<ApiContext>,
}

impl RenewableApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn series_path(area_id: &str, cluster_id: &str) -> String {
        format!("input/renewables/series/{area_id}/{cluster_id}/series")
    }
}

#[async_trait]
impl RenewableService for RenewableApiService {
    async fn update_renewable_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &RenewableClusterPropertiesUpdate,
    ) -> Result<RenewableClusterProperties> {
        let updated = update_table_row(&self.context, "renewables", area_id, cluster_id, update)
            .await
            .map_err(|cause| StudyError::RenewablePropertiesUpdate {
                name: cluster_id.to_string(),
                area_id: area_id.to_string(),
                cause,
            })?;
        debug!(area_id, cluster_id, "updated renewable cluster properties");
        Ok(updated)
    }

    async fn get_renewable_series(&self, area_id: &str, cluster_id: &str) -> Result<Matrix> {
        self.context
            .download_matrix(&Self::series_path(area_id, cluster_id))
            .await
    }

    async fn set_renewable_series(
        &self,
        area_id: &str,
        cluster_id: &str,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .upload_matrix(&Self::series_path(area_id, cluster_id), series)
            .await
    }
}

pub struct STStorageApiService {
    context: Arc<ApiContext>,
}

impl STStorageApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn series_url(&self, area_id: &str, storage_id: &str, matrix: STStorageMatrixName) -> String {
        self.context
            .study_url(&format!("areas/{area_id}/storages/{storage_id}/series/{matrix}"))
    }
}

#[async_trait]
impl STStorageService for STStorageApiService {
    async fn update_st_storage_properties(
        &self,
        area_id: &str,
        storage_id: &str,
        update: &STStoragePropertiesUpdate,
    ) -> Result<STStorageProperties> {
        let url = self
            .context
            .study_url(&format!("areas/{area_id}/storages/{storage_id}"));
        let updated: STStorageProperties = self
            .context
            .wrapper
            .patch_json(&url, update)
            .await
            .map_err(|err| StudyError::STStoragePropertiesUpdate {
                name: storage_id.to_string(),
                area_id: area_id.to_string(),
                cause: err.to_string(),
            })?
            .json()
            .await
            .map_err(|err| StudyError::STStoragePropertiesUpdate {
                name: storage_id.to_string(),
                area_id: area_id.to_string(),
                cause: err.to_string(),
            })?;
        debug!(area_id, storage_id, "updated short term storage properties");
        Ok(updated)
    }

    async fn get_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
    ) -> Result<Matrix> {
        let frame: MatrixFrameDto = self
            .context
            .get_json(&self.series_url(area_id, storage_id, matrix))
            .await
            .map_err(|err| StudyError::STStorageMatrixDownload {
                area_id: area_id.to_string(),
                name: storage_id.to_string(),
                matrix: matrix.to_string(),
                cause: err.to_string(),
            })?;
        Ok(frame.data)
    }

    async fn set_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .wrapper
            .put_json(
                &self.series_url(area_id, storage_id, matrix),
                &MatrixFrameDto::from_matrix(series),
            )
            .await
            .map_err(|err| StudyError::STStorageMatrixUpload {
                area_id: area_id.to_string(),
                name: storage_id.to_string(),
                matrix: matrix.to_string(),
                cause: err.to_string(),
            })?;
        debug!(area_id, storage_id, %matrix, "uploaded short term storage series");
        Ok(())
    }
}
