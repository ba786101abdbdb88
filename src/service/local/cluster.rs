//! Thermal, renewable and short-term storage services over the cluster
//! `list.ini` files.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::model::renewable::{RenewableClusterProperties, RenewableClusterPropertiesUpdate};
use crate::model::st_storage::{STStorageMatrixName, STStorageProperties, STStoragePropertiesUpdate};
use crate::model::thermal::{
    ThermalClusterMatrixName, ThermalClusterProperties, ThermalClusterPropertiesUpdate,
};
use crate::service::{RenewableService, STStorageService, ThermalService};
use crate::utils::error::{Result, StudyError};

use super::ini::{read_ini, write_ini, IniMap};
use super::matrix::{read_matrix, write_matrix};
use super::models;
use super::LocalContext;

/// Section name of the cluster whose id matches, if any. Sections are keyed
/// by cluster name, ids are derived.
pub(super) fn find_cluster_section(ini: &IniMap, cluster_id: &str) -> Option<String> {
    ini.sections()
        .find(|(name, _)| transform_name_to_id(name) == cluster_id)
        .map(|(name, _)| name.to_string())
}

pub struct ThermalLocalService {
    context: Arc<LocalContext>,
}

impl ThermalLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ThermalService for ThermalLocalService {
    async fn update_thermal_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &ThermalClusterPropertiesUpdate,
    ) -> Result<ThermalClusterProperties> {
        let error = |cause: String| StudyError::ThermalPropertiesUpdate {
            name: cluster_id.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let path = self.context.paths.thermal_list(area_id);
        let mut ini = read_ini(&path)?;
        let section_name = find_cluster_section(&ini, cluster_id)
            .ok_or_else(|| error("cluster does not exist".to_string()))?;
        let current = ini
            .section(&section_name)
            .map(models::thermal_from_section)
            .transpose()
            .map_err(|cause| error(cause))?
            .unwrap_or_default();
        let updated = current.from_update(update);
        *ini.ensure_section(&section_name) = models::thermal_to_section(&section_name, &updated);
        write_ini(&path, &ini)?;
        debug!(area_id, cluster_id, "updated thermal cluster properties");
        Ok(updated)
    }

    async fn get_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
    ) -> Result<Matrix> {
        read_matrix(&self.context.paths.thermal_matrix(area_id, cluster_id, matrix))
    }

    async fn set_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(&self.context.paths.thermal_matrix(area_id, cluster_id, matrix), series)
    }
}

pub struct RenewableLocalService {
    context: Arc<LocalContext>,
}

impl RenewableLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RenewableService for RenewableLocalService {
    async fn update_renewable_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &RenewableClusterPropertiesUpdate,
    ) -> Result<RenewableClusterProperties> {
        let error = |cause: String| StudyError::RenewablePropertiesUpdate {
            name: cluster_id.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let path = self.context.paths.renewable_list(area_id);
        let mut ini = read_ini(&path)?;
        let section_name = find_cluster_section(&ini, cluster_id)
            .ok_or_else(|| error("cluster does not exist".to_string()))?;
        let current = ini
            .section(&section_name)
            .map(models::renewable_from_section)
            .transpose()
            .map_err(|cause| error(cause))?
            .unwrap_or_default();
        let updated = current.from_update(update);
        *ini.ensure_section(&section_name) = models::renewable_to_section(&section_name, &updated);
        write_ini(&path, &ini)?;
        debug!(area_id, cluster_id, "updated renewable cluster properties");
        Ok(updated)
    }

    async fn get_renewable_series(&self, area_id: &str, cluster_id: &str) -> Result<Matrix> {
        read_matrix(&self.context.paths.renewable_series(area_id, cluster_id))
    }

    async fn set_renewable_series(
        &self,
        area_id: &str,
        cluster_id: &str,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(&self.context.paths.renewable_series(area_id, cluster_id), series)
    }
}

pub struct STStorageLocalService {
    context: Arc<LocalContext>,
}

impl STStorageLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl STStorageService for STStorageLocalService {
    async fn update_st_storage_properties(
        &self,
        area_id: &str,
        storage_id: &str,
        update: &STStoragePropertiesUpdate,
    ) -> Result<STStorageProperties> {
        let error = |cause: String| StudyError::STStoragePropertiesUpdate {
            name: storage_id.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let path = self.context.paths.st_storage_list(area_id);
        let mut ini = read_ini(&path)?;
        let section_name = find_cluster_section(&ini, storage_id)
            .ok_or_else(|| error("storage does not exist".to_string()))?;
        let current = ini
            .section(&section_name)
            .map(|s| models::st_storage_from_section(s, self.context.version))
            .transpose()
            .map_err(|cause| error(cause))?
            .unwrap_or_default();
        let updated = current.from_update(update);
        let section = models::st_storage_to_section(&section_name, &updated, self.context.version)
            .map_err(|cause| error(cause))?;
        *ini.ensure_section(&section_name) = section;
        write_ini(&path, &ini)?;
        debug!(area_id, storage_id, "updated short term storage properties");
        Ok(updated)
    }

    async fn get_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
    ) -> Result<Matrix> {
        read_matrix(&self.context.paths.st_storage_matrix(area_id, storage_id, matrix))
    }

    async fn set_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(
            &self.context.paths.st_storage_matrix(area_id, storage_id, matrix),
            series,
        )
    }
}
