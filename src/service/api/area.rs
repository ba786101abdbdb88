//! Area service over the web API: area creation and forms, cluster creation
//! and deletion, and the area-level series through the raw endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::model::area::{AreaProperties, AreaPropertiesUpdate, AreaUi, AreaUiUpdate};
use crate::model::matrix::Matrix;
use crate::model::renewable::RenewableClusterProperties;
use crate::model::st_storage::STStorageProperties;
use crate::model::thermal::ThermalClusterProperties;
use crate::service::{
    AreaData, AreaMatrixName, AreaService, RenewableClusterData, STStorageData, ThermalClusterData,
};
use crate::utils::error::{Result, StudyError};

use super::cluster::read_table;
use super::hydro::{read_hydro_properties, read_inflow_structure};
use super::models::{
    with_name, AreaCreatedDto, AreaCreationDto, AreaListItemDto, AreaUiEntryDto, AreaUiUpdateDto,
};
use super::ApiContext;

/// Spread costs are rejected by the properties form endpoint; they stay at
/// their stored values.
const FORM_EXCLUDED_FIELDS: [&str; 2] = ["spreadUnsuppliedEnergyCost", "spreadSpilledEnergyCost"];

pub struct AreaApiService {
    context: Arc<ApiContext>,
}

impl AreaApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn area_url(&self, area_id: &str, suffix: &str) -> String {
        self.context.study_url(&format!("areas/{area_id}{suffix}"))
    }

    async fn put_properties_form(&self, area_id: &str, properties: &AreaProperties) -> Result<()> {
        let mut body = serde_json::to_value(properties)?;
        if let Value::Object(map) = &mut body {
            for field in FORM_EXCLUDED_FIELDS {
                map.remove(field);
            }
        }
        self.context
            .wrapper
            .put_json(&self.area_url(area_id, "/properties/form"), &body)
            .await?;
        Ok(())
    }

    async fn read_properties(&self, area_id: &str) -> Result<AreaProperties> {
        self.context
            .get_json(&self.area_url(area_id, "/properties/form"))
            .await
    }

    async fn read_ui_map(&self) -> Result<BTreeMap<String, AreaUiEntryDto>> {
        let url = format!("{}?type=AREA&ui=true", self.context.study_url("areas"));
        self.context.get_json(&url).await
    }

    async fn read_ui(&self, area_id: &str) -> Result<AreaUi> {
        let mut uis = self.read_ui_map().await?;
        match uis.remove(area_id) {
            Some(entry) => Ok(entry.ui.into()),
            None => Ok(AreaUi::default()),
        }
    }

    async fn put_ui(&self, area_id: &str, ui: &AreaUi) -> Result<()> {
        self.context
            .wrapper
            .put_json(&self.area_url(area_id, "/ui"), &AreaUiUpdateDto::from(ui))
            .await?;
        Ok(())
    }

    fn matrix_path(area_id: &str, matrix: AreaMatrixName) -> String {
        match matrix {
            AreaMatrixName::Load => format!("input/load/series/load_{area_id}"),
            AreaMatrixName::Wind => format!("input/wind/series/wind_{area_id}"),
            AreaMatrixName::Solar => format!("input/solar/series/solar_{area_id}"),
            AreaMatrixName::Reserves => format!("input/reserves/{area_id}"),
            AreaMatrixName::MiscGen => format!("input/misc-gen/miscgen-{area_id}"),
        }
    }
}

#[async_trait]
impl AreaService for AreaApiService {
    async fn create_area(
        &self,
        name: &str,
        properties: Option<AreaProperties>,
        ui: Option<AreaUi>,
    ) -> Result<(AreaProperties, AreaUi)> {
        let error = |cause: String| StudyError::AreaCreation {
            name: name.to_string(),
            cause,
        };
        let created: AreaCreatedDto = self
            .context
            .post_for_json(
                &self.context.study_url("areas"),
                &AreaCreationDto { name, kind: "AREA" },
            )
            .await
            .map_err(|err| error(err.to_string()))?;
        let area_id = created.id;

        let properties = properties.unwrap_or_default();
        self.put_properties_form(&area_id, &properties)
            .await
            .map_err(|err| error(err.to_string()))?;

        let ui = match ui {
            Some(ui) => {
                self.put_ui(&area_id, &ui)
                    .await
                    .map_err(|err| error(err.to_string()))?;
                ui
            }
            // The server assigns a default position on creation.
            None => self.read_ui(&area_id).await.map_err(|err| error(err.to_string()))?,
        };
        info!(area = name, "created area");
        Ok((properties, ui))
    }

    async fn update_area_properties(
        &self,
        area_id: &str,
        update: &AreaPropertiesUpdate,
    ) -> Result<AreaProperties> {
        let error = |cause: String| StudyError::AreaPropertiesUpdate {
            area_id: area_id.to_string(),
            cause,
        };
        let current = self
            .read_properties(area_id)
            .await
            .map_err(|err| error(err.to_string()))?;
        let updated = current.from_update(update);
        self.put_properties_form(area_id, &updated)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, "updated area properties");
        Ok(updated)
    }

    async fn update_area_ui(&self, area_id: &str, update: &AreaUiUpdate) -> Result<AreaUi> {
        let error = |cause: String| StudyError::AreaUiUpdate {
            area_id: area_id.to_string(),
            cause,
        };
        let current = self.read_ui(area_id).await.map_err(|err| error(err.to_string()))?;
        let updated = current.from_update(update);
        self.put_ui(area_id, &updated)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, "updated area ui");
        Ok(updated)
    }

    async fn delete_area(&self, area_id: &str) -> Result<()> {
        self.context
            .wrapper
            .delete(&self.area_url(area_id, ""))
            .await
            .map_err(|err| StudyError::AreaDeletion {
                area_id: area_id.to_string(),
                cause: err.to_string(),
            })?;
        info!(area_id, "deleted area");
        Ok(())
    }

    async fn create_thermal_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<ThermalClusterProperties>,
    ) -> Result<ThermalClusterProperties> {
        let error = |cause: String| StudyError::ThermalCreation {
            name: name.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let properties = properties.unwrap_or_default();
        // The endpoint only accepts lowercase cluster names.
        let body =
            with_name(&properties, &name.to_lowercase()).map_err(|err| error(err.to_string()))?;
        let created: ThermalClusterProperties = self
            .context
            .post_for_json(&self.area_url(area_id, "/clusters/thermal"), &body)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, cluster = name, "created thermal cluster");
        Ok(created)
    }

    async fn create_renewable_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<RenewableClusterProperties>,
    ) -> Result<RenewableClusterProperties> {
        let error = |cause: String| StudyError::RenewableCreation {
            name: name.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let properties = properties.unwrap_or_default();
        let body =
            with_name(&properties, &name.to_lowercase()).map_err(|err| error(err.to_string()))?;
        let created: RenewableClusterProperties = self
            .context
            .post_for_json(&self.area_url(area_id, "/clusters/renewable"), &body)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, cluster = name, "created renewable cluster");
        Ok(created)
    }

    async fn create_st_storage(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<STStorageProperties>,
    ) -> Result<STStorageProperties> {
        let error = |cause: String| StudyError::STStorageCreation {
            name: name.to_string(),
            area_id: area_id.to_string(),
            cause,
        };
        let properties = properties.unwrap_or_default();
        let body = with_name(&properties, name).map_err(|err| error(err.to_string()))?;
        let created: STStorageProperties = self
            .context
            .post_for_json(&self.area_url(area_id, "/storages"), &body)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(area_id, storage = name, "created short term storage");
        Ok(created)
    }

    async fn delete_thermal_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()> {
        self.context
            .wrapper
            .delete_json(&self.area_url(area_id, "/clusters/thermal"), &cluster_ids)
            .await
            .map_err(|err| StudyError::ThermalDeletion {
                area_id: area_id.to_string(),
                names: cluster_ids.to_vec(),
                cause: err.to_string(),
            })?;
        debug!(area_id, ?cluster_ids, "deleted thermal clusters");
        Ok(())
    }

    async fn delete_renewable_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()> {
        self.context
            .wrapper
            .delete_json(&self.area_url(area_id, "/clusters/renewable"), &cluster_ids)
            .await
            .map_err(|err| StudyError::RenewableDeletion {
                area_id: area_id.to_string(),
                names: cluster_ids.to_vec(),
                cause: err.to_string(),
            })?;
        debug!(area_id, ?cluster_ids, "deleted renewable clusters");
        Ok(())
    }

    async fn delete_st_storages(&self, area_id: &str, storage_ids: &[String]) -> Result<()> {
        self.context
            .wrapper
            .delete_json(&self.area_url(area_id, "/storages"), &storage_ids)
            .await
            .map_err(|err| StudyError::STStorageDeletion {
                area_id: area_id.to_string(),
                names: storage_ids.to_vec(),
                cause: err.to_string(),
            })?;
        debug!(area_id, ?storage_ids, "deleted short term storages");
        Ok(())
    }

    async fn get_area_matrix(&self, area_id: &str, matrix: AreaMatrixName) -> Result<Matrix> {
        self.context
            .download_matrix(&Self::matrix_path(area_id, matrix))
            .await
    }

    async fn set_area_matrix(
        &self,
        area_id: &str,
        matrix: AreaMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .upload_matrix(&Self::matrix_path(area_id, matrix), series)
            .await
    }

    async fn read_areas(&self) -> Result<Vec<AreaData>> {
        let error = |cause: String| StudyError::AreasRetrieval { cause };

        let list_url = format!("{}?type=AREA", self.context.study_url("areas"));
        let areas: Vec<AreaListItemDto> = self
            .context
            .get_json(&list_url)
            .await
            .map_err(|err| error(err.to_string()))?;
        let mut uis = self.read_ui_map().await.map_err(|err| error(err.to_string()))?;

        // The table-mode endpoints return every cluster of the study in one
        // call, keyed `area / cluster`.
        let thermals: BTreeMap<String, ThermalClusterProperties> =
            read_table(&self.context, "thermals").await.map_err(|err| error(err.to_string()))?;
        let renewables: BTreeMap<String, RenewableClusterProperties> =
            read_table(&self.context, "renewables").await.map_err(|err| error(err.to_string()))?;
        let storages: BTreeMap<String, STStorageProperties> =
            read_table(&self.context, "st-storages").await.map_err(|err| error(err.to_string()))?;

        let mut result = Vec::with_capacity(areas.len());
        for area in areas {
            let properties = self
                .read_properties(&area.id)
                .await
                .map_err(|err| error(err.to_string()))?;
            let ui = uis.remove(&area.id).map(|entry| entry.ui.into()).unwrap_or_default();
            let hydro_properties = read_hydro_properties(&self.context, &area.id)
                .await
                .map_err(|err| error(err.to_string()))?;
            let inflow_structure = read_inflow_structure(&self.context, &area.id)
                .await
                .map_err(|err| error(err.to_string()))?;

            result.push(AreaData {
                name: area.name,
                properties,
                ui,
                thermals: clusters_of(&thermals, &area.id)
                    .map(|(name, properties)| ThermalClusterData { name, properties })
                    .collect(),
                renewables: clusters_of(&renewables, &area.id)
                    .map(|(name, properties)| RenewableClusterData { name, properties })
                    .collect(),
                st_storages: clusters_of(&storages, &area.id)
                    .map(|(name, properties)| STStorageData { name, properties })
                    .collect(),
                hydro_properties,
                inflow_structure,
            });
        }
        Ok(result)
    }
}

/// Filters one area's rows out of a `area / cluster` keyed table.
fn clusters_of<'a, T: Clone>(
    table: &'a BTreeMap<String, T>,
    area_id: &'a str,
) -> impl Iterator<Item = (String, T)> + 'a {
    table.iter().filter_map(move |(key, properties)| {
        let (area, cluster) = key.split_once(" / ")?;
        (area == area_id).then(|| (cluster.to_string(), properties.clone()))
    })
}
