use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::commons::{default_filtering, transform_name_to_id, FilterSet};
use crate::model::hydro::Hydro;
use crate::model::matrix::Matrix;
use crate::model::renewable::{RenewableCluster, RenewableClusterProperties};
use crate::model::st_storage::{STStorage, STStorageProperties};
use crate::model::thermal::{ThermalCluster, ThermalClusterProperties};
use crate::service::{AreaData, AreaMatrixName, StudyServices};
use crate::utils::error::{Result, StudyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdequacyPatchMode {
    #[default]
    Outside,
    Inside,
    Virtual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaProperties {
    pub energy_cost_unsupplied: f64,
    pub energy_cost_spilled: f64,
    pub non_dispatch_power: bool,
    pub dispatch_hydro_power: bool,
    pub other_dispatch_power: bool,
    pub filter_synthesis: FilterSet,
    pub filter_by_year: FilterSet,
    pub adequacy_patch_mode: AdequacyPatchMode,
    pub spread_unsupplied_energy_cost: f64,
    pub spread_spilled_energy_cost: f64,
}

impl Default for AreaProperties {
    fn default() -> Self {
        Self {
            energy_cost_unsupplied: 0.0,
            energy_cost_spilled: 0.0,
            non_dispatch_power: true,
            dispatch_hydro_power: true,
            other_dispatch_power: true,
            filter_synthesis: default_filtering(),
            filter_by_year: default_filtering(),
            adequacy_patch_mode: AdequacyPatchMode::default(),
            spread_unsupplied_energy_cost: 0.0,
            spread_spilled_energy_cost: 0.0,
        }
    }
}

impl AreaProperties {
    pub fn from_update(&self, update: &AreaPropertiesUpdate) -> Self {
        Self {
            energy_cost_unsupplied: update.energy_cost_unsupplied.unwrap_or(self.energy_cost_unsupplied),
            energy_cost_spilled: update.energy_cost_spilled.unwrap_or(self.energy_cost_spilled),
            non_dispatch_power: update.non_dispatch_power.unwrap_or(self.non_dispatch_power),
            dispatch_hydro_power: update.dispatch_hydro_power.unwrap_or(self.dispatch_hydro_power),
            other_dispatch_power: update.other_dispatch_power.unwrap_or(self.other_dispatch_power),
            filter_synthesis: update
                .filter_synthesis
                .clone()
                .unwrap_or_else(|| self.filter_synthesis.clone()),
            filter_by_year: update
                .filter_by_year
                .clone()
                .unwrap_or_else(|| self.filter_by_year.clone()),
            adequacy_patch_mode: update.adequacy_patch_mode.unwrap_or(self.adequacy_patch_mode),
            spread_unsupplied_energy_cost: update
                .spread_unsupplied_energy_cost
                .unwrap_or(self.spread_unsupplied_energy_cost),
            spread_spilled_energy_cost: update
                .spread_spilled_energy_cost
                .unwrap_or(self.spread_spilled_energy_cost),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaPropertiesUpdate {
    pub energy_cost_unsupplied: Option<f64>,
    pub energy_cost_spilled: Option<f64>,
    pub non_dispatch_power: Option<bool>,
    pub dispatch_hydro_power: Option<bool>,
    pub other_dispatch_power: Option<bool>,
    pub filter_synthesis: Option<FilterSet>,
    pub filter_by_year: Option<FilterSet>,
    pub adequacy_patch_mode: Option<AdequacyPatchMode>,
    pub spread_unsupplied_energy_cost: Option<f64>,
    pub spread_spilled_energy_cost: Option<f64>,
}

/// Position and color of the area node in the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaUi {
    pub x: i32,
    pub y: i32,
    pub color_rgb: [u8; 3],
}

impl Default for AreaUi {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            color_rgb: [230, 108, 44],
        }
    }
}

impl AreaUi {
    pub fn from_update(&self, update: &AreaUiUpdate) -> Self {
        Self {
            x: update.x.unwrap_or(self.x),
            y: update.y.unwrap_or(self.y),
            color_rgb: update.color_rgb.unwrap_or(self.color_rgb),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaUiUpdate {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub color_rgb: Option<[u8; 3]>,
}

/// An electrical node: demand, generation clusters and hydro description.
///
/// Child clusters are keyed by their id. Mutations delegate to the study's
/// services and keep the in-memory maps in sync.
#[derive(Clone)]
pub struct Area {
    services: StudyServices,
    name: String,
    id: String,
    properties: AreaProperties,
    ui: AreaUi,
    thermals: BTreeMap<String, ThermalCluster>,
    renewables: BTreeMap<String, RenewableCluster>,
    st_storages: BTreeMap<String, STStorage>,
    hydro: Hydro,
}

impl Area {
    pub fn new(
        services: StudyServices,
        name: impl Into<String>,
        properties: AreaProperties,
        ui: AreaUi,
    ) -> Self {
        let name = name.into();
        let id = transform_name_to_id(&name);
        let hydro = Hydro::new(services.hydro.clone(), id.clone(), Default::default(), Default::default());
        Self {
            services,
            name,
            id,
            properties,
            ui,
            thermals: BTreeMap::new(),
            renewables: BTreeMap::new(),
            st_storages: BTreeMap::new(),
            hydro,
        }
    }

    /// Rebuild a full area from what a backend read from storage.
    pub(crate) fn from_data(services: StudyServices, data: AreaData) -> Self {
        let id = transform_name_to_id(&data.name);
        let thermals = data
            .thermals
            .into_iter()
            .map(|c| {
                let cluster = ThermalCluster::new(services.thermal.clone(), id.clone(), c.name, c.properties);
                (cluster.id().to_string(), cluster)
            })
            .collect();
        let renewables = data
            .renewables
            .into_iter()
            .map(|c| {
                let cluster = RenewableCluster::new(services.renewable.clone(), id.clone(), c.name, c.properties);
                (cluster.id().to_string(), cluster)
            })
            .collect();
        let st_storages = data
            .st_storages
            .into_iter()
            .map(|c| {
                let storage = STStorage::new(services.st_storage.clone(), id.clone(), c.name, c.properties);
                (storage.id().to_string(), storage)
            })
            .collect();
        let hydro = Hydro::new(
            services.hydro.clone(),
            id.clone(),
            data.hydro_properties,
            data.inflow_structure,
        );
        Self {
            services,
            name: data.name,
            id,
            properties: data.properties,
            ui: data.ui,
            thermals,
            renewables,
            st_storages,
            hydro,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &AreaProperties {
        &self.properties
    }

    pub fn ui(&self) -> &AreaUi {
        &self.ui
    }

    pub fn thermals(&self) -> &BTreeMap<String, ThermalCluster> {
        &self.thermals
    }

    pub fn get_thermal(&self, cluster_id: &str) -> Option<&ThermalCluster> {
        self.thermals.get(cluster_id)
    }

    pub fn get_thermal_mut(&mut self, cluster_id: &str) -> Option<&mut ThermalCluster> {
        self.thermals.get_mut(cluster_id)
    }

    pub fn renewables(&self) -> &BTreeMap<String, RenewableCluster> {
        &self.renewables
    }

    pub fn get_renewable_mut(&mut self, cluster_id: &str) -> Option<&mut RenewableCluster> {
        self.renewables.get_mut(cluster_id)
    }

    pub fn st_storages(&self) -> &BTreeMap<String, STStorage> {
        &self.st_storages
    }

    pub fn get_st_storage_mut(&mut self, storage_id: &str) -> Option<&mut STStorage> {
        self.st_storages.get_mut(storage_id)
    }

    pub fn hydro(&self) -> &Hydro {
        &self.hydro
    }

    pub fn hydro_mut(&mut self) -> &mut Hydro {
        &mut self.hydro
    }

    pub async fn update_properties(&mut self, update: AreaPropertiesUpdate) -> Result<&AreaProperties> {
        self.properties = self.services.area.update_area_properties(&self.id, &update).await?;
        Ok(&self.properties)
    }

    pub async fn update_ui(&mut self, update: AreaUiUpdate) -> Result<&AreaUi> {
        self.ui = self.services.area.update_area_ui(&self.id, &update).await?;
        Ok(&self.ui)
    }

    pub async fn create_thermal_cluster(
        &mut self,
        name: &str,
        properties: Option<ThermalClusterProperties>,
    ) -> Result<&ThermalCluster> {
        let properties = self
            .services
            .area
            .create_thermal_cluster(&self.id, name, properties)
            .await?;
        let cluster = ThermalCluster::new(self.services.thermal.clone(), self.id.clone(), name, properties);
        let cluster_id = cluster.id().to_string();
        self.thermals.insert(cluster_id.clone(), cluster);
        Ok(&self.thermals[&cluster_id])
    }

    pub async fn create_renewable_cluster(
        &mut self,
        name: &str,
        properties: Option<RenewableClusterProperties>,
    ) -> Result<&RenewableCluster> {
        let properties = self
            .services
            .area
            .create_renewable_cluster(&self.id, name, properties)
            .await?;
        let cluster = RenewableCluster::new(self.services.renewable.clone(), self.id.clone(), name, properties);
        let cluster_id = cluster.id().to_string();
        self.renewables.insert(cluster_id.clone(), cluster);
        Ok(&self.renewables[&cluster_id])
    }

    pub async fn create_st_storage(
        &mut self,
        name: &str,
        properties: Option<STStorageProperties>,
    ) -> Result<&STStorage> {
        let properties = self
            .services
            .area
            .create_st_storage(&self.id, name, properties)
            .await?;
        let storage = STStorage::new(self.services.st_storage.clone(), self.id.clone(), name, properties);
        let storage_id = storage.id().to_string();
        self.st_storages.insert(storage_id.clone(), storage);
        Ok(&self.st_storages[&storage_id])
    }

    pub async fn delete_thermal_clusters(&mut self, cluster_ids: &[String]) -> Result<()> {
        for cluster_id in cluster_ids {
            if !self.thermals.contains_key(cluster_id) {
                return Err(StudyError::ThermalDeletion {
                    area_id: self.id.clone(),
                    names: cluster_ids.to_vec(),
                    cause: format!("unknown cluster {cluster_id}"),
                });
            }
        }
        self.services.area.delete_thermal_clusters(&self.id, cluster_ids).await?;
        for cluster_id in cluster_ids {
            self.thermals.remove(cluster_id);
        }
        Ok(())
    }

    pub async fn delete_renewable_clusters(&mut self, cluster_ids: &[String]) -> Result<()> {
        self.services
            .area
            .delete_renewable_clusters(&self.id, cluster_ids)
            .await?;
        for cluster_id in cluster_ids {
            self.renewables.remove(cluster_id);
        }
        Ok(())
    }

    pub async fn delete_st_storages(&mut self, storage_ids: &[String]) -> Result<()> {
        self.services.area.delete_st_storages(&self.id, storage_ids).await?;
        for storage_id in storage_ids {
            self.st_storages.remove(storage_id);
        }
        Ok(())
    }

    pub async fn get_load_matrix(&self) -> Result<Matrix> {
        self.services.area.get_area_matrix(&self.id, AreaMatrixName::Load).await
    }

    pub async fn set_load(&self, series: &Matrix) -> Result<()> {
        self.services
            .area
            .set_area_matrix(&self.id, AreaMatrixName::Load, series)
            .await
    }

    pub async fn get_wind_matrix(&self) -> Result<Matrix> {
        self.services.area.get_area_matrix(&self.id, AreaMatrixName::Wind).await
    }

    pub async fn set_wind(&self, series: &Matrix) -> Result<()> {
        self.services
            .area
            .set_area_matrix(&self.id, AreaMatrixName::Wind, series)
            .await
    }

    pub async fn get_solar_matrix(&self) -> Result<Matrix> {
        self.services.area.get_area_matrix(&self.id, AreaMatrixName::Solar).await
    }

    pub async fn set_solar(&self, series: &Matrix) -> Result<()> {
        self.services
            .area
            .set_area_matrix(&self.id, AreaMatrixName::Solar, series)
            .await
    }

    pub async fn get_reserves_matrix(&self) -> Result<Matrix> {
        self.services
            .area
            .get_area_matrix(&self.id, AreaMatrixName::Reserves)
            .await
    }

    pub async fn set_reserves(&self, series: &Matrix) -> Result<()> {
        self.services
            .area
            .set_area_matrix(&self.id, AreaMatrixName::Reserves, series)
            .await
    }

    pub async fn get_misc_gen_matrix(&self) -> Result<Matrix> {
        self.services
            .area
            .get_area_matrix(&self.id, AreaMatrixName::MiscGen)
            .await
    }

    pub async fn set_misc_gen(&self, series: &Matrix) -> Result<()> {
        self.services
            .area
            .set_area_matrix(&self.id, AreaMatrixName::MiscGen, series)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_id_is_normalized() {
        let area = Area::new(
            crate::service::tests::stub_services(),
            "DE east",
            AreaProperties::default(),
            AreaUi::default(),
        );
        assert_eq!(area.id(), "de east");
        assert_eq!(area.name(), "DE east");
    }

    #[test]
    fn ui_merge_keeps_unset_fields() {
        let ui = AreaUi::default().from_update(&AreaUiUpdate {
            x: Some(42),
            ..Default::default()
        });
        assert_eq!(ui.x, 42);
        assert_eq!(ui.color_rgb, [230, 108, 44]);
    }
}
