//! Area service over the study directory: the area list, the per-area ini
//! files and the cluster lists.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::area::{AreaProperties, AreaPropertiesUpdate, AreaUi, AreaUiUpdate};
use crate::model::commons::transform_name_to_id;
use crate::model::hydro::{HydroProperties, InflowStructure};
use crate::model::matrix::Matrix;
use crate::model::renewable::RenewableClusterProperties;
use crate::model::st_storage::STStorageProperties;
use crate::model::thermal::ThermalClusterProperties;
use crate::service::{
    AreaData, AreaMatrixName, AreaService, RenewableClusterData, STStorageData, ThermalClusterData,
};
use crate::utils::error::{Result, StudyError};

use super::cluster::find_cluster_section;
use super::ini::{ini_error, read_ini, write_ini, IniMap};
use super::matrix::{read_matrix, write_matrix};
use super::models;
use super::LocalContext;

const UNSERVED_COST_SECTION: &str = "unserverdenergycost";
const SPILLED_COST_SECTION: &str = "spilledenergycost";

pub struct AreaLocalService {
    context: Arc<LocalContext>,
}

impl AreaLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }

    fn read_area_names(&self) -> Result<Vec<String>> {
        let path = self.context.paths.areas_list();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn write_area_names(&self, names: &[String]) -> Result<()> {
        let path = self.context.paths.areas_list();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = names.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&path, content)?;
        Ok(())
    }

    fn write_area_files(&self, area_id: &str, properties: &AreaProperties, ui: &AreaUi) -> Result<()> {
        let paths = &self.context.paths;
        fs::create_dir_all(paths.area_dir(area_id))?;
        write_ini(&paths.area_optimization(area_id), &models::area_optimization_to_ini(properties))?;
        write_ini(&paths.area_adequacy_patch(area_id), &models::area_adequacy_to_ini(properties))?;
        write_ini(&paths.area_ui(area_id), &models::area_ui_to_ini(ui))?;

        let costs_path = paths.thermal_areas();
        let mut costs = read_ini(&costs_path)?;
        costs
            .ensure_section(UNSERVED_COST_SECTION)
            .set_f64_6(area_id, properties.energy_cost_unsupplied);
        costs
            .ensure_section(SPILLED_COST_SECTION)
            .set_f64_6(area_id, properties.energy_cost_spilled);
        write_ini(&costs_path, &costs)?;
        Ok(())
    }

    fn read_area_properties(&self, area_id: &str) -> Result<AreaProperties> {
        let paths = &self.context.paths;
        let optimization = read_ini(&paths.area_optimization(area_id))?;
        let adequacy = read_ini(&paths.area_adequacy_patch(area_id))?;
        let costs = read_ini(&paths.thermal_areas())?;
        let cost_of = |section: &str| -> Result<f64> {
            match costs.section(section) {
                Some(s) => s
                    .get_f64(area_id)
                    .map(|value| value.unwrap_or(0.0))
                    .map_err(|cause| ini_error(&paths.thermal_areas(), cause)),
                None => Ok(0.0),
            }
        };
        models::area_properties_from_ini(
            &optimization,
            &adequacy,
            cost_of(UNSERVED_COST_SECTION)?,
            cost_of(SPILLED_COST_SECTION)?,
        )
        .map_err(|cause| ini_error(&paths.area_optimization(area_id), cause))
    }

    fn read_thermals(&self, area_id: &str) -> Result<Vec<ThermalClusterData>> {
        let path = self.context.paths.thermal_list(area_id);
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(name, section)| {
                models::thermal_from_section(section)
                    .map(|properties| ThermalClusterData {
                        name: name.to_string(),
                        properties,
                    })
                    .map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn read_renewables(&self, area_id: &str) -> Result<Vec<RenewableClusterData>> {
        let path = self.context.paths.renewable_list(area_id);
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(name, section)| {
                models::renewable_from_section(section)
                    .map(|properties| RenewableClusterData {
                        name: name.to_string(),
                        properties,
                    })
                    .map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn read_st_storages(&self, area_id: &str) -> Result<Vec<STStorageData>> {
        let path = self.context.paths.st_storage_list(area_id);
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(name, section)| {
                models::st_storage_from_section(section, self.context.version)
                    .map(|properties| STStorageData {
                        name: name.to_string(),
                        properties,
                    })
                    .map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn remove_area_everywhere(&self, area_id: &str) -> Result<()> {
        let paths = &self.context.paths;

        // Per-area directories.
        for dir in [
            paths.area_dir(area_id),
            paths.links_dir(area_id),
            paths.thermal_list(area_id).parent().map(Into::into).unwrap_or_default(),
            paths.renewable_list(area_id).parent().map(Into::into).unwrap_or_default(),
            paths.st_storage_list(area_id).parent().map(Into::into).unwrap_or_default(),
        ] {
            if dir.as_os_str().is_empty() || !dir.exists() {
                continue;
            }
            fs::remove_dir_all(&dir)?;
        }

        // Costs.
        let costs_path = paths.thermal_areas();
        let mut costs = read_ini(&costs_path)?;
        for section in [UNSERVED_COST_SECTION, SPILLED_COST_SECTION] {
            if let Some(s) = costs.section_mut(section) {
                s.remove(area_id);
            }
        }
        write_ini(&costs_path, &costs)?;

        // Hydro entries.
        let hydro_path = paths.hydro_ini();
        let mut hydro = read_ini(&hydro_path)?;
        models::hydro_remove_area(&mut hydro, area_id);
        write_ini(&hydro_path, &hydro)?;

        // Links pointing at the deleted area from other areas.
        let links_root = paths.root().join("input").join("links");
        if links_root.exists() {
            for entry in fs::read_dir(&links_root)? {
                let entry = entry?;
                let properties_path = entry.path().join("properties.ini");
                if !properties_path.is_file() {
                    continue;
                }
                let mut ini = read_ini(&properties_path)?;
                if ini.remove_section(area_id).is_some() {
                    write_ini(&properties_path, &ini)?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AreaService for AreaLocalService {
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
        let area_id = transform_name_to_id(name);
        let mut names = self.read_area_names()?;
        if names.iter().any(|existing| transform_name_to_id(existing) == area_id) {
            return Err(error("area already exists".to_string()));
        }

        let properties = properties.unwrap_or_default();
        let ui = ui.unwrap_or_default();
        self.write_area_files(&area_id, &properties, &ui)?;

        // Default hydro description, so the area always reads back complete.
        let hydro_path = self.context.paths.hydro_ini();
        let mut hydro = read_ini(&hydro_path)?;
        models::hydro_properties_to_ini(
            &mut hydro,
            &area_id,
            &HydroProperties::default(),
            self.context.version,
        )
        .map_err(|cause| error(cause))?;
        write_ini(&hydro_path, &hydro)?;
        write_ini(
            &self.context.paths.hydro_prepro_ini(&area_id),
            &models::inflow_structure_to_ini(&InflowStructure::default()),
        )?;

        let mut allocation = IniMap::new();
        allocation.ensure_section("allocation").set(&area_id, 1);
        write_ini(&self.context.paths.hydro_allocation(&area_id), &allocation)?;

        names.push(name.to_string());
        names.sort_by_key(|name| transform_name_to_id(name));
        self.write_area_names(&names)?;

        info!(area = name, "created area");
        Ok((properties, ui))
    }

    async fn update_area_properties(
        &self,
        area_id: &str,
        update: &AreaPropertiesUpdate,
    ) -> Result<AreaProperties> {
        let current = self.read_area_properties(area_id)?;
        let updated = current.from_update(update);
        self.write_area_files(area_id, &updated, &self.read_area_ui(area_id)?)?;
        debug!(area_id, "updated area properties");
        Ok(updated)
    }

    async fn update_area_ui(&self, area_id: &str, update: &AreaUiUpdate) -> Result<AreaUi> {
        let current = self.read_area_ui(area_id)?;
        let updated = current.from_update(update);
        write_ini(&self.context.paths.area_ui(area_id), &models::area_ui_to_ini(&updated))?;
        debug!(area_id, "updated area ui");
        Ok(updated)
    }

    async fn delete_area(&self, area_id: &str) -> Result<()> {
        let names = self.read_area_names()?;
        let remaining: Vec<String> = names
            .iter()
            .filter(|name| transform_name_to_id(name) != area_id)
            .cloned()
            .collect();
        if remaining.len() == names.len() {
            return Err(StudyError::AreaDeletion {
                area_id: area_id.to_string(),
                cause: "area does not exist".to_string(),
            });
        }
        self.remove_area_everywhere(area_id)?;
        self.write_area_names(&remaining)?;
        info!(area_id, "deleted area");
        Ok(())
    }

    async fn create_thermal_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<ThermalClusterProperties>,
    ) -> Result<ThermalClusterProperties> {
        let path = self.context.paths.thermal_list(area_id);
        let mut ini = read_ini(&path)?;
        if find_cluster_section(&ini, &transform_name_to_id(name)).is_some() {
            return Err(StudyError::ThermalCreation {
                name: name.to_string(),
                area_id: area_id.to_string(),
                cause: "cluster already exists".to_string(),
            });
        }
        let properties = properties.unwrap_or_default();
        *ini.ensure_section(name) = models::thermal_to_section(name, &properties);
        write_ini(&path, &ini)?;
        debug!(area_id, cluster = name, "created thermal cluster");
        Ok(properties)
    }

    async fn create_renewable_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<RenewableClusterProperties>,
    ) -> Result<RenewableClusterProperties> {
        let path = self.context.paths.renewable_list(area_id);
        let mut ini = read_ini(&path)?;
        if find_cluster_section(&ini, &transform_name_to_id(name)).is_some() {
            return Err(StudyError::RenewableCreation {
                name: name.to_string(),
                area_id: area_id.to_string(),
                cause: "cluster already exists".to_string(),
            });
        }
        let properties = properties.unwrap_or_default();
        *ini.ensure_section(name) = models::renewable_to_section(name, &properties);
        write_ini(&path, &ini)?;
        debug!(area_id, cluster = name, "created renewable cluster");
        Ok(properties)
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
        let path = self.context.paths.st_storage_list(area_id);
        let mut ini = read_ini(&path)?;
        if find_cluster_section(&ini, &transform_name_to_id(name)).is_some() {
            return Err(error("storage already exists".to_string()));
        }
        let properties = properties.unwrap_or_default();
        let section = models::st_storage_to_section(name, &properties, self.context.version)
            .map_err(|cause| error(cause))?;
        *ini.ensure_section(name) = section;
        write_ini(&path, &ini)?;
        debug!(area_id, storage = name, "created short term storage");
        Ok(properties)
    }

    async fn delete_thermal_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()> {
        let path = self.context.paths.thermal_list(area_id);
        let mut ini = read_ini(&path)?;
        for cluster_id in cluster_ids {
            let section_name = find_cluster_section(&ini, cluster_id).ok_or_else(|| {
                StudyError::ThermalDeletion {
                    names: cluster_ids.to_vec(),
                    area_id: area_id.to_string(),
                    cause: format!("cluster {cluster_id} does not exist"),
                }
            })?;
            ini.remove_section(&section_name);
        }
        write_ini(&path, &ini)?;
        debug!(area_id, ?cluster_ids, "deleted thermal clusters");
        Ok(())
    }

    async fn delete_renewable_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()> {
        let path = self.context.paths.renewable_list(area_id);
        let mut ini = read_ini(&path)?;
        for cluster_id in cluster_ids {
            let section_name = find_cluster_section(&ini, cluster_id).ok_or_else(|| {
                StudyError::RenewableDeletion {
                    names: cluster_ids.to_vec(),
                    area_id: area_id.to_string(),
                    cause: format!("cluster {cluster_id} does not exist"),
                }
            })?;
            ini.remove_section(&section_name);
        }
        write_ini(&path, &ini)?;
        debug!(area_id, ?cluster_ids, "deleted renewable clusters");
        Ok(())
    }

    async fn delete_st_storages(&self, area_id: &str, storage_ids: &[String]) -> Result<()> {
        let path = self.context.paths.st_storage_list(area_id);
        let mut ini = read_ini(&path)?;
        for storage_id in storage_ids {
            let section_name = find_cluster_section(&ini, storage_id).ok_or_else(|| {
                StudyError::STStorageDeletion {
                    names: storage_ids.to_vec(),
                    area_id: area_id.to_string(),
                    cause: format!("storage {storage_id} does not exist"),
                }
            })?;
            ini.remove_section(&section_name);
        }
        write_ini(&path, &ini)?;
        debug!(area_id, ?storage_ids, "deleted short term storages");
        Ok(())
    }

    async fn get_area_matrix(&self, area_id: &str, matrix: AreaMatrixName) -> Result<Matrix> {
        read_matrix(&self.context.paths.area_matrix(area_id, matrix))
    }

    async fn set_area_matrix(
        &self,
        area_id: &str,
        matrix: AreaMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(&self.context.paths.area_matrix(area_id, matrix), series)
    }

    async fn read_areas(&self) -> Result<Vec<AreaData>> {
        let hydro_ini = read_ini(&self.context.paths.hydro_ini())?;
        let mut areas = Vec::new();
        for name in self.read_area_names()? {
            let area_id = transform_name_to_id(&name);
            let hydro_properties =
                models::hydro_properties_from_ini(&hydro_ini, &area_id, self.context.version)
                    .map_err(|cause| StudyError::HydroPropertiesRead {
                        area_id: area_id.clone(),
                        cause,
                    })?;
            let prepro_path = self.context.paths.hydro_prepro_ini(&area_id);
            let inflow_structure = models::inflow_structure_from_ini(&read_ini(&prepro_path)?)
                .map_err(|cause| ini_error(&prepro_path, cause))?;
            areas.push(AreaData {
                properties: self.read_area_properties(&area_id)?,
                ui: self.read_area_ui(&area_id)?,
                thermals: self.read_thermals(&area_id)?,
                renewables: self.read_renewables(&area_id)?,
                st_storages: self.read_st_storages(&area_id)?,
                hydro_properties,
                inflow_structure,
                name,
            });
        }
        Ok(areas)
    }
}

impl AreaLocalService {
    fn read_area_ui(&self, area_id: &str) -> Result<AreaUi> {
        let path = self.context.paths.area_ui(area_id);
        models::area_ui_from_ini(&read_ini(&path)?).map_err(|cause| ini_error(&path, cause))
    }
}
