//! Backend abstraction: one set of async traits, implemented twice — against
//! the AntaresWeb REST API and against a study directory on disk.
//!
//! The traits deal in plain data (property structs and the `*Data` carriers);
//! entities are assembled on top of them by [`crate::study::Study`].

pub mod api;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::area::{AreaProperties, AreaPropertiesUpdate, AreaUi, AreaUiUpdate};
use crate::model::binding_constraint::{
    BindingConstraintProperties, BindingConstraintPropertiesUpdate, ConstraintMatrixName,
    ConstraintTerm,
};
use crate::model::hydro::{HydroMatrixName, HydroProperties, HydroPropertiesUpdate, InflowStructure};
use crate::model::link::{LinkMatrixName, LinkProperties, LinkPropertiesUpdate, LinkUi, LinkUiUpdate};
use crate::model::matrix::Matrix;
use crate::model::renewable::{RenewableClusterProperties, RenewableClusterPropertiesUpdate};
use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{StudySettings, StudySettingsUpdate};
use crate::model::simulation::{AntaresSimulationParameters, Job};
use crate::model::st_storage::{STStorageMatrixName, STStorageProperties, STStoragePropertiesUpdate};
use crate::model::thermal::{
    ThermalClusterMatrixName, ThermalClusterProperties, ThermalClusterPropertiesUpdate,
};
use crate::model::xpansion::{
    XpansionCandidate, XpansionCandidateUpdate, XpansionConfigurationData, XpansionConstraint,
    XpansionConstraintUpdate, XpansionSensitivity, XpansionSensitivityUpdate, XpansionSettings,
    XpansionSettingsUpdate,
};
use crate::utils::error::Result;

/// Area-level time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaMatrixName {
    Load,
    Wind,
    Solar,
    Reserves,
    MiscGen,
}

impl AreaMatrixName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Wind => "wind",
            Self::Solar => "solar",
            Self::Reserves => "reserves",
            Self::MiscGen => "misc-gen",
        }
    }
}

/// Everything a backend knows about one area, as read from storage.
#[derive(Debug, Clone, Default)]
pub struct AreaData {
    pub name: String,
    pub properties: AreaProperties,
    pub ui: AreaUi,
    pub thermals: Vec<ThermalClusterData>,
    pub renewables: Vec<RenewableClusterData>,
    pub st_storages: Vec<STStorageData>,
    pub hydro_properties: HydroProperties,
    pub inflow_structure: InflowStructure,
}

#[derive(Debug, Clone)]
pub struct ThermalClusterData {
    pub name: String,
    pub properties: ThermalClusterProperties,
}

#[derive(Debug, Clone)]
pub struct RenewableClusterData {
    pub name: String,
    pub properties: RenewableClusterProperties,
}

#[derive(Debug, Clone)]
pub struct STStorageData {
    pub name: String,
    pub properties: STStorageProperties,
}

#[derive(Debug, Clone)]
pub struct LinkData {
    pub area_from: String,
    pub area_to: String,
    pub properties: LinkProperties,
    pub ui: LinkUi,
}

#[derive(Debug, Clone)]
pub struct ConstraintData {
    pub name: String,
    pub properties: BindingConstraintProperties,
    pub terms: Vec<ConstraintTerm>,
}

#[async_trait]
pub trait AreaService: Send + Sync {
    /// Creates an area and returns its normalized properties and ui.
    async fn create_area(
        &self,
        name: &str,
        properties: Option<AreaProperties>,
        ui: Option<AreaUi>,
    ) -> Result<(AreaProperties, AreaUi)>;

    async fn update_area_properties(
        &self,
        area_id: &str,
        update: &AreaPropertiesUpdate,
    ) -> Result<AreaProperties>;

    async fn update_area_ui(&self, area_id: &str, update: &AreaUiUpdate) -> Result<AreaUi>;

    async fn delete_area(&self, area_id: &str) -> Result<()>;

    async fn create_thermal_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<ThermalClusterProperties>,
    ) -> Result<ThermalClusterProperties>;

    async fn create_renewable_cluster(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<RenewableClusterProperties>,
    ) -> Result<RenewableClusterProperties>;

    async fn create_st_storage(
        &self,
        area_id: &str,
        name: &str,
        properties: Option<STStorageProperties>,
    ) -> Result<STStorageProperties>;

    async fn delete_thermal_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()>;

    async fn delete_renewable_clusters(&self, area_id: &str, cluster_ids: &[String]) -> Result<()>;

    async fn delete_st_storages(&self, area_id: &str, storage_ids: &[String]) -> Result<()>;

    async fn get_area_matrix(&self, area_id: &str, matrix: AreaMatrixName) -> Result<Matrix>;

    async fn set_area_matrix(
        &self,
        area_id: &str,
        matrix: AreaMatrixName,
        series: &Matrix,
    ) -> Result<()>;

    /// Reads every area of the study, clusters and hydro included.
    async fn read_areas(&self) -> Result<Vec<AreaData>>;
}

#[async_trait]
pub trait LinkService: Send + Sync {
    async fn create_link(
        &self,
        area_from: &str,
        area_to: &str,
        properties: Option<LinkProperties>,
        ui: Option<LinkUi>,
    ) -> Result<(LinkProperties, LinkUi)>;

    async fn update_link_properties(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkPropertiesUpdate,
    ) -> Result<LinkProperties>;

    async fn update_link_ui(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkUiUpdate,
    ) -> Result<LinkUi>;

    async fn delete_link(&self, area_from_id: &str, area_to_id: &str) -> Result<()>;

    async fn get_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
    ) -> Result<Matrix>;

    async fn set_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
        series: &Matrix,
    ) -> Result<()>;

    async fn read_links(&self) -> Result<Vec<LinkData>>;
}

#[async_trait]
pub trait ThermalService: Send + Sync {
    async fn update_thermal_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &ThermalClusterPropertiesUpdate,
    ) -> Result<ThermalClusterProperties>;

    async fn get_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
    ) -> Result<Matrix>;

    async fn set_thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
        series: &Matrix,
    ) -> Result<()>;
}

#[async_trait]
pub trait RenewableService: Send + Sync {
    async fn update_renewable_properties(
        &self,
        area_id: &str,
        cluster_id: &str,
        update: &RenewableClusterPropertiesUpdate,
    ) -> Result<RenewableClusterProperties>;

    async fn get_renewable_series(&self, area_id: &str, cluster_id: &str) -> Result<Matrix>;

    async fn set_renewable_series(
        &self,
        area_id: &str,
        cluster_id: &str,
        series: &Matrix,
    ) -> Result<()>;
}

#[async_trait]
pub trait STStorageService: Send + Sync {
    async fn update_st_storage_properties(
        &self,
        area_id: &str,
        storage_id: &str,
        update: &STStoragePropertiesUpdate,
    ) -> Result<STStorageProperties>;

    async fn get_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
    ) -> Result<Matrix>;

    async fn set_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
        series: &Matrix,
    ) -> Result<()>;
}

#[async_trait]
pub trait HydroService: Send + Sync {
    async fn update_hydro_properties(
        &self,
        area_id: &str,
        update: &HydroPropertiesUpdate,
    ) -> Result<HydroProperties>;

    async fn update_inflow_structure(
        &self,
        area_id: &str,
        inflow_structure: &InflowStructure,
    ) -> Result<()>;

    async fn get_hydro_matrix(&self, area_id: &str, matrix: HydroMatrixName) -> Result<Matrix>;

    async fn set_hydro_matrix(
        &self,
        area_id: &str,
        matrix: HydroMatrixName,
        series: &Matrix,
    ) -> Result<()>;
}

#[async_trait]
pub trait BindingConstraintService: Send + Sync {
    async fn create_binding_constraint(
        &self,
        name: &str,
        properties: Option<BindingConstraintProperties>,
        terms: &[ConstraintTerm],
    ) -> Result<ConstraintData>;

    async fn update_binding_constraint_properties(
        &self,
        constraint_id: &str,
        update: &BindingConstraintPropertiesUpdate,
    ) -> Result<BindingConstraintProperties>;

    /// Adds terms and returns them as stored, so callers can key them by id.
    async fn add_constraint_terms(
        &self,
        constraint_id: &str,
        terms: &[ConstraintTerm],
    ) -> Result<Vec<ConstraintTerm>>;

    async fn delete_constraint_term(&self, constraint_id: &str, term_id: &str) -> Result<()>;

    async fn get_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
    ) -> Result<Matrix>;

    async fn update_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
        series: &Matrix,
    ) -> Result<()>;

    async fn read_binding_constraints(&self) -> Result<Vec<ConstraintData>>;
}

#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn read_study_settings(&self) -> Result<StudySettings>;

    /// Persists an update; the caller merges it into its cached settings.
    async fn edit_study_settings(
        &self,
        current: &StudySettings,
        update: &StudySettingsUpdate,
    ) -> Result<()>;

    async fn get_scenario_builder(&self, nb_years: u32) -> Result<ScenarioBuilder>;

    async fn set_scenario_builder(&self, scenario_builder: &ScenarioBuilder) -> Result<()>;
}

#[async_trait]
pub trait StudyService: Send + Sync {
    /// Deletes the study itself. `children` also removes variants on the
    /// web backend.
    async fn delete(&self, children: bool) -> Result<()>;

    async fn delete_binding_constraint(&self, constraint_id: &str) -> Result<()>;

    /// Creates a variant and returns its id. Only meaningful on the web
    /// backend.
    async fn create_variant(&self, name: &str) -> Result<String>;
}

#[async_trait]
pub trait RunService: Send + Sync {
    async fn run_antares_simulation(
        &self,
        parameters: Option<AntaresSimulationParameters>,
    ) -> Result<Job>;

    /// Polls until the job reaches a terminal state or `time_out` seconds
    /// have elapsed.
    async fn wait_job_completion(&self, job: &Job, time_out: u64) -> Result<Job>;
}

#[async_trait]
pub trait XpansionService: Send + Sync {
    async fn create_xpansion_configuration(&self) -> Result<XpansionConfigurationData>;

    async fn read_xpansion_configuration(&self) -> Result<Option<XpansionConfigurationData>>;

    async fn delete_xpansion_configuration(&self) -> Result<()>;

    async fn create_candidate(&self, candidate: &XpansionCandidate) -> Result<XpansionCandidate>;

    async fn update_candidate(
        &self,
        name: &str,
        update: &XpansionCandidateUpdate,
    ) -> Result<XpansionCandidate>;

    async fn delete_candidates(&self, names: &[String]) -> Result<()>;

    async fn create_constraint(
        &self,
        constraint: &XpansionConstraint,
        file_name: &str,
    ) -> Result<XpansionConstraint>;

    async fn update_constraint(
        &self,
        name: &str,
        update: &XpansionConstraintUpdate,
        file_name: &str,
    ) -> Result<XpansionConstraint>;

    async fn delete_constraints(&self, names: &[String], file_name: &str) -> Result<()>;

    async fn update_xpansion_settings(
        &self,
        update: &XpansionSettingsUpdate,
    ) -> Result<XpansionSettings>;

    async fn update_sensitivity(
        &self,
        update: &XpansionSensitivityUpdate,
    ) -> Result<XpansionSensitivity>;
}

/// The full set of backend services for one study. Cloning is cheap, every
/// field is an `Arc`.
#[derive(Clone)]
pub struct StudyServices {
    pub area: Arc<dyn AreaService>,
    pub link: Arc<dyn LinkService>,
    pub thermal: Arc<dyn ThermalService>,
    pub renewable: Arc<dyn RenewableService>,
    pub st_storage: Arc<dyn STStorageService>,
    pub hydro: Arc<dyn HydroService>,
    pub binding_constraint: Arc<dyn BindingConstraintService>,
    pub settings: Arc<dyn SettingsService>,
    pub study: Arc<dyn StudyService>,
    pub run: Arc<dyn RunService>,
    pub xpansion: Arc<dyn XpansionService>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A backend that panics on use. Good enough for tests that only
    /// construct entities.
    struct StubService;

    #[async_trait]
    impl AreaService for StubService {
        async fn create_area(
            &self,
            _name: &str,
            _properties: Option<AreaProperties>,
            _ui: Option<AreaUi>,
        ) -> Result<(AreaProperties, AreaUi)> {
            unimplemented!("stub backend")
        }

        async fn update_area_properties(
            &self,
            _area_id: &str,
            _update: &AreaPropertiesUpdate,
        ) -> Result<AreaProperties> {
            unimplemented!("stub backend")
        }

        async fn update_area_ui(&self, _area_id: &str, _update: &AreaUiUpdate) -> Result<AreaUi> {
            unimplemented!("stub backend")
        }

        async fn delete_area(&self, _area_id: &str) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn create_thermal_cluster(
            &self,
            _area_id: &str,
            _name: &str,
            _properties: Option<ThermalClusterProperties>,
        ) -> Result<ThermalClusterProperties> {
            unimplemented!("stub backend")
        }

        async fn create_renewable_cluster(
            &self,
            _area_id: &str,
            _name: &str,
            _properties: Option<RenewableClusterProperties>,
        ) -> Result<RenewableClusterProperties> {
            unimplemented!("stub backend")
        }

        async fn create_st_storage(
            &self,
            _area_id: &str,
            _name: &str,
            _properties: Option<STStorageProperties>,
        ) -> Result<STStorageProperties> {
            unimplemented!("stub backend")
        }

        async fn delete_thermal_clusters(
            &self,
            _area_id: &str,
            _cluster_ids: &[String],
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn delete_renewable_clusters(
            &self,
            _area_id: &str,
            _cluster_ids: &[String],
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn delete_st_storages(&self, _area_id: &str, _storage_ids: &[String]) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn get_area_matrix(&self, _area_id: &str, _matrix: AreaMatrixName) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_area_matrix(
            &self,
            _area_id: &str,
            _matrix: AreaMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn read_areas(&self) -> Result<Vec<AreaData>> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl LinkService for StubService {
        async fn create_link(
            &self,
            _area_from: &str,
            _area_to: &str,
            _properties: Option<LinkProperties>,
            _ui: Option<LinkUi>,
        ) -> Result<(LinkProperties, LinkUi)> {
            unimplemented!("stub backend")
        }

        async fn update_link_properties(
            &self,
            _area_from_id: &str,
            _area_to_id: &str,
            _update: &LinkPropertiesUpdate,
        ) -> Result<LinkProperties> {
            unimplemented!("stub backend")
        }

        async fn update_link_ui(
            &self,
            _area_from_id: &str,
            _area_to_id: &str,
            _update: &LinkUiUpdate,
        ) -> Result<LinkUi> {
            unimplemented!("stub backend")
        }

        async fn delete_link(&self, _area_from_id: &str, _area_to_id: &str) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn get_link_matrix(
            &self,
            _area_from_id: &str,
            _area_to_id: &str,
            _matrix: LinkMatrixName,
        ) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_link_matrix(
            &self,
            _area_from_id: &str,
            _area_to_id: &str,
            _matrix: LinkMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn read_links(&self) -> Result<Vec<LinkData>> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl ThermalService for StubService {
        async fn update_thermal_properties(
            &self,
            _area_id: &str,
            _cluster_id: &str,
            _update: &ThermalClusterPropertiesUpdate,
        ) -> Result<ThermalClusterProperties> {
            unimplemented!("stub backend")
        }

        async fn get_thermal_matrix(
            &self,
            _area_id: &str,
            _cluster_id: &str,
            _matrix: ThermalClusterMatrixName,
        ) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_thermal_matrix(
            &self,
            _area_id: &str,
            _cluster_id: &str,
            _matrix: ThermalClusterMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl RenewableService for StubService {
        async fn update_renewable_properties(
            &self,
            _area_id: &str,
            _cluster_id: &str,
            _update: &RenewableClusterPropertiesUpdate,
        ) -> Result<RenewableClusterProperties> {
            unimplemented!("stub backend")
        }

        async fn get_renewable_series(&self, _area_id: &str, _cluster_id: &str) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_renewable_series(
            &self,
            _area_id: &str,
            _cluster_id: &str,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl STStorageService for StubService {
        async fn update_st_storage_properties(
            &self,
            _area_id: &str,
            _storage_id: &str,
            _update: &STStoragePropertiesUpdate,
        ) -> Result<STStorageProperties> {
            unimplemented!("stub backend")
        }

        async fn get_storage_matrix(
            &self,
            _area_id: &str,
            _storage_id: &str,
            _matrix: STStorageMatrixName,
        ) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_storage_matrix(
            &self,
            _area_id: &str,
            _storage_id: &str,
            _matrix: STStorageMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl HydroService for StubService {
        async fn update_hydro_properties(
            &self,
            _area_id: &str,
            _update: &HydroPropertiesUpdate,
        ) -> Result<HydroProperties> {
            unimplemented!("stub backend")
        }

        async fn update_inflow_structure(
            &self,
            _area_id: &str,
            _inflow_structure: &InflowStructure,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn get_hydro_matrix(&self, _area_id: &str, _matrix: HydroMatrixName) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn set_hydro_matrix(
            &self,
            _area_id: &str,
            _matrix: HydroMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl BindingConstraintService for StubService {
        async fn create_binding_constraint(
            &self,
            _name: &str,
            _properties: Option<BindingConstraintProperties>,
            _terms: &[ConstraintTerm],
        ) -> Result<ConstraintData> {
            unimplemented!("stub backend")
        }

        async fn update_binding_constraint_properties(
            &self,
            _constraint_id: &str,
            _update: &BindingConstraintPropertiesUpdate,
        ) -> Result<BindingConstraintProperties> {
            unimplemented!("stub backend")
        }

        async fn add_constraint_terms(
            &self,
            _constraint_id: &str,
            _terms: &[ConstraintTerm],
        ) -> Result<Vec<ConstraintTerm>> {
            unimplemented!("stub backend")
        }

        async fn delete_constraint_term(&self, _constraint_id: &str, _term_id: &str) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn get_constraint_matrix(
            &self,
            _constraint_id: &str,
            _matrix: ConstraintMatrixName,
        ) -> Result<Matrix> {
            unimplemented!("stub backend")
        }

        async fn update_constraint_matrix(
            &self,
            _constraint_id: &str,
            _matrix: ConstraintMatrixName,
            _series: &Matrix,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn read_binding_constraints(&self) -> Result<Vec<ConstraintData>> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl SettingsService for StubService {
        async fn read_study_settings(&self) -> Result<StudySettings> {
            unimplemented!("stub backend")
        }

        async fn edit_study_settings(
            &self,
            _current: &StudySettings,
            _update: &StudySettingsUpdate,
        ) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn get_scenario_builder(&self, _nb_years: u32) -> Result<ScenarioBuilder> {
            unimplemented!("stub backend")
        }

        async fn set_scenario_builder(&self, _scenario_builder: &ScenarioBuilder) -> Result<()> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl StudyService for StubService {
        async fn delete(&self, _children: bool) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn delete_binding_constraint(&self, _constraint_id: &str) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn create_variant(&self, _name: &str) -> Result<String> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl RunService for StubService {
        async fn run_antares_simulation(
            &self,
            _parameters: Option<AntaresSimulationParameters>,
        ) -> Result<Job> {
            unimplemented!("stub backend")
        }

        async fn wait_job_completion(&self, _job: &Job, _time_out: u64) -> Result<Job> {
            unimplemented!("stub backend")
        }
    }

    #[async_trait]
    impl XpansionService for StubService {
        async fn create_xpansion_configuration(&self) -> Result<XpansionConfigurationData> {
            unimplemented!("stub backend")
        }

        async fn read_xpansion_configuration(&self) -> Result<Option<XpansionConfigurationData>> {
            unimplemented!("stub backend")
        }

        async fn delete_xpansion_configuration(&self) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn create_candidate(&self, _candidate: &XpansionCandidate) -> Result<XpansionCandidate> {
            unimplemented!("stub backend")
        }

        async fn update_candidate(
            &self,
            _name: &str,
            _update: &XpansionCandidateUpdate,
        ) -> Result<XpansionCandidate> {
            unimplemented!("stub backend")
        }

        async fn delete_candidates(&self, _names: &[String]) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn create_constraint(
            &self,
            _constraint: &XpansionConstraint,
            _file_name: &str,
        ) -> Result<XpansionConstraint> {
            unimplemented!("stub backend")
        }

        async fn update_constraint(
            &self,
            _name: &str,
            _update: &XpansionConstraintUpdate,
            _file_name: &str,
        ) -> Result<XpansionConstraint> {
            unimplemented!("stub backend")
        }

        async fn delete_constraints(&self, _names: &[String], _file_name: &str) -> Result<()> {
            unimplemented!("stub backend")
        }

        async fn update_xpansion_settings(
            &self,
            _update: &XpansionSettingsUpdate,
        ) -> Result<XpansionSettings> {
            unimplemented!("stub backend")
        }

        async fn update_sensitivity(
            &self,
            _update: &XpansionSensitivityUpdate,
        ) -> Result<XpansionSensitivity> {
            unimplemented!("stub backend")
        }
    }

    pub(crate) fn stub_services() -> StudyServices {
        let stub = Arc::new(StubService);
        StudyServices {
            area: stub.clone(),
            link: stub.clone(),
            thermal: stub.clone(),
            renewable: stub.clone(),
            st_storage: stub.clone(),
            hydro: stub.clone(),
            binding_constraint: stub.clone(),
            settings: stub.clone(),
            study: stub.clone(),
            run: stub.clone(),
            xpansion: stub,
        }
    }
}
