//! The study aggregate: owns the areas, links and constraints of one study
//! and the service bundle that persists them. Factory functions build it
//! against either backend.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::{ApiConf, LocalConfiguration};
use crate::model::area::{Area, AreaProperties, AreaUi};
use crate::model::binding_constraint::{
    BindingConstraint, BindingConstraintProperties, ConstraintTerm,
};
use crate::model::commons::{transform_name_to_id, StudyVersion};
use crate::model::link::{Link, LinkProperties, LinkUi};
use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{StudySettings, StudySettingsUpdate};
use crate::model::simulation::{AntaresSimulationParameters, Job};
use crate::model::xpansion::XpansionConfiguration;
use crate::service::api::{create_api_services, RequestWrapper};
use crate::service::local::{
    create_local_services, read_study_descriptor, scaffold_study, StudyPaths,
};
use crate::service::StudyServices;
use crate::utils::error::{Result, StudyError};

/// An energy-system study, local directory or AntaresWeb study. Children are
/// keyed by id; every mutation writes through to the backend before touching
/// the in-memory maps.
pub struct Study {
    services: StudyServices,
    name: String,
    version: StudyVersion,
    areas: BTreeMap<String, Area>,
    links: BTreeMap<String, Link>,
    binding_constraints: BTreeMap<String, BindingConstraint>,
    settings: StudySettings,
}

impl Study {
    fn new(
        services: StudyServices,
        name: impl Into<String>,
        version: StudyVersion,
        settings: StudySettings,
    ) -> Self {
        Self {
            services,
            name: name.into(),
            version,
            areas: BTreeMap::new(),
            links: BTreeMap::new(),
            binding_constraints: BTreeMap::new(),
            settings,
        }
    }

    /// Loads the full topology from the backend.
    async fn load(
        services: StudyServices,
        name: impl Into<String>,
        version: StudyVersion,
    ) -> Result<Self> {
        let settings = services.settings.read_study_settings().await?;
        let mut study = Self::new(services, name, version, settings);

        for data in study.services.area.read_areas().await? {
            let area = Area::from_data(study.services.clone(), data);
            study.areas.insert(area.id().to_string(), area);
        }
        for data in study.services.link.read_links().await? {
            let link = Link::new(
                study.services.link.clone(),
                data.area_from,
                data.area_to,
                data.properties,
                data.ui,
            );
            study.links.insert(link.id(), link);
        }
        for data in study.services.binding_constraint.read_binding_constraints().await? {
            let constraint = BindingConstraint::new(
                study.services.binding_constraint.clone(),
                data.name,
                data.properties,
                data.terms,
            );
            study
                .binding_constraints
                .insert(constraint.id().to_string(), constraint);
        }
        Ok(study)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> StudyVersion {
        self.version
    }

    pub fn settings(&self) -> &StudySettings {
        &self.settings
    }

    pub fn areas(&self) -> &BTreeMap<String, Area> {
        &self.areas
    }

    pub fn get_area(&self, area_id: &str) -> Option<&Area> {
        self.areas.get(area_id)
    }

    pub fn get_area_mut(&mut self, area_id: &str) -> Option<&mut Area> {
        self.areas.get_mut(area_id)
    }

    pub fn links(&self) -> &BTreeMap<String, Link> {
        &self.links
    }

    pub fn get_link_mut(&mut self, link_id: &str) -> Option<&mut Link> {
        self.links.get_mut(link_id)
    }

    pub fn binding_constraints(&self) -> &BTreeMap<String, BindingConstraint> {
        &self.binding_constraints
    }

    pub fn get_binding_constraint_mut(&mut self, constraint_id: &str) -> Option<&mut BindingConstraint> {
        self.binding_constraints.get_mut(constraint_id)
    }

    pub async fn create_area(
        &mut self,
        name: &str,
        properties: Option<AreaProperties>,
        ui: Option<AreaUi>,
    ) -> Result<&Area> {
        let (properties, ui) = self.services.area.create_area(name, properties, ui).await?;
        let area = Area::new(self.services.clone(), name, properties, ui);
        let area_id = area.id().to_string();
        self.areas.insert(area_id.clone(), area);
        Ok(&self.areas[&area_id])
    }

    pub async fn delete_area(&mut self, area_id: &str) -> Result<()> {
        self.services.area.delete_area(area_id).await?;
        self.areas.remove(area_id);
        Ok(())
    }

    pub async fn create_link(
        &mut self,
        area_from: &str,
        area_to: &str,
        properties: Option<LinkProperties>,
        ui: Option<LinkUi>,
    ) -> Result<&Link> {
        let error = |cause: String| StudyError::LinkCreation {
            area_from: area_from.to_string(),
            area_to: area_to.to_string(),
            cause,
        };
        let from_id = transform_name_to_id(area_from);
        let to_id = transform_name_to_id(area_to);
        if from_id == to_id {
            return Err(error("a link cannot start and end at the same area".to_string()));
        }
        let missing: Vec<&str> = [from_id.as_str(), to_id.as_str()]
            .into_iter()
            .filter(|id| !self.areas.contains_key(*id))
            .collect();
        if !missing.is_empty() {
            return Err(error(format!("{} does not exist", missing.join(", "))));
        }
        let mut ids = [from_id, to_id];
        ids.sort();
        if self.links.contains_key(&format!("{} / {}", ids[0], ids[1])) {
            return Err(error(format!(
                "a link from {area_from} to {area_to} already exists"
            )));
        }
        let (properties, ui) = self
            .services
            .link
            .create_link(area_from, area_to, properties, ui)
            .await?;
        let link = Link::new(self.services.link.clone(), area_from, area_to, properties, ui);
        let link_id = link.id();
        self.links.insert(link_id.clone(), link);
        Ok(&self.links[&link_id])
    }

    pub async fn delete_link(&mut self, area_from: &str, area_to: &str) -> Result<()> {
        let mut ids = [transform_name_to_id(area_from), transform_name_to_id(area_to)];
        ids.sort();
        let [from_id, to_id] = ids;
        self.services.link.delete_link(&from_id, &to_id).await?;
        self.links.remove(&format!("{from_id} / {to_id}"));
        Ok(())
    }

    pub async fn create_binding_constraint(
        &mut self,
        name: &str,
        properties: Option<BindingConstraintProperties>,
        terms: Vec<ConstraintTerm>,
    ) -> Result<&BindingConstraint> {
        let data = self
            .services
            .binding_constraint
            .create_binding_constraint(name, properties, &terms)
            .await?;
        let constraint = BindingConstraint::new(
            self.services.binding_constraint.clone(),
            data.name,
            data.properties,
            data.terms,
        );
        let constraint_id = constraint.id().to_string();
        self.binding_constraints.insert(constraint_id.clone(), constraint);
        Ok(&self.binding_constraints[&constraint_id])
    }

    pub async fn delete_binding_constraint(&mut self, constraint_id: &str) -> Result<()> {
        self.services.study.delete_binding_constraint(constraint_id).await?;
        self.binding_constraints.remove(constraint_id);
        Ok(())
    }

    /// Persists a settings update and merges it into the cached settings.
    pub async fn update_settings(&mut self, update: StudySettingsUpdate) -> Result<&StudySettings> {
        self.services
            .settings
            .edit_study_settings(&self.settings, &update)
            .await?;
        self.settings = self.settings.from_update(&update);
        Ok(&self.settings)
    }

    pub async fn get_scenario_builder(&self) -> Result<ScenarioBuilder> {
        self.services
            .settings
            .get_scenario_builder(self.settings.general_parameters.nb_years)
            .await
    }

    pub async fn set_scenario_builder(&self, scenario_builder: &ScenarioBuilder) -> Result<()> {
        self.services.settings.set_scenario_builder(scenario_builder).await
    }

    pub async fn run_antares_simulation(
        &self,
        parameters: Option<AntaresSimulationParameters>,
    ) -> Result<Job> {
        self.services.run.run_antares_simulation(parameters).await
    }

    pub async fn wait_job_completion(&self, job: &Job, time_out: u64) -> Result<Job> {
        self.services.run.wait_job_completion(job, time_out).await
    }

    pub async fn create_xpansion_configuration(&self) -> Result<XpansionConfiguration> {
        let data = self.services.xpansion.create_xpansion_configuration().await?;
        Ok(XpansionConfiguration::from_data(self.services.xpansion.clone(), data))
    }

    pub async fn read_xpansion_configuration(&self) -> Result<Option<XpansionConfiguration>> {
        let data = self.services.xpansion.read_xpansion_configuration().await?;
        Ok(data.map(|data| XpansionConfiguration::from_data(self.services.xpansion.clone(), data)))
    }

    pub async fn delete_xpansion_configuration(&self) -> Result<()> {
        self.services.xpansion.delete_xpansion_configuration().await
    }

    /// Deletes the study itself; on the web backend `children` also removes
    /// its variants.
    pub async fn delete(self, children: bool) -> Result<()> {
        self.services.study.delete(children).await
    }

    pub async fn create_variant(&self, name: &str) -> Result<String> {
        self.services.study.create_variant(name).await
    }
}

/// Scaffolds a new study directory and returns the aggregate over it.
pub async fn create_study_local(
    name: &str,
    version: StudyVersion,
    config: &LocalConfiguration,
) -> Result<Study> {
    let paths = StudyPaths::new(config.study_path());
    scaffold_study(&paths, name, version)?;
    let services = create_local_services(config, version);
    let settings = services.settings.read_study_settings().await?;
    info!(study = name, %version, path = %config.study_path().display(), "created local study");
    Ok(Study::new(services, name, version, settings))
}

/// Loads an existing study directory: descriptor, settings and topology.
pub async fn read_study_local(config: &LocalConfiguration) -> Result<Study> {
    let paths = StudyPaths::new(config.study_path());
    let (name, version) = read_study_descriptor(&paths)?;
    let services = create_local_services(config, version);
    Study::load(services, name, version).await
}

#[derive(serde::Deserialize)]
struct StudyMetadataDto {
    name: String,
    version: String,
}

/// Creates a study on an AntaresWeb server and returns the aggregate over it.
pub async fn create_study_api(name: &str, version: StudyVersion, config: &ApiConf) -> Result<Study> {
    let wrapper = RequestWrapper::new(config)?;
    let url = format!(
        "{}/studies?name={name}&version={version}",
        wrapper.base_url()
    );
    let study_id: String = wrapper.post(&url).await?.json().await?;
    let services = create_api_services(config, &study_id)?;
    let settings = services.settings.read_study_settings().await?;
    info!(study = name, %study_id, "created study on the web server");
    Ok(Study::new(services, name, version, settings))
}

/// Loads an existing AntaresWeb study: metadata, settings and topology.
pub async fn read_study_api(config: &ApiConf, study_id: &str) -> Result<Study> {
    let wrapper = RequestWrapper::new(config)?;
    let url = format!("{}/studies/{study_id}", wrapper.base_url());
    let metadata: StudyMetadataDto = wrapper.get_json(&url).await?;
    let version = metadata.version.parse()?;
    let services = create_api_services(config, study_id)?;
    Study::load(services, metadata.name, version).await
}

/// Creates a variant of an AntaresWeb study and returns the loaded variant.
pub async fn create_variant_api(config: &ApiConf, study_id: &str, name: &str) -> Result<Study> {
    let services = create_api_services(config, study_id)?;
    let variant_id = services.study.create_variant(name).await?;
    read_study_api(config, &variant_id).await
}
