//! Settings service over `settings/generaldata.ini` and
//! `settings/scenariobuilder.dat`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{StudySettings, StudySettingsUpdate};
use crate::service::SettingsService;
use crate::utils::error::{Result, StudyError};

use super::ini::{read_ini, write_ini};
use super::settings::{
    scenario_builder_from_ini, scenario_builder_to_ini, settings_from_ini, settings_to_ini,
};
use super::LocalContext;

pub struct SettingsLocalService {
    context: Arc<LocalContext>,
}

impl SettingsLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl SettingsService for SettingsLocalService {
    async fn read_study_settings(&self) -> Result<StudySettings> {
        let ini = read_ini(&self.context.paths.general_data())?;
        settings_from_ini(&ini, self.context.version)
    }

    async fn edit_study_settings(
        &self,
        current: &StudySettings,
        update: &StudySettingsUpdate,
    ) -> Result<()> {
        let merged = current.from_update(update);
        let ini = settings_to_ini(&merged, self.context.version);
        write_ini(&self.context.paths.general_data(), &ini)
            .map_err(|err| StudyError::StudySettingsUpdate { cause: err.to_string() })?;
        debug!("updated study settings");
        Ok(())
    }

    async fn get_scenario_builder(&self, nb_years: u32) -> Result<ScenarioBuilder> {
        let ini = read_ini(&self.context.paths.scenario_builder())?;
        scenario_builder_from_ini(&ini, nb_years as usize)
    }

    async fn set_scenario_builder(&self, scenario_builder: &ScenarioBuilder) -> Result<()> {
        let ini = scenario_builder_to_ini(scenario_builder);
        write_ini(&self.context.paths.scenario_builder(), &ini)
            .map_err(|err| StudyError::ScenarioBuilderEdition { cause: err.to_string() })?;
        debug!("wrote scenario builder");
        Ok(())
    }
}
