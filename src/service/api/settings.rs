//! Settings service over the web API `config/...` forms. Each group of the
//! settings maps to one form endpoint, plus `timeseries/config` for the
//! thermal timeseries number.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{
    PlaylistData, StudySettings, StudySettingsUpdate, ThematicTrimmingParameters,
};
use crate::service::SettingsService;
use crate::utils::error::{Result, StudyError};

use super::models::{
    scenario_builder_from_api, scenario_builder_to_api, AdequacyPatchFormDto, AdvancedFormDto,
    GeneralFormDto, ThermalTsConfigDto, TimeseriesConfigDto,
};
use super::ApiContext;

pub struct SettingsApiService {
    context: Arc<ApiContext>,
}

impl SettingsApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn form_url(&self, form: &str) -> String {
        self.context.study_url(&format!("config/{form}/form"))
    }

    fn timeseries_url(&self) -> String {
        self.context.study_url("timeseries/config")
    }

    async fn put_form(&self, form: &str, body: &impl serde::Serialize) -> Result<()> {
        self.context
            .wrapper
            .put_json(&self.form_url(form), body)
            .await
            .map_err(|err| StudyError::StudySettingsUpdate {
                cause: err.to_string(),
            })?;
        debug!(form, "updated settings form");
        Ok(())
    }
}

#[async_trait]
impl SettingsService for SettingsApiService {
    async fn read_study_settings(&self) -> Result<StudySettings> {
        let error = |cause: String| StudyError::StudySettingsRead { cause };

        let general: GeneralFormDto = self
            .context
            .get_json(&self.form_url("general"))
            .await
            .map_err(|err| error(err.to_string()))?;
        let timeseries: TimeseriesConfigDto = self
            .context
            .get_json(&self.timeseries_url())
            .await
            .map_err(|err| error(err.to_string()))?;
        let optimization_parameters = self
            .context
            .get_json(&self.form_url("optimization"))
            .await
            .map_err(|err| error(err.to_string()))?;
        let advanced: AdvancedFormDto = self
            .context
            .get_json(&self.form_url("advancedparameters"))
            .await
            .map_err(|err| error(err.to_string()))?;
        let adequacy: AdequacyPatchFormDto = self
            .context
            .get_json(&self.form_url("adequacypatch"))
            .await
            .map_err(|err| error(err.to_string()))?;
        let thematic_trimming_parameters: ThematicTrimmingParameters = self
            .context
            .get_json(&self.form_url("thematictrimming"))
            .await
            .map_err(|err| error(err.to_string()))?;
        let playlist_parameters: BTreeMap<u32, PlaylistData> = self
            .context
            .get_json(&self.form_url("playlist"))
            .await
            .map_err(|err| error(err.to_string()))?;

        let (advanced_parameters, seed_parameters) = advanced.into_models()?;
        Ok(StudySettings {
            general_parameters: general.into_model(timeseries.thermal.number),
            optimization_parameters,
            advanced_parameters,
            seed_parameters,
            adequacy_patch_parameters: adequacy.into_model(),
            thematic_trimming_parameters,
            playlist_parameters,
        })
    }

    async fn edit_study_settings(
        &self,
        current: &StudySettings,
        update: &StudySettingsUpdate,
    ) -> Result<()> {
        if let Some(general) = &update.general_parameters {
            let merged = current.general_parameters.from_update(general);
            self.put_form("general", &GeneralFormDto::from_model(&merged)).await?;
            if merged.nb_timeseries_thermal != current.general_parameters.nb_timeseries_thermal {
                self.context
                    .wrapper
                    .put_json(
                        &self.timeseries_url(),
                        &TimeseriesConfigDto {
                            thermal: ThermalTsConfigDto {
                                number: merged.nb_timeseries_thermal,
                            },
                        },
                    )
                    .await
                    .map_err(|err| StudyError::StudySettingsUpdate {
                        cause: err.to_string(),
                    })?;
            }
        }
        if let Some(optimization) = &update.optimization_parameters {
            // The optimization form has no field for the export structure flag.
            if optimization.include_exportstructure.is_some() {
                return Err(StudyError::StudySettingsUpdate {
                    cause: "include_exportstructure can only be changed on a local study"
                        .to_string(),
                });
            }
            let merged = current.optimization_parameters.from_update(optimization);
            self.put_form("optimization", &merged).await?;
        }
        if update.advanced_parameters.is_some() || update.seed_parameters.is_some() {
            let advanced = match &update.advanced_parameters {
                Some(advanced) => current.advanced_parameters.from_update(advanced),
                None => current.advanced_parameters.clone(),
            };
            let seeds = match &update.seed_parameters {
                Some(seeds) => current.seed_parameters.from_update(seeds),
                None => current.seed_parameters.clone(),
            };
            self.put_form("advancedparameters", &AdvancedFormDto::from_models(&advanced, &seeds))
                .await?;
        }
        if let Some(adequacy) = &update.adequacy_patch_parameters {
            let merged = current.adequacy_patch_parameters.from_update(adequacy);
            self.put_form("adequacypatch", &AdequacyPatchFormDto::from_model(&merged))
                .await?;
        }
        if let Some(trimming) = &update.thematic_trimming_parameters {
            self.put_form("thematictrimming", trimming).await?;
        }
        if let Some(playlist) = &update.playlist_parameters {
            self.put_form("playlist", playlist).await?;
        }
        Ok(())
    }

    async fn get_scenario_builder(&self, nb_years: u32) -> Result<ScenarioBuilder> {
        let body: Value = self
            .context
            .get_json(&self.context.study_url("config/scenariobuilder"))
            .await
            .map_err(|err| StudyError::ScenarioBuilderRead {
                cause: err.to_string(),
            })?;
        scenario_builder_from_api(nb_years as usize, &body)
    }

    async fn set_scenario_builder(&self, scenario_builder: &ScenarioBuilder) -> Result<()> {
        self.context
            .wrapper
            .put_json(
                &self.context.study_url("config/scenariobuilder"),
                &scenario_builder_to_api(scenario_builder),
            )
            .await
            .map_err(|err| StudyError::ScenarioBuilderEdition {
                cause: err.to_string(),
            })?;
        debug!("updated scenario builder");
        Ok(())
    }
}
