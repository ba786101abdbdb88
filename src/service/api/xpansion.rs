//! Xpansion service over the `extensions/xpansion` endpoints. Constraint
//! files keep the Antares-Xpansion ini format and travel as raw resources.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::xpansion::{
    XpansionCandidate, XpansionCandidateUpdate, XpansionConfigurationData, XpansionConstraint,
    XpansionConstraintUpdate, XpansionSensitivity, XpansionSensitivityUpdate, XpansionSettings,
    XpansionSettingsUpdate,
};
use crate::service::local::ini::IniMap;
use crate::service::local::models::{
    xpansion_constraint_from_section, xpansion_constraint_to_section,
};
use crate::service::XpansionService;
use crate::utils::error::{Result, StudyError};

use super::models::{XpansionCandidateDto, XpansionSettingsDto};
use super::ApiContext;

pub struct XpansionApiService {
    context: Arc<ApiContext>,
}

impl XpansionApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn xpansion_url(&self, path: &str) -> String {
        self.context.study_url(&format!("extensions/xpansion/{path}"))
    }

    async fn read_settings(&self) -> Result<XpansionSettingsDto> {
        self.context.get_json(&self.xpansion_url("settings")).await
    }

    async fn put_settings(&self, dto: &XpansionSettingsDto) -> Result<()> {
        self.context
            .wrapper
            .put_json(&self.xpansion_url("settings"), dto)
            .await?;
        Ok(())
    }

    async fn read_candidates(&self) -> Result<Vec<XpansionCandidate>> {
        let candidates: Vec<XpansionCandidateDto> = self
            .context
            .get_json(&self.xpansion_url("candidates"))
            .await?;
        candidates
            .into_iter()
            .map(XpansionCandidateDto::into_model)
            .collect()
    }

    /// Constraint files are plain ini resources; a missing file reads as
    /// empty, like on a local study.
    async fn read_constraints(&self, file_name: &str) -> Result<Vec<XpansionConstraint>> {
        let url = self.xpansion_url(&format!("resources/constraints/{file_name}"));
        let response = match self.context.wrapper.get(&url).await {
            Ok(response) => response,
            Err(StudyError::Api(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let content = response.text().await.map_err(StudyError::Http)?;
        let ini = IniMap::parse(&content).map_err(StudyError::Api)?;
        ini.sections()
            .map(|(_, section)| {
                xpansion_constraint_from_section(section).map_err(StudyError::Api)
            })
            .collect()
    }

    async fn write_constraints(
        &self,
        constraints: &[XpansionConstraint],
        file_name: &str,
    ) -> Result<()> {
        let mut ini = IniMap::new();
        for (index, constraint) in constraints.iter().enumerate() {
            *ini.ensure_section((index + 1).to_string()) =
                xpansion_constraint_to_section(constraint);
        }
        let url = format!(
            "{}?path=user/expansion/constraint_resources/{file_name}",
            self.context.study_url("raw")
        );
        self.context
            .wrapper
            .post_json(&url, &ini.to_string())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl XpansionService for XpansionApiService {
    async fn create_xpansion_configuration(&self) -> Result<XpansionConfigurationData> {
        let data = XpansionConfigurationData::default();
        let dto = XpansionSettingsDto {
            settings: data.settings.clone(),
            sensitivity_config: Some(data.sensitivity.clone()),
        };
        self.context
            .wrapper
            .post_json(&self.xpansion_url("settings"), &dto)
            .await
            .map_err(|err| StudyError::XpansionConfigurationCreation {
                cause: err.to_string(),
            })?;
        info!("created expansion configuration");
        Ok(data)
    }

    async fn read_xpansion_configuration(&self) -> Result<Option<XpansionConfigurationData>> {
        let error = |cause: String| StudyError::XpansionConfigurationRead { cause };
        // No settings means the study has no expansion configuration.
        let settings = match self.read_settings().await {
            Ok(settings) => settings,
            Err(StudyError::Api(_)) => return Ok(None),
            Err(err) => return Err(error(err.to_string())),
        };
        let candidates = self
            .read_candidates()
            .await
            .map_err(|err| error(err.to_string()))?
            .into_iter()
            .map(|candidate| (candidate.name.clone(), candidate))
            .collect();

        let mut constraints = BTreeMap::new();
        if let Some(file_name) = &settings.settings.additional_constraints {
            for constraint in self
                .read_constraints(file_name)
                .await
                .map_err(|err| error(err.to_string()))?
            {
                constraints.insert(constraint.name.clone(), constraint);
            }
        }
        Ok(Some(XpansionConfigurationData {
            settings: settings.settings,
            candidates,
            constraints,
            sensitivity: settings.sensitivity_config.unwrap_or_default(),
        }))
    }

    async fn delete_xpansion_configuration(&self) -> Result<()> {
        self.context
            .wrapper
            .delete(&self.xpansion_url("settings"))
            .await
            .map_err(|err| StudyError::XpansionConfigurationDeletion {
                cause: err.to_string(),
            })?;
        info!("deleted expansion configuration");
        Ok(())
    }

    async fn create_candidate(&self, candidate: &XpansionCandidate) -> Result<XpansionCandidate> {
        candidate.validate()?;
        self.context
            .wrapper
            .post_json(
                &self.xpansion_url("candidates"),
                &XpansionCandidateDto::from_model(candidate),
            )
            .await
            .map_err(|err| StudyError::XpansionCandidateCreation {
                name: candidate.name.clone(),
                cause: err.to_string(),
            })?;
        debug!(candidate = %candidate.name, "created expansion candidate");
        Ok(candidate.clone())
    }

    async fn update_candidate(
        &self,
        name: &str,
        update: &XpansionCandidateUpdate,
    ) -> Result<XpansionCandidate> {
        let error = |cause: String| StudyError::XpansionCandidateEdition {
            name: name.to_string(),
            cause,
        };
        let candidates = self
            .read_candidates()
            .await
            .map_err(|err| error(err.to_string()))?;
        let current = candidates
            .into_iter()
            .find(|candidate| candidate.name == name)
            .ok_or_else(|| error("candidate does not exist".to_string()))?;
        let updated = current.from_update(update);
        updated.validate()?;
        self.context
            .wrapper
            .put_json(
                &self.xpansion_url(&format!("candidates/{name}")),
                &XpansionCandidateDto::from_model(&updated),
            )
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(candidate = name, "updated expansion candidate");
        Ok(updated)
    }

    async fn delete_candidates(&self, names: &[String]) -> Result<()> {
        for name in names {
            self.context
                .wrapper
                .delete(&self.xpansion_url(&format!("candidates/{name}")))
                .await
                .map_err(|err| StudyError::XpansionCandidateDeletion {
                    names: names.to_vec(),
                    cause: err.to_string(),
                })?;
        }
        debug!(?names, "deleted expansion candidates");
        Ok(())
    }

    async fn create_constraint(
        &self,
        constraint: &XpansionConstraint,
        file_name: &str,
    ) -> Result<XpansionConstraint> {
        let error = |cause: String| StudyError::XpansionConstraintEdition {
            name: constraint.name.clone(),
            cause,
        };
        let mut constraints = self
            .read_constraints(file_name)
            .await
            .map_err(|err| error(err.to_string()))?;
        if constraints.iter().any(|existing| existing.name == constraint.name) {
            return Err(error("constraint already exists".to_string()));
        }
        constraints.push(constraint.clone());
        self.write_constraints(&constraints, file_name)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(constraint = %constraint.name, file_name, "created expansion constraint");
        Ok(constraint.clone())
    }

    async fn update_constraint(
        &self,
        name: &str,
        update: &XpansionConstraintUpdate,
        file_name: &str,
    ) -> Result<XpansionConstraint> {
        let error = |cause: String| StudyError::XpansionConstraintEdition {
            name: name.to_string(),
            cause,
        };
        let mut constraints = self
            .read_constraints(file_name)
            .await
            .map_err(|err| error(err.to_string()))?;
        let position = constraints
            .iter()
            .position(|constraint| constraint.name == name)
            .ok_or_else(|| error("constraint does not exist".to_string()))?;
        let updated = constraints[position].from_update(update);
        constraints[position] = updated.clone();
        self.write_constraints(&constraints, file_name)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!(constraint = name, file_name, "updated expansion constraint");
        Ok(updated)
    }

    async fn delete_constraints(&self, names: &[String], file_name: &str) -> Result<()> {
        let mut constraints = self.read_constraints(file_name).await?;
        for name in names {
            let position = constraints
                .iter()
                .position(|constraint| &constraint.name == name)
                .ok_or_else(|| StudyError::XpansionConstraintEdition {
                    name: name.clone(),
                    cause: "constraint does not exist".to_string(),
                })?;
            constraints.remove(position);
        }
        self.write_constraints(&constraints, file_name).await?;
        debug!(?names, file_name, "deleted expansion constraints");
        Ok(())
    }

    async fn update_xpansion_settings(
        &self,
        update: &XpansionSettingsUpdate,
    ) -> Result<XpansionSettings> {
        let error = |cause: String| StudyError::XpansionSettingsEdition { cause };
        let current = self.read_settings().await.map_err(|err| error(err.to_string()))?;
        let updated = XpansionSettingsDto {
            settings: current.settings.from_update(update),
            sensitivity_config: current.sensitivity_config,
        };
        self.put_settings(&updated)
            .await
            .map_err(|err| error(err.to_string()))?;
        debug!("updated expansion settings");
        Ok(updated.settings)
    }

    async fn update_sensitivity(
        &self,
        update: &XpansionSensitivityUpdate,
    ) -> Result<XpansionSensitivity> {
        let error = |cause: String| StudyError::XpansionSettingsEdition { cause };
        let current = self.read_settings().await.map_err(|err| error(err.to_string()))?;
        let updated = current
            .sensitivity_config
            .unwrap_or_default()
            .from_update(update);
        self.put_settings(&XpansionSettingsDto {
            settings: current.settings,
            sensitivity_config: Some(updated.clone()),
        })
        .await
        .map_err(|err| error(err.to_string()))?;
        debug!("updated expansion sensitivity");
        Ok(updated)
    }
}
