//! Xpansion service over the `user/expansion` directory, in the file formats
//! Antares-Xpansion reads: a sectionless `settings.ini`, numbered candidate
//! sections and a JSON sensitivity input.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::xpansion::{
    XpansionCandidate, XpansionCandidateUpdate, XpansionConfigurationData, XpansionConstraint,
    XpansionConstraintUpdate, XpansionSensitivity, XpansionSensitivityUpdate, XpansionSettings,
    XpansionSettingsUpdate,
};
use crate::service::XpansionService;
use crate::utils::error::{Result, StudyError};

use super::ini::{ini_error, read_ini, write_ini, IniMap};
use super::models;
use super::LocalContext;

pub struct XpansionLocalService {
    context: Arc<LocalContext>,
}

impl XpansionLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }

    fn read_settings(&self) -> Result<XpansionSettings> {
        let path = self.context.paths.expansion_settings();
        let ini = read_ini(&path)?;
        models::xpansion_settings_from_ini(&ini).map_err(|cause| ini_error(&path, cause))
    }

    fn write_settings(&self, settings: &XpansionSettings) -> Result<()> {
        write_ini(
            &self.context.paths.expansion_settings(),
            &models::xpansion_settings_to_ini(settings),
        )
    }

    fn read_candidates(&self) -> Result<Vec<XpansionCandidate>> {
        let path = self.context.paths.expansion_candidates();
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(_, section)| {
                models::xpansion_candidate_from_section(section)
                    .map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn write_candidates(&self, candidates: &[XpansionCandidate]) -> Result<()> {
        let mut ini = IniMap::new();
        for (index, candidate) in candidates.iter().enumerate() {
            // Antares-Xpansion numbers candidate sections from 1.
            *ini.ensure_section((index + 1).to_string()) =
                models::xpansion_candidate_to_section(candidate);
        }
        write_ini(&self.context.paths.expansion_candidates(), &ini)
    }

    fn read_constraints(&self, file_name: &str) -> Result<Vec<XpansionConstraint>> {
        let path = self.context.paths.expansion_constraints(file_name);
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(_, section)| {
                models::xpansion_constraint_from_section(section)
                    .map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn write_constraints(&self, constraints: &[XpansionConstraint], file_name: &str) -> Result<()> {
        let mut ini = IniMap::new();
        for (index, constraint) in constraints.iter().enumerate() {
            *ini.ensure_section((index + 1).to_string()) =
                models::xpansion_constraint_to_section(constraint);
        }
        write_ini(&self.context.paths.expansion_constraints(file_name), &ini)
    }

    fn read_sensitivity(&self) -> Result<XpansionSensitivity> {
        let path = self.context.paths.expansion_sensitivity();
        if !path.exists() {
            return Ok(XpansionSensitivity::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_sensitivity(&self, sensitivity: &XpansionSensitivity) -> Result<()> {
        let path = self.context.paths.expansion_sensitivity();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(sensitivity)?)?;
        Ok(())
    }

    fn configured(&self) -> bool {
        self.context.paths.expansion_settings().is_file()
    }
}

#[async_trait]
impl XpansionService for XpansionLocalService {
    async fn create_xpansion_configuration(&self) -> Result<XpansionConfigurationData> {
        if self.configured() {
            return Err(StudyError::XpansionConfigurationCreation {
                cause: "an expansion configuration already exists".to_string(),
            });
        }
        let expansion = self.context.paths.expansion_dir();
        for dir in ["capa", "constraints", "weights", "sensitivity"] {
            fs::create_dir_all(expansion.join(dir))?;
        }
        let data = XpansionConfigurationData::default();
        self.write_settings(&data.settings)?;
        self.write_candidates(&[])?;
        self.write_sensitivity(&data.sensitivity)?;
        info!("created expansion configuration");
        Ok(data)
    }

    async fn read_xpansion_configuration(&self) -> Result<Option<XpansionConfigurationData>> {
        if !self.configured() {
            return Ok(None);
        }
        let settings = self.read_settings()?;
        let candidates = self
            .read_candidates()?
            .into_iter()
            .map(|candidate| (candidate.name.clone(), candidate))
            .collect();

        let mut constraints = std::collections::BTreeMap::new();
        if let Some(file_name) = &settings.additional_constraints {
            for constraint in self.read_constraints(file_name)? {
                constraints.insert(constraint.name.clone(), constraint);
            }
        }
        Ok(Some(XpansionConfigurationData {
            settings,
            candidates,
            constraints,
            sensitivity: self.read_sensitivity()?,
        }))
    }

    async fn delete_xpansion_configuration(&self) -> Result<()> {
        let expansion = self.context.paths.expansion_dir();
        if !expansion.exists() {
            return Err(StudyError::XpansionConfigurationDeletion {
                cause: "no expansion configuration".to_string(),
            });
        }
        fs::remove_dir_all(&expansion)?;
        info!("deleted expansion configuration");
        Ok(())
    }

    async fn create_candidate(&self, candidate: &XpansionCandidate) -> Result<XpansionCandidate> {
        candidate.validate()?;
        let mut candidates = self.read_candidates()?;
        if candidates.iter().any(|existing| existing.name == candidate.name) {
            return Err(StudyError::XpansionCandidateCreation {
                name: candidate.name.clone(),
                cause: "candidate already exists".to_string(),
            });
        }
        candidates.push(candidate.clone());
        self.write_candidates(&candidates)?;
        debug!(candidate = %candidate.name, "created expansion candidate");
        Ok(candidate.clone())
    }

    async fn update_candidate(
        &self,
        name: &str,
        update: &XpansionCandidateUpdate,
    ) -> Result<XpansionCandidate> {
        let mut candidates = self.read_candidates()?;
        let position = candidates
            .iter()
            .position(|candidate| candidate.name == name)
            .ok_or_else(|| StudyError::XpansionCandidateEdition {
                name: name.to_string(),
                cause: "candidate does not exist".to_string(),
            })?;
        let updated = candidates[position].from_update(update);
        updated.validate()?;
        candidates[position] = updated.clone();
        self.write_candidates(&candidates)?;
        debug!(candidate = name, "updated expansion candidate");
        Ok(updated)
    }

    async fn delete_candidates(&self, names: &[String]) -> Result<()> {
        let mut candidates = self.read_candidates()?;
        for name in names {
            let position = candidates
                .iter()
                .position(|candidate| &candidate.name == name)
                .ok_or_else(|| StudyError::XpansionCandidateDeletion {
                    names: names.to_vec(),
                    cause: format!("candidate {name} does not exist"),
                })?;
            candidates.remove(position);
        }
        self.write_candidates(&candidates)?;
        debug!(?names, "deleted expansion candidates");
        Ok(())
    }

    async fn create_constraint(
        &self,
        constraint: &XpansionConstraint,
        file_name: &str,
    ) -> Result<XpansionConstraint> {
        let mut constraints = self.read_constraints(file_name)?;
        if constraints.iter().any(|existing| existing.name == constraint.name) {
            return Err(StudyError::XpansionConstraintEdition {
                name: constraint.name.clone(),
                cause: "constraint already exists".to_string(),
            });
        }
        constraints.push(constraint.clone());
        self.write_constraints(&constraints, file_name)?;
        debug!(constraint = %constraint.name, file_name, "created expansion constraint");
        Ok(constraint.clone())
    }

    async fn update_constraint(
        &self,
        name: &str,
        update: &XpansionConstraintUpdate,
        file_name: &str,
    ) -> Result<XpansionConstraint> {
        let mut constraints = self.read_constraints(file_name)?;
        let position = constraints
            .iter()
            .position(|constraint| constraint.name == name)
            .ok_or_else(|| StudyError::XpansionConstraintEdition {
                name: name.to_string(),
                cause: "constraint does not exist".to_string(),
            })?;
        let updated = constraints[position].from_update(update);
        constraints[position] = updated.clone();
        self.write_constraints(&constraints, file_name)?;
        debug!(constraint = name, file_name, "updated expansion constraint");
        Ok(updated)
    }

    async fn delete_constraints(&self, names: &[String], file_name: &str) -> Result<()> {
        let mut constraints = self.read_constraints(file_name)?;
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
        self.write_constraints(&constraints, file_name)?;
        debug!(?names, file_name, "deleted expansion constraints");
        Ok(())
    }

    async fn update_xpansion_settings(
        &self,
        update: &XpansionSettingsUpdate,
    ) -> Result<XpansionSettings> {
        let current = self.read_settings()?;
        let updated = current.from_update(update);
        self.write_settings(&updated)
            .map_err(|err| StudyError::XpansionSettingsEdition { cause: err.to_string() })?;
        debug!("updated expansion settings");
        Ok(updated)
    }

    async fn update_sensitivity(
        &self,
        update: &XpansionSensitivityUpdate,
    ) -> Result<XpansionSensitivity> {
        let current = self.read_sensitivity()?;
        let updated = current.from_update(update);
        self.write_sensitivity(&updated)?;
        debug!("updated expansion sensitivity");
        Ok(updated)
    }
}
