use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::service::XpansionService;
use crate::utils::error::{Result, StudyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UcType {
    #[default]
    ExpansionFast,
    ExpansionAccurate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Master {
    #[default]
    Integer,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum XpansionSolver {
    #[serde(rename = "Cbc")]
    #[strum(serialize = "Cbc")]
    Cbc,
    #[serde(rename = "Coin")]
    #[strum(serialize = "Coin")]
    Coin,
    #[default]
    #[serde(rename = "Xpress")]
    #[strum(serialize = "Xpress")]
    Xpress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XpansionSettings {
    pub master: Master,
    pub uc_type: UcType,
    pub optimality_gap: f64,
    pub relative_gap: f64,
    pub relaxed_optimality_gap: f64,
    pub max_iteration: u32,
    pub solver: XpansionSolver,
    pub log_level: u32,
    pub separation_parameter: f64,
    pub batch_size: u32,
    pub yearly_weights: Option<String>,
    pub additional_constraints: Option<String>,
    pub timelimit: u64,
}

impl Default for XpansionSettings {
    fn default() -> Self {
        Self {
            master: Master::default(),
            uc_type: UcType::default(),
            optimality_gap: 1.0,
            relative_gap: 1e-6,
            relaxed_optimality_gap: 1e-5,
            max_iteration: 1000,
            solver: XpansionSolver::default(),
            log_level: 0,
            separation_parameter: 0.5,
            batch_size: 96,
            yearly_weights: None,
            additional_constraints: None,
            timelimit: 1_000_000_000_000,
        }
    }
}

impl XpansionSettings {
    pub fn from_update(&self, update: &XpansionSettingsUpdate) -> Self {
        Self {
            master: update.master.unwrap_or(self.master),
            uc_type: update.uc_type.unwrap_or(self.uc_type),
            optimality_gap: update.optimality_gap.unwrap_or(self.optimality_gap),
            relative_gap: update.relative_gap.unwrap_or(self.relative_gap),
            relaxed_optimality_gap: update.relaxed_optimality_gap.unwrap_or(self.relaxed_optimality_gap),
            max_iteration: update.max_iteration.unwrap_or(self.max_iteration),
            solver: update.solver.unwrap_or(self.solver),
            log_level: update.log_level.unwrap_or(self.log_level),
            separation_parameter: update.separation_parameter.unwrap_or(self.separation_parameter),
            batch_size: update.batch_size.unwrap_or(self.batch_size),
            yearly_weights: update
                .yearly_weights
                .clone()
                .or_else(|| self.yearly_weights.clone()),
            additional_constraints: update
                .additional_constraints
                .clone()
                .or_else(|| self.additional_constraints.clone()),
            timelimit: update.timelimit.unwrap_or(self.timelimit),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XpansionSettingsUpdate {
    pub master: Option<Master>,
    pub uc_type: Option<UcType>,
    pub optimality_gap: Option<f64>,
    pub relative_gap: Option<f64>,
    pub relaxed_optimality_gap: Option<f64>,
    pub max_iteration: Option<u32>,
    pub solver: Option<XpansionSolver>,
    pub log_level: Option<u32>,
    pub separation_parameter: Option<f64>,
    pub batch_size: Option<u32>,
    pub yearly_weights: Option<String>,
    pub additional_constraints: Option<String>,
    pub timelimit: Option<u64>,
}

/// An investment candidate on a link. Either `max_investment` or the
/// `unit_size`/`max_units` pair must be provided.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct XpansionCandidate {
    pub name: String,
    pub area_from: String,
    pub area_to: String,
    pub annual_cost_per_mw: f64,
    pub already_installed_capacity: Option<u32>,
    pub unit_size: Option<f64>,
    pub max_units: Option<u32>,
    pub max_investment: Option<f64>,
    pub direct_link_profile: Option<String>,
    pub indirect_link_profile: Option<String>,
    pub already_installed_direct_link_profile: Option<String>,
    pub already_installed_indirect_link_profile: Option<String>,
}

impl XpansionCandidate {
    pub fn new(
        name: impl Into<String>,
        area_from: impl Into<String>,
        area_to: impl Into<String>,
        annual_cost_per_mw: f64,
    ) -> Self {
        Self {
            name: name.into(),
            area_from: area_from.into(),
            area_to: area_to.into(),
            annual_cost_per_mw,
            already_installed_capacity: None,
            unit_size: None,
            max_units: None,
            max_investment: None,
            direct_link_profile: None,
            indirect_link_profile: None,
            already_installed_direct_link_profile: None,
            already_installed_indirect_link_profile: None,
        }
    }

    pub fn with_max_investment(mut self, max_investment: f64) -> Self {
        self.max_investment = Some(max_investment);
        self
    }

    pub fn with_units(mut self, unit_size: f64, max_units: u32) -> Self {
        self.unit_size = Some(unit_size);
        self.max_units = Some(max_units);
        self
    }

    /// A candidate needs an investment bound: either `max_investment` or both
    /// `unit_size` and `max_units`.
    pub fn validate(&self) -> Result<()> {
        if self.max_investment.is_none() && (self.unit_size.is_none() || self.max_units.is_none()) {
            return Err(StudyError::BadCandidateFormat(self.name.clone()));
        }
        Ok(())
    }

    pub fn from_update(&self, update: &XpansionCandidateUpdate) -> Self {
        Self {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            area_from: update.area_from.clone().unwrap_or_else(|| self.area_from.clone()),
            area_to: update.area_to.clone().unwrap_or_else(|| self.area_to.clone()),
            annual_cost_per_mw: update.annual_cost_per_mw.unwrap_or(self.annual_cost_per_mw),
            already_installed_capacity: update
                .already_installed_capacity
                .or(self.already_installed_capacity),
            unit_size: update.unit_size.or(self.unit_size),
            max_units: update.max_units.or(self.max_units),
            max_investment: update.max_investment.or(self.max_investment),
            direct_link_profile: update
                .direct_link_profile
                .clone()
                .or_else(|| self.direct_link_profile.clone()),
            indirect_link_profile: update
                .indirect_link_profile
                .clone()
                .or_else(|| self.indirect_link_profile.clone()),
            already_installed_direct_link_profile: update
                .already_installed_direct_link_profile
                .clone()
                .or_else(|| self.already_installed_direct_link_profile.clone()),
            already_installed_indirect_link_profile: update
                .already_installed_indirect_link_profile
                .clone()
                .or_else(|| self.already_installed_indirect_link_profile.clone()),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct XpansionCandidateUpdate {
    pub name: Option<String>,
    pub area_from: Option<String>,
    pub area_to: Option<String>,
    pub annual_cost_per_mw: Option<f64>,
    pub already_installed_capacity: Option<u32>,
    pub unit_size: Option<f64>,
    pub max_units: Option<u32>,
    pub max_investment: Option<f64>,
    pub direct_link_profile: Option<String>,
    pub indirect_link_profile: Option<String>,
    pub already_installed_direct_link_profile: Option<String>,
    pub already_installed_indirect_link_profile: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintSign {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

/// An additional constraint over candidate investments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpansionConstraint {
    pub name: String,
    pub sign: ConstraintSign,
    pub right_hand_side: f64,
    #[serde(default)]
    pub candidates_coefficients: BTreeMap<String, f64>,
}

impl XpansionConstraint {
    pub fn from_update(&self, update: &XpansionConstraintUpdate) -> Self {
        let mut candidates_coefficients = self.candidates_coefficients.clone();
        if let Some(coefficients) = &update.candidates_coefficients {
            candidates_coefficients.extend(coefficients.clone());
        }
        Self {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            sign: update.sign.unwrap_or(self.sign),
            right_hand_side: update.right_hand_side.unwrap_or(self.right_hand_side),
            candidates_coefficients,
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XpansionConstraintUpdate {
    pub name: Option<String>,
    pub sign: Option<ConstraintSign>,
    pub right_hand_side: Option<f64>,
    pub candidates_coefficients: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpansionSensitivity {
    pub epsilon: f64,
    pub projection: Vec<String>,
    pub capex: bool,
}

impl Default for XpansionSensitivity {
    fn default() -> Self {
        Self {
            epsilon: 0.0,
            projection: Vec::new(),
            capex: false,
        }
    }
}

impl XpansionSensitivity {
    pub fn from_update(&self, update: &XpansionSensitivityUpdate) -> Self {
        Self {
            epsilon: update.epsilon.unwrap_or(self.epsilon),
            projection: update.projection.clone().unwrap_or_else(|| self.projection.clone()),
            capex: update.capex.unwrap_or(self.capex),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XpansionSensitivityUpdate {
    pub epsilon: Option<f64>,
    pub projection: Option<Vec<String>>,
    pub capex: Option<bool>,
}

/// Plain data snapshot of an expansion configuration, as read by a backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XpansionConfigurationData {
    pub settings: XpansionSettings,
    pub candidates: BTreeMap<String, XpansionCandidate>,
    pub constraints: BTreeMap<String, XpansionConstraint>,
    pub sensitivity: XpansionSensitivity,
}

/// The expansion problem attached to a study: settings, candidates,
/// constraints and sensitivity analysis. Mutations go through the service and
/// keep the cached maps in sync.
#[derive(Clone)]
pub struct XpansionConfiguration {
    service: Arc<dyn XpansionService>,
    settings: XpansionSettings,
    candidates: BTreeMap<String, XpansionCandidate>,
    constraints: BTreeMap<String, XpansionConstraint>,
    sensitivity: XpansionSensitivity,
}

impl XpansionConfiguration {
    pub(crate) fn from_data(service: Arc<dyn XpansionService>, data: XpansionConfigurationData) -> Self {
        Self {
            service,
            settings: data.settings,
            candidates: data.candidates,
            constraints: data.constraints,
            sensitivity: data.sensitivity,
        }
    }

    pub fn settings(&self) -> &XpansionSettings {
        &self.settings
    }

    pub fn candidates(&self) -> &BTreeMap<String, XpansionCandidate> {
        &self.candidates
    }

    pub fn constraints(&self) -> &BTreeMap<String, XpansionConstraint> {
        &self.constraints
    }

    pub fn sensitivity(&self) -> &XpansionSensitivity {
        &self.sensitivity
    }

    pub async fn create_candidate(&mut self, candidate: XpansionCandidate) -> Result<&XpansionCandidate> {
        candidate.validate()?;
        let created = self.service.create_candidate(&candidate).await?;
        let name = created.name.clone();
        self.candidates.insert(name.clone(), created);
        Ok(&self.candidates[&name])
    }

    pub async fn update_candidate(
        &mut self,
        name: &str,
        update: XpansionCandidateUpdate,
    ) -> Result<&XpansionCandidate> {
        let updated = self.service.update_candidate(name, &update).await?;
        // A renamed candidate moves to its new key.
        self.candidates.remove(name);
        let new_name = updated.name.clone();
        self.candidates.insert(new_name.clone(), updated);
        Ok(&self.candidates[&new_name])
    }

    pub async fn delete_candidates(&mut self, names: &[String]) -> Result<()> {
        self.service.delete_candidates(names).await?;
        for name in names {
            self.candidates.remove(name);
        }
        Ok(())
    }

    pub async fn create_constraint(
        &mut self,
        constraint: XpansionConstraint,
        file_name: &str,
    ) -> Result<&XpansionConstraint> {
        let created = self.service.create_constraint(&constraint, file_name).await?;
        let name = created.name.clone();
        self.constraints.insert(name.clone(), created);
        Ok(&self.constraints[&name])
    }

    pub async fn update_constraint(
        &mut self,
        name: &str,
        update: XpansionConstraintUpdate,
        file_name: &str,
    ) -> Result<&XpansionConstraint> {
        let updated = self.service.update_constraint(name, &update, file_name).await?;
        self.constraints.remove(name);
        let new_name = updated.name.clone();
        self.constraints.insert(new_name.clone(), updated);
        Ok(&self.constraints[&new_name])
    }

    pub async fn delete_constraints(&mut self, names: &[String], file_name: &str) -> Result<()> {
        self.service.delete_constraints(names, file_name).await?;
        for name in names {
            self.constraints.remove(name);
        }
        Ok(())
    }

    pub async fn update_settings(&mut self, update: XpansionSettingsUpdate) -> Result<&XpansionSettings> {
        self.settings = self.service.update_xpansion_settings(&update).await?;
        Ok(&self.settings)
    }

    pub async fn update_sensitivity(
        &mut self,
        update: XpansionSensitivityUpdate,
    ) -> Result<&XpansionSensitivity> {
        self.sensitivity = self.service.update_sensitivity(&update).await?;
        Ok(&self.sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_needs_an_investment_bound() {
        let bare = XpansionCandidate::new("transmission", "fr", "be", 120.0);
        assert!(matches!(bare.validate(), Err(StudyError::BadCandidateFormat(_))));

        assert!(bare.clone().with_max_investment(500.0).validate().is_ok());
        assert!(bare.with_units(100.0, 5).validate().is_ok());
    }

    #[test]
    fn constraint_update_merges_coefficients() {
        let constraint = XpansionConstraint {
            name: "cap".to_string(),
            sign: ConstraintSign::LessOrEqual,
            right_hand_side: 10.0,
            candidates_coefficients: BTreeMap::from([("a".to_string(), 1.0)]),
        };
        let updated = constraint.from_update(&XpansionConstraintUpdate {
            candidates_coefficients: Some(BTreeMap::from([("b".to_string(), 2.0)])),
            ..Default::default()
        });
        assert_eq!(updated.candidates_coefficients.len(), 2);
        assert_eq!(updated.right_hand_side, 10.0);
    }
}
