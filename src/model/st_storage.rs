use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::service::STStorageService;
use crate::utils::error::Result;

/// Conventional storage groups. Stored as a free string since AntaresWeb
/// accepts arbitrary group names from 9.2 onwards.
pub const ST_STORAGE_GROUPS: [&str; 9] = [
    "psp_open",
    "psp_closed",
    "pondage",
    "battery",
    "other1",
    "other2",
    "other3",
    "other4",
    "other5",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct STStorageProperties {
    pub group: String,
    pub injection_nominal_capacity: f64,
    pub withdrawal_nominal_capacity: f64,
    pub reservoir_capacity: f64,
    pub efficiency: f64,
    pub initial_level: f64,
    pub initial_level_optim: bool,
    pub enabled: bool,
    /// Only meaningful from study version 9.2, `None` below.
    pub efficiency_withdrawal: Option<f64>,
    pub penalize_variation_injection: Option<bool>,
    pub penalize_variation_withdrawal: Option<bool>,
}

impl Default for STStorageProperties {
    fn default() -> Self {
        Self {
            group: "other1".to_string(),
            injection_nominal_capacity: 0.0,
            withdrawal_nominal_capacity: 0.0,
            reservoir_capacity: 0.0,
            efficiency: 1.0,
            initial_level: 0.5,
            initial_level_optim: false,
            enabled: true,
            efficiency_withdrawal: None,
            penalize_variation_injection: None,
            penalize_variation_withdrawal: None,
        }
    }
}

impl STStorageProperties {
    pub fn from_update(&self, update: &STStoragePropertiesUpdate) -> Self {
        Self {
            group: update.group.clone().unwrap_or_else(|| self.group.clone()),
            injection_nominal_capacity: update
                .injection_nominal_capacity
                .unwrap_or(self.injection_nominal_capacity),
            withdrawal_nominal_capacity: update
                .withdrawal_nominal_capacity
                .unwrap_or(self.withdrawal_nominal_capacity),
            reservoir_capacity: update.reservoir_capacity.unwrap_or(self.reservoir_capacity),
            efficiency: update.efficiency.unwrap_or(self.efficiency),
            initial_level: update.initial_level.unwrap_or(self.initial_level),
            initial_level_optim: update.initial_level_optim.unwrap_or(self.initial_level_optim),
            enabled: update.enabled.unwrap_or(self.enabled),
            efficiency_withdrawal: update.efficiency_withdrawal.or(self.efficiency_withdrawal),
            penalize_variation_injection: update
                .penalize_variation_injection
                .or(self.penalize_variation_injection),
            penalize_variation_withdrawal: update
                .penalize_variation_withdrawal
                .or(self.penalize_variation_withdrawal),
        }
    }

    /// Fields that only exist from version 9.2, by user-facing name.
    pub fn fields_requiring_9_2(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.efficiency_withdrawal.is_some() {
            fields.push("efficiency_withdrawal");
        }
        if self.penalize_variation_injection.is_some() {
            fields.push("penalize_variation_injection");
        }
        if self.penalize_variation_withdrawal.is_some() {
            fields.push("penalize_variation_withdrawal");
        }
        fields
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct STStoragePropertiesUpdate {
    pub group: Option<String>,
    pub injection_nominal_capacity: Option<f64>,
    pub withdrawal_nominal_capacity: Option<f64>,
    pub reservoir_capacity: Option<f64>,
    pub efficiency: Option<f64>,
    pub initial_level: Option<f64>,
    pub initial_level_optim: Option<bool>,
    pub enabled: Option<bool>,
    pub efficiency_withdrawal: Option<f64>,
    pub penalize_variation_injection: Option<bool>,
    pub penalize_variation_withdrawal: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum STStorageMatrixName {
    PmaxInjection,
    PmaxWithdrawal,
    LowerRuleCurve,
    UpperRuleCurve,
    Inflows,
}

/// A short-term storage unit attached to an area.
#[derive(Clone)]
pub struct STStorage {
    service: Arc<dyn STStorageService>,
    area_id: String,
    name: String,
    id: String,
    properties: STStorageProperties,
}

impl std::fmt::Debug for STStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("STStorage")
            .field("area_id", &self.area_id)
            .field("name", &self.name)
            .field("id", &self.id)
            .field("properties", &self.properties)
            .finish()
    }
}

impl STStorage {
    pub fn new(
        service: Arc<dyn STStorageService>,
        area_id: impl Into<String>,
        name: impl Into<String>,
        properties: STStorageProperties,
    ) -> Self {
        let name = name.into();
        let id = transform_name_to_id(&name);
        Self {
            service,
            area_id: area_id.into(),
            name,
            id,
            properties,
        }
    }

    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &STStorageProperties {
        &self.properties
    }

    pub async fn update_properties(
        &mut self,
        update: STStoragePropertiesUpdate,
    ) -> Result<&STStorageProperties> {
        self.properties = self
            .service
            .update_st_storage_properties(&self.area_id, &self.id, &update)
            .await?;
        Ok(&self.properties)
    }

    pub async fn get_matrix(&self, matrix: STStorageMatrixName) -> Result<Matrix> {
        self.service.get_storage_matrix(&self.area_id, &self.id, matrix).await
    }

    pub async fn set_matrix(&self, matrix: STStorageMatrixName, series: &Matrix) -> Result<()> {
        self.service
            .set_storage_matrix(&self.area_id, &self.id, matrix, series)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_names_use_snake_case() {
        assert_eq!(STStorageMatrixName::PmaxInjection.to_string(), "pmax_injection");
        assert_eq!(STStorageMatrixName::LowerRuleCurve.to_string(), "lower_rule_curve");
    }

    #[test]
    fn version_gated_fields_default_to_none() {
        let props = STStorageProperties::default();
        assert!(props.fields_requiring_9_2().is_empty());

        let props = STStorageProperties {
            efficiency_withdrawal: Some(0.9),
            ..Default::default()
        };
        assert_eq!(props.fields_requiring_9_2(), vec!["efficiency_withdrawal"]);
    }

    #[test]
    fn update_merge_preserves_gated_fields() {
        let current = STStorageProperties {
            penalize_variation_injection: Some(true),
            ..Default::default()
        };
        let merged = current.from_update(&STStoragePropertiesUpdate {
            efficiency: Some(0.85),
            ..Default::default()
        });
        assert_eq!(merged.efficiency, 0.85);
        assert_eq!(merged.penalize_variation_injection, Some(true));
    }
}
