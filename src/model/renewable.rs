use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::service::RenewableService;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum RenewableClusterGroup {
    #[serde(rename = "solar thermal")]
    #[strum(serialize = "solar thermal")]
    ThermalSolar,
    #[serde(rename = "solar pv")]
    #[strum(serialize = "solar pv")]
    PvSolar,
    #[serde(rename = "solar rooftop")]
    #[strum(serialize = "solar rooftop")]
    RooftopSolar,
    #[serde(rename = "wind onshore")]
    #[strum(serialize = "wind onshore")]
    WindOnShore,
    #[serde(rename = "wind offshore")]
    #[strum(serialize = "wind offshore")]
    WindOffShore,
    #[default]
    #[serde(rename = "other res 1")]
    #[strum(serialize = "other res 1")]
    Other1,
    #[serde(rename = "other res 2")]
    #[strum(serialize = "other res 2")]
    Other2,
    #[serde(rename = "other res 3")]
    #[strum(serialize = "other res 3")]
    Other3,
    #[serde(rename = "other res 4")]
    #[strum(serialize = "other res 4")]
    Other4,
}

/// Whether the series is absolute power (MW) or a production factor scaled by
/// the installed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum TimeSeriesInterpretation {
    #[default]
    #[serde(rename = "power-generation")]
    #[strum(serialize = "power-generation")]
    PowerGeneration,
    #[serde(rename = "production-factor")]
    #[strum(serialize = "production-factor")]
    ProductionFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenewableClusterProperties {
    pub enabled: bool,
    pub unit_count: u32,
    pub nominal_capacity: f64,
    pub group: RenewableClusterGroup,
    pub ts_interpretation: TimeSeriesInterpretation,
}

impl Default for RenewableClusterProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            unit_count: 1,
            nominal_capacity: 0.0,
            group: RenewableClusterGroup::default(),
            ts_interpretation: TimeSeriesInterpretation::default(),
        }
    }
}

impl RenewableClusterProperties {
    pub fn installed_capacity(&self) -> f64 {
        f64::from(self.unit_count) * self.nominal_capacity
    }

    pub fn from_update(&self, update: &RenewableClusterPropertiesUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            unit_count: update.unit_count.unwrap_or(self.unit_count),
            nominal_capacity: update.nominal_capacity.unwrap_or(self.nominal_capacity),
            group: update.group.unwrap_or(self.group),
            ts_interpretation: update.ts_interpretation.unwrap_or(self.ts_interpretation),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenewableClusterPropertiesUpdate {
    pub enabled: Option<bool>,
    pub unit_count: Option<u32>,
    pub nominal_capacity: Option<f64>,
    pub group: Option<RenewableClusterGroup>,
    pub ts_interpretation: Option<TimeSeriesInterpretation>,
}

#[derive(Clone)]
pub struct RenewableCluster {
    service: Arc<dyn RenewableService>,
    area_id: String,
    name: String,
    id: String,
    properties: RenewableClusterProperties,
}

impl RenewableCluster {
    pub fn new(
        service: Arc<dyn RenewableService>,
        area_id: impl Into<String>,
        name: impl Into<String>,
        properties: RenewableClusterProperties,
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

    pub fn properties(&self) -> &RenewableClusterProperties {
        &self.properties
    }

    pub async fn update_properties(
        &mut self,
        update: RenewableClusterPropertiesUpdate,
    ) -> Result<&RenewableClusterProperties> {
        self.properties = self
            .service
            .update_renewable_properties(&self.area_id, &self.id, &update)
            .await?;
        Ok(&self.properties)
    }

    pub async fn get_series(&self) -> Result<Matrix> {
        self.service.get_renewable_series(&self.area_id, &self.id).await
    }

    pub async fn set_series(&self, series: &Matrix) -> Result<()> {
        self.service
            .set_renewable_series(&self.area_id, &self.id, series)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_strings_match_antares_values() {
        assert_eq!(RenewableClusterGroup::WindOffShore.to_string(), "wind offshore");
        assert_eq!(
            "solar rooftop".parse::<RenewableClusterGroup>().unwrap(),
            RenewableClusterGroup::RooftopSolar
        );
    }

    #[test]
    fn merge_overrides_only_set_fields() {
        let merged = RenewableClusterProperties::default().from_update(&RenewableClusterPropertiesUpdate {
            ts_interpretation: Some(TimeSeriesInterpretation::ProductionFactor),
            ..Default::default()
        });
        assert_eq!(merged.ts_interpretation, TimeSeriesInterpretation::ProductionFactor);
        assert_eq!(merged.unit_count, 1);
    }
}
