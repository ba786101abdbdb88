use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::matrix::Matrix;
use crate::service::HydroService;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HydroProperties {
    pub inter_daily_breakdown: f64,
    pub intra_daily_modulation: f64,
    pub inter_monthly_breakdown: f64,
    pub reservoir: bool,
    pub reservoir_capacity: f64,
    pub follow_load: bool,
    pub use_water: bool,
    pub hard_bounds: bool,
    pub initialize_reservoir_date: u32,
    pub use_heuristic: bool,
    pub power_to_level: bool,
    pub use_leeway: bool,
    pub leeway_low: f64,
    pub leeway_up: f64,
    pub pumping_efficiency: f64,
    /// Only meaningful from study version 9.2, `None` below.
    pub overflow_spilled_cost_difference: Option<f64>,
}

impl Default for HydroProperties {
    fn default() -> Self {
        Self {
            inter_daily_breakdown: 1.0,
            intra_daily_modulation: 24.0,
            inter_monthly_breakdown: 1.0,
            reservoir: false,
            reservoir_capacity: 0.0,
            follow_load: true,
            use_water: false,
            hard_bounds: false,
            initialize_reservoir_date: 0,
            use_heuristic: true,
            power_to_level: false,
            use_leeway: false,
            leeway_low: 1.0,
            leeway_up: 1.0,
            pumping_efficiency: 1.0,
            overflow_spilled_cost_difference: None,
        }
    }
}

impl HydroProperties {
    pub fn from_update(&self, update: &HydroPropertiesUpdate) -> Self {
        Self {
            inter_daily_breakdown: update.inter_daily_breakdown.unwrap_or(self.inter_daily_breakdown),
            intra_daily_modulation: update.intra_daily_modulation.unwrap_or(self.intra_daily_modulation),
            inter_monthly_breakdown: update
                .inter_monthly_breakdown
                .unwrap_or(self.inter_monthly_breakdown),
            reservoir: update.reservoir.unwrap_or(self.reservoir),
            reservoir_capacity: update.reservoir_capacity.unwrap_or(self.reservoir_capacity),
            follow_load: update.follow_load.unwrap_or(self.follow_load),
            use_water: update.use_water.unwrap_or(self.use_water),
            hard_bounds: update.hard_bounds.unwrap_or(self.hard_bounds),
            initialize_reservoir_date: update
                .initialize_reservoir_date
                .unwrap_or(self.initialize_reservoir_date),
            use_heuristic: update.use_heuristic.unwrap_or(self.use_heuristic),
            power_to_level: update.power_to_level.unwrap_or(self.power_to_level),
            use_leeway: update.use_leeway.unwrap_or(self.use_leeway),
            leeway_low: update.leeway_low.unwrap_or(self.leeway_low),
            leeway_up: update.leeway_up.unwrap_or(self.leeway_up),
            pumping_efficiency: update.pumping_efficiency.unwrap_or(self.pumping_efficiency),
            overflow_spilled_cost_difference: update
                .overflow_spilled_cost_difference
                .or(self.overflow_spilled_cost_difference),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HydroPropertiesUpdate {
    pub inter_daily_breakdown: Option<f64>,
    pub intra_daily_modulation: Option<f64>,
    pub inter_monthly_breakdown: Option<f64>,
    pub reservoir: Option<bool>,
    pub reservoir_capacity: Option<f64>,
    pub follow_load: Option<bool>,
    pub use_water: Option<bool>,
    pub hard_bounds: Option<bool>,
    pub initialize_reservoir_date: Option<u32>,
    pub use_heuristic: Option<bool>,
    pub power_to_level: Option<bool>,
    pub use_leeway: Option<bool>,
    pub leeway_low: Option<f64>,
    pub leeway_up: Option<f64>,
    pub pumping_efficiency: Option<f64>,
    pub overflow_spilled_cost_difference: Option<f64>,
}

/// Inter-monthly correlation of natural inflows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflowStructure {
    pub intermonthly_correlation: f64,
}

impl Default for InflowStructure {
    fn default() -> Self {
        Self {
            intermonthly_correlation: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydroMatrixName {
    MaxPower,
    Reservoir,
    InflowPattern,
    CreditModulations,
    WaterValues,
    RorSeries,
    ModSeries,
    MinGen,
    Energy,
}

/// Hydraulic description of an area. Every area owns exactly one.
#[derive(Clone)]
pub struct Hydro {
    service: Arc<dyn HydroService>,
    area_id: String,
    properties: HydroProperties,
    inflow_structure: InflowStructure,
}

impl Hydro {
    pub fn new(
        service: Arc<dyn HydroService>,
        area_id: impl Into<String>,
        properties: HydroProperties,
        inflow_structure: InflowStructure,
    ) -> Self {
        Self {
            service,
            area_id: area_id.into(),
            properties,
            inflow_structure,
        }
    }

    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    pub fn properties(&self) -> &HydroProperties {
        &self.properties
    }

    pub fn inflow_structure(&self) -> &InflowStructure {
        &self.inflow_structure
    }

    pub async fn update_properties(&mut self, update: HydroPropertiesUpdate) -> Result<&HydroProperties> {
        self.properties = self.service.update_hydro_properties(&self.area_id, &update).await?;
        Ok(&self.properties)
    }

    pub async fn update_inflow_structure(
        &mut self,
        inflow_structure: InflowStructure,
    ) -> Result<&InflowStructure> {
        self.service
            .update_inflow_structure(&self.area_id, &inflow_structure)
            .await?;
        self.inflow_structure = inflow_structure;
        Ok(&self.inflow_structure)
    }

    pub async fn get_matrix(&self, matrix: HydroMatrixName) -> Result<Matrix> {
        self.service.get_hydro_matrix(&self.area_id, matrix).await
    }

    pub async fn set_matrix(&self, matrix: HydroMatrixName, series: &Matrix) -> Result<()> {
        self.service.set_hydro_matrix(&self.area_id, matrix, series).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_antares() {
        let props = HydroProperties::default();
        assert_eq!(props.intra_daily_modulation, 24.0);
        assert!(props.follow_load);
        assert!(props.overflow_spilled_cost_difference.is_none());
        assert_eq!(InflowStructure::default().intermonthly_correlation, 0.5);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let merged = HydroProperties::default().from_update(&HydroPropertiesUpdate {
            reservoir: Some(true),
            reservoir_capacity: Some(1200.0),
            ..Default::default()
        });
        assert!(merged.reservoir);
        assert_eq!(merged.reservoir_capacity, 1200.0);
        assert_eq!(merged.leeway_low, 1.0);
    }
}
