use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::service::ThermalService;
use crate::utils::error::Result;

/// Law used when generating availability time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LawOption {
    #[default]
    Uniform,
    Geometric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum ThermalClusterGroup {
    #[serde(rename = "nuclear")]
    #[strum(serialize = "nuclear")]
    Nuclear,
    #[serde(rename = "lignite")]
    #[strum(serialize = "lignite")]
    Lignite,
    #[serde(rename = "hard coal")]
    #[strum(serialize = "hard coal")]
    HardCoal,
    #[serde(rename = "gas")]
    #[strum(serialize = "gas")]
    Gas,
    #[serde(rename = "oil")]
    #[strum(serialize = "oil")]
    Oil,
    #[serde(rename = "mixed fuel")]
    #[strum(serialize = "mixed fuel")]
    MixedFuel,
    #[default]
    #[serde(rename = "other 1")]
    #[strum(serialize = "other 1")]
    Other1,
    #[serde(rename = "other 2")]
    #[strum(serialize = "other 2")]
    Other2,
    #[serde(rename = "other 3")]
    #[strum(serialize = "other 3")]
    Other3,
    #[serde(rename = "other 4")]
    #[strum(serialize = "other 4")]
    Other4,
}

/// Per-cluster override of the global time-series generation switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum LocalTsGenerationBehavior {
    #[default]
    #[serde(rename = "use global")]
    #[strum(serialize = "use global")]
    UseGlobal,
    #[serde(rename = "force no generation")]
    #[strum(serialize = "force no generation")]
    ForceNoGeneration,
    #[serde(rename = "force generation")]
    #[strum(serialize = "force generation")]
    ForceGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum ThermalCostGeneration {
    #[default]
    #[serde(rename = "SetManually")]
    #[strum(serialize = "SetManually")]
    SetManually,
    #[serde(rename = "useCostTimeseries")]
    #[strum(serialize = "useCostTimeseries")]
    UseCostTimeSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThermalClusterProperties {
    pub enabled: bool,
    pub unit_count: u32,
    pub nominal_capacity: f64,
    pub group: ThermalClusterGroup,
    pub gen_ts: LocalTsGenerationBehavior,
    pub min_stable_power: f64,
    pub min_up_time: u32,
    pub min_down_time: u32,
    pub must_run: bool,
    pub spinning: f64,
    pub volatility_forced: f64,
    pub volatility_planned: f64,
    pub law_forced: LawOption,
    pub law_planned: LawOption,
    pub marginal_cost: f64,
    pub spread_cost: f64,
    pub fixed_cost: f64,
    pub startup_cost: f64,
    pub market_bid_cost: f64,
    pub co2: f64,
    pub nh3: f64,
    pub so2: f64,
    pub nox: f64,
    pub pm2_5: f64,
    pub pm5: f64,
    pub pm10: f64,
    pub nmvoc: f64,
    pub op1: f64,
    pub op2: f64,
    pub op3: f64,
    pub op4: f64,
    pub op5: f64,
    pub cost_generation: ThermalCostGeneration,
    pub efficiency: f64,
    pub variable_o_m_cost: f64,
}

impl Default for ThermalClusterProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            unit_count: 1,
            nominal_capacity: 0.0,
            group: ThermalClusterGroup::default(),
            gen_ts: LocalTsGenerationBehavior::default(),
            min_stable_power: 0.0,
            min_up_time: 1,
            min_down_time: 1,
            must_run: false,
            spinning: 0.0,
            volatility_forced: 0.0,
            volatility_planned: 0.0,
            law_forced: LawOption::default(),
            law_planned: LawOption::default(),
            marginal_cost: 0.0,
            spread_cost: 0.0,
            fixed_cost: 0.0,
            startup_cost: 0.0,
            market_bid_cost: 0.0,
            co2: 0.0,
            nh3: 0.0,
            so2: 0.0,
            nox: 0.0,
            pm2_5: 0.0,
            pm5: 0.0,
            pm10: 0.0,
            nmvoc: 0.0,
            op1: 0.0,
            op2: 0.0,
            op3: 0.0,
            op4: 0.0,
            op5: 0.0,
            cost_generation: ThermalCostGeneration::default(),
            efficiency: 100.0,
            variable_o_m_cost: 0.0,
        }
    }
}

impl ThermalClusterProperties {
    pub fn installed_capacity(&self) -> f64 {
        f64::from(self.unit_count) * self.nominal_capacity
    }

    pub fn enabled_capacity(&self) -> f64 {
        if self.enabled {
            self.installed_capacity()
        } else {
            0.0
        }
    }

    pub fn from_update(&self, update: &ThermalClusterPropertiesUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            unit_count: update.unit_count.unwrap_or(self.unit_count),
            nominal_capacity: update.nominal_capacity.unwrap_or(self.nominal_capacity),
            group: update.group.unwrap_or(self.group),
            gen_ts: update.gen_ts.unwrap_or(self.gen_ts),
            min_stable_power: update.min_stable_power.unwrap_or(self.min_stable_power),
            min_up_time: update.min_up_time.unwrap_or(self.min_up_time),
            min_down_time: update.min_down_time.unwrap_or(self.min_down_time),
            must_run: update.must_run.unwrap_or(self.must_run),
            spinning: update.spinning.unwrap_or(self.spinning),
            volatility_forced: update.volatility_forced.unwrap_or(self.volatility_forced),
            volatility_planned: update.volatility_planned.unwrap_or(self.volatility_planned),
            law_forced: update.law_forced.unwrap_or(self.law_forced),
            law_planned: update.law_planned.unwrap_or(self.law_planned),
            marginal_cost: update.marginal_cost.unwrap_or(self.marginal_cost),
            spread_cost: update.spread_cost.unwrap_or(self.spread_cost),
            fixed_cost: update.fixed_cost.unwrap_or(self.fixed_cost),
            startup_cost: update.startup_cost.unwrap_or(self.startup_cost),
            market_bid_cost: update.market_bid_cost.unwrap_or(self.market_bid_cost),
            co2: update.co2.unwrap_or(self.co2),
            nh3: update.nh3.unwrap_or(self.nh3),
            so2: update.so2.unwrap_or(self.so2),
            nox: update.nox.unwrap_or(self.nox),
            pm2_5: update.pm2_5.unwrap_or(self.pm2_5),
            pm5: update.pm5.unwrap_or(self.pm5),
            pm10: update.pm10.unwrap_or(self.pm10),
            nmvoc: update.nmvoc.unwrap_or(self.nmvoc),
            op1: update.op1.unwrap_or(self.op1),
            op2: update.op2.unwrap_or(self.op2),
            op3: update.op3.unwrap_or(self.op3),
            op4: update.op4.unwrap_or(self.op4),
            op5: update.op5.unwrap_or(self.op5),
            cost_generation: update.cost_generation.unwrap_or(self.cost_generation),
            efficiency: update.efficiency.unwrap_or(self.efficiency),
            variable_o_m_cost: update.variable_o_m_cost.unwrap_or(self.variable_o_m_cost),
        }
    }
}

/// Partial update: `None` fields keep their current value.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThermalClusterPropertiesUpdate {
    pub enabled: Option<bool>,
    pub unit_count: Option<u32>,
    pub nominal_capacity: Option<f64>,
    pub group: Option<ThermalClusterGroup>,
    pub gen_ts: Option<LocalTsGenerationBehavior>,
    pub min_stable_power: Option<f64>,
    pub min_up_time: Option<u32>,
    pub min_down_time: Option<u32>,
    pub must_run: Option<bool>,
    pub spinning: Option<f64>,
    pub volatility_forced: Option<f64>,
    pub volatility_planned: Option<f64>,
    pub law_forced: Option<LawOption>,
    pub law_planned: Option<LawOption>,
    pub marginal_cost: Option<f64>,
    pub spread_cost: Option<f64>,
    pub fixed_cost: Option<f64>,
    pub startup_cost: Option<f64>,
    pub market_bid_cost: Option<f64>,
    pub co2: Option<f64>,
    pub nh3: Option<f64>,
    pub so2: Option<f64>,
    pub nox: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm5: Option<f64>,
    pub pm10: Option<f64>,
    pub nmvoc: Option<f64>,
    pub op1: Option<f64>,
    pub op2: Option<f64>,
    pub op3: Option<f64>,
    pub op4: Option<f64>,
    pub op5: Option<f64>,
    pub cost_generation: Option<ThermalCostGeneration>,
    pub efficiency: Option<f64>,
    pub variable_o_m_cost: Option<f64>,
}

/// Matrices attached to a thermal cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalClusterMatrixName {
    PreproData,
    PreproModulation,
    Series,
    SeriesCo2Cost,
    SeriesFuelCost,
}

impl ThermalClusterMatrixName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreproData => "data",
            Self::PreproModulation => "modulation",
            Self::Series => "series",
            Self::SeriesCo2Cost => "CO2Cost",
            Self::SeriesFuelCost => "fuelCost",
        }
    }
}

/// A thermal generation cluster attached to an area. Mutations go through the
/// backing service and the cached properties are refreshed from its answer.
#[derive(Clone)]
pub struct ThermalCluster {
    service: Arc<dyn ThermalService>,
    area_id: String,
    name: String,
    id: String,
    properties: ThermalClusterProperties,
}

impl ThermalCluster {
    pub fn new(
        service: Arc<dyn ThermalService>,
        area_id: impl Into<String>,
        name: impl Into<String>,
        properties: ThermalClusterProperties,
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

    pub fn properties(&self) -> &ThermalClusterProperties {
        &self.properties
    }

    pub async fn update_properties(
        &mut self,
        update: ThermalClusterPropertiesUpdate,
    ) -> Result<&ThermalClusterProperties> {
        self.properties = self
            .service
            .update_thermal_properties(&self.area_id, &self.id, &update)
            .await?;
        Ok(&self.properties)
    }

    pub async fn get_matrix(&self, matrix: ThermalClusterMatrixName) -> Result<Matrix> {
        self.service
            .get_thermal_matrix(&self.area_id, &self.id, matrix)
            .await
    }

    pub async fn set_matrix(&self, matrix: ThermalClusterMatrixName, series: &Matrix) -> Result<()> {
        self.service
            .set_thermal_matrix(&self.area_id, &self.id, matrix, series)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let current = ThermalClusterProperties::default();
        let update = ThermalClusterPropertiesUpdate {
            nominal_capacity: Some(830.0),
            group: Some(ThermalClusterGroup::Nuclear),
            ..Default::default()
        };
        let merged = current.from_update(&update);
        assert_eq!(merged.nominal_capacity, 830.0);
        assert_eq!(merged.group, ThermalClusterGroup::Nuclear);
        assert_eq!(merged.efficiency, 100.0);
        assert!(merged.enabled);
    }

    #[test]
    fn group_round_trips_through_strings() {
        assert_eq!(ThermalClusterGroup::HardCoal.to_string(), "hard coal");
        assert_eq!("mixed fuel".parse::<ThermalClusterGroup>().unwrap(), ThermalClusterGroup::MixedFuel);
    }

    #[test]
    fn installed_capacity_multiplies_units() {
        let props = ThermalClusterProperties {
            unit_count: 4,
            nominal_capacity: 250.0,
            ..Default::default()
        };
        assert_eq!(props.installed_capacity(), 1000.0);
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let update = ThermalClusterPropertiesUpdate {
            marginal_cost: Some(42.5),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"marginalCost":42.5}"#);
    }
}
