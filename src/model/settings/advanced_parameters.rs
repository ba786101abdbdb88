use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum InitialReservoirLevel {
    #[default]
    #[serde(rename = "cold start")]
    #[strum(serialize = "cold start")]
    ColdStart,
    #[serde(rename = "hot start")]
    #[strum(serialize = "hot start")]
    HotStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum HydroHeuristicPolicy {
    #[default]
    #[serde(rename = "accommodate rule curves")]
    #[strum(serialize = "accommodate rule curves")]
    AccommodateRuleCurves,
    #[serde(rename = "maximize generation")]
    #[strum(serialize = "maximize generation")]
    MaximizeGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HydroPricingMode {
    #[default]
    Fast,
    Accurate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum PowerFluctuation {
    #[default]
    #[serde(rename = "free modulations")]
    #[strum(serialize = "free modulations")]
    FreeModulations,
    #[serde(rename = "minimize excursions")]
    #[strum(serialize = "minimize excursions")]
    MinimizeExcursions,
    #[serde(rename = "minimize ramping")]
    #[strum(serialize = "minimize ramping")]
    MinimizeRamping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum SheddingPolicy {
    #[default]
    #[serde(rename = "shave peaks")]
    #[strum(serialize = "shave peaks")]
    ShavePeaks,
    #[serde(rename = "minimize duration")]
    #[strum(serialize = "minimize duration")]
    MinimizeDuration,
    #[serde(rename = "accurate shave peaks")]
    #[strum(serialize = "accurate shave peaks")]
    AccurateShavePeaks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnitCommitmentMode {
    #[default]
    Fast,
    Accurate,
    #[serde(rename = "milp")]
    Milp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SimulationCore {
    Minimum,
    Low,
    #[default]
    Medium,
    High,
    Maximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RenewableGenerationModeling {
    #[default]
    Aggregated,
    Clusters,
}

/// Kinds of time series whose correlation is computed with the accurate
/// (hourly) method rather than the yearly average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputSeries {
    Wind,
    Load,
    Solar,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedParameters {
    pub initial_reservoir_levels: InitialReservoirLevel,
    pub hydro_heuristic_policy: HydroHeuristicPolicy,
    pub hydro_pricing_mode: HydroPricingMode,
    pub power_fluctuations: PowerFluctuation,
    pub shedding_policy: SheddingPolicy,
    pub unit_commitment_mode: UnitCommitmentMode,
    pub number_of_cores_mode: SimulationCore,
    pub renewable_generation_modelling: RenewableGenerationModeling,
    pub accuracy_on_correlation: BTreeSet<OutputSeries>,
}

impl AdvancedParameters {
    pub fn from_update(&self, update: &AdvancedParametersUpdate) -> Self {
        Self {
            initial_reservoir_levels: update
                .initial_reservoir_levels
                .unwrap_or(self.initial_reservoir_levels),
            hydro_heuristic_policy: update
                .hydro_heuristic_policy
                .unwrap_or(self.hydro_heuristic_policy),
            hydro_pricing_mode: update.hydro_pricing_mode.unwrap_or(self.hydro_pricing_mode),
            power_fluctuations: update.power_fluctuations.unwrap_or(self.power_fluctuations),
            shedding_policy: update.shedding_policy.unwrap_or(self.shedding_policy),
            unit_commitment_mode: update.unit_commitment_mode.unwrap_or(self.unit_commitment_mode),
            number_of_cores_mode: update.number_of_cores_mode.unwrap_or(self.number_of_cores_mode),
            renewable_generation_modelling: update
                .renewable_generation_modelling
                .unwrap_or(self.renewable_generation_modelling),
            accuracy_on_correlation: update
                .accuracy_on_correlation
                .clone()
                .unwrap_or_else(|| self.accuracy_on_correlation.clone()),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedParametersUpdate {
    pub initial_reservoir_levels: Option<InitialReservoirLevel>,
    pub hydro_heuristic_policy: Option<HydroHeuristicPolicy>,
    pub hydro_pricing_mode: Option<HydroPricingMode>,
    pub power_fluctuations: Option<PowerFluctuation>,
    pub shedding_policy: Option<SheddingPolicy>,
    pub unit_commitment_mode: Option<UnitCommitmentMode>,
    pub number_of_cores_mode: Option<SimulationCore>,
    pub renewable_generation_modelling: Option<RenewableGenerationModeling>,
    pub accuracy_on_correlation: Option<BTreeSet<OutputSeries>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedParameters {
    pub seed_tsgen_wind: u32,
    pub seed_tsgen_load: u32,
    pub seed_tsgen_hydro: u32,
    pub seed_tsgen_thermal: u32,
    pub seed_tsgen_solar: u32,
    pub seed_tsnumbers: u32,
    pub seed_unsupplied_energy_costs: u32,
    pub seed_spilled_energy_costs: u32,
    pub seed_thermal_costs: u32,
    pub seed_hydro_costs: u32,
    pub seed_initial_reservoir_levels: u32,
}

impl Default for SeedParameters {
    fn default() -> Self {
        Self {
            seed_tsgen_wind: 5489,
            seed_tsgen_load: 1005489,
            seed_tsgen_hydro: 2005489,
            seed_tsgen_thermal: 3005489,
            seed_tsgen_solar: 4005489,
            seed_tsnumbers: 5005489,
            seed_unsupplied_energy_costs: 6005489,
            seed_spilled_energy_costs: 7005489,
            seed_thermal_costs: 8005489,
            seed_hydro_costs: 9005489,
            seed_initial_reservoir_levels: 10005489,
        }
    }
}

impl SeedParameters {
    pub fn from_update(&self, update: &SeedParametersUpdate) -> Self {
        Self {
            seed_tsgen_wind: update.seed_tsgen_wind.unwrap_or(self.seed_tsgen_wind),
            seed_tsgen_load: update.seed_tsgen_load.unwrap_or(self.seed_tsgen_load),
            seed_tsgen_hydro: update.seed_tsgen_hydro.unwrap_or(self.seed_tsgen_hydro),
            seed_tsgen_thermal: update.seed_tsgen_thermal.unwrap_or(self.seed_tsgen_thermal),
            seed_tsgen_solar: update.seed_tsgen_solar.unwrap_or(self.seed_tsgen_solar),
            seed_tsnumbers: update.seed_tsnumbers.unwrap_or(self.seed_tsnumbers),
            seed_unsupplied_energy_costs: update
                .seed_unsupplied_energy_costs
                .unwrap_or(self.seed_unsupplied_energy_costs),
            seed_spilled_energy_costs: update
                .seed_spilled_energy_costs
                .unwrap_or(self.seed_spilled_energy_costs),
            seed_thermal_costs: update.seed_thermal_costs.unwrap_or(self.seed_thermal_costs),
            seed_hydro_costs: update.seed_hydro_costs.unwrap_or(self.seed_hydro_costs),
            seed_initial_reservoir_levels: update
                .seed_initial_reservoir_levels
                .unwrap_or(self.seed_initial_reservoir_levels),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedParametersUpdate {
    pub seed_tsgen_wind: Option<u32>,
    pub seed_tsgen_load: Option<u32>,
    pub seed_tsgen_hydro: Option<u32>,
    pub seed_tsgen_thermal: Option<u32>,
    pub seed_tsgen_solar: Option<u32>,
    pub seed_tsnumbers: Option<u32>,
    pub seed_unsupplied_energy_costs: Option<u32>,
    pub seed_spilled_energy_costs: Option<u32>,
    pub seed_thermal_costs: Option<u32>,
    pub seed_hydro_costs: Option<u32>,
    pub seed_initial_reservoir_levels: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_wire_strings_round_trip() {
        assert_eq!(InitialReservoirLevel::ColdStart.to_string(), "cold start");
        assert_eq!(
            "shave peaks".parse::<SheddingPolicy>().unwrap(),
            SheddingPolicy::ShavePeaks
        );
    }

    #[test]
    fn seeds_start_from_the_antares_defaults() {
        let seeds = SeedParameters::default();
        assert_eq!(seeds.seed_tsgen_wind, 5489);
        assert_eq!(seeds.seed_initial_reservoir_levels, 10005489);
    }
}
