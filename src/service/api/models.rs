//! DTOs for the AntaresWeb endpoints whose JSON shape differs from the model
//! structs, plus the nested scenario-builder representation.
//!
//! Most property structs already serialize to the exact camelCase form bodies
//! and are sent as-is; only the divergent shapes live here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::area::AreaUi;
use crate::model::binding_constraint::{BindingConstraintProperties, ConstraintTerm};
use crate::model::link::{LinkProperties, LinkUi};
use crate::model::matrix::Matrix;
use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{
    AdequacyPatchParameters, AdvancedParameters, BuildingMode, GeneralParameters,
    HydroHeuristicPolicy, HydroPricingMode, InitialReservoirLevel, Mode, Month, OutputSeries,
    PowerFluctuation, PriceTakingOrder, RenewableGenerationModeling, SeedParameters,
    SheddingPolicy, SimulationCore, UnitCommitmentMode, WeekDay,
};
use crate::model::simulation::JobStatus;
use crate::model::xpansion::{XpansionCandidate, XpansionSensitivity, XpansionSettings};
use crate::utils::error::{Result, StudyError};

/// The `raw` download endpoint wraps rows in a `data`/`index`/`columns`
/// object; only the rows matter to us.
#[derive(Debug, Deserialize)]
pub struct MatrixDto {
    pub data: Matrix,
}

/// Full frame the storage series endpoints exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixFrameDto {
    pub data: Matrix,
    pub index: Vec<usize>,
    pub columns: Vec<usize>,
}

impl MatrixFrameDto {
    pub fn from_matrix(series: &Matrix) -> Self {
        Self {
            data: series.clone(),
            index: (0..series.nb_rows()).collect(),
            columns: (0..series.nb_cols()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AreaCreationDto<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AreaCreatedDto {
    pub id: String,
}

/// One entry of `GET /areas?type=AREA`.
#[derive(Debug, Deserialize)]
pub struct AreaListItemDto {
    pub id: String,
    pub name: String,
}

/// One value of the `ui=true` area map: the ui block is nested and colors are
/// split into three fields.
#[derive(Debug, Deserialize)]
pub struct AreaUiEntryDto {
    pub ui: AreaUiFieldsDto,
}

#[derive(Debug, Deserialize)]
pub struct AreaUiFieldsDto {
    pub x: i32,
    pub y: i32,
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
}

impl From<AreaUiFieldsDto> for AreaUi {
    fn from(dto: AreaUiFieldsDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            color_rgb: [dto.color_r, dto.color_g, dto.color_b],
        }
    }
}

/// Body of `PUT /areas/{id}/ui`, which keeps snake_case keys.
#[derive(Debug, Serialize)]
pub struct AreaUiUpdateDto {
    pub x: i32,
    pub y: i32,
    pub color_rgb: [u8; 3],
}

impl From<&AreaUi> for AreaUiUpdateDto {
    fn from(ui: &AreaUi) -> Self {
        Self {
            x: ui.x,
            y: ui.y,
            color_rgb: ui.color_rgb,
        }
    }
}

/// Serializes `payload` and adds a `name` key, the shape cluster creation
/// endpoints expect.
pub fn with_name(payload: &impl Serialize, name: &str) -> Result<Value> {
    let mut value = serde_json::to_value(payload)?;
    if let Value::Object(map) = &mut value {
        map.insert("name".to_string(), Value::String(name.to_string()));
    }
    Ok(value)
}

/// The hydro inflow-structure form spells the correlation field differently
/// from the model.
#[derive(Debug, Serialize, Deserialize)]
pub struct InflowStructureDto {
    #[serde(rename = "interMonthlyCorrelation")]
    pub inter_monthly_correlation: f64,
}

/// Wire form of a link: both endpoints plus flattened properties and ui.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkDto {
    pub area1: String,
    pub area2: String,
    #[serde(flatten)]
    pub properties: LinkProperties,
    #[serde(flatten)]
    pub ui: LinkUi,
}

/// Binding constraint as returned by the API: id, name and terms alongside
/// the flattened properties.
#[derive(Debug, Deserialize)]
pub struct ConstraintDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub terms: Vec<ConstraintTerm>,
    #[serde(flatten)]
    pub properties: BindingConstraintProperties,
}

#[derive(Debug, Serialize)]
pub struct ConstraintCreationDto<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub properties: &'a BindingConstraintProperties,
}

/// `config/general/form`: a handful of fields carry different names than the
/// model, and the thermal TS count lives in a separate endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralFormDto {
    pub mode: Mode,
    pub first_day: u32,
    pub last_day: u32,
    pub horizon: String,
    pub first_month: Month,
    pub first_week_day: WeekDay,
    pub first_january: WeekDay,
    pub leap_year: bool,
    pub nb_years: u32,
    pub building_mode: BuildingMode,
    pub selection_mode: bool,
    pub year_by_year: bool,
    pub simulation_synthesis: bool,
    pub geographic_trimming: bool,
    pub thematic_trimming: bool,
}

impl GeneralFormDto {
    pub fn from_model(general: &GeneralParameters) -> Self {
        Self {
            mode: general.mode,
            first_day: general.simulation_start,
            last_day: general.simulation_end,
            horizon: general.horizon.clone(),
            first_month: general.first_month_in_year,
            first_week_day: general.first_week_day,
            first_january: general.january_first,
            leap_year: general.leap_year,
            nb_years: general.nb_years,
            building_mode: general.building_mode,
            selection_mode: general.user_playlist,
            year_by_year: general.year_by_year,
            simulation_synthesis: general.simulation_synthesis,
            geographic_trimming: general.geographic_trimming,
            thematic_trimming: general.thematic_trimming,
        }
    }

    pub fn into_model(self, nb_timeseries_thermal: u32) -> GeneralParameters {
        GeneralParameters {
            mode: self.mode,
            horizon: self.horizon,
            nb_years: self.nb_years,
            simulation_start: self.first_day,
            simulation_end: self.last_day,
            january_first: self.first_january,
            first_month_in_year: self.first_month,
            first_week_day: self.first_week_day,
            leap_year: self.leap_year,
            year_by_year: self.year_by_year,
            simulation_synthesis: self.simulation_synthesis,
            building_mode: self.building_mode,
            user_playlist: self.selection_mode,
            thematic_trimming: self.thematic_trimming,
            geographic_trimming: self.geographic_trimming,
            nb_timeseries_thermal,
        }
    }
}

/// `{study}/timeseries/config` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeseriesConfigDto {
    pub thermal: ThermalTsConfigDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThermalTsConfigDto {
    pub number: u32,
}

/// `config/advancedparameters/form` merges the advanced and seed groups, with
/// the correlation set carried as a comma-joined string.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFormDto {
    pub initial_reservoir_levels: InitialReservoirLevel,
    pub hydro_heuristic_policy: HydroHeuristicPolicy,
    pub hydro_pricing_mode: HydroPricingMode,
    pub power_fluctuations: PowerFluctuation,
    pub shedding_policy: SheddingPolicy,
    pub unit_commitment_mode: UnitCommitmentMode,
    pub number_of_cores_mode: SimulationCore,
    pub renewable_generation_modelling: RenewableGenerationModeling,
    pub accuracy_on_correlation: String,
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

impl AdvancedFormDto {
    pub fn from_models(advanced: &AdvancedParameters, seeds: &SeedParameters) -> Self {
        let accuracy_on_correlation = advanced
            .accuracy_on_correlation
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            initial_reservoir_levels: advanced.initial_reservoir_levels,
            hydro_heuristic_policy: advanced.hydro_heuristic_policy,
            hydro_pricing_mode: advanced.hydro_pricing_mode,
            power_fluctuations: advanced.power_fluctuations,
            shedding_policy: advanced.shedding_policy,
            unit_commitment_mode: advanced.unit_commitment_mode,
            number_of_cores_mode: advanced.number_of_cores_mode,
            renewable_generation_modelling: advanced.renewable_generation_modelling,
            accuracy_on_correlation,
            seed_tsgen_wind: seeds.seed_tsgen_wind,
            seed_tsgen_load: seeds.seed_tsgen_load,
            seed_tsgen_hydro: seeds.seed_tsgen_hydro,
            seed_tsgen_thermal: seeds.seed_tsgen_thermal,
            seed_tsgen_solar: seeds.seed_tsgen_solar,
            seed_tsnumbers: seeds.seed_tsnumbers,
            seed_unsupplied_energy_costs: seeds.seed_unsupplied_energy_costs,
            seed_spilled_energy_costs: seeds.seed_spilled_energy_costs,
            seed_thermal_costs: seeds.seed_thermal_costs,
            seed_hydro_costs: seeds.seed_hydro_costs,
            seed_initial_reservoir_levels: seeds.seed_initial_reservoir_levels,
        }
    }

    pub fn into_models(self) -> Result<(AdvancedParameters, SeedParameters)> {
        let mut accuracy_on_correlation = std::collections::BTreeSet::new();
        for part in self.accuracy_on_correlation.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let series: OutputSeries =
                part.parse().map_err(|_| StudyError::StudySettingsRead {
                    cause: format!("unknown correlation series `{part}`"),
                })?;
            accuracy_on_correlation.insert(series);
        }
        let advanced = AdvancedParameters {
            initial_reservoir_levels: self.initial_reservoir_levels,
            hydro_heuristic_policy: self.hydro_heuristic_policy,
            hydro_pricing_mode: self.hydro_pricing_mode,
            power_fluctuations: self.power_fluctuations,
            shedding_policy: self.shedding_policy,
            unit_commitment_mode: self.unit_commitment_mode,
            number_of_cores_mode: self.number_of_cores_mode,
            renewable_generation_modelling: self.renewable_generation_modelling,
            accuracy_on_correlation,
        };
        let seeds = SeedParameters {
            seed_tsgen_wind: self.seed_tsgen_wind,
            seed_tsgen_load: self.seed_tsgen_load,
            seed_tsgen_hydro: self.seed_tsgen_hydro,
            seed_tsgen_thermal: self.seed_tsgen_thermal,
            seed_tsgen_solar: self.seed_tsgen_solar,
            seed_tsnumbers: self.seed_tsnumbers,
            seed_unsupplied_energy_costs: self.seed_unsupplied_energy_costs,
            seed_spilled_energy_costs: self.seed_spilled_energy_costs,
            seed_thermal_costs: self.seed_thermal_costs,
            seed_hydro_costs: self.seed_hydro_costs,
            seed_initial_reservoir_levels: self.seed_initial_reservoir_levels,
        };
        Ok((advanced, seeds))
    }
}

/// `config/adequacypatch/form` spells three of the toggles differently.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdequacyPatchFormDto {
    pub enable_adequacy_patch: bool,
    pub ntc_from_physical_areas_out_to_physical_areas_in_adequacy_patch: bool,
    pub ntc_between_physical_areas_out_adequacy_patch: bool,
    pub price_taking_order: PriceTakingOrder,
    pub include_hurdle_cost_csr: bool,
    pub check_csr_cost_function: bool,
    pub threshold_initiate_curtailment_sharing_rule: f64,
    pub threshold_display_local_matching_rule_violations: f64,
    pub threshold_csr_variable_bounds_relaxation: u32,
}

impl AdequacyPatchFormDto {
    pub fn from_model(patch: &AdequacyPatchParameters) -> Self {
        Self {
            enable_adequacy_patch: patch.include_adq_patch,
            ntc_from_physical_areas_out_to_physical_areas_in_adequacy_patch: patch
                .set_to_null_ntc_from_physical_out_to_physical_in_for_first_step,
            ntc_between_physical_areas_out_adequacy_patch: patch
                .set_to_null_ntc_between_physical_out_for_first_step,
            price_taking_order: patch.price_taking_order,
            include_hurdle_cost_csr: patch.include_hurdle_cost_csr,
            check_csr_cost_function: patch.check_csr_cost_function,
            threshold_initiate_curtailment_sharing_rule: patch
                .threshold_initiate_curtailment_sharing_rule,
            threshold_display_local_matching_rule_violations: patch
                .threshold_display_local_matching_rule_violations,
            threshold_csr_variable_bounds_relaxation: patch
                .threshold_csr_variable_bounds_relaxation,
        }
    }

    pub fn into_model(self) -> AdequacyPatchParameters {
        AdequacyPatchParameters {
            include_adq_patch: self.enable_adequacy_patch,
            set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: self
                .ntc_from_physical_areas_out_to_physical_areas_in_adequacy_patch,
            set_to_null_ntc_between_physical_out_for_first_step: self
                .ntc_between_physical_areas_out_adequacy_patch,
            price_taking_order: self.price_taking_order,
            include_hurdle_cost_csr: self.include_hurdle_cost_csr,
            check_csr_cost_function: self.check_csr_cost_function,
            threshold_initiate_curtailment_sharing_rule: self
                .threshold_initiate_curtailment_sharing_rule,
            threshold_display_local_matching_rule_violations: self
                .threshold_display_local_matching_rule_violations,
            threshold_csr_variable_bounds_relaxation: self
                .threshold_csr_variable_bounds_relaxation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RunResponseDto {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct JobDto {
    pub status: JobStatus,
    #[serde(default)]
    pub output_id: Option<String>,
}

/// Launcher parameters, in the names the launcher endpoint expects.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct RunRequestDto {
    pub nb_cpu: Option<u32>,
    pub auto_unzip: bool,
    pub output_suffix: Option<String>,
    pub other_options: Option<String>,
}

/// Xpansion settings frame: the flattened settings plus the nested
/// sensitivity block.
#[derive(Debug, Serialize, Deserialize)]
pub struct XpansionSettingsDto {
    #[serde(flatten)]
    pub settings: XpansionSettings,
    #[serde(rename = "sensitivityConfig", default)]
    pub sensitivity_config: Option<XpansionSensitivity>,
}

/// Candidate as the web API carries it: one `link` field instead of the two
/// area columns of the file format.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpansionCandidateDto {
    pub name: String,
    pub link: String,
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

impl XpansionCandidateDto {
    pub fn from_model(candidate: &XpansionCandidate) -> Self {
        Self {
            name: candidate.name.clone(),
            link: format!("{} - {}", candidate.area_from, candidate.area_to),
            annual_cost_per_mw: candidate.annual_cost_per_mw,
            already_installed_capacity: candidate.already_installed_capacity,
            unit_size: candidate.unit_size,
            max_units: candidate.max_units,
            max_investment: candidate.max_investment,
            direct_link_profile: candidate.direct_link_profile.clone(),
            indirect_link_profile: candidate.indirect_link_profile.clone(),
            already_installed_direct_link_profile: candidate
                .already_installed_direct_link_profile
                .clone(),
            already_installed_indirect_link_profile: candidate
                .already_installed_indirect_link_profile
                .clone(),
        }
    }

    pub fn into_model(self) -> Result<XpansionCandidate> {
        let (area_from, area_to) =
            self.link
                .split_once(" - ")
                .ok_or_else(|| StudyError::XpansionConfigurationRead {
                    cause: format!("malformed candidate link `{}`", self.link),
                })?;
        Ok(XpansionCandidate {
            name: self.name,
            area_from: area_from.to_string(),
            area_to: area_to.to_string(),
            annual_cost_per_mw: self.annual_cost_per_mw,
            already_installed_capacity: self.already_installed_capacity,
            unit_size: self.unit_size,
            max_units: self.max_units,
            max_investment: self.max_investment,
            direct_link_profile: self.direct_link_profile,
            indirect_link_profile: self.indirect_link_profile,
            already_installed_direct_link_profile: self.already_installed_direct_link_profile,
            already_installed_indirect_link_profile: self.already_installed_indirect_link_profile,
        })
    }
}

pub const DEFAULT_RULESET: &str = "Default Ruleset";

/// Nests the flat `kind,id,year` entries the way the scenario-builder config
/// endpoint lays them out: ruleset → kind → id (→ cluster) → year.
pub fn scenario_builder_to_api(builder: &ScenarioBuilder) -> Value {
    let mut ruleset = Map::new();
    for (key, value) in builder.to_entries() {
        let parts: Vec<&str> = key.split(',').collect();
        let path: Vec<String> = match parts.as_slice() {
            [kind @ ("t" | "r"), area, year, cluster] => vec![
                kind.to_string(),
                area.to_string(),
                cluster.to_string(),
                year.to_string(),
            ],
            ["ntc", from, to, year] => {
                vec!["ntc".to_string(), format!("{from} / {to}"), year.to_string()]
            }
            [kind, id, year] => vec![kind.to_string(), id.to_string(), year.to_string()],
            _ => continue,
        };
        insert_nested(&mut ruleset, &path, value);
    }
    Value::Object(Map::from_iter([(
        DEFAULT_RULESET.to_string(),
        Value::Object(ruleset),
    )]))
}

fn insert_nested(map: &mut Map<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert_nested(child, rest, value);
            }
        }
    }
}

/// Rebuilds a [`ScenarioBuilder`] from the nested config representation. The
/// first ruleset is used.
pub fn scenario_builder_from_api(nb_years: usize, body: &Value) -> Result<ScenarioBuilder> {
    let rulesets = body.as_object().ok_or_else(|| StudyError::ScenarioBuilderRead {
        cause: "expected a ruleset object".to_string(),
    })?;
    let Some(ruleset) = rulesets
        .get(DEFAULT_RULESET)
        .or_else(|| rulesets.values().next())
        .and_then(Value::as_object)
    else {
        return ScenarioBuilder::from_entries(nb_years, []);
    };

    let mut entries: Vec<(String, Value)> = Vec::new();
    for (kind, per_kind) in ruleset {
        let per_kind = per_kind.as_object().ok_or_else(malformed(kind))?;
        match kind.as_str() {
            "t" | "r" => {
                for (area, clusters) in per_kind {
                    let clusters = clusters.as_object().ok_or_else(malformed(kind))?;
                    for (cluster, years) in clusters {
                        let years = years.as_object().ok_or_else(malformed(kind))?;
                        for (year, value) in years {
                            entries.push((format!("{kind},{area},{year},{cluster}"), value.clone()));
                        }
                    }
                }
            }
            "ntc" => {
                for (link_id, years) in per_kind {
                    let (from, to) = link_id.split_once(" / ").ok_or_else(malformed(kind))?;
                    let years = years.as_object().ok_or_else(malformed(kind))?;
                    for (year, value) in years {
                        entries.push((format!("ntc,{from},{to},{year}"), value.clone()));
                    }
                }
            }
            _ => {
                for (id, years) in per_kind {
                    let years = years.as_object().ok_or_else(malformed(kind))?;
                    for (year, value) in years {
                        entries.push((format!("{kind},{id},{year}"), value.clone()));
                    }
                }
            }
        }
    }
    ScenarioBuilder::from_entries(nb_years, entries.iter().map(|(k, v)| (k.as_str(), v.clone())))
}

fn malformed(kind: &str) -> impl Fn() -> StudyError + '_ {
    move || StudyError::ScenarioBuilderRead {
        cause: format!("malformed `{kind}` block"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn general_form_uses_the_web_field_names() {
        let general = GeneralParameters {
            simulation_start: 7,
            user_playlist: true,
            ..Default::default()
        };
        let value = serde_json::to_value(GeneralFormDto::from_model(&general)).unwrap();
        assert_eq!(value["firstDay"], json!(7));
        assert_eq!(value["selectionMode"], json!(true));
        assert!(value.get("nbTimeseriesThermal").is_none());
    }

    #[test]
    fn adequacy_form_round_trips() {
        let patch = AdequacyPatchParameters {
            include_adq_patch: true,
            ..Default::default()
        };
        let value = serde_json::to_value(AdequacyPatchFormDto::from_model(&patch)).unwrap();
        assert_eq!(value["enableAdequacyPatch"], json!(true));
        assert_eq!(
            value["ntcBetweenPhysicalAreasOutAdequacyPatch"],
            json!(true)
        );

        let parsed: AdequacyPatchFormDto = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.into_model(), patch);
    }

    #[test]
    fn advanced_form_joins_correlation_series() {
        let mut advanced = AdvancedParameters::default();
        advanced.accuracy_on_correlation.insert(OutputSeries::Wind);
        advanced.accuracy_on_correlation.insert(OutputSeries::Load);
        let dto = AdvancedFormDto::from_models(&advanced, &SeedParameters::default());
        assert_eq!(dto.accuracy_on_correlation, "wind, load");

        let (parsed, _) = dto.into_models().unwrap();
        assert_eq!(parsed.accuracy_on_correlation, advanced.accuracy_on_correlation);
    }

    #[test]
    fn scenario_builder_nests_and_flattens() {
        let mut builder = ScenarioBuilder::new(2);
        builder.load_mut("fr").set_year(0, Some(3));
        builder.thermal_mut("fr", "nuclear").set_year(1, Some(2));
        builder.link_mut("be / fr").set_year(0, Some(1));

        let nested = scenario_builder_to_api(&builder);
        assert_eq!(nested[DEFAULT_RULESET]["l"]["fr"]["0"], json!(3));
        assert_eq!(nested[DEFAULT_RULESET]["t"]["fr"]["nuclear"]["1"], json!(2));
        assert_eq!(nested[DEFAULT_RULESET]["ntc"]["be / fr"]["0"], json!(1));

        let rebuilt = scenario_builder_from_api(2, &nested).unwrap();
        assert_eq!(rebuilt, builder);
    }

    #[test]
    fn candidate_link_splits_into_areas() {
        let candidate = XpansionCandidate::new("cable", "be", "fr", 100.0).with_max_investment(50.0);
        let dto = XpansionCandidateDto::from_model(&candidate);
        assert_eq!(dto.link, "be - fr");
        assert_eq!(dto.into_model().unwrap(), candidate);
    }
}
