//! `generaldata.ini` and `scenariobuilder.dat` codecs.
//!
//! The playlist and variables-selection sections use a reset/exception
//! encoding: a `*_reset` flag gives the majority state and duplicate
//! `+`/`-` keys list the exceptions.

use serde_json::Value;

use crate::model::commons::{StudyVersion, STUDY_VERSION_9_2};
use crate::model::scenario_builder::ScenarioBuilder;
use crate::model::settings::{
    AdequacyPatchParameters, AdvancedParameters, GeneralParameters, OptimizationParameters,
    OutputSeries, PlaylistData, SeedParameters, StudySettings, ThematicTrimmingParameters,
    ThematicVariable,
};
use crate::model::settings::general::BuildingMode;
use crate::utils::error::{Result, StudyError};

use super::ini::{IniMap, IniSection};

type CodecResult<T> = std::result::Result<T, String>;

const GENERAL: &str = "general";
const INPUT: &str = "input";
const OUTPUT: &str = "output";
const OPTIMIZATION: &str = "optimization";
const ADEQUACY_PATCH: &str = "adequacy patch";
const OTHER_PREFERENCES: &str = "other preferences";
const ADVANCED_PARAMETERS: &str = "advanced parameters";
const SEEDS: &str = "seeds - Mersenne Twister";
const PLAYLIST: &str = "playlist";
const VARIABLES_SELECTION: &str = "variables selection";

const DEFAULT_RULESET: &str = "Default Ruleset";

pub fn settings_to_ini(settings: &StudySettings, version: StudyVersion) -> IniMap {
    let mut ini = IniMap::new();
    write_general(&mut ini, &settings.general_parameters);
    write_output(&mut ini, &settings.general_parameters);
    write_optimization(&mut ini, &settings.optimization_parameters);
    write_adequacy_patch(&mut ini, &settings.adequacy_patch_parameters);
    write_other_preferences(&mut ini, &settings.advanced_parameters, version);
    write_advanced_parameters(&mut ini, &settings.advanced_parameters);
    write_seeds(&mut ini, &settings.seed_parameters);
    if !settings.playlist_parameters.is_empty() {
        write_playlist(
            &mut ini,
            &settings.playlist_parameters,
            settings.general_parameters.nb_years,
        );
    }
    if settings.general_parameters.thematic_trimming {
        write_thematic_trimming(&mut ini, &settings.thematic_trimming_parameters, version);
    }
    ini
}

pub fn settings_from_ini(ini: &IniMap, version: StudyVersion) -> Result<StudySettings> {
    let error = |cause: String| StudyError::StudySettingsRead { cause };
    let general_parameters = read_general(ini).map_err(error)?;
    let playlist_parameters = if general_parameters.user_playlist {
        read_playlist(ini, general_parameters.nb_years).map_err(error)?
    } else {
        Default::default()
    };
    let thematic_trimming_parameters = if general_parameters.thematic_trimming {
        read_thematic_trimming(ini, version)?
    } else {
        ThematicTrimmingParameters::all_enabled()
    };
    Ok(StudySettings {
        general_parameters,
        optimization_parameters: read_optimization(ini).map_err(error)?,
        advanced_parameters: read_other_preferences(ini).map_err(error)?,
        seed_parameters: read_seeds(ini).map_err(error)?,
        adequacy_patch_parameters: read_adequacy_patch(ini).map_err(error)?,
        thematic_trimming_parameters,
        playlist_parameters,
    })
}

fn write_general(ini: &mut IniMap, p: &GeneralParameters) {
    let s = ini.ensure_section(GENERAL);
    s.set("mode", p.mode);
    s.set("horizon", &p.horizon);
    s.set("nbyears", p.nb_years);
    s.set("simulation.start", p.simulation_start);
    s.set("simulation.end", p.simulation_end);
    s.set("january.1st", p.january_first);
    s.set("first-month-in-year", p.first_month_in_year);
    s.set("first.weekday", p.first_week_day);
    s.set("leapyear", p.leap_year);
    s.set("year-by-year", p.year_by_year);
    s.set("derated", p.building_mode == BuildingMode::Derated);
    s.set("custom-scenario", p.building_mode == BuildingMode::Custom);
    s.set("user-playlist", p.user_playlist);
    s.set("thematic-trimming", p.thematic_trimming);
    s.set("geographic-trimming", p.geographic_trimming);
    s.set("generate", "");
    s.set("nbtimeseriesload", 1);
    s.set("nbtimeserieshydro", 1);
    s.set("nbtimeserieswind", 1);
    s.set("nbtimeseriesthermal", p.nb_timeseries_thermal);
    s.set("nbtimeseriessolar", 1);
    s.set("refreshtimeseries", "");
    s.set("intra-modal", "");
    s.set("inter-modal", "");
    s.set("refreshintervalload", 100);
    s.set("refreshintervalhydro", 100);
    s.set("refreshintervalwind", 100);
    s.set("refreshintervalthermal", 100);
    s.set("refreshintervalsolar", 100);
    s.set("readonly", false);
    ini.ensure_section(INPUT).set("import", "");
}

fn read_general(ini: &IniMap) -> CodecResult<GeneralParameters> {
    let d = GeneralParameters::default();
    let empty = IniSection::new();
    let s = ini.section(GENERAL).unwrap_or(&empty);
    let output = ini.section(OUTPUT).unwrap_or(&empty);
    let derated = s.get_bool("derated")?.unwrap_or(false);
    let custom = s.get_bool("custom-scenario")?.unwrap_or(false);
    let building_mode = if derated {
        BuildingMode::Derated
    } else if custom {
        BuildingMode::Custom
    } else {
        BuildingMode::Automatic
    };
    Ok(GeneralParameters {
        mode: s.get_parsed("mode")?.unwrap_or(d.mode),
        horizon: s.get("horizon").unwrap_or_default().to_string(),
        nb_years: s.get_u32("nbyears")?.unwrap_or(d.nb_years),
        simulation_start: s.get_u32("simulation.start")?.unwrap_or(d.simulation_start),
        simulation_end: s.get_u32("simulation.end")?.unwrap_or(d.simulation_end),
        january_first: s.get_parsed("january.1st")?.unwrap_or(d.january_first),
        first_month_in_year: s.get_parsed("first-month-in-year")?.unwrap_or(d.first_month_in_year),
        first_week_day: s.get_parsed("first.weekday")?.unwrap_or(d.first_week_day),
        leap_year: s.get_bool("leapyear")?.unwrap_or(d.leap_year),
        year_by_year: s.get_bool("year-by-year")?.unwrap_or(d.year_by_year),
        simulation_synthesis: output.get_bool("synthesis")?.unwrap_or(d.simulation_synthesis),
        building_mode,
        user_playlist: s.get_bool("user-playlist")?.unwrap_or(d.user_playlist),
        thematic_trimming: s.get_bool("thematic-trimming")?.unwrap_or(d.thematic_trimming),
        geographic_trimming: s.get_bool("geographic-trimming")?.unwrap_or(d.geographic_trimming),
        nb_timeseries_thermal: s.get_u32("nbtimeseriesthermal")?.unwrap_or(d.nb_timeseries_thermal),
    })
}

fn write_output(ini: &mut IniMap, p: &GeneralParameters) {
    let s = ini.ensure_section(OUTPUT);
    s.set("synthesis", p.simulation_synthesis);
    s.set("storenewset", false);
    s.set("archives", "");
}

fn write_optimization(ini: &mut IniMap, p: &OptimizationParameters) {
    let s = ini.ensure_section(OPTIMIZATION);
    s.set("simplex-range", p.simplex_range);
    s.set("transmission-capacities", p.transmission_capacities);
    s.set("include-constraints", p.include_constraints);
    s.set("include-hurdlecosts", p.include_hurdlecosts);
    s.set("include-tc-minstablepower", p.include_tc_minstablepower);
    s.set("include-tc-min-ud-time", p.include_tc_min_ud_time);
    s.set("include-dayahead", p.include_dayahead);
    s.set("include-strategicreserve", p.include_strategicreserve);
    s.set("include-spinningreserve", p.include_spinningreserve);
    s.set("include-primaryreserve", p.include_primaryreserve);
    s.set("include-exportmps", p.include_exportmps);
    s.set("include-exportstructure", p.include_exportstructure);
    s.set(
        "include-unfeasible-problem-behavior",
        p.include_unfeasible_problem_behavior,
    );
}

fn read_optimization(ini: &IniMap) -> CodecResult<OptimizationParameters> {
    let d = OptimizationParameters::default();
    let empty = IniSection::new();
    let s = ini.section(OPTIMIZATION).unwrap_or(&empty);
    Ok(OptimizationParameters {
        simplex_range: s.get_parsed("simplex-range")?.unwrap_or(d.simplex_range),
        transmission_capacities: s
            .get_parsed("transmission-capacities")?
            .unwrap_or(d.transmission_capacities),
        include_constraints: s.get_bool("include-constraints")?.unwrap_or(d.include_constraints),
        include_hurdlecosts: s.get_bool("include-hurdlecosts")?.unwrap_or(d.include_hurdlecosts),
        include_tc_minstablepower: s
            .get_bool("include-tc-minstablepower")?
            .unwrap_or(d.include_tc_minstablepower),
        include_tc_min_ud_time: s
            .get_bool("include-tc-min-ud-time")?
            .unwrap_or(d.include_tc_min_ud_time),
        include_dayahead: s.get_bool("include-dayahead")?.unwrap_or(d.include_dayahead),
        include_strategicreserve: s
            .get_bool("include-strategicreserve")?
            .unwrap_or(d.include_strategicreserve),
        include_spinningreserve: s
            .get_bool("include-spinningreserve")?
            .unwrap_or(d.include_spinningreserve),
        include_primaryreserve: s
            .get_bool("include-primaryreserve")?
            .unwrap_or(d.include_primaryreserve),
        include_exportmps: s.get_parsed("include-exportmps")?.unwrap_or(d.include_exportmps),
        include_exportstructure: s
            .get_bool("include-exportstructure")?
            .unwrap_or(d.include_exportstructure),
        include_unfeasible_problem_behavior: s
            .get_parsed("include-unfeasible-problem-behavior")?
            .unwrap_or(d.include_unfeasible_problem_behavior),
    })
}

fn write_adequacy_patch(ini: &mut IniMap, p: &AdequacyPatchParameters) {
    let s = ini.ensure_section(ADEQUACY_PATCH);
    s.set("include-adq-patch", p.include_adq_patch);
    s.set(
        "set-to-null-ntc-from-physical-out-to-physical-in-for-first-step",
        p.set_to_null_ntc_from_physical_out_to_physical_in_for_first_step,
    );
    s.set(
        "set-to-null-ntc-between-physical-out-for-first-step",
        p.set_to_null_ntc_between_physical_out_for_first_step,
    );
    s.set("price-taking-order", p.price_taking_order);
    s.set("include-hurdle-cost-csr", p.include_hurdle_cost_csr);
    s.set("check-csr-cost-function", p.check_csr_cost_function);
    s.set(
        "threshold-initiate-curtailment-sharing-rule",
        p.threshold_initiate_curtailment_sharing_rule,
    );
    s.set(
        "threshold-display-local-matching-rule-violations",
        p.threshold_display_local_matching_rule_violations,
    );
    s.set(
        "threshold-csr-variable-bounds-relaxation",
        p.threshold_csr_variable_bounds_relaxation,
    );
}

fn read_adequacy_patch(ini: &IniMap) -> CodecResult<AdequacyPatchParameters> {
    let d = AdequacyPatchParameters::default();
    let empty = IniSection::new();
    let s = ini.section(ADEQUACY_PATCH).unwrap_or(&empty);
    Ok(AdequacyPatchParameters {
        include_adq_patch: s.get_bool("include-adq-patch")?.unwrap_or(d.include_adq_patch),
        set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: s
            .get_bool("set-to-null-ntc-from-physical-out-to-physical-in-for-first-step")?
            .unwrap_or(d.set_to_null_ntc_from_physical_out_to_physical_in_for_first_step),
        set_to_null_ntc_between_physical_out_for_first_step: s
            .get_bool("set-to-null-ntc-between-physical-out-for-first-step")?
            .unwrap_or(d.set_to_null_ntc_between_physical_out_for_first_step),
        price_taking_order: s.get_parsed("price-taking-order")?.unwrap_or(d.price_taking_order),
        include_hurdle_cost_csr: s
            .get_bool("include-hurdle-cost-csr")?
            .unwrap_or(d.include_hurdle_cost_csr),
        check_csr_cost_function: s
            .get_bool("check-csr-cost-function")?
            .unwrap_or(d.check_csr_cost_function),
        threshold_initiate_curtailment_sharing_rule: s
            .get_f64("threshold-initiate-curtailment-sharing-rule")?
            .unwrap_or(d.threshold_initiate_curtailment_sharing_rule),
        threshold_display_local_matching_rule_violations: s
            .get_f64("threshold-display-local-matching-rule-violations")?
            .unwrap_or(d.threshold_display_local_matching_rule_violations),
        threshold_csr_variable_bounds_relaxation: s
            .get_u32("threshold-csr-variable-bounds-relaxation")?
            .unwrap_or(d.threshold_csr_variable_bounds_relaxation),
    })
}

fn write_other_preferences(ini: &mut IniMap, p: &AdvancedParameters, version: StudyVersion) {
    let s = ini.ensure_section(OTHER_PREFERENCES);
    if version < STUDY_VERSION_9_2 {
        s.set("initial-reservoir-levels", p.initial_reservoir_levels);
    }
    s.set("hydro-heuristic-policy", p.hydro_heuristic_policy);
    s.set("hydro-pricing-mode", p.hydro_pricing_mode);
    s.set("power-fluctuations", p.power_fluctuations);
    s.set("shedding-policy", p.shedding_policy);
    s.set("shedding-strategy", "shave margins");
    s.set("unit-commitment-mode", p.unit_commitment_mode);
    s.set("number-of-cores-mode", p.number_of_cores_mode);
    s.set("renewable-generation-modelling", p.renewable_generation_modelling);
    s.set("day-ahead-reserve-management", "global");
}

fn read_other_preferences(ini: &IniMap) -> CodecResult<AdvancedParameters> {
    let d = AdvancedParameters::default();
    let empty = IniSection::new();
    let s = ini.section(OTHER_PREFERENCES).unwrap_or(&empty);
    let advanced = ini.section(ADVANCED_PARAMETERS).unwrap_or(&empty);
    let accuracy_on_correlation = match advanced.get("accuracy-on-correlation") {
        None => d.accuracy_on_correlation,
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<OutputSeries>()
                    .map_err(|_| format!("invalid accuracy-on-correlation entry `{part}`"))
            })
            .collect::<CodecResult<_>>()?,
    };
    Ok(AdvancedParameters {
        initial_reservoir_levels: s
            .get_parsed("initial-reservoir-levels")?
            .unwrap_or(d.initial_reservoir_levels),
        hydro_heuristic_policy: s
            .get_parsed("hydro-heuristic-policy")?
            .unwrap_or(d.hydro_heuristic_policy),
        hydro_pricing_mode: s.get_parsed("hydro-pricing-mode")?.unwrap_or(d.hydro_pricing_mode),
        power_fluctuations: s.get_parsed("power-fluctuations")?.unwrap_or(d.power_fluctuations),
        shedding_policy: s.get_parsed("shedding-policy")?.unwrap_or(d.shedding_policy),
        unit_commitment_mode: s
            .get_parsed("unit-commitment-mode")?
            .unwrap_or(d.unit_commitment_mode),
        number_of_cores_mode: s
            .get_parsed("number-of-cores-mode")?
            .unwrap_or(d.number_of_cores_mode),
        renewable_generation_modelling: s
            .get_parsed("renewable-generation-modelling")?
            .unwrap_or(d.renewable_generation_modelling),
        accuracy_on_correlation,
    })
}

fn write_advanced_parameters(ini: &mut IniMap, p: &AdvancedParameters) {
    let joined = p
        .accuracy_on_correlation
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ini.ensure_section(ADVANCED_PARAMETERS)
        .set("accuracy-on-correlation", joined);
}

fn write_seeds(ini: &mut IniMap, p: &SeedParameters) {
    let s = ini.ensure_section(SEEDS);
    s.set("seed-tsgen-wind", p.seed_tsgen_wind);
    s.set("seed-tsgen-load", p.seed_tsgen_load);
    s.set("seed-tsgen-hydro", p.seed_tsgen_hydro);
    s.set("seed-tsgen-thermal", p.seed_tsgen_thermal);
    s.set("seed-tsgen-solar", p.seed_tsgen_solar);
    s.set("seed-tsnumbers", p.seed_tsnumbers);
    s.set("seed-unsupplied-energy-costs", p.seed_unsupplied_energy_costs);
    s.set("seed-spilled-energy-costs", p.seed_spilled_energy_costs);
    s.set("seed-thermal-costs", p.seed_thermal_costs);
    s.set("seed-hydro-costs", p.seed_hydro_costs);
    s.set("seed-initial-reservoir-levels", p.seed_initial_reservoir_levels);
}

fn read_seeds(ini: &IniMap) -> CodecResult<SeedParameters> {
    let d = SeedParameters::default();
    let empty = IniSection::new();
    let s = ini.section(SEEDS).unwrap_or(&empty);
    Ok(SeedParameters {
        seed_tsgen_wind: s.get_u32("seed-tsgen-wind")?.unwrap_or(d.seed_tsgen_wind),
        seed_tsgen_load: s.get_u32("seed-tsgen-load")?.unwrap_or(d.seed_tsgen_load),
        seed_tsgen_hydro: s.get_u32("seed-tsgen-hydro")?.unwrap_or(d.seed_tsgen_hydro),
        seed_tsgen_thermal: s.get_u32("seed-tsgen-thermal")?.unwrap_or(d.seed_tsgen_thermal),
        seed_tsgen_solar: s.get_u32("seed-tsgen-solar")?.unwrap_or(d.seed_tsgen_solar),
        seed_tsnumbers: s.get_u32("seed-tsnumbers")?.unwrap_or(d.seed_tsnumbers),
        seed_unsupplied_energy_costs: s
            .get_u32("seed-unsupplied-energy-costs")?
            .unwrap_or(d.seed_unsupplied_energy_costs),
        seed_spilled_energy_costs: s
            .get_u32("seed-spilled-energy-costs")?
            .unwrap_or(d.seed_spilled_energy_costs),
        seed_thermal_costs: s.get_u32("seed-thermal-costs")?.unwrap_or(d.seed_thermal_costs),
        seed_hydro_costs: s.get_u32("seed-hydro-costs")?.unwrap_or(d.seed_hydro_costs),
        seed_initial_reservoir_levels: s
            .get_u32("seed-initial-reservoir-levels")?
            .unwrap_or(d.seed_initial_reservoir_levels),
    })
}

// Playlist years are 1-based in the model and 0-based in the file.

fn write_playlist(
    ini: &mut IniMap,
    playlist: &std::collections::BTreeMap<u32, PlaylistData>,
    nb_years: u32,
) {
    let status = |year: u32| playlist.get(&year).map(|data| data.status).unwrap_or(true);
    let enabled_count = (1..=nb_years).filter(|year| status(*year)).count() as u32;
    let reset = enabled_count * 2 >= nb_years;

    let s = ini.ensure_section(PLAYLIST);
    s.set("playlist_reset", reset);
    for year in 1..=nb_years {
        if status(year) != reset {
            let key = if reset { "playlist_year -" } else { "playlist_year +" };
            s.push(key, year - 1);
        }
    }
    for (year, data) in playlist {
        if data.weight != 1.0 {
            s.push("playlist_year_weight", format!("{},{}", year - 1, data.weight));
        }
    }
}

fn read_playlist(
    ini: &IniMap,
    nb_years: u32,
) -> CodecResult<std::collections::BTreeMap<u32, PlaylistData>> {
    let Some(s) = ini.section(PLAYLIST) else {
        return Ok(Default::default());
    };
    let reset = s.get_bool("playlist_reset")?.unwrap_or(true);
    let exceptions = if reset { "playlist_year -" } else { "playlist_year +" };
    let mut playlist: std::collections::BTreeMap<u32, PlaylistData> = (1..=nb_years)
        .map(|year| {
            (
                year,
                if reset {
                    PlaylistData::enabled()
                } else {
                    PlaylistData::disabled()
                },
            )
        })
        .collect();
    for raw in s.get_all(exceptions) {
        let year: u32 = raw
            .parse()
            .map_err(|_| format!("invalid playlist year `{raw}`"))?;
        if let Some(data) = playlist.get_mut(&(year + 1)) {
            data.status = !reset;
        }
    }
    for raw in s.get_all("playlist_year_weight") {
        let (year, weight) = raw
            .split_once(',')
            .ok_or_else(|| format!("invalid playlist weight `{raw}`"))?;
        let year: u32 = year
            .parse()
            .map_err(|_| format!("invalid playlist year `{year}`"))?;
        let weight: f64 = weight
            .parse()
            .map_err(|_| format!("invalid playlist weight `{weight}`"))?;
        if let Some(data) = playlist.get_mut(&(year + 1)) {
            data.weight = weight;
        }
    }
    Ok(playlist)
}

fn write_thematic_trimming(
    ini: &mut IniMap,
    trimming: &ThematicTrimmingParameters,
    version: StudyVersion,
) {
    let entries: Vec<(ThematicVariable, bool)> = trimming.entries_for_version(version).collect();
    let enabled_count = entries.iter().filter(|(_, enabled)| *enabled).count();
    let reset = enabled_count * 2 >= entries.len();

    let s = ini.ensure_section(VARIABLES_SELECTION);
    s.set("selected_vars_reset", reset);
    for (variable, enabled) in entries {
        if enabled != reset {
            let key = if reset { "select_var -" } else { "select_var +" };
            s.push(key, variable);
        }
    }
}

fn read_thematic_trimming(
    ini: &IniMap,
    version: StudyVersion,
) -> Result<ThematicTrimmingParameters> {
    let error = |cause: String| StudyError::StudySettingsRead { cause };
    let Some(s) = ini.section(VARIABLES_SELECTION) else {
        return Ok(ThematicTrimmingParameters::all_enabled());
    };
    let reset = s.get_bool("selected_vars_reset").map_err(error)?.unwrap_or(true);
    let mut trimming = if reset {
        ThematicTrimmingParameters::all_enabled()
    } else {
        ThematicTrimmingParameters::all_disabled()
    };
    let exceptions = if reset { "select_var -" } else { "select_var +" };
    for raw in s.get_all(exceptions) {
        let variable = raw
            .parse::<ThematicVariable>()
            .map_err(|_| error(format!("unknown output variable `{raw}`")))?;
        let out_of_version = if version < STUDY_VERSION_9_2 {
            variable.requires_9_2()
        } else {
            variable.is_sts_group_variable()
        };
        if out_of_version {
            return Err(StudyError::FieldNotAvailableForVersion {
                field: variable.to_string(),
                version: version.to_string(),
            });
        }
        trimming.set(variable, !reset);
    }
    Ok(trimming)
}

// ---------------------------------------------------------------------------
// scenariobuilder.dat
// ---------------------------------------------------------------------------

pub fn scenario_builder_to_ini(builder: &ScenarioBuilder) -> IniMap {
    let mut ini = IniMap::new();
    let s = ini.ensure_section(DEFAULT_RULESET);
    for (key, value) in builder.to_entries() {
        s.set(key, value);
    }
    ini
}

/// Reads the first ruleset of the file, whatever its name.
pub fn scenario_builder_from_ini(ini: &IniMap, nb_years: usize) -> Result<ScenarioBuilder> {
    let Some((_, section)) = ini.sections().next() else {
        return Ok(ScenarioBuilder::new(nb_years));
    };
    let entries = section.iter().map(|(key, raw)| {
        let value = if raw.contains('.') {
            raw.parse::<f64>().map(Value::from).unwrap_or(Value::Null)
        } else {
            raw.parse::<u64>().map(Value::from).unwrap_or(Value::Null)
        };
        (key, value)
    });
    ScenarioBuilder::from_entries(nb_years, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::commons::STUDY_VERSION_8_8;
    use crate::model::settings::StudySettings;

    #[test]
    fn generaldata_round_trips_the_defaults() {
        let settings = StudySettings::default();
        let ini = settings_to_ini(&settings, STUDY_VERSION_8_8);
        assert_eq!(ini.section(GENERAL).unwrap().get("nbyears"), Some("1"));
        assert_eq!(ini.section(GENERAL).unwrap().get("derated"), Some("false"));

        let parsed = settings_from_ini(&ini, STUDY_VERSION_8_8).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn building_mode_maps_to_the_boolean_pair() {
        let mut settings = StudySettings::default();
        settings.general_parameters.building_mode = BuildingMode::Custom;
        let ini = settings_to_ini(&settings, STUDY_VERSION_8_8);
        let general = ini.section(GENERAL).unwrap();
        assert_eq!(general.get("derated"), Some("false"));
        assert_eq!(general.get("custom-scenario"), Some("true"));

        let parsed = settings_from_ini(&ini, STUDY_VERSION_8_8).unwrap();
        assert_eq!(parsed.general_parameters.building_mode, BuildingMode::Custom);
    }

    #[test]
    fn playlist_writes_exceptions_against_the_majority() {
        let mut settings = StudySettings::default();
        settings.general_parameters.nb_years = 5;
        settings.general_parameters.user_playlist = true;
        settings.playlist_parameters = (1..=5)
            .map(|year| (year, PlaylistData::enabled()))
            .collect();
        settings.playlist_parameters.insert(2, PlaylistData::disabled());
        settings.playlist_parameters.insert(
            4,
            PlaylistData {
                status: true,
                weight: 2.5,
            },
        );

        let ini = settings_to_ini(&settings, STUDY_VERSION_8_8);
        let playlist = ini.section(PLAYLIST).unwrap();
        assert_eq!(playlist.get("playlist_reset"), Some("true"));
        assert_eq!(playlist.get_all("playlist_year -"), vec!["1"]);
        assert_eq!(playlist.get_all("playlist_year_weight"), vec!["3,2.5"]);

        let parsed = settings_from_ini(&ini, STUDY_VERSION_8_8).unwrap();
        assert_eq!(parsed.playlist_parameters, settings.playlist_parameters);
    }

    #[test]
    fn trimming_lists_disabled_variables_when_most_are_enabled() {
        let mut settings = StudySettings::default();
        settings.general_parameters.thematic_trimming = true;
        settings
            .thematic_trimming_parameters
            .set(ThematicVariable::OvCost, false);

        let ini = settings_to_ini(&settings, STUDY_VERSION_8_8);
        let selection = ini.section(VARIABLES_SELECTION).unwrap();
        assert_eq!(selection.get("selected_vars_reset"), Some("true"));
        assert_eq!(selection.get_all("select_var -"), vec!["OV. COST"]);

        let parsed = settings_from_ini(&ini, STUDY_VERSION_8_8).unwrap();
        assert!(!parsed.thematic_trimming_parameters.is_enabled(ThematicVariable::OvCost));
        assert!(parsed.thematic_trimming_parameters.is_enabled(ThematicVariable::Load));
    }

    #[test]
    fn trimming_read_rejects_9_2_variables_on_an_8_8_study() {
        let mut settings = StudySettings::default();
        settings.general_parameters.thematic_trimming = true;
        settings
            .thematic_trimming_parameters
            .set(ThematicVariable::StsByGroup, false);

        let ini = settings_to_ini(&settings, STUDY_VERSION_9_2);
        assert!(ini
            .section(VARIABLES_SELECTION)
            .unwrap()
            .get_all("select_var -")
            .contains(&"STS by group".to_string()));

        let err = settings_from_ini(&ini, STUDY_VERSION_8_8).unwrap_err();
        assert!(matches!(
            err,
            StudyError::FieldNotAvailableForVersion { ref field, .. } if field == "STS by group"
        ));
    }

    #[test]
    fn trimming_read_rejects_storage_group_variables_from_9_2_on() {
        let mut settings = StudySettings::default();
        settings.general_parameters.thematic_trimming = true;
        settings
            .thematic_trimming_parameters
            .set(ThematicVariable::BatteryInjection, false);

        let ini = settings_to_ini(&settings, STUDY_VERSION_8_8);
        let err = settings_from_ini(&ini, STUDY_VERSION_9_2).unwrap_err();
        assert!(matches!(
            err,
            StudyError::FieldNotAvailableForVersion { ref field, .. } if field == "Battery_injection"
        ));
    }

    #[test]
    fn scenario_builder_dat_round_trips() {
        let mut builder = ScenarioBuilder::new(2);
        builder.load_mut("fr").set_year(0, Some(3));
        builder.thermal_mut("fr", "gas").set_year(1, Some(7));
        builder.hydro_initial_level_mut("fr")[0] = Some(25.0);

        let ini = scenario_builder_to_ini(&builder);
        let section = ini.section(DEFAULT_RULESET).unwrap();
        assert_eq!(section.get("l,fr,0"), Some("3"));
        assert_eq!(section.get("t,fr,1,gas"), Some("7"));
        assert_eq!(section.get("hl,fr,0"), Some("0.25"));

        let parsed = scenario_builder_from_ini(&ini, 2).unwrap();
        assert_eq!(parsed, builder);
    }
}
