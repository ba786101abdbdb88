//! Conversions between the user model and the INI sections of a study tree.
//!
//! Key names follow the Antares file format, so they differ from both the
//! Rust field names and the camelCase JSON used by the web API. All functions
//! return `Err(String)` on malformed content; callers attach the file path.

use std::collections::BTreeMap;

use crate::model::area::{AdequacyPatchMode, AreaProperties, AreaUi};
use crate::model::binding_constraint::{
    BindingConstraintProperties, ConstraintTerm, ConstraintTermData,
};
use crate::model::commons::{join_filters, parse_filters, StudyVersion, STUDY_VERSION_9_2};
use crate::model::hydro::{HydroProperties, InflowStructure};
use crate::model::link::{LinkProperties, LinkUi};
use crate::model::renewable::RenewableClusterProperties;
use crate::model::st_storage::{STStorageProperties, ST_STORAGE_GROUPS};
use crate::model::thermal::ThermalClusterProperties;
use crate::model::xpansion::{
    XpansionCandidate, XpansionConstraint, XpansionSettings,
};
use crate::service::ConstraintData;

use super::ini::{IniMap, IniSection};

type CodecResult<T> = std::result::Result<T, String>;

// ---------------------------------------------------------------------------
// Thermal clusters (input/thermal/clusters/{area}/list.ini)
// ---------------------------------------------------------------------------

pub fn thermal_to_section(name: &str, p: &ThermalClusterProperties) -> IniSection {
    let mut s = IniSection::new();
    s.set("group", p.group);
    s.set("name", name);
    s.set("enabled", p.enabled);
    s.set("unitcount", p.unit_count);
    s.set_f64_6("nominalcapacity", p.nominal_capacity);
    s.set("gen-ts", p.gen_ts);
    s.set_f64_6("min-stable-power", p.min_stable_power);
    s.set("min-up-time", p.min_up_time);
    s.set("min-down-time", p.min_down_time);
    s.set("must-run", p.must_run);
    s.set_f64_6("spinning", p.spinning);
    s.set_f64_6("volatility.forced", p.volatility_forced);
    s.set_f64_6("volatility.planned", p.volatility_planned);
    s.set("law.forced", p.law_forced);
    s.set("law.planned", p.law_planned);
    s.set_f64_6("marginal-cost", p.marginal_cost);
    s.set_f64_6("spread-cost", p.spread_cost);
    s.set_f64_6("fixed-cost", p.fixed_cost);
    s.set_f64_6("startup-cost", p.startup_cost);
    s.set_f64_6("market-bid-cost", p.market_bid_cost);
    s.set_f64_6("co2", p.co2);
    s.set_f64_6("nh3", p.nh3);
    s.set_f64_6("so2", p.so2);
    s.set_f64_6("nox", p.nox);
    s.set_f64_6("pm2_5", p.pm2_5);
    s.set_f64_6("pm5", p.pm5);
    s.set_f64_6("pm10", p.pm10);
    s.set_f64_6("nmvoc", p.nmvoc);
    s.set_f64_6("op1", p.op1);
    s.set_f64_6("op2", p.op2);
    s.set_f64_6("op3", p.op3);
    s.set_f64_6("op4", p.op4);
    s.set_f64_6("op5", p.op5);
    s.set("costgeneration", p.cost_generation);
    s.set_f64_6("efficiency", p.efficiency);
    s.set_f64_6("variableomcost", p.variable_o_m_cost);
    s
}

pub fn thermal_from_section(s: &IniSection) -> CodecResult<ThermalClusterProperties> {
    let d = ThermalClusterProperties::default();
    Ok(ThermalClusterProperties {
        enabled: s.get_bool("enabled")?.unwrap_or(d.enabled),
        unit_count: s.get_u32("unitcount")?.unwrap_or(d.unit_count),
        nominal_capacity: s.get_f64("nominalcapacity")?.unwrap_or(d.nominal_capacity),
        group: s.get_parsed("group")?.unwrap_or(d.group),
        gen_ts: s.get_parsed("gen-ts")?.unwrap_or(d.gen_ts),
        min_stable_power: s.get_f64("min-stable-power")?.unwrap_or(d.min_stable_power),
        min_up_time: s.get_u32("min-up-time")?.unwrap_or(d.min_up_time),
        min_down_time: s.get_u32("min-down-time")?.unwrap_or(d.min_down_time),
        must_run: s.get_bool("must-run")?.unwrap_or(d.must_run),
        spinning: s.get_f64("spinning")?.unwrap_or(d.spinning),
        volatility_forced: s.get_f64("volatility.forced")?.unwrap_or(d.volatility_forced),
        volatility_planned: s.get_f64("volatility.planned")?.unwrap_or(d.volatility_planned),
        law_forced: s.get_parsed("law.forced")?.unwrap_or(d.law_forced),
        law_planned: s.get_parsed("law.planned")?.unwrap_or(d.law_planned),
        marginal_cost: s.get_f64("marginal-cost")?.unwrap_or(d.marginal_cost),
        spread_cost: s.get_f64("spread-cost")?.unwrap_or(d.spread_cost),
        fixed_cost: s.get_f64("fixed-cost")?.unwrap_or(d.fixed_cost),
        startup_cost: s.get_f64("startup-cost")?.unwrap_or(d.startup_cost),
        market_bid_cost: s.get_f64("market-bid-cost")?.unwrap_or(d.market_bid_cost),
        co2: s.get_f64("co2")?.unwrap_or(d.co2),
        nh3: s.get_f64("nh3")?.unwrap_or(d.nh3),
        so2: s.get_f64("so2")?.unwrap_or(d.so2),
        nox: s.get_f64("nox")?.unwrap_or(d.nox),
        pm2_5: s.get_f64("pm2_5")?.unwrap_or(d.pm2_5),
        pm5: s.get_f64("pm5")?.unwrap_or(d.pm5),
        pm10: s.get_f64("pm10")?.unwrap_or(d.pm10),
        nmvoc: s.get_f64("nmvoc")?.unwrap_or(d.nmvoc),
        op1: s.get_f64("op1")?.unwrap_or(d.op1),
        op2: s.get_f64("op2")?.unwrap_or(d.op2),
        op3: s.get_f64("op3")?.unwrap_or(d.op3),
        op4: s.get_f64("op4")?.unwrap_or(d.op4),
        op5: s.get_f64("op5")?.unwrap_or(d.op5),
        cost_generation: s.get_parsed("costgeneration")?.unwrap_or(d.cost_generation),
        efficiency: s.get_f64("efficiency")?.unwrap_or(d.efficiency),
        variable_o_m_cost: s.get_f64("variableomcost")?.unwrap_or(d.variable_o_m_cost),
    })
}

// ---------------------------------------------------------------------------
// Renewable clusters (input/renewables/clusters/{area}/list.ini)
// ---------------------------------------------------------------------------

pub fn renewable_to_section(name: &str, p: &RenewableClusterProperties) -> IniSection {
    let mut s = IniSection::new();
    s.set("name", name);
    s.set("group", p.group);
    s.set("enabled", p.enabled);
    s.set("unitcount", p.unit_count);
    s.set_f64_6("nominalcapacity", p.nominal_capacity);
    s.set("ts-interpretation", p.ts_interpretation);
    s
}

pub fn renewable_from_section(s: &IniSection) -> CodecResult<RenewableClusterProperties> {
    let d = RenewableClusterProperties::default();
    Ok(RenewableClusterProperties {
        enabled: s.get_bool("enabled")?.unwrap_or(d.enabled),
        unit_count: s.get_u32("unitcount")?.unwrap_or(d.unit_count),
        nominal_capacity: s.get_f64("nominalcapacity")?.unwrap_or(d.nominal_capacity),
        group: s.get_parsed("group")?.unwrap_or(d.group),
        ts_interpretation: s.get_parsed("ts-interpretation")?.unwrap_or(d.ts_interpretation),
    })
}

// ---------------------------------------------------------------------------
// Short-term storage (input/st-storage/clusters/{area}/list.ini)
// ---------------------------------------------------------------------------

pub fn st_storage_to_section(
    name: &str,
    p: &STStorageProperties,
    version: StudyVersion,
) -> CodecResult<IniSection> {
    if version < STUDY_VERSION_9_2 {
        if !p.fields_requiring_9_2().is_empty() {
            return Err(format!(
                "fields {:?} only exist from study version 9.2",
                p.fields_requiring_9_2()
            ));
        }
        if !ST_STORAGE_GROUPS.contains(&p.group.as_str()) {
            return Err(format!(
                "group `{}` is not valid before study version 9.2; expected one of {:?}",
                p.group, ST_STORAGE_GROUPS
            ));
        }
    }
    let mut s = IniSection::new();
    s.set("name", name);
    s.set("group", &p.group);
    s.set_f64_6("injectionnominalcapacity", p.injection_nominal_capacity);
    s.set_f64_6("withdrawalnominalcapacity", p.withdrawal_nominal_capacity);
    s.set_f64_6("reservoircapacity", p.reservoir_capacity);
    s.set_f64_6("efficiency", p.efficiency);
    s.set_f64_6("initiallevel", p.initial_level);
    s.set("initialleveloptim", p.initial_level_optim);
    s.set("enabled", p.enabled);
    if let Some(value) = p.efficiency_withdrawal {
        s.set_f64_6("efficiencywithdrawal", value);
    }
    if let Some(value) = p.penalize_variation_injection {
        s.set("penalize-variation-injection", value);
    }
    if let Some(value) = p.penalize_variation_withdrawal {
        s.set("penalize-variation-withdrawal", value);
    }
    Ok(s)
}

pub fn st_storage_from_section(
    s: &IniSection,
    version: StudyVersion,
) -> CodecResult<STStorageProperties> {
    let d = STStorageProperties::default();
    let mut p = STStorageProperties {
        group: s.get("group").unwrap_or(&d.group).to_string(),
        injection_nominal_capacity: s
            .get_f64("injectionnominalcapacity")?
            .unwrap_or(d.injection_nominal_capacity),
        withdrawal_nominal_capacity: s
            .get_f64("withdrawalnominalcapacity")?
            .unwrap_or(d.withdrawal_nominal_capacity),
        reservoir_capacity: s.get_f64("reservoircapacity")?.unwrap_or(d.reservoir_capacity),
        efficiency: s.get_f64("efficiency")?.unwrap_or(d.efficiency),
        initial_level: s.get_f64("initiallevel")?.unwrap_or(d.initial_level),
        initial_level_optim: s.get_bool("initialleveloptim")?.unwrap_or(d.initial_level_optim),
        enabled: s.get_bool("enabled")?.unwrap_or(d.enabled),
        efficiency_withdrawal: s.get_f64("efficiencywithdrawal")?,
        penalize_variation_injection: s.get_bool("penalize-variation-injection")?,
        penalize_variation_withdrawal: s.get_bool("penalize-variation-withdrawal")?,
    };
    if version < STUDY_VERSION_9_2 {
        if !p.fields_requiring_9_2().is_empty() {
            return Err(format!(
                "fields {:?} only exist from study version 9.2",
                p.fields_requiring_9_2()
            ));
        }
    } else {
        p.efficiency_withdrawal.get_or_insert(1.0);
        p.penalize_variation_injection.get_or_insert(false);
        p.penalize_variation_withdrawal.get_or_insert(false);
    }
    Ok(p)
}

// ---------------------------------------------------------------------------
// Links (input/links/{from}/properties.ini, one section per destination)
// ---------------------------------------------------------------------------

pub fn link_to_section(properties: &LinkProperties, ui: &LinkUi) -> IniSection {
    let mut s = IniSection::new();
    s.set("hurdles-cost", properties.hurdles_cost);
    s.set("loop-flow", properties.loop_flow);
    s.set("use-phase-shifter", properties.use_phase_shifter);
    s.set("transmission-capacities", properties.transmission_capacities);
    s.set("asset-type", properties.asset_type);
    s.set("link-style", ui.link_style);
    s.set("link-width", ui.link_width);
    s.set("colorr", ui.colorr);
    s.set("colorg", ui.colorg);
    s.set("colorb", ui.colorb);
    s.set("display-comments", properties.display_comments);
    s.set("comments", &properties.comments);
    s.set("filter-synthesis", join_filters(&properties.filter_synthesis));
    s.set("filter-year-by-year", join_filters(&properties.filter_year_by_year));
    s
}

pub fn link_from_section(s: &IniSection) -> CodecResult<(LinkProperties, LinkUi)> {
    let dp = LinkProperties::default();
    let du = LinkUi::default();
    let properties = LinkProperties {
        hurdles_cost: s.get_bool("hurdles-cost")?.unwrap_or(dp.hurdles_cost),
        loop_flow: s.get_bool("loop-flow")?.unwrap_or(dp.loop_flow),
        use_phase_shifter: s.get_bool("use-phase-shifter")?.unwrap_or(dp.use_phase_shifter),
        transmission_capacities: s
            .get_parsed("transmission-capacities")?
            .unwrap_or(dp.transmission_capacities),
        asset_type: s.get_parsed("asset-type")?.unwrap_or(dp.asset_type),
        display_comments: s.get_bool("display-comments")?.unwrap_or(dp.display_comments),
        comments: s.get("comments").unwrap_or_default().to_string(),
        filter_synthesis: match s.get("filter-synthesis") {
            Some(raw) => parse_filters(raw).map_err(|e| e.to_string())?,
            None => dp.filter_synthesis,
        },
        filter_year_by_year: match s.get("filter-year-by-year") {
            Some(raw) => parse_filters(raw).map_err(|e| e.to_string())?,
            None => dp.filter_year_by_year,
        },
    };
    let ui = LinkUi {
        link_style: s.get_parsed("link-style")?.unwrap_or(du.link_style),
        link_width: s.get_f64("link-width")?.unwrap_or(du.link_width),
        colorr: s.get_parsed("colorr")?.unwrap_or(du.colorr),
        colorg: s.get_parsed("colorg")?.unwrap_or(du.colorg),
        colorb: s.get_parsed("colorb")?.unwrap_or(du.colorb),
    };
    Ok((properties, ui))
}

// ---------------------------------------------------------------------------
// Areas (optimization.ini, adequacy_patch.ini, ui.ini, thermal/areas.ini)
// ---------------------------------------------------------------------------

pub fn area_optimization_to_ini(p: &AreaProperties) -> IniMap {
    let mut ini = IniMap::new();
    let nodal = ini.ensure_section("nodal optimization");
    nodal.set("non-dispatchable-power", p.non_dispatch_power);
    nodal.set("dispatchable-hydro-power", p.dispatch_hydro_power);
    nodal.set("other-dispatchable-power", p.other_dispatch_power);
    nodal.set_f64_6("spread-unsupplied-energy-cost", p.spread_unsupplied_energy_cost);
    nodal.set_f64_6("spread-spilled-energy-cost", p.spread_spilled_energy_cost);
    let filtering = ini.ensure_section("filtering");
    filtering.set("filter-synthesis", join_filters(&p.filter_synthesis));
    filtering.set("filter-year-by-year", join_filters(&p.filter_by_year));
    ini
}

pub fn area_adequacy_to_ini(p: &AreaProperties) -> IniMap {
    let mut ini = IniMap::new();
    ini.ensure_section("adequacy-patch")
        .set("adequacy-patch-mode", p.adequacy_patch_mode);
    ini
}

/// Rebuilds `AreaProperties` from the three files it is spread across. Any
/// missing piece falls back to the defaults.
pub fn area_properties_from_ini(
    optimization: &IniMap,
    adequacy: &IniMap,
    energy_cost_unsupplied: f64,
    energy_cost_spilled: f64,
) -> CodecResult<AreaProperties> {
    let d = AreaProperties::default();
    let empty = IniSection::new();
    let nodal = optimization.section("nodal optimization").unwrap_or(&empty);
    let filtering = optimization.section("filtering").unwrap_or(&empty);
    let patch = adequacy.section("adequacy-patch").unwrap_or(&empty);
    Ok(AreaProperties {
        energy_cost_unsupplied,
        energy_cost_spilled,
        non_dispatch_power: nodal.get_bool("non-dispatchable-power")?.unwrap_or(d.non_dispatch_power),
        dispatch_hydro_power: nodal
            .get_bool("dispatchable-hydro-power")?
            .unwrap_or(d.dispatch_hydro_power),
        other_dispatch_power: nodal
            .get_bool("other-dispatchable-power")?
            .unwrap_or(d.other_dispatch_power),
        filter_synthesis: match filtering.get("filter-synthesis") {
            Some(raw) => parse_filters(raw).map_err(|e| e.to_string())?,
            None => d.filter_synthesis,
        },
        filter_by_year: match filtering.get("filter-year-by-year") {
            Some(raw) => parse_filters(raw).map_err(|e| e.to_string())?,
            None => d.filter_by_year,
        },
        adequacy_patch_mode: patch
            .get_parsed::<AdequacyPatchMode>("adequacy-patch-mode")?
            .unwrap_or(d.adequacy_patch_mode),
        spread_unsupplied_energy_cost: nodal
            .get_f64("spread-unsupplied-energy-cost")?
            .unwrap_or(d.spread_unsupplied_energy_cost),
        spread_spilled_energy_cost: nodal
            .get_f64("spread-spilled-energy-cost")?
            .unwrap_or(d.spread_spilled_energy_cost),
    })
}

pub fn area_ui_to_ini(ui: &AreaUi) -> IniMap {
    let mut ini = IniMap::new();
    let section = ini.ensure_section("ui");
    section.set("x", ui.x);
    section.set("y", ui.y);
    section.set("color_r", ui.color_rgb[0]);
    section.set("color_g", ui.color_rgb[1]);
    section.set("color_b", ui.color_rgb[2]);
    section.set("layers", "0");
    ini.ensure_section("layerX").set("0", ui.x);
    ini.ensure_section("layerY").set("0", ui.y);
    ini.ensure_section("layerColor").set(
        "0",
        format!("{},{},{}", ui.color_rgb[0], ui.color_rgb[1], ui.color_rgb[2]),
    );
    ini
}

pub fn area_ui_from_ini(ini: &IniMap) -> CodecResult<AreaUi> {
    let d = AreaUi::default();
    let empty = IniSection::new();
    let section = ini.section("ui").unwrap_or(&empty);
    Ok(AreaUi {
        x: section.get_parsed("x")?.unwrap_or(d.x),
        y: section.get_parsed("y")?.unwrap_or(d.y),
        color_rgb: [
            section.get_parsed("color_r")?.unwrap_or(d.color_rgb[0]),
            section.get_parsed("color_g")?.unwrap_or(d.color_rgb[1]),
            section.get_parsed("color_b")?.unwrap_or(d.color_rgb[2]),
        ],
    })
}

// ---------------------------------------------------------------------------
// Hydro (input/hydro/hydro.ini, one section per property, keyed by area)
// ---------------------------------------------------------------------------

const HYDRO_OVERFLOW_KEY: &str = "overflow spilled cost difference";

pub fn hydro_properties_to_ini(
    ini: &mut IniMap,
    area_id: &str,
    p: &HydroProperties,
    version: StudyVersion,
) -> CodecResult<()> {
    if version < STUDY_VERSION_9_2 && p.overflow_spilled_cost_difference.is_some() {
        return Err(format!("`{HYDRO_OVERFLOW_KEY}` only exists from study version 9.2"));
    }
    ini.ensure_section("inter-daily-breakdown")
        .set_f64_6(area_id, p.inter_daily_breakdown);
    ini.ensure_section("intra-daily-modulation")
        .set_f64_6(area_id, p.intra_daily_modulation);
    ini.ensure_section("inter-monthly-breakdown")
        .set_f64_6(area_id, p.inter_monthly_breakdown);
    ini.ensure_section("reservoir").set(area_id, p.reservoir);
    ini.ensure_section("reservoir capacity")
        .set_f64_6(area_id, p.reservoir_capacity);
    ini.ensure_section("follow load").set(area_id, p.follow_load);
    ini.ensure_section("use water").set(area_id, p.use_water);
    ini.ensure_section("hard bounds").set(area_id, p.hard_bounds);
    ini.ensure_section("initialize reservoir date")
        .set(area_id, p.initialize_reservoir_date);
    ini.ensure_section("use heuristic").set(area_id, p.use_heuristic);
    ini.ensure_section("power to level").set(area_id, p.power_to_level);
    ini.ensure_section("use leeway").set(area_id, p.use_leeway);
    ini.ensure_section("leeway low").set_f64_6(area_id, p.leeway_low);
    ini.ensure_section("leeway up").set_f64_6(area_id, p.leeway_up);
    ini.ensure_section("pumping efficiency")
        .set_f64_6(area_id, p.pumping_efficiency);
    if let Some(value) = p.overflow_spilled_cost_difference {
        ini.ensure_section(HYDRO_OVERFLOW_KEY).set_f64_6(area_id, value);
    }
    Ok(())
}

pub fn hydro_properties_from_ini(
    ini: &IniMap,
    area_id: &str,
    version: StudyVersion,
) -> CodecResult<HydroProperties> {
    let d = HydroProperties::default();
    let field = |section: &str| -> Option<&str> { ini.section(section).and_then(|s| s.get(area_id)) };
    let get_f64 = |section: &str, default: f64| -> CodecResult<f64> {
        match field(section) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("invalid value `{raw}` for `{section}`")),
        }
    };
    let get_bool = |section: &str, default: bool| -> CodecResult<bool> {
        match field(section) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(format!("invalid boolean `{raw}` for `{section}`")),
            },
        }
    };
    let overflow = match field(HYDRO_OVERFLOW_KEY) {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| format!("invalid value `{raw}` for `{HYDRO_OVERFLOW_KEY}`"))?,
        ),
        None if version >= STUDY_VERSION_9_2 => Some(0.0),
        None => None,
    };
    if version < STUDY_VERSION_9_2 && overflow.is_some() {
        return Err(format!("`{HYDRO_OVERFLOW_KEY}` only exists from study version 9.2"));
    }
    Ok(HydroProperties {
        inter_daily_breakdown: get_f64("inter-daily-breakdown", d.inter_daily_breakdown)?,
        intra_daily_modulation: get_f64("intra-daily-modulation", d.intra_daily_modulation)?,
        inter_monthly_breakdown: get_f64("inter-monthly-breakdown", d.inter_monthly_breakdown)?,
        reservoir: get_bool("reservoir", d.reservoir)?,
        reservoir_capacity: get_f64("reservoir capacity", d.reservoir_capacity)?,
        follow_load: get_bool("follow load", d.follow_load)?,
        use_water: get_bool("use water", d.use_water)?,
        hard_bounds: get_bool("hard bounds", d.hard_bounds)?,
        initialize_reservoir_date: match field("initialize reservoir date") {
            None => d.initialize_reservoir_date,
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("invalid value `{raw}` for `initialize reservoir date`"))?,
        },
        use_heuristic: get_bool("use heuristic", d.use_heuristic)?,
        power_to_level: get_bool("power to level", d.power_to_level)?,
        use_leeway: get_bool("use leeway", d.use_leeway)?,
        leeway_low: get_f64("leeway low", d.leeway_low)?,
        leeway_up: get_f64("leeway up", d.leeway_up)?,
        pumping_efficiency: get_f64("pumping efficiency", d.pumping_efficiency)?,
        overflow_spilled_cost_difference: overflow,
    })
}

/// Drops every hydro entry of an area, for area deletion.
pub fn hydro_remove_area(ini: &mut IniMap, area_id: &str) {
    let sections: Vec<String> = ini.sections().map(|(name, _)| name.to_string()).collect();
    for name in sections {
        if let Some(section) = ini.section_mut(&name) {
            section.remove(area_id);
        }
    }
}

pub fn inflow_structure_to_ini(inflow: &InflowStructure) -> IniMap {
    let mut ini = IniMap::new();
    ini.ensure_section("prepro")
        .set_f64_6("intermonthly-correlation", inflow.intermonthly_correlation);
    ini
}

pub fn inflow_structure_from_ini(ini: &IniMap) -> CodecResult<InflowStructure> {
    let d = InflowStructure::default();
    let correlation = match ini.section("prepro") {
        Some(section) => section
            .get_f64("intermonthly-correlation")?
            .unwrap_or(d.intermonthly_correlation),
        None => d.intermonthly_correlation,
    };
    Ok(InflowStructure {
        intermonthly_correlation: correlation,
    })
}

// ---------------------------------------------------------------------------
// Binding constraints (input/bindingconstraints/bindingconstraints.ini)
// ---------------------------------------------------------------------------

const CONSTRAINT_PROPERTY_KEYS: [&str; 9] = [
    "name",
    "id",
    "enabled",
    "type",
    "operator",
    "comments",
    "filter-year-by-year",
    "filter-synthesis",
    "group",
];

pub fn constraint_to_section(constraint: &ConstraintData, constraint_id: &str) -> IniSection {
    let mut s = IniSection::new();
    let p = &constraint.properties;
    s.set("name", &constraint.name);
    s.set("id", constraint_id);
    s.set("enabled", p.enabled);
    s.set("type", p.time_step);
    s.set("operator", p.operator);
    s.set("comments", &p.comments);
    s.set("filter-year-by-year", &p.filter_year_by_year);
    s.set("filter-synthesis", &p.filter_synthesis);
    s.set("group", &p.group);
    for term in &constraint.terms {
        s.set(term.id(), term.weight_offset());
    }
    s
}

pub fn constraint_from_section(s: &IniSection) -> CodecResult<ConstraintData> {
    let d = BindingConstraintProperties::default();
    let name = s.get("name").ok_or("missing `name`")?.to_string();
    let properties = BindingConstraintProperties {
        enabled: s.get_bool("enabled")?.unwrap_or(d.enabled),
        time_step: s.get_parsed("type")?.unwrap_or(d.time_step),
        operator: s.get_parsed("operator")?.unwrap_or(d.operator),
        comments: s.get("comments").unwrap_or_default().to_string(),
        filter_year_by_year: s
            .get("filter-year-by-year")
            .unwrap_or(&d.filter_year_by_year)
            .to_string(),
        filter_synthesis: s.get("filter-synthesis").unwrap_or(&d.filter_synthesis).to_string(),
        group: s.get("group").unwrap_or(&d.group).to_string(),
    };
    let mut terms = Vec::new();
    for (key, value) in s.iter() {
        if CONSTRAINT_PROPERTY_KEYS.contains(&key) {
            continue;
        }
        terms.push(parse_term(key, value)?);
    }
    Ok(ConstraintData {
        name,
        properties,
        terms,
    })
}

fn parse_term(key: &str, value: &str) -> CodecResult<ConstraintTerm> {
    let data = if let Some((area1, area2)) = key.split_once('%') {
        ConstraintTermData::link(area1, area2)
    } else if let Some((area, cluster)) = key.split_once('.') {
        ConstraintTermData::cluster(area, cluster)
    } else {
        return Err(format!("unrecognized constraint term `{key}`"));
    };
    let (weight, offset) = match value.split_once('%') {
        Some((weight, offset)) => (
            weight
                .parse()
                .map_err(|_| format!("invalid weight `{weight}` for term `{key}`"))?,
            Some(
                offset
                    .parse()
                    .map_err(|_| format!("invalid offset `{offset}` for term `{key}`"))?,
            ),
        ),
        None => (
            value
                .parse()
                .map_err(|_| format!("invalid weight `{value}` for term `{key}`"))?,
            None,
        ),
    };
    Ok(ConstraintTerm::new(data, Some(weight), offset))
}

// ---------------------------------------------------------------------------
// Xpansion (user/expansion/…)
// ---------------------------------------------------------------------------

pub fn xpansion_settings_to_ini(settings: &XpansionSettings) -> IniMap {
    let mut ini = IniMap::new();
    let s = ini.ensure_section("");
    s.set("master", settings.master);
    s.set("uc_type", settings.uc_type);
    s.set("optimality_gap", settings.optimality_gap);
    s.set("relative_gap", settings.relative_gap);
    s.set("relaxed_optimality_gap", settings.relaxed_optimality_gap);
    s.set("max_iteration", settings.max_iteration);
    s.set("solver", settings.solver);
    s.set("log_level", settings.log_level);
    s.set("separation_parameter", settings.separation_parameter);
    s.set("batch_size", settings.batch_size);
    if let Some(weights) = &settings.yearly_weights {
        s.set("yearly-weights", weights);
    }
    if let Some(constraints) = &settings.additional_constraints {
        s.set("additional-constraints", constraints);
    }
    s.set("timelimit", settings.timelimit);
    ini
}

pub fn xpansion_settings_from_ini(ini: &IniMap) -> CodecResult<XpansionSettings> {
    let d = XpansionSettings::default();
    let empty = IniSection::new();
    let s = ini.section("").unwrap_or(&empty);
    Ok(XpansionSettings {
        master: s.get_parsed("master")?.unwrap_or(d.master),
        uc_type: s.get_parsed("uc_type")?.unwrap_or(d.uc_type),
        optimality_gap: s.get_f64("optimality_gap")?.unwrap_or(d.optimality_gap),
        relative_gap: s.get_f64("relative_gap")?.unwrap_or(d.relative_gap),
        relaxed_optimality_gap: s
            .get_f64("relaxed_optimality_gap")?
            .unwrap_or(d.relaxed_optimality_gap),
        max_iteration: s.get_u32("max_iteration")?.unwrap_or(d.max_iteration),
        solver: s.get_parsed("solver")?.unwrap_or(d.solver),
        log_level: s.get_u32("log_level")?.unwrap_or(d.log_level),
        separation_parameter: s
            .get_f64("separation_parameter")?
            .unwrap_or(d.separation_parameter),
        batch_size: s.get_u32("batch_size")?.unwrap_or(d.batch_size),
        yearly_weights: s.get("yearly-weights").map(str::to_string),
        additional_constraints: s.get("additional-constraints").map(str::to_string),
        timelimit: s.get_parsed("timelimit")?.unwrap_or(d.timelimit),
    })
}

pub fn xpansion_candidate_to_section(candidate: &XpansionCandidate) -> IniSection {
    let mut s = IniSection::new();
    s.set("name", &candidate.name);
    s.set("link", format!("{} - {}", candidate.area_from, candidate.area_to));
    s.set("annual-cost-per-mw", candidate.annual_cost_per_mw);
    if let Some(value) = candidate.unit_size {
        s.set("unit-size", value);
    }
    if let Some(value) = candidate.max_units {
        s.set("max-units", value);
    }
    if let Some(value) = candidate.max_investment {
        s.set("max-investment", value);
    }
    if let Some(value) = candidate.already_installed_capacity {
        s.set("already-installed-capacity", value);
    }
    if let Some(profile) = &candidate.direct_link_profile {
        s.set("direct-link-profile", profile);
    }
    if let Some(profile) = &candidate.indirect_link_profile {
        s.set("indirect-link-profile", profile);
    }
    if let Some(profile) = &candidate.already_installed_direct_link_profile {
        s.set("already-installed-direct-link-profile", profile);
    }
    if let Some(profile) = &candidate.already_installed_indirect_link_profile {
        s.set("already-installed-indirect-link-profile", profile);
    }
    s
}

pub fn xpansion_candidate_from_section(s: &IniSection) -> CodecResult<XpansionCandidate> {
    let name = s.get("name").ok_or("missing `name`")?.to_string();
    let link = s.get("link").ok_or("missing `link`")?;
    let (area_from, area_to) = link
        .split_once(" - ")
        .ok_or_else(|| format!("link `{link}` must be `area1 - area2`"))?;
    Ok(XpansionCandidate {
        name,
        area_from: area_from.to_string(),
        area_to: area_to.to_string(),
        annual_cost_per_mw: s
            .get_f64("annual-cost-per-mw")?
            .ok_or("missing `annual-cost-per-mw`")?,
        already_installed_capacity: s.get_u32("already-installed-capacity")?,
        unit_size: s.get_f64("unit-size")?,
        max_units: s.get_u32("max-units")?,
        max_investment: s.get_f64("max-investment")?,
        direct_link_profile: s.get("direct-link-profile").map(str::to_string),
        indirect_link_profile: s.get("indirect-link-profile").map(str::to_string),
        already_installed_direct_link_profile: s
            .get("already-installed-direct-link-profile")
            .map(str::to_string),
        already_installed_indirect_link_profile: s
            .get("already-installed-indirect-link-profile")
            .map(str::to_string),
    })
}

pub fn xpansion_constraint_to_section(constraint: &XpansionConstraint) -> IniSection {
    let mut s = IniSection::new();
    s.set("name", &constraint.name);
    s.set("sign", constraint.sign);
    s.set("rhs", constraint.right_hand_side);
    for (candidate, coefficient) in &constraint.candidates_coefficients {
        s.set(candidate.clone(), coefficient);
    }
    s
}

pub fn xpansion_constraint_from_section(s: &IniSection) -> CodecResult<XpansionConstraint> {
    let name = s.get("name").ok_or("missing `name`")?.to_string();
    let sign = s.get_parsed("sign")?.ok_or("missing `sign`")?;
    let right_hand_side = s.get_f64("rhs")?.ok_or("missing `rhs`")?;
    let mut candidates_coefficients = BTreeMap::new();
    for (key, value) in s.iter() {
        if matches!(key, "name" | "sign" | "rhs") {
            continue;
        }
        let coefficient = value
            .parse()
            .map_err(|_| format!("invalid coefficient `{value}` for candidate `{key}`"))?;
        candidates_coefficients.insert(key.to_string(), coefficient);
    }
    Ok(XpansionConstraint {
        name,
        sign,
        right_hand_side,
        candidates_coefficients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::commons::STUDY_VERSION_8_8;

    #[test]
    fn thermal_section_round_trips() {
        let properties = ThermalClusterProperties {
            nominal_capacity: 1200.0,
            marginal_cost: 35.5,
            ..Default::default()
        };
        let section = thermal_to_section("Gas base", &properties);
        assert_eq!(section.get("nominalcapacity"), Some("1200.000000"));
        assert_eq!(section.get("name"), Some("Gas base"));

        let parsed = thermal_from_section(&section).unwrap();
        assert_eq!(parsed, properties);
    }

    #[test]
    fn st_storage_rejects_9_2_fields_on_8_8() {
        let properties = STStorageProperties {
            efficiency_withdrawal: Some(0.9),
            ..Default::default()
        };
        assert!(st_storage_to_section("batt", &properties, STUDY_VERSION_8_8).is_err());
        assert!(st_storage_to_section("batt", &STStorageProperties::default(), STUDY_VERSION_8_8).is_ok());
    }

    #[test]
    fn st_storage_read_fills_9_2_defaults() {
        let section = st_storage_to_section("batt", &STStorageProperties::default(), STUDY_VERSION_8_8).unwrap();
        let parsed = st_storage_from_section(&section, STUDY_VERSION_9_2).unwrap();
        assert_eq!(parsed.efficiency_withdrawal, Some(1.0));
        assert_eq!(parsed.penalize_variation_injection, Some(false));
    }

    #[test]
    fn constraint_terms_survive_the_ini_round_trip() {
        let data = ConstraintData {
            name: "FR-BE flow".to_string(),
            properties: BindingConstraintProperties::default(),
            terms: vec![
                ConstraintTerm::new(ConstraintTermData::link("fr", "be"), Some(2.5), Some(3)),
                ConstraintTerm::new(ConstraintTermData::cluster("fr", "gas"), Some(1.0), None),
            ],
        };
        let section = constraint_to_section(&data, "fr-be flow");
        assert_eq!(section.get("be%fr"), Some("2.500000%3"));
        assert_eq!(section.get("fr.gas"), Some("1"));

        let parsed = constraint_from_section(&section).unwrap();
        assert_eq!(parsed.name, data.name);
        assert_eq!(parsed.terms.len(), 2);
        assert_eq!(parsed.terms[0].offset, Some(3));
    }

    #[test]
    fn hydro_ini_keeps_one_section_per_property() {
        let mut ini = IniMap::new();
        let properties = HydroProperties {
            reservoir: true,
            reservoir_capacity: 500.0,
            ..Default::default()
        };
        hydro_properties_to_ini(&mut ini, "fr", &properties, STUDY_VERSION_8_8).unwrap();
        hydro_properties_to_ini(&mut ini, "be", &HydroProperties::default(), STUDY_VERSION_8_8).unwrap();

        assert_eq!(ini.section("reservoir").unwrap().get("fr"), Some("true"));
        let parsed = hydro_properties_from_ini(&ini, "fr", STUDY_VERSION_8_8).unwrap();
        assert_eq!(parsed, properties);

        hydro_remove_area(&mut ini, "fr");
        assert!(ini.section("reservoir").unwrap().get("fr").is_none());
    }

    #[test]
    fn xpansion_candidate_link_is_joined() {
        let candidate =
            XpansionCandidate::new("battery", "area1", "area2", 100.0).with_max_investment(1000.0);
        let section = xpansion_candidate_to_section(&candidate);
        assert_eq!(section.get("link"), Some("area1 - area2"));
        let parsed = xpansion_candidate_from_section(&section).unwrap();
        assert_eq!(parsed, candidate);
    }
}
