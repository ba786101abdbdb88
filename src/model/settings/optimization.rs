use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SimplexOptimizationRange {
    Day,
    #[default]
    Week,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum OptimizationTransmissionCapacities {
    #[default]
    #[serde(rename = "local-values")]
    #[strum(serialize = "local-values")]
    LocalValues,
    #[serde(rename = "null-for-all-links")]
    #[strum(serialize = "null-for-all-links")]
    NullForAllLinks,
    #[serde(rename = "infinite-for-all-links")]
    #[strum(serialize = "infinite-for-all-links")]
    InfiniteForAllLinks,
    #[serde(rename = "null-for-physical-links")]
    #[strum(serialize = "null-for-physical-links")]
    NullForPhysicalLinks,
    #[serde(rename = "infinite-for-physical-links")]
    #[strum(serialize = "infinite-for-physical-links")]
    InfiniteForPhysicalLinks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum UnfeasibleProblemBehavior {
    #[serde(rename = "warning-dry")]
    #[strum(serialize = "warning-dry")]
    WarningDry,
    #[serde(rename = "warning-verbose")]
    #[strum(serialize = "warning-verbose")]
    WarningVerbose,
    #[serde(rename = "error-dry")]
    #[strum(serialize = "error-dry")]
    ErrorDry,
    #[default]
    #[serde(rename = "error-verbose")]
    #[strum(serialize = "error-verbose")]
    ErrorVerbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportMps {
    #[default]
    None,
    #[serde(rename = "optim-1")]
    #[strum(serialize = "optim-1")]
    Optim1,
    #[serde(rename = "optim-2")]
    #[strum(serialize = "optim-2")]
    Optim2,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationParameters {
    pub simplex_range: SimplexOptimizationRange,
    pub transmission_capacities: OptimizationTransmissionCapacities,
    pub include_constraints: bool,
    pub include_hurdlecosts: bool,
    pub include_tc_minstablepower: bool,
    pub include_tc_min_ud_time: bool,
    pub include_dayahead: bool,
    pub include_strategicreserve: bool,
    pub include_spinningreserve: bool,
    pub include_primaryreserve: bool,
    pub include_exportmps: ExportMps,
    pub include_exportstructure: bool,
    pub include_unfeasible_problem_behavior: UnfeasibleProblemBehavior,
}

impl Default for OptimizationParameters {
    fn default() -> Self {
        Self {
            simplex_range: SimplexOptimizationRange::default(),
            transmission_capacities: OptimizationTransmissionCapacities::default(),
            include_constraints: true,
            include_hurdlecosts: true,
            include_tc_minstablepower: true,
            include_tc_min_ud_time: true,
            include_dayahead: true,
            include_strategicreserve: true,
            include_spinningreserve: true,
            include_primaryreserve: true,
            include_exportmps: ExportMps::default(),
            include_exportstructure: false,
            include_unfeasible_problem_behavior: UnfeasibleProblemBehavior::default(),
        }
    }
}

impl OptimizationParameters {
    pub fn from_update(&self, update: &OptimizationParametersUpdate) -> Self {
        Self {
            simplex_range: update.simplex_range.unwrap_or(self.simplex_range),
            transmission_capacities: update
                .transmission_capacities
                .unwrap_or(self.transmission_capacities),
            include_constraints: update.include_constraints.unwrap_or(self.include_constraints),
            include_hurdlecosts: update.include_hurdlecosts.unwrap_or(self.include_hurdlecosts),
            include_tc_minstablepower: update
                .include_tc_minstablepower
                .unwrap_or(self.include_tc_minstablepower),
            include_tc_min_ud_time: update
                .include_tc_min_ud_time
                .unwrap_or(self.include_tc_min_ud_time),
            include_dayahead: update.include_dayahead.unwrap_or(self.include_dayahead),
            include_strategicreserve: update
                .include_strategicreserve
                .unwrap_or(self.include_strategicreserve),
            include_spinningreserve: update
                .include_spinningreserve
                .unwrap_or(self.include_spinningreserve),
            include_primaryreserve: update
                .include_primaryreserve
                .unwrap_or(self.include_primaryreserve),
            include_exportmps: update.include_exportmps.unwrap_or(self.include_exportmps),
            include_exportstructure: update
                .include_exportstructure
                .unwrap_or(self.include_exportstructure),
            include_unfeasible_problem_behavior: update
                .include_unfeasible_problem_behavior
                .unwrap_or(self.include_unfeasible_problem_behavior),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationParametersUpdate {
    pub simplex_range: Option<SimplexOptimizationRange>,
    pub transmission_capacities: Option<OptimizationTransmissionCapacities>,
    pub include_constraints: Option<bool>,
    pub include_hurdlecosts: Option<bool>,
    pub include_tc_minstablepower: Option<bool>,
    pub include_tc_min_ud_time: Option<bool>,
    pub include_dayahead: Option<bool>,
    pub include_strategicreserve: Option<bool>,
    pub include_spinningreserve: Option<bool>,
    pub include_primaryreserve: Option<bool>,
    pub include_exportmps: Option<ExportMps>,
    pub include_exportstructure: Option<bool>,
    pub include_unfeasible_problem_behavior: Option<UnfeasibleProblemBehavior>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_use_dashes() {
        assert_eq!(
            OptimizationTransmissionCapacities::InfiniteForAllLinks.to_string(),
            "infinite-for-all-links"
        );
        assert_eq!(
            "error-dry".parse::<UnfeasibleProblemBehavior>().unwrap(),
            UnfeasibleProblemBehavior::ErrorDry
        );
    }

    #[test]
    fn update_keeps_unset_fields() {
        let base = OptimizationParameters::default();
        let update = OptimizationParametersUpdate {
            include_exportmps: Some(ExportMps::Both),
            ..Default::default()
        };
        let merged = base.from_update(&update);
        assert_eq!(merged.include_exportmps, ExportMps::Both);
        assert!(merged.include_constraints);
    }
}
