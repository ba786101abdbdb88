use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum PriceTakingOrder {
    #[default]
    #[serde(rename = "DENS")]
    #[strum(serialize = "DENS")]
    Dens,
    #[serde(rename = "Load")]
    #[strum(serialize = "Load")]
    Load,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdequacyPatchParameters {
    pub include_adq_patch: bool,
    pub set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: bool,
    pub set_to_null_ntc_between_physical_out_for_first_step: bool,
    pub price_taking_order: PriceTakingOrder,
    pub include_hurdle_cost_csr: bool,
    pub check_csr_cost_function: bool,
    pub threshold_initiate_curtailment_sharing_rule: f64,
    pub threshold_display_local_matching_rule_violations: f64,
    pub threshold_csr_variable_bounds_relaxation: u32,
}

impl Default for AdequacyPatchParameters {
    fn default() -> Self {
        Self {
            include_adq_patch: false,
            set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: true,
            set_to_null_ntc_between_physical_out_for_first_step: true,
            price_taking_order: PriceTakingOrder::default(),
            include_hurdle_cost_csr: false,
            check_csr_cost_function: false,
            threshold_initiate_curtailment_sharing_rule: 1.0,
            threshold_display_local_matching_rule_violations: 0.0,
            threshold_csr_variable_bounds_relaxation: 3,
        }
    }
}

impl AdequacyPatchParameters {
    pub fn from_update(&self, update: &AdequacyPatchParametersUpdate) -> Self {
        Self {
            include_adq_patch: update.include_adq_patch.unwrap_or(self.include_adq_patch),
            set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: update
                .set_to_null_ntc_from_physical_out_to_physical_in_for_first_step
                .unwrap_or(self.set_to_null_ntc_from_physical_out_to_physical_in_for_first_step),
            set_to_null_ntc_between_physical_out_for_first_step: update
                .set_to_null_ntc_between_physical_out_for_first_step
                .unwrap_or(self.set_to_null_ntc_between_physical_out_for_first_step),
            price_taking_order: update.price_taking_order.unwrap_or(self.price_taking_order),
            include_hurdle_cost_csr: update
                .include_hurdle_cost_csr
                .unwrap_or(self.include_hurdle_cost_csr),
            check_csr_cost_function: update
                .check_csr_cost_function
                .unwrap_or(self.check_csr_cost_function),
            threshold_initiate_curtailment_sharing_rule: update
                .threshold_initiate_curtailment_sharing_rule
                .unwrap_or(self.threshold_initiate_curtailment_sharing_rule),
            threshold_display_local_matching_rule_violations: update
                .threshold_display_local_matching_rule_violations
                .unwrap_or(self.threshold_display_local_matching_rule_violations),
            threshold_csr_variable_bounds_relaxation: update
                .threshold_csr_variable_bounds_relaxation
                .unwrap_or(self.threshold_csr_variable_bounds_relaxation),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdequacyPatchParametersUpdate {
    pub include_adq_patch: Option<bool>,
    pub set_to_null_ntc_from_physical_out_to_physical_in_for_first_step: Option<bool>,
    pub set_to_null_ntc_between_physical_out_for_first_step: Option<bool>,
    pub price_taking_order: Option<PriceTakingOrder>,
    pub include_hurdle_cost_csr: Option<bool>,
    pub check_csr_cost_function: Option<bool>,
    pub threshold_initiate_curtailment_sharing_rule: Option<f64>,
    pub threshold_display_local_matching_rule_violations: Option<f64>,
    pub threshold_csr_variable_bounds_relaxation: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_is_disabled_by_default() {
        let patch = AdequacyPatchParameters::default();
        assert!(!patch.include_adq_patch);
        assert_eq!(patch.price_taking_order, PriceTakingOrder::Dens);
        assert_eq!(patch.threshold_csr_variable_bounds_relaxation, 3);
    }
}
