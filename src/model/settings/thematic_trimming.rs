use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::model::commons::{StudyVersion, STUDY_VERSION_9_2};

/// An output variable of the simulator. The serde name is the camel-cased
/// form used by AntaresWeb; the strum string is the label written in
/// `generaldata.ini` under `[variables selection]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum ThematicVariable {
    #[strum(serialize = "OV. COST")]
    OvCost,
    #[strum(serialize = "OP. COST")]
    OpCost,
    #[strum(serialize = "MRG. PRICE")]
    MrgPrice,
    #[strum(serialize = "CO2 EMIS.")]
    Co2Emis,
    #[strum(serialize = "DTG by plant")]
    DtgByPlant,
    #[strum(serialize = "BALANCE")]
    Balance,
    #[strum(serialize = "ROW BAL.")]
    RowBal,
    #[strum(serialize = "PSP")]
    Psp,
    #[strum(serialize = "MISC. NDG")]
    MiscNdg,
    #[strum(serialize = "LOAD")]
    Load,
    #[strum(serialize = "H. ROR")]
    HRor,
    #[strum(serialize = "WIND")]
    Wind,
    #[strum(serialize = "SOLAR")]
    Solar,
    #[strum(serialize = "NUCLEAR")]
    Nuclear,
    #[strum(serialize = "LIGNITE")]
    Lignite,
    #[strum(serialize = "COAL")]
    Coal,
    #[strum(serialize = "GAS")]
    Gas,
    #[strum(serialize = "OIL")]
    Oil,
    #[strum(serialize = "MIX. FUEL")]
    MixFuel,
    #[strum(serialize = "MISC. DTG")]
    MiscDtg,
    #[strum(serialize = "H. STOR")]
    HStor,
    #[strum(serialize = "H. PUMP")]
    HPump,
    #[strum(serialize = "H. LEV")]
    HLev,
    #[strum(serialize = "H. INFL")]
    HInfl,
    #[strum(serialize = "H. OVFL")]
    HOvfl,
    #[strum(serialize = "H. VAL")]
    HVal,
    #[strum(serialize = "H. COST")]
    HCost,
    #[strum(serialize = "UNSP. ENRG")]
    UnspEnrg,
    #[strum(serialize = "SPIL. ENRG")]
    SpilEnrg,
    #[strum(serialize = "LOLD")]
    Lold,
    #[strum(serialize = "LOLP")]
    Lolp,
    #[strum(serialize = "AVL DTG")]
    AvlDtg,
    #[strum(serialize = "DTG MRG")]
    DtgMrg,
    #[strum(serialize = "MAX MRG")]
    MaxMrg,
    #[strum(serialize = "NP COST")]
    NpCost,
    #[strum(serialize = "NP Cost by plant")]
    NpCostByPlant,
    #[strum(serialize = "NODU")]
    Nodu,
    #[strum(serialize = "NODU by plant")]
    NoduByPlant,
    #[strum(serialize = "FLOW LIN.")]
    FlowLin,
    #[strum(serialize = "UCAP LIN.")]
    UcapLin,
    #[strum(serialize = "LOOP FLOW")]
    LoopFlow,
    #[strum(serialize = "FLOW QUAD.")]
    FlowQuad,
    #[strum(serialize = "CONG. FEE (ALG.)")]
    CongFeeAlg,
    #[strum(serialize = "CONG. FEE (ABS.)")]
    CongFeeAbs,
    #[strum(serialize = "MARG. COST")]
    MargCost,
    #[strum(serialize = "CONG. PROB +")]
    CongProbPlus,
    #[strum(serialize = "CONG. PROB -")]
    CongProbMinus,
    #[strum(serialize = "HURDLE COST")]
    HurdleCost,
    // since v8.1
    #[strum(serialize = "RES generation by plant")]
    ResGenerationByPlant,
    #[strum(serialize = "MISC. DTG 2")]
    MiscDtg2,
    #[strum(serialize = "MISC. DTG 3")]
    MiscDtg3,
    #[strum(serialize = "MISC. DTG 4")]
    MiscDtg4,
    #[strum(serialize = "WIND OFFSHORE")]
    WindOffshore,
    #[strum(serialize = "WIND ONSHORE")]
    WindOnshore,
    #[strum(serialize = "SOLAR CONCR")]
    SolarConcrt,
    #[strum(serialize = "SOLAR PV")]
    SolarPv,
    #[strum(serialize = "SOLAR ROOFT")]
    SolarRooft,
    #[strum(serialize = "RENW. 1")]
    Renw1,
    #[strum(serialize = "RENW. 2")]
    Renw2,
    #[strum(serialize = "RENW. 3")]
    Renw3,
    #[strum(serialize = "RENW. 4")]
    Renw4,
    // since v8.3
    #[strum(serialize = "DENS")]
    Dens,
    #[strum(serialize = "Profit by plant")]
    ProfitByPlant,
    // since v8.6
    #[strum(serialize = "STS inj by plant")]
    StsInjByPlant,
    #[strum(serialize = "STS withdrawal by plant")]
    StsWithdrawalByPlant,
    #[strum(serialize = "STS lvl by plant")]
    StsLvlByPlant,
    #[strum(serialize = "PSP_open_injection")]
    PspOpenInjection,
    #[strum(serialize = "PSP_open_withdrawal")]
    PspOpenWithdrawal,
    #[strum(serialize = "PSP_open_level")]
    PspOpenLevel,
    #[strum(serialize = "PSP_closed_injection")]
    PspClosedInjection,
    #[strum(serialize = "PSP_closed_withdrawal")]
    PspClosedWithdrawal,
    #[strum(serialize = "PSP_closed_level")]
    PspClosedLevel,
    #[strum(serialize = "Pondage_injection")]
    PondageInjection,
    #[strum(serialize = "Pondage_withdrawal")]
    PondageWithdrawal,
    #[strum(serialize = "Pondage_level")]
    PondageLevel,
    #[strum(serialize = "Battery_injection")]
    BatteryInjection,
    #[strum(serialize = "Battery_withdrawal")]
    BatteryWithdrawal,
    #[strum(serialize = "Battery_level")]
    BatteryLevel,
    #[strum(serialize = "Other1_injection")]
    Other1Injection,
    #[strum(serialize = "Other1_withdrawal")]
    Other1Withdrawal,
    #[strum(serialize = "Other1_level")]
    Other1Level,
    #[strum(serialize = "Other2_injection")]
    Other2Injection,
    #[strum(serialize = "Other2_withdrawal")]
    Other2Withdrawal,
    #[strum(serialize = "Other2_level")]
    Other2Level,
    #[strum(serialize = "Other3_injection")]
    Other3Injection,
    #[strum(serialize = "Other3_withdrawal")]
    Other3Withdrawal,
    #[strum(serialize = "Other3_level")]
    Other3Level,
    #[strum(serialize = "Other4_injection")]
    Other4Injection,
    #[strum(serialize = "Other4_withdrawal")]
    Other4Withdrawal,
    #[strum(serialize = "Other4_level")]
    Other4Level,
    #[strum(serialize = "Other5_injection")]
    Other5Injection,
    #[strum(serialize = "Other5_withdrawal")]
    Other5Withdrawal,
    #[strum(serialize = "Other5_level")]
    Other5Level,
    // since v8.8
    #[strum(serialize = "STS Cashflow By Cluster")]
    StsCashflowByCluster,
    #[strum(serialize = "NPCAP HOURS")]
    NpcapHours,
    // since v9.2
    #[strum(serialize = "STS by group")]
    StsByGroup,
}

impl ThematicVariable {
    /// Variables that only exist from version 9.2 on.
    pub fn requires_9_2(self) -> bool {
        self == ThematicVariable::StsByGroup
    }

    /// Per-storage-group variables, replaced by [`ThematicVariable::StsByGroup`]
    /// in version 9.2.
    pub fn is_sts_group_variable(self) -> bool {
        use ThematicVariable::*;
        matches!(
            self,
            PspOpenInjection
                | PspOpenWithdrawal
                | PspOpenLevel
                | PspClosedInjection
                | PspClosedWithdrawal
                | PspClosedLevel
                | PondageInjection
                | PondageWithdrawal
                | PondageLevel
                | BatteryInjection
                | BatteryWithdrawal
                | BatteryLevel
                | Other1Injection
                | Other1Withdrawal
                | Other1Level
                | Other2Injection
                | Other2Withdrawal
                | Other2Level
                | Other3Injection
                | Other3Withdrawal
                | Other3Level
                | Other4Injection
                | Other4Withdrawal
                | Other4Level
                | Other5Injection
                | Other5Withdrawal
                | Other5Level
        )
    }

    /// Variables meaningful for a given study version.
    pub fn for_version(version: StudyVersion) -> impl Iterator<Item = ThematicVariable> {
        ThematicVariable::iter().filter(move |var| {
            if version < STUDY_VERSION_9_2 {
                !var.requires_9_2()
            } else {
                !var.is_sts_group_variable()
            }
        })
    }
}

/// Which output variables the simulation writes. Every variable defaults to
/// enabled; a missing entry means enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThematicTrimmingParameters {
    values: BTreeMap<ThematicVariable, bool>,
}

impl Default for ThematicTrimmingParameters {
    fn default() -> Self {
        Self {
            values: ThematicVariable::iter().map(|var| (var, true)).collect(),
        }
    }
}

impl ThematicTrimmingParameters {
    pub fn is_enabled(&self, variable: ThematicVariable) -> bool {
        self.values.get(&variable).copied().unwrap_or(true)
    }

    pub fn set(&mut self, variable: ThematicVariable, enabled: bool) {
        self.values.insert(variable, enabled);
    }

    pub fn with(mut self, variable: ThematicVariable, enabled: bool) -> Self {
        self.set(variable, enabled);
        self
    }

    pub fn all_enabled() -> Self {
        Self::default()
    }

    pub fn all_disabled() -> Self {
        Self {
            values: ThematicVariable::iter().map(|var| (var, false)).collect(),
        }
    }

    pub fn all_reversed(&self) -> Self {
        Self {
            values: ThematicVariable::iter()
                .map(|var| (var, !self.is_enabled(var)))
                .collect(),
        }
    }

    /// (variable, enabled) pairs restricted to what `version` supports.
    pub fn entries_for_version(
        &self,
        version: StudyVersion,
    ) -> impl Iterator<Item = (ThematicVariable, bool)> + '_ {
        ThematicVariable::for_version(version).map(move |var| (var, self.is_enabled(var)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::commons::STUDY_VERSION_8_8;

    #[test]
    fn ini_labels_round_trip() {
        assert_eq!(ThematicVariable::OvCost.to_string(), "OV. COST");
        assert_eq!(
            "CONG. FEE (ALG.)".parse::<ThematicVariable>().unwrap(),
            ThematicVariable::CongFeeAlg
        );
        assert_eq!(
            "STS Cashflow By Cluster".parse::<ThematicVariable>().unwrap(),
            ThematicVariable::StsCashflowByCluster
        );
    }

    #[test]
    fn version_filter_swaps_group_variables() {
        let for_8_8: Vec<_> = ThematicVariable::for_version(STUDY_VERSION_8_8).collect();
        assert!(for_8_8.contains(&ThematicVariable::PspOpenInjection));
        assert!(!for_8_8.contains(&ThematicVariable::StsByGroup));

        let for_9_2: Vec<_> = ThematicVariable::for_version(STUDY_VERSION_9_2).collect();
        assert!(for_9_2.contains(&ThematicVariable::StsByGroup));
        assert!(!for_9_2.contains(&ThematicVariable::PspOpenInjection));
    }

    #[test]
    fn reversal_flips_every_variable() {
        let trimming = ThematicTrimmingParameters::default().with(ThematicVariable::Load, false);
        let reversed = trimming.all_reversed();
        assert!(reversed.is_enabled(ThematicVariable::Load));
        assert!(!reversed.is_enabled(ThematicVariable::Wind));
    }

    #[test]
    fn json_keys_are_camel_cased() {
        let trimming = ThematicTrimmingParameters::all_disabled();
        let json = serde_json::to_value(&trimming).unwrap();
        assert_eq!(json["ovCost"], serde_json::json!(false));
        assert_eq!(json["stsCashflowByCluster"], serde_json::json!(false));
    }
}
