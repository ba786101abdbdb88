//! Simulation settings, mirroring the sections of `generaldata.ini`.

pub mod adequacy_patch;
pub mod advanced_parameters;
pub mod general;
pub mod optimization;
pub mod playlist;
pub mod thematic_trimming;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use adequacy_patch::{AdequacyPatchParameters, AdequacyPatchParametersUpdate, PriceTakingOrder};
pub use advanced_parameters::{
    AdvancedParameters, AdvancedParametersUpdate, HydroHeuristicPolicy, HydroPricingMode,
    InitialReservoirLevel, OutputSeries, PowerFluctuation, RenewableGenerationModeling,
    SeedParameters, SeedParametersUpdate, SheddingPolicy, SimulationCore, UnitCommitmentMode,
};
pub use general::{BuildingMode, GeneralParameters, GeneralParametersUpdate, Mode, Month, WeekDay};
pub use optimization::{
    ExportMps, OptimizationParameters, OptimizationParametersUpdate,
    OptimizationTransmissionCapacities, SimplexOptimizationRange, UnfeasibleProblemBehavior,
};
pub use playlist::PlaylistData;
pub use thematic_trimming::{ThematicTrimmingParameters, ThematicVariable};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudySettings {
    pub general_parameters: GeneralParameters,
    pub optimization_parameters: OptimizationParameters,
    pub advanced_parameters: AdvancedParameters,
    pub seed_parameters: SeedParameters,
    pub adequacy_patch_parameters: AdequacyPatchParameters,
    pub thematic_trimming_parameters: ThematicTrimmingParameters,
    /// One entry per Monte-Carlo year, keyed 1-based. Empty means every year
    /// plays with weight 1.
    pub playlist_parameters: BTreeMap<u32, PlaylistData>,
}

impl StudySettings {
    /// Applies an update on top of the current settings. Thematic trimming
    /// and the playlist are replaced wholesale when present.
    pub fn from_update(&self, update: &StudySettingsUpdate) -> Self {
        Self {
            general_parameters: match &update.general_parameters {
                Some(general) => self.general_parameters.from_update(general),
                None => self.general_parameters.clone(),
            },
            optimization_parameters: match &update.optimization_parameters {
                Some(optimization) => self.optimization_parameters.from_update(optimization),
                None => self.optimization_parameters.clone(),
            },
            advanced_parameters: match &update.advanced_parameters {
                Some(advanced) => self.advanced_parameters.from_update(advanced),
                None => self.advanced_parameters.clone(),
            },
            seed_parameters: match &update.seed_parameters {
                Some(seeds) => self.seed_parameters.from_update(seeds),
                None => self.seed_parameters.clone(),
            },
            adequacy_patch_parameters: match &update.adequacy_patch_parameters {
                Some(patch) => self.adequacy_patch_parameters.from_update(patch),
                None => self.adequacy_patch_parameters.clone(),
            },
            thematic_trimming_parameters: update
                .thematic_trimming_parameters
                .clone()
                .unwrap_or_else(|| self.thematic_trimming_parameters.clone()),
            playlist_parameters: update
                .playlist_parameters
                .clone()
                .unwrap_or_else(|| self.playlist_parameters.clone()),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudySettingsUpdate {
    pub general_parameters: Option<GeneralParametersUpdate>,
    pub optimization_parameters: Option<OptimizationParametersUpdate>,
    pub advanced_parameters: Option<AdvancedParametersUpdate>,
    pub seed_parameters: Option<SeedParametersUpdate>,
    pub adequacy_patch_parameters: Option<AdequacyPatchParametersUpdate>,
    pub thematic_trimming_parameters: Option<ThematicTrimmingParameters>,
    pub playlist_parameters: Option<BTreeMap<u32, PlaylistData>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_named_groups() {
        let settings = StudySettings::default();
        let update = StudySettingsUpdate {
            general_parameters: Some(GeneralParametersUpdate {
                nb_years: Some(10),
                horizon: Some("2030".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = settings.from_update(&update);
        assert_eq!(merged.general_parameters.nb_years, 10);
        assert_eq!(merged.general_parameters.horizon, "2030");
        assert_eq!(merged.optimization_parameters, settings.optimization_parameters);
        assert!(merged.playlist_parameters.is_empty());
    }

    #[test]
    fn playlist_update_replaces_the_whole_map() {
        let mut settings = StudySettings::default();
        settings.playlist_parameters.insert(1, PlaylistData::disabled());
        settings.playlist_parameters.insert(2, PlaylistData::enabled());

        let update = StudySettingsUpdate {
            playlist_parameters: Some(BTreeMap::from([(3, PlaylistData::enabled())])),
            ..Default::default()
        };
        let merged = settings.from_update(&update);
        assert_eq!(merged.playlist_parameters.len(), 1);
        assert!(merged.playlist_parameters.contains_key(&3));
    }
}
