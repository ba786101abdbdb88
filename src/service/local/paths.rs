//! Layout of an Antares study directory.

use std::path::{Path, PathBuf};

use crate::model::hydro::HydroMatrixName;
use crate::model::link::LinkMatrixName;
use crate::model::st_storage::STStorageMatrixName;
use crate::model::thermal::ThermalClusterMatrixName;
use crate::service::AreaMatrixName;

#[derive(Debug, Clone)]
pub struct StudyPaths {
    root: PathBuf,
}

impl StudyPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn study_antares(&self) -> PathBuf {
        self.root.join("study.antares")
    }

    pub fn general_data(&self) -> PathBuf {
        self.root.join("settings").join("generaldata.ini")
    }

    pub fn scenario_builder(&self) -> PathBuf {
        self.root.join("settings").join("scenariobuilder.dat")
    }

    pub fn areas_dir(&self) -> PathBuf {
        self.root.join("input").join("areas")
    }

    pub fn areas_list(&self) -> PathBuf {
        self.areas_dir().join("list.txt")
    }

    pub fn area_dir(&self, area_id: &str) -> PathBuf {
        self.areas_dir().join(area_id)
    }

    pub fn area_optimization(&self, area_id: &str) -> PathBuf {
        self.area_dir(area_id).join("optimization.ini")
    }

    pub fn area_ui(&self, area_id: &str) -> PathBuf {
        self.area_dir(area_id).join("ui.ini")
    }

    pub fn area_adequacy_patch(&self, area_id: &str) -> PathBuf {
        self.area_dir(area_id).join("adequacy_patch.ini")
    }

    /// Unserved and spilled energy costs for every area live in one file.
    pub fn thermal_areas(&self) -> PathBuf {
        self.root.join("input").join("thermal").join("areas.ini")
    }

    pub fn area_matrix(&self, area_id: &str, matrix: AreaMatrixName) -> PathBuf {
        let input = self.root.join("input");
        match matrix {
            AreaMatrixName::Load => input.join("load").join("series").join(format!("load_{area_id}.txt")),
            AreaMatrixName::Wind => input.join("wind").join("series").join(format!("wind_{area_id}.txt")),
            AreaMatrixName::Solar => input
                .join("solar")
                .join("series")
                .join(format!("solar_{area_id}.txt")),
            AreaMatrixName::Reserves => input.join("reserves").join(format!("{area_id}.txt")),
            AreaMatrixName::MiscGen => input.join("misc-gen").join(format!("miscgen-{area_id}.txt")),
        }
    }

    pub fn links_dir(&self, area_from_id: &str) -> PathBuf {
        self.root.join("input").join("links").join(area_from_id)
    }

    pub fn link_properties(&self, area_from_id: &str) -> PathBuf {
        self.links_dir(area_from_id).join("properties.ini")
    }

    pub fn link_matrix(&self, area_from_id: &str, area_to_id: &str, matrix: LinkMatrixName) -> PathBuf {
        let dir = self.links_dir(area_from_id);
        match matrix {
            LinkMatrixName::Parameters => dir.join(format!("{area_to_id}_parameters.txt")),
            LinkMatrixName::CapacityDirect => dir.join("capacities").join(format!("{area_to_id}_direct.txt")),
            LinkMatrixName::CapacityIndirect => {
                dir.join("capacities").join(format!("{area_to_id}_indirect.txt"))
            }
        }
    }

    pub fn thermal_list(&self, area_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("thermal")
            .join("clusters")
            .join(area_id)
            .join("list.ini")
    }

    pub fn thermal_matrix(
        &self,
        area_id: &str,
        cluster_id: &str,
        matrix: ThermalClusterMatrixName,
    ) -> PathBuf {
        let thermal = self.root.join("input").join("thermal");
        match matrix {
            ThermalClusterMatrixName::PreproData | ThermalClusterMatrixName::PreproModulation => thermal
                .join("prepro")
                .join(area_id)
                .join(cluster_id)
                .join(format!("{}.txt", matrix.as_str())),
            _ => thermal
                .join("series")
                .join(area_id)
                .join(cluster_id)
                .join(format!("{}.txt", matrix.as_str())),
        }
    }

    pub fn renewable_list(&self, area_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("renewables")
            .join("clusters")
            .join(area_id)
            .join("list.ini")
    }

    pub fn renewable_series(&self, area_id: &str, cluster_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("renewables")
            .join("series")
            .join(area_id)
            .join(cluster_id)
            .join("series.txt")
    }

    pub fn st_storage_list(&self, area_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("st-storage")
            .join("clusters")
            .join(area_id)
            .join("list.ini")
    }

    pub fn st_storage_matrix(
        &self,
        area_id: &str,
        storage_id: &str,
        matrix: STStorageMatrixName,
    ) -> PathBuf {
        let file = match matrix {
            STStorageMatrixName::PmaxInjection => "PMAX-injection.txt",
            STStorageMatrixName::PmaxWithdrawal => "PMAX-withdrawal.txt",
            STStorageMatrixName::LowerRuleCurve => "lower-rule-curve.txt",
            STStorageMatrixName::UpperRuleCurve => "upper-rule-curve.txt",
            STStorageMatrixName::Inflows => "inflows.txt",
        };
        self.root
            .join("input")
            .join("st-storage")
            .join("series")
            .join(area_id)
            .join(storage_id)
            .join(file)
    }

    pub fn hydro_ini(&self) -> PathBuf {
        self.root.join("input").join("hydro").join("hydro.ini")
    }

    pub fn hydro_correlation(&self) -> PathBuf {
        self.root
            .join("input")
            .join("hydro")
            .join("prepro")
            .join("correlation.ini")
    }

    pub fn hydro_prepro_ini(&self, area_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("hydro")
            .join("prepro")
            .join(area_id)
            .join("prepro.ini")
    }

    pub fn hydro_allocation(&self, area_id: &str) -> PathBuf {
        self.root
            .join("input")
            .join("hydro")
            .join("allocation")
            .join(format!("{area_id}.ini"))
    }

    pub fn hydro_matrix(&self, area_id: &str, matrix: HydroMatrixName) -> PathBuf {
        let hydro = self.root.join("input").join("hydro");
        let capacity = hydro.join("common").join("capacity");
        match matrix {
            HydroMatrixName::MaxPower => capacity.join(format!("maxpower_{area_id}.txt")),
            HydroMatrixName::Reservoir => capacity.join(format!("reservoir_{area_id}.txt")),
            HydroMatrixName::InflowPattern => capacity.join(format!("inflowPattern_{area_id}.txt")),
            HydroMatrixName::CreditModulations => {
                capacity.join(format!("creditmodulations_{area_id}.txt"))
            }
            HydroMatrixName::WaterValues => capacity.join(format!("waterValues_{area_id}.txt")),
            HydroMatrixName::RorSeries => hydro.join("series").join(area_id).join("ror.txt"),
            HydroMatrixName::ModSeries => hydro.join("series").join(area_id).join("mod.txt"),
            HydroMatrixName::MinGen => hydro.join("series").join(area_id).join("mingen.txt"),
            HydroMatrixName::Energy => hydro.join("prepro").join(area_id).join("energy.txt"),
        }
    }

    pub fn binding_constraints_ini(&self) -> PathBuf {
        self.root
            .join("input")
            .join("bindingconstraints")
            .join("bindingconstraints.ini")
    }

    pub fn binding_constraint_matrix(&self, constraint_id: &str, suffix: &str) -> PathBuf {
        self.root
            .join("input")
            .join("bindingconstraints")
            .join(format!("{constraint_id}_{suffix}.txt"))
    }

    pub fn expansion_dir(&self) -> PathBuf {
        self.root.join("user").join("expansion")
    }

    pub fn expansion_settings(&self) -> PathBuf {
        self.expansion_dir().join("settings.ini")
    }

    pub fn expansion_candidates(&self) -> PathBuf {
        self.expansion_dir().join("candidates.ini")
    }

    pub fn expansion_constraints(&self, file_name: &str) -> PathBuf {
        self.expansion_dir().join("constraints").join(file_name)
    }

    pub fn expansion_sensitivity(&self) -> PathBuf {
        self.expansion_dir().join("sensitivity").join("sensitivity_in.json")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_series_follow_the_antares_layout() {
        let paths = StudyPaths::new("/tmp/study");
        assert_eq!(
            paths.area_matrix("fr", AreaMatrixName::Load),
            PathBuf::from("/tmp/study/input/load/series/load_fr.txt")
        );
        assert_eq!(
            paths.area_matrix("fr", AreaMatrixName::MiscGen),
            PathBuf::from("/tmp/study/input/misc-gen/miscgen-fr.txt")
        );
    }

    #[test]
    fn thermal_prepro_and_series_are_split() {
        let paths = StudyPaths::new("/tmp/study");
        assert_eq!(
            paths.thermal_matrix("fr", "gas", ThermalClusterMatrixName::PreproData),
            PathBuf::from("/tmp/study/input/thermal/prepro/fr/gas/data.txt")
        );
        assert_eq!(
            paths.thermal_matrix("fr", "gas", ThermalClusterMatrixName::SeriesFuelCost),
            PathBuf::from("/tmp/study/input/thermal/series/fr/gas/fuelCost.txt")
        );
    }
}
