//! Local backend: every service reads and writes the Antares study tree
//! directly, ini files for properties and tab-separated files for series.

mod area;
mod cluster;
mod constraint;
mod hydro;
pub(crate) mod ini;
mod link;
mod matrix;
pub(crate) mod models;
mod paths;
mod run;
mod settings;
mod study;
mod study_settings;
mod xpansion;

use std::sync::Arc;

use crate::config::LocalConfiguration;
use crate::model::commons::StudyVersion;
use crate::service::StudyServices;

pub use paths::StudyPaths;
pub use study::{read_study_descriptor, scaffold_study};

/// Shared by every local service: where the study lives and which format
/// version its files follow.
pub(crate) struct LocalContext {
    pub paths: StudyPaths,
    pub version: StudyVersion,
}

/// Builds the full service bundle for a study directory.
pub fn create_local_services(config: &LocalConfiguration, version: StudyVersion) -> StudyServices {
    let context = Arc::new(LocalContext {
        paths: StudyPaths::new(config.study_path()),
        version,
    });
    StudyServices {
        area: Arc::new(area::AreaLocalService::new(context.clone())),
        link: Arc::new(link::LinkLocalService::new(context.clone())),
        thermal: Arc::new(cluster::ThermalLocalService::new(context.clone())),
        renewable: Arc::new(cluster::RenewableLocalService::new(context.clone())),
        st_storage: Arc::new(cluster::STStorageLocalService::new(context.clone())),
        hydro: Arc::new(hydro::HydroLocalService::new(context.clone())),
        binding_constraint: Arc::new(constraint::BindingConstraintLocalService::new(
            context.clone(),
        )),
        settings: Arc::new(study_settings::SettingsLocalService::new(context.clone())),
        study: Arc::new(study::StudyLocalService::new(context.clone())),
        run: Arc::new(run::RunLocalService::new(context.clone())),
        xpansion: Arc::new(xpansion::XpansionLocalService::new(context)),
    }
}
