//! Study-level operations on the local tree plus the initial scaffolding
//! written when a study is created.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::model::commons::StudyVersion;
use crate::model::settings::StudySettings;
use crate::service::StudyService;
use crate::utils::error::{Result, StudyError};

use super::constraint::BindingConstraintLocalService;
use super::ini::{read_ini, write_ini, IniMap};
use super::paths::StudyPaths;
use super::{settings, LocalContext};

const ANTARES_SECTION: &str = "antares";

/// Writes the minimal directory tree AntaresWeb expects from a bare study:
/// the `study.antares` descriptor, default general data, empty area list and
/// the per-mode correlation files.
pub fn scaffold_study(paths: &StudyPaths, name: &str, version: StudyVersion) -> Result<()> {
    let mut descriptor = IniMap::new();
    let section = descriptor.ensure_section(ANTARES_SECTION);
    section.set("version", version);
    section.set("caption", name);
    let now = Utc::now().timestamp();
    section.set("created", now);
    section.set("lastsave", now);
    section.set("author", "Unknown");
    write_ini(&paths.study_antares(), &descriptor)?;

    write_ini(
        &paths.general_data(),
        &settings::settings_to_ini(&StudySettings::default(), version),
    )?;
    write_ini(&paths.scenario_builder(), &IniMap::new())?;

    fs::create_dir_all(paths.areas_dir())?;
    fs::write(paths.areas_list(), "")?;

    write_ini(&paths.hydro_ini(), &IniMap::new())?;
    let mut correlation = IniMap::new();
    correlation.ensure_section("general").set("mode", "annual");
    write_ini(&paths.hydro_correlation(), &correlation)?;
    for series in ["load", "solar", "wind"] {
        write_ini(
            &paths.root().join("input").join(series).join("prepro").join("correlation.ini"),
            &correlation,
        )?;
    }

    write_ini(&paths.binding_constraints_ini(), &IniMap::new())?;
    fs::create_dir_all(paths.output_dir())?;
    info!(study = name, version = %version, "scaffolded study directory");
    Ok(())
}

/// Reads the caption and version out of `study.antares`.
pub fn read_study_descriptor(paths: &StudyPaths) -> Result<(String, StudyVersion)> {
    let descriptor = read_ini(&paths.study_antares())?;
    let section = descriptor
        .section(ANTARES_SECTION)
        .ok_or_else(|| StudyError::StudyRead {
            id: paths.root().display().to_string(),
            cause: "study.antares has no [antares] section".to_string(),
        })?;
    let name = section.get("caption").unwrap_or_default().to_string();
    let version = section
        .get("version")
        .unwrap_or_default()
        .parse::<StudyVersion>()
        .map_err(|err| StudyError::StudyRead {
            id: paths.root().display().to_string(),
            cause: err.to_string(),
        })?;
    Ok((name, version))
}

pub struct StudyLocalService {
    context: Arc<LocalContext>,
    constraints: BindingConstraintLocalService,
}

impl StudyLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        let constraints = BindingConstraintLocalService::new(context.clone());
        Self { context, constraints }
    }
}

#[async_trait]
impl StudyService for StudyLocalService {
    async fn delete(&self, _children: bool) -> Result<()> {
        let root = self.context.paths.root();
        fs::remove_dir_all(root).map_err(|err| StudyError::StudyDeletion {
            id: root.display().to_string(),
            cause: err.to_string(),
        })?;
        info!(study = %root.display(), "deleted study directory");
        Ok(())
    }

    async fn delete_binding_constraint(&self, constraint_id: &str) -> Result<()> {
        self.constraints.delete(constraint_id)
    }

    async fn create_variant(&self, name: &str) -> Result<String> {
        Err(StudyError::StudyVariantCreation {
            id: name.to_string(),
            cause: "variants are only available through the web API".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::commons::STUDY_VERSION_8_8;

    #[test]
    fn scaffold_then_read_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StudyPaths::new(dir.path());
        scaffold_study(&paths, "Base Case", STUDY_VERSION_8_8).unwrap();

        assert!(paths.general_data().is_file());
        assert!(paths.areas_list().is_file());
        let (name, version) = read_study_descriptor(&paths).unwrap();
        assert_eq!(name, "Base Case");
        assert_eq!(version, STUDY_VERSION_8_8);
    }
}
