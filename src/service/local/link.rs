//! Link service over `input/links/{from}/properties.ini`. Each origin area
//! owns one file with a section per destination.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::commons::transform_name_to_id;
use crate::model::link::{
    LinkMatrixName, LinkProperties, LinkPropertiesUpdate, LinkUi, LinkUiUpdate,
};
use crate::model::matrix::Matrix;
use crate::service::{LinkData, LinkService};
use crate::utils::error::{Result, StudyError};

use super::ini::{ini_error, read_ini, write_ini};
use super::matrix::{read_matrix, write_matrix};
use super::models;
use super::LocalContext;

pub struct LinkLocalService {
    context: Arc<LocalContext>,
}

impl LinkLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }

    fn link_id(area_from_id: &str, area_to_id: &str) -> String {
        format!("{area_from_id} / {area_to_id}")
    }

    fn read_link(&self, area_from_id: &str, area_to_id: &str) -> Result<Option<(LinkProperties, LinkUi)>> {
        let path = self.context.paths.link_properties(area_from_id);
        let ini = read_ini(&path)?;
        ini.section(area_to_id)
            .map(models::link_from_section)
            .transpose()
            .map_err(|cause| ini_error(&path, cause))
    }

    fn write_link(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        properties: &LinkProperties,
        ui: &LinkUi,
    ) -> Result<()> {
        let path = self.context.paths.link_properties(area_from_id);
        let mut ini = read_ini(&path)?;
        *ini.ensure_section(area_to_id) = models::link_to_section(properties, ui);
        write_ini(&path, &ini)
    }
}

#[async_trait]
impl LinkService for LinkLocalService {
    async fn create_link(
        &self,
        area_from: &str,
        area_to: &str,
        properties: Option<LinkProperties>,
        ui: Option<LinkUi>,
    ) -> Result<(LinkProperties, LinkUi)> {
        // Links are stored under their alphabetically first end.
        let mut from_id = transform_name_to_id(area_from);
        let mut to_id = transform_name_to_id(area_to);
        if from_id > to_id {
            std::mem::swap(&mut from_id, &mut to_id);
        }
        if self.read_link(&from_id, &to_id)?.is_some() {
            return Err(StudyError::LinkCreation {
                area_from: area_from.to_string(),
                area_to: area_to.to_string(),
                cause: "link already exists".to_string(),
            });
        }
        let properties = properties.unwrap_or_default();
        let ui = ui.unwrap_or_default();
        self.write_link(&from_id, &to_id, &properties, &ui)?;
        info!(link = %Self::link_id(&from_id, &to_id), "created link");
        Ok((properties, ui))
    }

    async fn update_link_properties(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkPropertiesUpdate,
    ) -> Result<LinkProperties> {
        let (properties, ui) = self.read_link(area_from_id, area_to_id)?.ok_or_else(|| {
            StudyError::LinkPropertiesUpdate {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: "link does not exist".to_string(),
            }
        })?;
        let updated = properties.from_update(update);
        self.write_link(area_from_id, area_to_id, &updated, &ui)?;
        debug!(link = %Self::link_id(area_from_id, area_to_id), "updated link properties");
        Ok(updated)
    }

    async fn update_link_ui(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkUiUpdate,
    ) -> Result<LinkUi> {
        let (properties, ui) = self.read_link(area_from_id, area_to_id)?.ok_or_else(|| {
            StudyError::LinkUiUpdate {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: "link does not exist".to_string(),
            }
        })?;
        let updated = ui.from_update(update);
        self.write_link(area_from_id, area_to_id, &properties, &updated)?;
        debug!(link = %Self::link_id(area_from_id, area_to_id), "updated link ui");
        Ok(updated)
    }

    async fn delete_link(&self, area_from_id: &str, area_to_id: &str) -> Result<()> {
        let path = self.context.paths.link_properties(area_from_id);
        let mut ini = read_ini(&path)?;
        if ini.remove_section(area_to_id).is_none() {
            return Err(StudyError::LinkDeletion {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: "link does not exist".to_string(),
            });
        }
        write_ini(&path, &ini)?;
        for matrix in [
            LinkMatrixName::Parameters,
            LinkMatrixName::CapacityDirect,
            LinkMatrixName::CapacityIndirect,
        ] {
            let file = self.context.paths.link_matrix(area_from_id, area_to_id, matrix);
            if file.exists() {
                fs::remove_file(&file)?;
            }
        }
        info!(link = %Self::link_id(area_from_id, area_to_id), "deleted link");
        Ok(())
    }

    async fn get_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
    ) -> Result<Matrix> {
        read_matrix(&self.context.paths.link_matrix(area_from_id, area_to_id, matrix))
    }

    async fn set_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(
            &self.context.paths.link_matrix(area_from_id, area_to_id, matrix),
            series,
        )
    }

    async fn read_links(&self) -> Result<Vec<LinkData>> {
        let links_root = self.context.paths.root().join("input").join("links");
        if !links_root.exists() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<_> = fs::read_dir(&links_root)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.path().is_dir())
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        let mut links = Vec::new();
        for entry in entries {
            let area_from = entry.file_name().to_string_lossy().to_string();
            let path = entry.path().join("properties.ini");
            if !path.is_file() {
                continue;
            }
            let ini = read_ini(&path)?;
            for (area_to, section) in ini.sections() {
                let (properties, ui) =
                    models::link_from_section(section).map_err(|cause| ini_error(&path, cause))?;
                links.push(LinkData {
                    area_from: area_from.clone(),
                    area_to: area_to.to_string(),
                    properties,
                    ui,
                });
            }
        }
        Ok(links)
    }
}
