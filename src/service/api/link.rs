//! Link service over the web API `links` endpoints, capacities through `raw`.

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

use super::models::LinkDto;
use super::ApiContext;

pub struct LinkApiService {
    context: Arc<ApiContext>,
}

impl LinkApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn link_id(area_from_id: &str, area_to_id: &str) -> String {
        format!("{area_from_id} / {area_to_id}")
    }

    fn link_url(&self, area_from_id: &str, area_to_id: &str) -> String {
        self.context
            .study_url(&format!("links/{area_from_id}/{area_to_id}"))
    }

    fn matrix_path(area_from_id: &str, area_to_id: &str, matrix: LinkMatrixName) -> String {
        match matrix {
            LinkMatrixName::Parameters => {
                format!("input/links/{area_from_id}/{area_to_id}_parameters")
            }
            LinkMatrixName::CapacityDirect => {
                format!("input/links/{area_from_id}/capacities/{area_to_id}_direct")
            }
            LinkMatrixName::CapacityIndirect => {
                format!("input/links/{area_from_id}/capacities/{area_to_id}_indirect")
            }
        }
    }
}

#[async_trait]
impl LinkService for LinkApiService {
    async fn create_link(
        &self,
        area_from: &str,
        area_to: &str,
        properties: Option<LinkProperties>,
        ui: Option<LinkUi>,
    ) -> Result<(LinkProperties, LinkUi)> {
        // Links are keyed by their alphabetically first end.
        let mut from_id = transform_name_to_id(area_from);
        let mut to_id = transform_name_to_id(area_to);
        if from_id > to_id {
            std::mem::swap(&mut from_id, &mut to_id);
        }
        let body = LinkDto {
            area1: from_id.clone(),
            area2: to_id.clone(),
            properties: properties.unwrap_or_default(),
            ui: ui.unwrap_or_default(),
        };
        let created: LinkDto = self
            .context
            .post_for_json(&self.context.study_url("links"), &body)
            .await
            .map_err(|err| StudyError::LinkCreation {
                area_from: area_from.to_string(),
                area_to: area_to.to_string(),
                cause: err.to_string(),
            })?;
        info!(link = %Self::link_id(&from_id, &to_id), "created link");
        Ok((created.properties, created.ui))
    }

    async fn update_link_properties(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkPropertiesUpdate,
    ) -> Result<LinkProperties> {
        let updated: LinkDto = self
            .context
            .put_for_json(&self.link_url(area_from_id, area_to_id), update)
            .await
            .map_err(|err| StudyError::LinkPropertiesUpdate {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: err.to_string(),
            })?;
        debug!(link = %Self::link_id(area_from_id, area_to_id), "updated link properties");
        Ok(updated.properties)
    }

    async fn update_link_ui(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        update: &LinkUiUpdate,
    ) -> Result<LinkUi> {
        let updated: LinkDto = self
            .context
            .put_for_json(&self.link_url(area_from_id, area_to_id), update)
            .await
            .map_err(|err| StudyError::LinkUiUpdate {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: err.to_string(),
            })?;
        debug!(link = %Self::link_id(area_from_id, area_to_id), "updated link ui");
        Ok(updated.ui)
    }

    async fn delete_link(&self, area_from_id: &str, area_to_id: &str) -> Result<()> {
        self.context
            .wrapper
            .delete(&self.link_url(area_from_id, area_to_id))
            .await
            .map_err(|err| StudyError::LinkDeletion {
                link_id: Self::link_id(area_from_id, area_to_id),
                cause: err.to_string(),
            })?;
        info!(link = %Self::link_id(area_from_id, area_to_id), "deleted link");
        Ok(())
    }

    async fn get_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
    ) -> Result<Matrix> {
        self.context
            .download_matrix(&Self::matrix_path(area_from_id, area_to_id, matrix))
            .await
    }

    async fn set_link_matrix(
        &self,
        area_from_id: &str,
        area_to_id: &str,
        matrix: LinkMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        self.context
            .upload_matrix(&Self::matrix_path(area_from_id, area_to_id, matrix), series)
            .await
    }

    async fn read_links(&self) -> Result<Vec<LinkData>> {
        let links: Vec<LinkDto> = self
            .context
            .get_json(&self.context.study_url("links"))
            .await
            .map_err(|err| StudyError::LinksRetrieval {
                cause: err.to_string(),
            })?;
        Ok(links
            .into_iter()
            .map(|link| LinkData {
                area_from: link.area1,
                area_to: link.area2,
                properties: link.properties,
                ui: link.ui,
            })
            .collect())
    }
}
