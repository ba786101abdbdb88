//! AntaresWeb backend: every service talks to the REST API under
//! `/api/v1/studies/{study_id}`, matrices travel through the `raw` endpoint.

mod area;
mod cluster;
mod constraint;
mod hydro;
mod link;
mod models;
mod run;
mod session;
mod settings;
mod study;
mod xpansion;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConf;
use crate::model::matrix::Matrix;
use crate::service::StudyServices;
use crate::utils::error::{Result, StudyError};

pub use session::{RequestWrapper, DEFAULT_TIME_OUT};

/// Shared by every web service: the configured HTTP client and the id of the
/// study all URLs are scoped to.
pub(crate) struct ApiContext {
    pub wrapper: RequestWrapper,
    pub study_id: String,
}

impl ApiContext {
    /// URL under `/api/v1/studies/{study_id}/`.
    pub fn study_url(&self, path: &str) -> String {
        format!("{}/studies/{}/{}", self.wrapper.base_url(), self.study_id, path)
    }

    /// URL directly under `/api/v1/`, for launcher and task endpoints.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.wrapper.base_url(), path)
    }

    /// Uploads a matrix to a study-relative raw path, as plain JSON rows.
    pub async fn upload_matrix(&self, path: &str, series: &Matrix) -> Result<()> {
        let url = format!("{}?path={}", self.study_url("raw"), path);
        self.wrapper
            .post_json(&url, series)
            .await
            .map_err(|err| StudyError::MatrixUpload {
                path: path.to_string(),
                cause: err.to_string(),
            })?;
        Ok(())
    }

    /// Downloads a matrix from a study-relative raw path. The endpoint wraps
    /// the rows in a `data`/`index`/`columns` object.
    pub async fn download_matrix(&self, path: &str) -> Result<Matrix> {
        let url = format!("{}?path={}", self.study_url("raw"), path);
        let dto: models::MatrixDto =
            self.wrapper
                .get_json(&url)
                .await
                .map_err(|err| StudyError::MatrixDownload {
                    path: path.to_string(),
                    cause: err.to_string(),
                })?;
        Ok(dto.data)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.wrapper.get_json(url).await
    }

    pub async fn put_for_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        Ok(self.wrapper.put_json(url, body).await?.json().await?)
    }

    pub async fn post_for_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        Ok(self.wrapper.post_json(url, body).await?.json().await?)
    }
}

/// Builds the full service bundle for one study on an AntaresWeb server.
pub fn create_api_services(config: &ApiConf, study_id: &str) -> Result<StudyServices> {
    let context = Arc::new(ApiContext {
        wrapper: RequestWrapper::new(config)?,
        study_id: study_id.to_string(),
    });
    Ok(StudyServices {
        area: Arc::new(area::AreaApiService::new(context.clone())),
        link: Arc::new(link::LinkApiService::new(context.clone())),
        thermal: Arc::new(cluster::ThermalApiService::new(context.clone())),
        renewable: Arc::new(cluster::RenewableApiService::new(context.clone())),
        st_storage: Arc::new(cluster::STStorageApiService::new(context.clone())),
        hydro: Arc::new(hydro::HydroApiService::new(context.clone())),
        binding_constraint: Arc::new(constraint::BindingConstraintApiService::new(
            context.clone(),
        )),
        settings: Arc::new(settings::SettingsApiService::new(context.clone())),
        study: Arc::new(study::StudyApiService::new(context.clone())),
        run: Arc::new(run::RunApiService::new(context.clone())),
        xpansion: Arc::new(xpansion::XpansionApiService::new(context)),
    })
}
