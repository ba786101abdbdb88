//! Study level operations: deletion, variants and binding constraint removal.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::service::StudyService;
use crate::utils::error::{Result, StudyError};

use super::ApiContext;

pub struct StudyApiService {
    context: Arc<ApiContext>,
}

impl StudyApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl StudyService for StudyApiService {
    async fn delete(&self, children: bool) -> Result<()> {
        let url = format!(
            "{}?children={children}",
            self.context.api_url(&format!("studies/{}", self.context.study_id))
        );
        self.context
            .wrapper
            .delete(&url)
            .await
            .map_err(|err| StudyError::StudyDeletion {
                id: self.context.study_id.clone(),
                cause: err.to_string(),
            })?;
        info!(study_id = %self.context.study_id, "deleted study");
        Ok(())
    }

    async fn delete_binding_constraint(&self, constraint_id: &str) -> Result<()> {
        self.context
            .wrapper
            .delete(&self.context.study_url(&format!("bindingconstraints/{constraint_id}")))
            .await
            .map_err(|err| StudyError::BindingConstraintDeletion {
                name: constraint_id.to_string(),
                cause: err.to_string(),
            })?;
        info!(constraint_id, "deleted binding constraint");
        Ok(())
    }

    async fn create_variant(&self, name: &str) -> Result<String> {
        let url = format!(
            "{}?name={name}",
            self.context
                .api_url(&format!("studies/{}/variants", self.context.study_id))
        );
        let error = |cause: String| StudyError::StudyVariantCreation {
            id: self.context.study_id.clone(),
            cause,
        };
        let variant_id: String = self
            .context
            .wrapper
            .post(&url)
            .await
            .map_err(|err| error(err.to_string()))?
            .json()
            .await
            .map_err(|err| error(err.to_string()))?;
        info!(variant = name, %variant_id, "created study variant");
        Ok(variant_id)
    }
}
