//! Binding constraint service over the web API `bindingconstraints` endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::model::binding_constraint::{
    BindingConstraintProperties, BindingConstraintPropertiesUpdate, ConstraintMatrixName,
    ConstraintTerm,
};
use crate::model::matrix::Matrix;
use crate::service::{BindingConstraintService, ConstraintData};
use crate::utils::error::{Result, StudyError};

use super::models::{ConstraintCreationDto, ConstraintDto};
use super::ApiContext;

pub struct BindingConstraintApiService {
    context: Arc<ApiContext>,
}

impl BindingConstraintApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    fn constraint_url(&self, constraint_id: &str) -> String {
        self.context
            .study_url(&format!("bindingconstraints/{constraint_id}"))
    }

    fn matrix_body_key(matrix: ConstraintMatrixName) -> &'static str {
        match matrix {
            ConstraintMatrixName::LessTerm => "lessTermMatrix",
            ConstraintMatrixName::EqualTerm => "equalTermMatrix",
            ConstraintMatrixName::GreaterTerm => "greaterTermMatrix",
        }
    }
}

#[async_trait]
impl BindingConstraintService for BindingConstraintApiService {
    async fn create_binding_constraint(
        &self,
        name: &str,
        properties: Option<BindingConstraintProperties>,
        terms: &[ConstraintTerm],
    ) -> Result<ConstraintData> {
        let error = |cause: String| StudyError::BindingConstraintCreation {
            name: name.to_string(),
            cause,
        };
        let properties = properties.unwrap_or_default();
        let created: ConstraintDto = self
            .context
            .post_for_json(
                &self.context.study_url("bindingconstraints"),
                &ConstraintCreationDto {
                    name,
                    properties: &properties,
                },
            )
            .await
            .map_err(|err| error(err.to_string()))?;
        let terms = if terms.is_empty() {
            Vec::new()
        } else {
            self.add_constraint_terms(&created.id, terms)
                .await
                .map_err(|err| error(err.to_string()))?
        };
        info!(constraint = name, "created binding constraint");
        Ok(ConstraintData {
            name: created.name,
            properties: created.properties,
            terms,
        })
    }

    async fn update_binding_constraint_properties(
        &self,
        constraint_id: &str,
        update: &BindingConstraintPropertiesUpdate,
    ) -> Result<BindingConstraintProperties> {
        let updated: ConstraintDto = self
            .context
            .put_for_json(&self.constraint_url(constraint_id), update)
            .await
            .map_err(|err| StudyError::ConstraintPropertiesUpdate {
                name: constraint_id.to_string(),
                cause: err.to_string(),
            })?;
        debug!(constraint_id, "updated binding constraint properties");
        Ok(updated.properties)
    }

    async fn add_constraint_terms(
        &self,
        constraint_id: &str,
        terms: &[ConstraintTerm],
    ) -> Result<Vec<ConstraintTerm>> {
        self.context
            .wrapper
            .post_json(
                &format!("{}/terms", self.constraint_url(constraint_id)),
                &terms,
            )
            .await
            .map_err(|err| StudyError::ConstraintTermAddition {
                name: constraint_id.to_string(),
                term_ids: terms.iter().map(ConstraintTerm::id).collect(),
                cause: err.to_string(),
            })?;
        debug!(constraint_id, "added binding constraint terms");
        Ok(terms.to_vec())
    }

    async fn delete_constraint_term(&self, constraint_id: &str, term_id: &str) -> Result<()> {
        self.context
            .wrapper
            .delete(&format!("{}/term/{term_id}", self.constraint_url(constraint_id)))
            .await
            .map_err(|err| StudyError::ConstraintTermDeletion {
                constraint_id: constraint_id.to_string(),
                term_id: term_id.to_string(),
                cause: err.to_string(),
            })?;
        debug!(constraint_id, term_id, "deleted binding constraint term");
        Ok(())
    }

    async fn get_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
    ) -> Result<Matrix> {
        let path = format!("input/bindingconstraints/{constraint_id}_{}", matrix.as_str());
        self.context
            .download_matrix(&path)
            .await
            .map_err(|err| StudyError::ConstraintMatrixDownload {
                name: constraint_id.to_string(),
                matrix: matrix.as_str().to_string(),
                cause: err.to_string(),
            })
    }

    async fn update_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        let body = json!({ Self::matrix_body_key(matrix): series });
        self.context
            .wrapper
            .put_json(&self.constraint_url(constraint_id), &body)
            .await
            .map_err(|err| StudyError::ConstraintMatrixUpdate {
                name: constraint_id.to_string(),
                matrix: matrix.as_str().to_string(),
                cause: err.to_string(),
            })?;
        debug!(constraint_id, matrix = matrix.as_str(), "updated binding constraint matrix");
        Ok(())
    }

    async fn read_binding_constraints(&self) -> Result<Vec<ConstraintData>> {
        let constraints: Vec<ConstraintDto> = self
            .context
            .get_json(&self.context.study_url("bindingconstraints"))
            .await
            .map_err(|err| StudyError::ConstraintsRetrieval {
                cause: err.to_string(),
            })?;
        Ok(constraints
            .into_iter()
            .map(|constraint| ConstraintData {
                name: constraint.name,
                properties: constraint.properties,
                terms: constraint.terms,
            })
            .collect())
    }
}
