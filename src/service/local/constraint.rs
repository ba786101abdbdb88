//! Binding constraint service over
//! `input/bindingconstraints/bindingconstraints.ini`, where constraints live
//! in numbered sections.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::binding_constraint::{
    BindingConstraintProperties, BindingConstraintPropertiesUpdate, ConstraintMatrixName,
    ConstraintTerm,
};
use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::service::{BindingConstraintService, ConstraintData};
use crate::utils::error::{Result, StudyError};

use super::ini::{ini_error, read_ini, write_ini, IniMap};
use super::matrix::{read_matrix, write_matrix};
use super::models;
use super::LocalContext;

pub struct BindingConstraintLocalService {
    context: Arc<LocalContext>,
}

impl BindingConstraintLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self { context }
    }

    fn read_all(&self) -> Result<Vec<ConstraintData>> {
        let path = self.context.paths.binding_constraints_ini();
        let ini = read_ini(&path)?;
        ini.sections()
            .map(|(_, section)| {
                models::constraint_from_section(section).map_err(|cause| ini_error(&path, cause))
            })
            .collect()
    }

    fn write_all(&self, constraints: &[ConstraintData]) -> Result<()> {
        let mut ini = IniMap::new();
        for (index, constraint) in constraints.iter().enumerate() {
            let constraint_id = transform_name_to_id(&constraint.name);
            *ini.ensure_section(index.to_string()) =
                models::constraint_to_section(constraint, &constraint_id);
        }
        write_ini(&self.context.paths.binding_constraints_ini(), &ini)
    }

    fn position_of(constraints: &[ConstraintData], constraint_id: &str) -> Option<usize> {
        constraints
            .iter()
            .position(|constraint| transform_name_to_id(&constraint.name) == constraint_id)
    }

    pub(super) fn delete(&self, constraint_id: &str) -> Result<()> {
        let mut constraints = self.read_all()?;
        let position = Self::position_of(&constraints, constraint_id).ok_or_else(|| {
            StudyError::BindingConstraintDeletion {
                name: constraint_id.to_string(),
                cause: "constraint does not exist".to_string(),
            }
        })?;
        constraints.remove(position);
        self.write_all(&constraints)?;
        for suffix in ["lt", "gt", "eq"] {
            let file = self.context.paths.binding_constraint_matrix(constraint_id, suffix);
            if file.exists() {
                std::fs::remove_file(&file)?;
            }
        }
        info!(constraint_id, "deleted binding constraint");
        Ok(())
    }
}

#[async_trait]
impl BindingConstraintService for BindingConstraintLocalService {
    async fn create_binding_constraint(
        &self,
        name: &str,
        properties: Option<BindingConstraintProperties>,
        terms: &[ConstraintTerm],
    ) -> Result<ConstraintData> {
        let constraint_id = transform_name_to_id(name);
        let mut constraints = self.read_all()?;
        if Self::position_of(&constraints, &constraint_id).is_some() {
            return Err(StudyError::BindingConstraintCreation {
                name: name.to_string(),
                cause: "constraint already exists".to_string(),
            });
        }
        let data = ConstraintData {
            name: name.to_string(),
            properties: properties.unwrap_or_default(),
            terms: terms.to_vec(),
        };
        constraints.push(data.clone());
        self.write_all(&constraints)?;
        info!(constraint = name, "created binding constraint");
        Ok(data)
    }

    async fn update_binding_constraint_properties(
        &self,
        constraint_id: &str,
        update: &BindingConstraintPropertiesUpdate,
    ) -> Result<BindingConstraintProperties> {
        let mut constraints = self.read_all()?;
        let position = Self::position_of(&constraints, constraint_id).ok_or_else(|| {
            StudyError::ConstraintPropertiesUpdate {
                name: constraint_id.to_string(),
                cause: "constraint does not exist".to_string(),
            }
        })?;
        let updated = constraints[position].properties.from_update(update);
        constraints[position].properties = updated.clone();
        self.write_all(&constraints)?;
        debug!(constraint_id, "updated binding constraint properties");
        Ok(updated)
    }

    async fn add_constraint_terms(
        &self,
        constraint_id: &str,
        terms: &[ConstraintTerm],
    ) -> Result<Vec<ConstraintTerm>> {
        let error = |cause: String| StudyError::ConstraintTermAddition {
            name: constraint_id.to_string(),
            term_ids: terms.iter().map(ConstraintTerm::id).collect(),
            cause,
        };
        let mut constraints = self.read_all()?;
        let position = Self::position_of(&constraints, constraint_id)
            .ok_or_else(|| error("constraint does not exist".to_string()))?;
        for term in terms {
            if constraints[position].terms.iter().any(|existing| existing.id() == term.id()) {
                return Err(error(format!("term {} already exists", term.id())));
            }
            constraints[position].terms.push(term.clone());
        }
        self.write_all(&constraints)?;
        debug!(constraint_id, added = terms.len(), "added constraint terms");
        Ok(terms.to_vec())
    }

    async fn delete_constraint_term(&self, constraint_id: &str, term_id: &str) -> Result<()> {
        let error = |cause: String| StudyError::ConstraintTermDeletion {
            constraint_id: constraint_id.to_string(),
            term_id: term_id.to_string(),
            cause,
        };
        let mut constraints = self.read_all()?;
        let position = Self::position_of(&constraints, constraint_id)
            .ok_or_else(|| error("constraint does not exist".to_string()))?;
        let before = constraints[position].terms.len();
        constraints[position].terms.retain(|term| term.id() != term_id);
        if constraints[position].terms.len() == before {
            return Err(error("term does not exist".to_string()));
        }
        self.write_all(&constraints)?;
        debug!(constraint_id, term_id, "deleted constraint term");
        Ok(())
    }

    async fn get_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
    ) -> Result<Matrix> {
        read_matrix(
            &self
                .context
                .paths
                .binding_constraint_matrix(constraint_id, matrix.as_str()),
        )
    }

    async fn update_constraint_matrix(
        &self,
        constraint_id: &str,
        matrix: ConstraintMatrixName,
        series: &Matrix,
    ) -> Result<()> {
        write_matrix(
            &self
                .context
                .paths
                .binding_constraint_matrix(constraint_id, matrix.as_str()),
            series,
        )
    }

    async fn read_binding_constraints(&self) -> Result<Vec<ConstraintData>> {
        self.read_all()
    }
}
