use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::commons::transform_name_to_id;
use crate::model::matrix::Matrix;
use crate::service::BindingConstraintService;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BindingConstraintFrequency {
    #[default]
    Hourly,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BindingConstraintOperator {
    #[default]
    Less,
    Greater,
    Both,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMatrixName {
    LessTerm,
    EqualTerm,
    GreaterTerm,
}

impl ConstraintMatrixName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessTerm => "lt",
            Self::EqualTerm => "eq",
            Self::GreaterTerm => "gt",
        }
    }
}

/// What a constraint term applies to: a link flow or a cluster output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintTermData {
    Link { area1: String, area2: String },
    Cluster { area: String, cluster: String },
}

impl ConstraintTermData {
    pub fn link(area1: impl Into<String>, area2: impl Into<String>) -> Self {
        Self::Link {
            area1: area1.into(),
            area2: area2.into(),
        }
    }

    pub fn cluster(area: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self::Cluster {
            area: area.into(),
            cluster: cluster.into(),
        }
    }

    /// Term id as stored in AntaresWeb: `area1%area2` with sorted lowercase
    /// areas for links, `area.cluster` lowercase for clusters.
    pub fn term_id(&self) -> String {
        match self {
            Self::Link { area1, area2 } => {
                let mut ends = [area1.to_lowercase(), area2.to_lowercase()];
                ends.sort();
                ends.join("%")
            }
            Self::Cluster { area, cluster } => {
                format!("{}.{}", area.to_lowercase(), cluster.to_lowercase())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintTerm {
    pub data: ConstraintTermData,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ConstraintTerm {
    pub fn new(data: ConstraintTermData, weight: Option<f64>, offset: Option<i64>) -> Self {
        Self { data, weight, offset }
    }

    pub fn id(&self) -> String {
        self.data.term_id()
    }

    /// INI value: `weight%offset` with the weight fixed to 6 decimals when an
    /// offset is present, else the bare weight.
    pub fn weight_offset(&self) -> String {
        let weight = self.weight.unwrap_or(0.0);
        match self.offset {
            Some(offset) => format!("{weight:.6}%{offset}"),
            None => format!("{weight}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingConstraintProperties {
    pub enabled: bool,
    pub time_step: BindingConstraintFrequency,
    pub operator: BindingConstraintOperator,
    pub comments: String,
    pub filter_year_by_year: String,
    pub filter_synthesis: String,
    pub group: String,
}

impl Default for BindingConstraintProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            time_step: BindingConstraintFrequency::default(),
            operator: BindingConstraintOperator::default(),
            comments: String::new(),
            filter_year_by_year: "hourly".to_string(),
            filter_synthesis: "hourly".to_string(),
            group: "default".to_string(),
        }
    }
}

impl BindingConstraintProperties {
    pub fn from_update(&self, update: &BindingConstraintPropertiesUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            time_step: update.time_step.unwrap_or(self.time_step),
            operator: update.operator.unwrap_or(self.operator),
            comments: update.comments.clone().unwrap_or_else(|| self.comments.clone()),
            filter_year_by_year: update
                .filter_year_by_year
                .clone()
                .unwrap_or_else(|| self.filter_year_by_year.clone()),
            filter_synthesis: update
                .filter_synthesis
                .clone()
                .unwrap_or_else(|| self.filter_synthesis.clone()),
            group: update.group.clone().unwrap_or_else(|| self.group.clone()),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingConstraintPropertiesUpdate {
    pub enabled: Option<bool>,
    pub time_step: Option<BindingConstraintFrequency>,
    pub operator: Option<BindingConstraintOperator>,
    pub comments: Option<String>,
    pub filter_year_by_year: Option<String>,
    pub filter_synthesis: Option<String>,
    pub group: Option<String>,
}

/// A linear constraint over link flows and cluster outputs, with its terms
/// keyed by term id.
#[derive(Clone)]
pub struct BindingConstraint {
    service: Arc<dyn BindingConstraintService>,
    name: String,
    id: String,
    properties: BindingConstraintProperties,
    terms: BTreeMap<String, ConstraintTerm>,
}

impl BindingConstraint {
    pub fn new(
        service: Arc<dyn BindingConstraintService>,
        name: impl Into<String>,
        properties: BindingConstraintProperties,
        terms: Vec<ConstraintTerm>,
    ) -> Self {
        let name = name.into();
        let id = transform_name_to_id(&name);
        let terms = terms.into_iter().map(|t| (t.id(), t)).collect();
        Self {
            service,
            name,
            id,
            properties,
            terms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &BindingConstraintProperties {
        &self.properties
    }

    pub fn terms(&self) -> &BTreeMap<String, ConstraintTerm> {
        &self.terms
    }

    pub async fn update_properties(
        &mut self,
        update: BindingConstraintPropertiesUpdate,
    ) -> Result<&BindingConstraintProperties> {
        self.properties = self
            .service
            .update_binding_constraint_properties(&self.id, &update)
            .await?;
        Ok(&self.properties)
    }

    pub async fn add_terms(&mut self, terms: Vec<ConstraintTerm>) -> Result<()> {
        let added = self.service.add_constraint_terms(&self.id, &terms).await?;
        for term in added {
            self.terms.insert(term.id(), term);
        }
        Ok(())
    }

    pub async fn delete_term(&mut self, term_id: &str) -> Result<()> {
        self.service.delete_constraint_term(&self.id, term_id).await?;
        self.terms.remove(term_id);
        Ok(())
    }

    pub async fn get_matrix(&self, matrix: ConstraintMatrixName) -> Result<Matrix> {
        self.service.get_constraint_matrix(&self.id, matrix).await
    }

    pub async fn set_matrix(&self, matrix: ConstraintMatrixName, series: &Matrix) -> Result<()> {
        self.service.update_constraint_matrix(&self.id, matrix, series).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_term_id_sorts_areas() {
        let data = ConstraintTermData::link("FR", "BE");
        assert_eq!(data.term_id(), "be%fr");
    }

    #[test]
    fn cluster_term_id_joins_with_dot() {
        let data = ConstraintTermData::cluster("FR", "Nuclear FR");
        assert_eq!(data.term_id(), "fr.nuclear fr");
    }

    #[test]
    fn weight_offset_formats() {
        let term = ConstraintTerm::new(ConstraintTermData::link("a", "b"), Some(2.5), Some(3));
        assert_eq!(term.weight_offset(), "2.500000%3");

        let term = ConstraintTerm::new(ConstraintTermData::link("a", "b"), Some(2.5), None);
        assert_eq!(term.weight_offset(), "2.5");

        let term = ConstraintTerm::new(ConstraintTermData::link("a", "b"), None, Some(1));
        assert_eq!(term.weight_offset(), "0.000000%1");
    }
}
