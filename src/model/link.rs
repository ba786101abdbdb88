use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::commons::{default_filtering, transform_name_to_id, FilterSet};
use crate::model::matrix::Matrix;
use crate::service::LinkService;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum TransmissionCapacities {
    #[default]
    #[serde(rename = "enabled")]
    #[strum(serialize = "enabled")]
    Enabled,
    #[serde(rename = "ignore")]
    #[strum(serialize = "ignore")]
    Disabled,
    #[serde(rename = "infinite")]
    #[strum(serialize = "infinite")]
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum AssetType {
    #[default]
    #[serde(rename = "ac")]
    #[strum(serialize = "ac")]
    Ac,
    #[serde(rename = "dc")]
    #[strum(serialize = "dc")]
    Dc,
    #[serde(rename = "gaz")]
    #[strum(serialize = "gaz")]
    Gaz,
    #[serde(rename = "virt")]
    #[strum(serialize = "virt")]
    Virtual,
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStyle {
    Dot,
    #[default]
    Plain,
    Dash,
    DotDash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkProperties {
    pub hurdles_cost: bool,
    pub loop_flow: bool,
    pub use_phase_shifter: bool,
    pub transmission_capacities: TransmissionCapacities,
    pub asset_type: AssetType,
    pub display_comments: bool,
    pub comments: String,
    pub filter_synthesis: FilterSet,
    pub filter_year_by_year: FilterSet,
}

impl Default for LinkProperties {
    fn default() -> Self {
        Self {
            hurdles_cost: false,
            loop_flow: false,
            use_phase_shifter: false,
            transmission_capacities: TransmissionCapacities::default(),
            asset_type: AssetType::default(),
            display_comments: true,
            comments: String::new(),
            filter_synthesis: default_filtering(),
            filter_year_by_year: default_filtering(),
        }
    }
}

impl LinkProperties {
    pub fn from_update(&self, update: &LinkPropertiesUpdate) -> Self {
        Self {
            hurdles_cost: update.hurdles_cost.unwrap_or(self.hurdles_cost),
            loop_flow: update.loop_flow.unwrap_or(self.loop_flow),
            use_phase_shifter: update.use_phase_shifter.unwrap_or(self.use_phase_shifter),
            transmission_capacities: update
                .transmission_capacities
                .unwrap_or(self.transmission_capacities),
            asset_type: update.asset_type.unwrap_or(self.asset_type),
            display_comments: update.display_comments.unwrap_or(self.display_comments),
            comments: update.comments.clone().unwrap_or_else(|| self.comments.clone()),
            filter_synthesis: update
                .filter_synthesis
                .clone()
                .unwrap_or_else(|| self.filter_synthesis.clone()),
            filter_year_by_year: update
                .filter_year_by_year
                .clone()
                .unwrap_or_else(|| self.filter_year_by_year.clone()),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkPropertiesUpdate {
    pub hurdles_cost: Option<bool>,
    pub loop_flow: Option<bool>,
    pub use_phase_shifter: Option<bool>,
    pub transmission_capacities: Option<TransmissionCapacities>,
    pub asset_type: Option<AssetType>,
    pub display_comments: Option<bool>,
    pub comments: Option<String>,
    pub filter_synthesis: Option<FilterSet>,
    pub filter_year_by_year: Option<FilterSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkUi {
    pub link_style: LinkStyle,
    pub link_width: f64,
    pub colorr: u8,
    pub colorg: u8,
    pub colorb: u8,
}

impl Default for LinkUi {
    fn default() -> Self {
        Self {
            link_style: LinkStyle::Plain,
            link_width: 1.0,
            colorr: 112,
            colorg: 112,
            colorb: 112,
        }
    }
}

impl LinkUi {
    pub fn from_update(&self, update: &LinkUiUpdate) -> Self {
        Self {
            link_style: update.link_style.unwrap_or(self.link_style),
            link_width: update.link_width.unwrap_or(self.link_width),
            colorr: update.colorr.unwrap_or(self.colorr),
            colorg: update.colorg.unwrap_or(self.colorg),
            colorb: update.colorb.unwrap_or(self.colorb),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkUiUpdate {
    pub link_style: Option<LinkStyle>,
    pub link_width: Option<f64>,
    pub colorr: Option<u8>,
    pub colorg: Option<u8>,
    pub colorb: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMatrixName {
    Parameters,
    CapacityDirect,
    CapacityIndirect,
}

/// An interconnection between two areas. The two area names are kept sorted so
/// `fr / de` and `de / fr` designate the same link.
#[derive(Clone)]
pub struct Link {
    service: Arc<dyn LinkService>,
    area_from: String,
    area_to: String,
    properties: LinkProperties,
    ui: LinkUi,
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("area_from", &self.area_from)
            .field("area_to", &self.area_to)
            .field("properties", &self.properties)
            .field("ui", &self.ui)
            .finish()
    }
}

impl Link {
    pub fn new(
        service: Arc<dyn LinkService>,
        area_from: impl Into<String>,
        area_to: impl Into<String>,
        properties: LinkProperties,
        ui: LinkUi,
    ) -> Self {
        let mut ends = [area_from.into(), area_to.into()];
        ends.sort();
        let [area_from, area_to] = ends;
        Self {
            service,
            area_from,
            area_to,
            properties,
            ui,
        }
    }

    pub fn area_from(&self) -> &str {
        &self.area_from
    }

    pub fn area_to(&self) -> &str {
        &self.area_to
    }

    pub fn area_from_id(&self) -> String {
        transform_name_to_id(&self.area_from)
    }

    pub fn area_to_id(&self) -> String {
        transform_name_to_id(&self.area_to)
    }

    pub fn id(&self) -> String {
        format!("{} / {}", self.area_from_id(), self.area_to_id())
    }

    pub fn properties(&self) -> &LinkProperties {
        &self.properties
    }

    pub fn ui(&self) -> &LinkUi {
        &self.ui
    }

    pub async fn update_properties(&mut self, update: LinkPropertiesUpdate) -> Result<&LinkProperties> {
        self.properties = self
            .service
            .update_link_properties(&self.area_from_id(), &self.area_to_id(), &update)
            .await?;
        Ok(&self.properties)
    }

    pub async fn update_ui(&mut self, update: LinkUiUpdate) -> Result<&LinkUi> {
        self.ui = self
            .service
            .update_link_ui(&self.area_from_id(), &self.area_to_id(), &update)
            .await?;
        Ok(&self.ui)
    }

    pub async fn get_matrix(&self, matrix: LinkMatrixName) -> Result<Matrix> {
        self.service
            .get_link_matrix(&self.area_from_id(), &self.area_to_id(), matrix)
            .await
    }

    pub async fn set_matrix(&self, matrix: LinkMatrixName, series: &Matrix) -> Result<()> {
        self.service
            .set_link_matrix(&self.area_from_id(), &self.area_to_id(), matrix, series)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::stub_services;

    #[test]
    fn link_ends_are_sorted() {
        let services = stub_services();
        let link = Link::new(
            services.link.clone(),
            "FR",
            "BE",
            LinkProperties::default(),
            LinkUi::default(),
        );
        assert_eq!(link.area_from(), "BE");
        assert_eq!(link.area_to(), "FR");
        assert_eq!(link.id(), "be / fr");
    }

    #[test]
    fn transmission_capacities_wire_values() {
        assert_eq!(TransmissionCapacities::Disabled.to_string(), "ignore");
        assert_eq!("infinite".parse::<TransmissionCapacities>().unwrap(), TransmissionCapacities::Infinite);
    }
}
