use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    #[default]
    Economy,
    Adequacy,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Month {
    #[default]
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WeekDay {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// How Monte-Carlo scenarios are built. Locally this is encoded as the
/// `derated`/`custom-scenario` boolean pair in `generaldata.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BuildingMode {
    #[default]
    Automatic,
    Custom,
    Derated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralParameters {
    pub mode: Mode,
    pub horizon: String,
    pub nb_years: u32,
    pub simulation_start: u32,
    pub simulation_end: u32,
    pub january_first: WeekDay,
    pub first_month_in_year: Month,
    pub first_week_day: WeekDay,
    pub leap_year: bool,
    pub year_by_year: bool,
    pub simulation_synthesis: bool,
    pub building_mode: BuildingMode,
    pub user_playlist: bool,
    pub thematic_trimming: bool,
    pub geographic_trimming: bool,
    pub nb_timeseries_thermal: u32,
}

impl Default for GeneralParameters {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            horizon: String::new(),
            nb_years: 1,
            simulation_start: 1,
            simulation_end: 365,
            january_first: WeekDay::Monday,
            first_month_in_year: Month::January,
            first_week_day: WeekDay::Monday,
            leap_year: false,
            year_by_year: false,
            simulation_synthesis: true,
            building_mode: BuildingMode::default(),
            user_playlist: false,
            thematic_trimming: false,
            geographic_trimming: false,
            nb_timeseries_thermal: 1,
        }
    }
}

impl GeneralParameters {
    pub fn from_update(&self, update: &GeneralParametersUpdate) -> Self {
        Self {
            mode: update.mode.unwrap_or(self.mode),
            horizon: update.horizon.clone().unwrap_or_else(|| self.horizon.clone()),
            nb_years: update.nb_years.unwrap_or(self.nb_years),
            simulation_start: update.simulation_start.unwrap_or(self.simulation_start),
            simulation_end: update.simulation_end.unwrap_or(self.simulation_end),
            january_first: update.january_first.unwrap_or(self.january_first),
            first_month_in_year: update.first_month_in_year.unwrap_or(self.first_month_in_year),
            first_week_day: update.first_week_day.unwrap_or(self.first_week_day),
            leap_year: update.leap_year.unwrap_or(self.leap_year),
            year_by_year: update.year_by_year.unwrap_or(self.year_by_year),
            simulation_synthesis: update.simulation_synthesis.unwrap_or(self.simulation_synthesis),
            building_mode: update.building_mode.unwrap_or(self.building_mode),
            user_playlist: update.user_playlist.unwrap_or(self.user_playlist),
            thematic_trimming: update.thematic_trimming.unwrap_or(self.thematic_trimming),
            geographic_trimming: update.geographic_trimming.unwrap_or(self.geographic_trimming),
            nb_timeseries_thermal: update.nb_timeseries_thermal.unwrap_or(self.nb_timeseries_thermal),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralParametersUpdate {
    pub mode: Option<Mode>,
    pub horizon: Option<String>,
    pub nb_years: Option<u32>,
    pub simulation_start: Option<u32>,
    pub simulation_end: Option<u32>,
    pub january_first: Option<WeekDay>,
    pub first_month_in_year: Option<Month>,
    pub first_week_day: Option<WeekDay>,
    pub leap_year: Option<bool>,
    pub year_by_year: Option<bool>,
    pub simulation_synthesis: Option<bool>,
    pub building_mode: Option<BuildingMode>,
    pub user_playlist: Option<bool>,
    pub thematic_trimming: Option<bool>,
    pub geographic_trimming: Option<bool>,
    pub nb_timeseries_thermal: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_one_year_run() {
        let general = GeneralParameters::default();
        assert_eq!(general.nb_years, 1);
        assert_eq!(general.simulation_end, 365);
        assert_eq!(general.building_mode, BuildingMode::Automatic);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("Economy".parse::<Mode>().unwrap(), Mode::Economy);
        assert_eq!("MONDAY".parse::<WeekDay>().unwrap(), WeekDay::Monday);
        assert_eq!(Month::December.to_string(), "december");
    }
}
