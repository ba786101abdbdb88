use std::collections::BTreeMap;

use serde_json::Value;

use crate::utils::error::{Result, StudyError};

/// TS-number assignment per Monte-Carlo year for one object. `None` means the
/// year is left to the sampler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenarioMatrix {
    years: Vec<Option<u32>>,
}

impl ScenarioMatrix {
    pub fn with_years(nb_years: usize) -> Self {
        Self {
            years: vec![None; nb_years],
        }
    }

    pub fn get_year(&self, year: usize) -> Option<u32> {
        self.years.get(year).copied().flatten()
    }

    pub fn set_year(&mut self, year: usize, ts_number: Option<u32>) {
        if year < self.years.len() {
            self.years[year] = ts_number;
        }
    }

    pub fn years(&self) -> &[Option<u32>] {
        &self.years
    }
}

/// Per-kind year → TS-number assignments for a whole study.
///
/// Kinds mirror the `scenariobuilder.dat` prefixes: load `l`, thermal `t`,
/// hydro `h`, wind `w`, solar `s`, link `ntc`, renewable `r`, binding
/// constraint `bc`, hydro initial level `hl` and hydro generation power `hgp`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioBuilder {
    nb_years: usize,
    pub load: BTreeMap<String, ScenarioMatrix>,
    pub thermal: BTreeMap<String, BTreeMap<String, ScenarioMatrix>>,
    pub hydro: BTreeMap<String, ScenarioMatrix>,
    pub wind: BTreeMap<String, ScenarioMatrix>,
    pub solar: BTreeMap<String, ScenarioMatrix>,
    pub link: BTreeMap<String, ScenarioMatrix>,
    pub renewable: BTreeMap<String, BTreeMap<String, ScenarioMatrix>>,
    pub binding_constraint: BTreeMap<String, ScenarioMatrix>,
    /// Initial reservoir levels as user-facing percentages (0..100).
    pub hydro_initial_level: BTreeMap<String, Vec<Option<f64>>>,
    pub hydro_generation_power: BTreeMap<String, ScenarioMatrix>,
}

impl ScenarioBuilder {
    pub fn new(nb_years: usize) -> Self {
        Self {
            nb_years,
            ..Default::default()
        }
    }

    pub fn nb_years(&self) -> usize {
        self.nb_years
    }

    pub fn load_mut(&mut self, area_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.load
            .entry(area_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn hydro_mut(&mut self, area_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.hydro
            .entry(area_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn wind_mut(&mut self, area_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.wind
            .entry(area_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn solar_mut(&mut self, area_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.solar
            .entry(area_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    /// `link_id` uses the `"from / to"` model convention.
    pub fn link_mut(&mut self, link_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.link
            .entry(link_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn binding_constraint_mut(&mut self, group_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.binding_constraint
            .entry(group_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn hydro_generation_power_mut(&mut self, area_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.hydro_generation_power
            .entry(area_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn hydro_initial_level_mut(&mut self, area_id: &str) -> &mut Vec<Option<f64>> {
        let nb_years = self.nb_years;
        self.hydro_initial_level
            .entry(area_id.to_string())
            .or_insert_with(|| vec![None; nb_years])
    }

    pub fn thermal_mut(&mut self, area_id: &str, cluster_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.thermal
            .entry(area_id.to_string())
            .or_default()
            .entry(cluster_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    pub fn renewable_mut(&mut self, area_id: &str, cluster_id: &str) -> &mut ScenarioMatrix {
        let nb_years = self.nb_years;
        self.renewable
            .entry(area_id.to_string())
            .or_default()
            .entry(cluster_id.to_string())
            .or_insert_with(|| ScenarioMatrix::with_years(nb_years))
    }

    /// Flatten to `scenariobuilder.dat` entries: `kind,id,year` keys
    /// (`kind,area,year,cluster` for clusters, `ntc,from,to,year` for links),
    /// one entry per assigned year. Initial levels are written as fractions.
    pub fn to_entries(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();

        for (kind, data) in [
            ("l", &self.load),
            ("h", &self.hydro),
            ("w", &self.wind),
            ("s", &self.solar),
            ("bc", &self.binding_constraint),
            ("hgp", &self.hydro_generation_power),
        ] {
            for (id, matrix) in data {
                for (year, ts) in matrix.years().iter().enumerate() {
                    if let Some(ts) = ts {
                        entries.push((format!("{kind},{id},{year}"), Value::from(*ts)));
                    }
                }
            }
        }

        for (kind, data) in [("t", &self.thermal), ("r", &self.renewable)] {
            for (area_id, clusters) in data {
                for (cluster_id, matrix) in clusters {
                    for (year, ts) in matrix.years().iter().enumerate() {
                        if let Some(ts) = ts {
                            entries.push((format!("{kind},{area_id},{year},{cluster_id}"), Value::from(*ts)));
                        }
                    }
                }
            }
        }

        for (link_id, matrix) in &self.link {
            let Some((from, to)) = link_id.split_once(" / ") else {
                continue;
            };
            for (year, ts) in matrix.years().iter().enumerate() {
                if let Some(ts) = ts {
                    entries.push((format!("ntc,{from},{to},{year}"), Value::from(*ts)));
                }
            }
        }

        for (area_id, levels) in &self.hydro_initial_level {
            for (year, level) in levels.iter().enumerate() {
                if let Some(level) = level {
                    entries.push((format!("hl,{area_id},{year}"), Value::from(level / 100.0)));
                }
            }
        }

        entries
    }

    /// Rebuild from `scenariobuilder.dat` entries. Unknown kind prefixes are
    /// rejected; years beyond `nb_years` are ignored.
    pub fn from_entries<'a, I>(nb_years: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut builder = Self::new(nb_years);
        for (key, value) in entries {
            let parts: Vec<&str> = key.split(',').collect();
            let kind = parts[0];
            match kind {
                "l" | "h" | "w" | "s" | "bc" | "hgp" => {
                    let (id, year) = Self::two_part_key(key, &parts)?;
                    let ts = Self::ts_number(key, &value)?;
                    let matrix = match kind {
                        "l" => builder.load_mut(id),
                        "h" => builder.hydro_mut(id),
                        "w" => builder.wind_mut(id),
                        "s" => builder.solar_mut(id),
                        "bc" => builder.binding_constraint_mut(id),
                        _ => builder.hydro_generation_power_mut(id),
                    };
                    matrix.set_year(year, Some(ts));
                }
                "hl" => {
                    let (id, year) = Self::two_part_key(key, &parts)?;
                    let level = value.as_f64().ok_or_else(|| StudyError::ScenarioBuilderRead {
                        cause: format!("invalid value for key {key}"),
                    })?;
                    let levels = builder.hydro_initial_level_mut(id);
                    if year < levels.len() {
                        levels[year] = Some(level * 100.0);
                    }
                }
                "t" | "r" => {
                    if parts.len() != 4 {
                        return Err(StudyError::ScenarioBuilderRead {
                            cause: format!("malformed key {key}"),
                        });
                    }
                    let (area_id, cluster_id) = (parts[1], parts[3]);
                    let year = Self::parse_year(key, parts[2])?;
                    let ts = Self::ts_number(key, &value)?;
                    let matrix = if kind == "t" {
                        builder.thermal_mut(area_id, cluster_id)
                    } else {
                        builder.renewable_mut(area_id, cluster_id)
                    };
                    matrix.set_year(year, Some(ts));
                }
                "ntc" => {
                    if parts.len() != 4 {
                        return Err(StudyError::ScenarioBuilderRead {
                            cause: format!("malformed key {key}"),
                        });
                    }
                    let link_id = format!("{} / {}", parts[1], parts[2]);
                    let year = Self::parse_year(key, parts[3])?;
                    let ts = Self::ts_number(key, &value)?;
                    builder.link_mut(&link_id).set_year(year, Some(ts));
                }
                other => return Err(StudyError::UnsupportedScenarioType(other.to_string())),
            }
        }
        Ok(builder)
    }

    fn two_part_key<'k>(key: &str, parts: &[&'k str]) -> Result<(&'k str, usize)> {
        if parts.len() != 3 {
            return Err(StudyError::ScenarioBuilderRead {
                cause: format!("malformed key {key}"),
            });
        }
        Ok((parts[1], Self::parse_year(key, parts[2])?))
    }

    fn parse_year(key: &str, raw: &str) -> Result<usize> {
        raw.parse().map_err(|_| StudyError::ScenarioBuilderRead {
            cause: format!("invalid year in key {key}"),
        })
    }

    fn ts_number(key: &str, value: &Value) -> Result<u32> {
        value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| StudyError::ScenarioBuilderRead {
                cause: format!("invalid value for key {key}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_builder() -> ScenarioBuilder {
        let mut builder = ScenarioBuilder::new(3);
        builder.load_mut("fr").set_year(0, Some(2));
        builder.load_mut("fr").set_year(2, Some(1));
        builder.thermal_mut("fr", "nuclear").set_year(1, Some(4));
        builder.link_mut("be / fr").set_year(0, Some(3));
        builder.hydro_initial_level_mut("fr")[1] = Some(25.0);
        builder
    }

    #[test]
    fn entries_round_trip() {
        let builder = sample_builder();
        let entries = builder.to_entries();
        let rebuilt = ScenarioBuilder::from_entries(
            3,
            entries.iter().map(|(k, v)| (k.as_str(), v.clone())),
        )
        .unwrap();
        assert_eq!(rebuilt, builder);
    }

    #[test]
    fn cluster_keys_have_four_parts() {
        let entries = sample_builder().to_entries();
        assert!(entries.iter().any(|(k, v)| k == "t,fr,1,nuclear" && *v == Value::from(4)));
    }

    #[test]
    fn link_keys_split_the_model_id() {
        let entries = sample_builder().to_entries();
        assert!(entries.iter().any(|(k, v)| k == "ntc,be,fr,0" && *v == Value::from(3)));
    }

    #[test]
    fn initial_levels_are_written_as_fractions() {
        let entries = sample_builder().to_entries();
        let (_, value) = entries.iter().find(|(k, _)| k == "hl,fr,1").unwrap();
        assert_eq!(value.as_f64().unwrap(), 0.25);

        let rebuilt =
            ScenarioBuilder::from_entries(3, [("hl,fr,1", Value::from(0.25))]).unwrap();
        assert_eq!(rebuilt.hydro_initial_level["fr"][1], Some(25.0));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = ScenarioBuilder::from_entries(1, [("xx,fr,0", Value::from(1))]).unwrap_err();
        assert!(matches!(err, StudyError::UnsupportedScenarioType(kind) if kind == "xx"));
    }

    #[test]
    fn out_of_range_years_are_ignored() {
        let rebuilt = ScenarioBuilder::from_entries(2, [("l,fr,5", Value::from(1))]).unwrap();
        assert_eq!(rebuilt.load["fr"].get_year(0), None);
        assert!(rebuilt.load["fr"].years().len() == 2);
    }
}
