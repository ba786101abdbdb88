use crate::utils::error::{Result, StudyError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static INVALID_ID_CHARS: OnceLock<Regex> = OnceLock::new();

/// Transforms a name into an identifier, the way AntaresWeb builds its ids.
pub fn transform_name_to_id(name: &str) -> String {
    let re = INVALID_ID_CHARS.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_(),& -]+").unwrap());
    re.replace_all(name, " ").trim().to_lowercase()
}

/// Output filtering frequencies. Ordered chronologically, which is also the
/// order they are written in ini files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOption {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl FilterOption {
    pub const ALL: [FilterOption; 5] = [
        FilterOption::Hourly,
        FilterOption::Daily,
        FilterOption::Weekly,
        FilterOption::Monthly,
        FilterOption::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOption::Hourly => "hourly",
            FilterOption::Daily => "daily",
            FilterOption::Weekly => "weekly",
            FilterOption::Monthly => "monthly",
            FilterOption::Annual => "annual",
        }
    }
}

impl FromStr for FilterOption {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hourly" => Ok(FilterOption::Hourly),
            "daily" => Ok(FilterOption::Daily),
            "weekly" => Ok(FilterOption::Weekly),
            "monthly" => Ok(FilterOption::Monthly),
            "annual" => Ok(FilterOption::Annual),
            other => Err(StudyError::FilteringValue {
                invalid: vec![other.to_string()],
                valid: FilterOption::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            }),
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FilterSet = BTreeSet<FilterOption>;

pub fn default_filtering() -> FilterSet {
    FilterOption::ALL.into_iter().collect()
}

/// Joins a filter set into the comma-separated form used by both backends.
pub fn join_filters(filters: &FilterSet) -> String {
    filters
        .iter()
        .map(FilterOption::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a comma (or space) separated list of filter values. An empty or
/// blank input is the empty set; unknown values are rejected.
pub fn parse_filters(value: &str) -> Result<FilterSet> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(FilterSet::new());
    }
    let mut invalid = Vec::new();
    let mut filters = FilterSet::new();
    for part in trimmed.replace(' ', "").split(',') {
        match part.parse::<FilterOption>() {
            Ok(option) => {
                filters.insert(option);
            }
            Err(_) => invalid.push(part.to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(StudyError::FilteringValue {
            invalid,
            valid: FilterOption::ALL.iter().map(|f| f.as_str().to_string()).collect(),
        });
    }
    Ok(filters)
}

/// serde adapter for filter sets carried as comma-separated strings.
pub mod comma_separated_filters {
    use super::{join_filters, parse_filters, FilterSet};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(filters: &FilterSet, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&join_filters(filters))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<FilterSet, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_filters(&raw).map_err(D::Error::custom)
    }
}

/// Antares study version. Parses both the dotted form ("9.2") and the legacy
/// compact form found in `study.antares` files ("880" meaning 8.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudyVersion {
    pub major: u32,
    pub minor: u32,
}

pub const STUDY_VERSION_8_8: StudyVersion = StudyVersion { major: 8, minor: 8 };
pub const STUDY_VERSION_9_2: StudyVersion = StudyVersion { major: 9, minor: 2 };

impl StudyVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for StudyVersion {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StudyError::InvalidVersion(s.to_string());
        if let Some((major, minor)) = s.split_once('.') {
            return Ok(StudyVersion {
                major: major.parse().map_err(|_| invalid())?,
                minor: minor.parse().map_err(|_| invalid())?,
            });
        }
        let compact: u32 = s.parse().map_err(|_| invalid())?;
        if compact < 100 {
            return Err(invalid());
        }
        Ok(StudyVersion {
            major: compact / 100,
            minor: (compact % 100) / 10,
        })
    }
}

impl fmt::Display for StudyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_to_id_strips_invalid_characters() {
        assert_eq!(transform_name_to_id("Zone A"), "zone a");
        assert_eq!(transform_name_to_id(" DE?2000 "), "de 2000");
        assert_eq!(transform_name_to_id("area_1 (north)"), "area_1 (north)");
    }

    #[test]
    fn filters_round_trip() {
        let set = parse_filters("daily, hourly").unwrap();
        assert_eq!(join_filters(&set), "hourly, daily");
        assert!(parse_filters("").unwrap().is_empty());
        assert!(parse_filters("fortnightly").is_err());
    }

    #[test]
    fn version_parses_both_forms() {
        let dotted: StudyVersion = "9.2".parse().unwrap();
        let compact: StudyVersion = "880".parse().unwrap();
        assert_eq!(dotted, STUDY_VERSION_9_2);
        assert_eq!(compact, STUDY_VERSION_8_8);
        assert!(compact < dotted);
        assert_eq!(dotted.to_string(), "9.2");
        assert!("abc".parse::<StudyVersion>().is_err());
    }
}
