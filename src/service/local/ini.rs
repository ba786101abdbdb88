//! Minimal INI reader/writer for the Antares study format.
//!
//! Antares INI files keep section and key order, and a key may appear several
//! times in one section (`select_var +`, `playlist_year -`). Values are kept
//! as raw strings; typed access goes through the `get_*` helpers.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::utils::error::{Result, StudyError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    entries: IndexMap<String, Vec<String>>,
}

impl IniSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value for a key, which is the common single-valued case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces any previous values of `key` with a single one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Display) {
        self.entries.insert(key.into(), vec![value.to_string()]);
    }

    /// Floats that Antares writes with six decimals.
    pub fn set_f64_6(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, format!("{value:.6}"));
    }

    /// Appends one more line for `key`, keeping previous ones.
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
        self.entries.entry(key.into()).or_default().push(value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(key)
    }

    pub fn get_parsed<T: FromStr>(&self, key: &str) -> std::result::Result<Option<T>, String> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| format!("invalid value `{raw}` for key `{key}`")),
        }
    }

    pub fn get_bool(&self, key: &str) -> std::result::Result<Option<bool>, String> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(format!("invalid boolean `{raw}` for key `{key}`")),
            },
        }
    }

    pub fn get_f64(&self, key: &str) -> std::result::Result<Option<f64>, String> {
        self.get_parsed(key)
    }

    pub fn get_u32(&self, key: &str) -> std::result::Result<Option<u32>, String> {
        self.get_parsed(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniMap {
    sections: IndexMap<String, IniSection>,
}

impl IniMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut IniSection> {
        self.sections.get_mut(name)
    }

    /// Gets or creates a section, keeping insertion order.
    pub fn ensure_section(&mut self, name: impl Into<String>) -> &mut IniSection {
        self.sections.entry(name.into()).or_default()
    }

    pub fn remove_section(&mut self, name: &str) -> Option<IniSection> {
        self.sections.shift_remove(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &IniSection)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut ini = IniMap::new();
        // Entries before any header land in an implicit "" section, which is
        // how the xpansion settings file is laid out.
        let mut current = String::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[') {
                let name = name
                    .strip_suffix(']')
                    .ok_or_else(|| format!("line {}: unterminated section header", line_no + 1))?;
                current = name.trim().to_string();
                ini.ensure_section(current.clone());
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {}: expected `key = value`", line_no + 1))?;
            ini.ensure_section(current.clone()).push(key.trim(), value.trim());
        }
        Ok(ini)
    }

    pub fn to_string(&self) -> String {
        let mut out = String::new();
        for (name, section) in &self.sections {
            if !name.is_empty() {
                out.push('[');
                out.push_str(name);
                out.push_str("]\n");
            }
            for (key, value) in section.iter() {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

fn format_error(path: &Path, cause: impl Display) -> StudyError {
    StudyError::IniFormat {
        path: path.display().to_string(),
        cause: cause.to_string(),
    }
}

/// Reads an INI file; a missing file yields an empty map, like the simulator
/// treats absent optional files.
pub fn read_ini(path: &Path) -> Result<IniMap> {
    if !path.exists() {
        return Ok(IniMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    IniMap::parse(&content).map_err(|cause| format_error(path, cause))
}

pub fn write_ini(path: &Path, ini: &IniMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, ini.to_string())?;
    Ok(())
}

/// Maps a section-level parse failure to an [`StudyError::IniFormat`] for
/// `path`.
pub fn ini_error(path: &Path, cause: impl Display) -> StudyError {
    format_error(path, cause)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_duplicate_keys() {
        let content = "[variables selection]\nselected_vars_reset = true\nselect_var - = LOAD\nselect_var - = WIND\n";
        let ini = IniMap::parse(content).unwrap();
        let section = ini.section("variables selection").unwrap();
        assert_eq!(section.get_bool("selected_vars_reset").unwrap(), Some(true));
        assert_eq!(section.get_all("select_var -"), ["LOAD", "WIND"]);
    }

    #[test]
    fn writes_one_line_per_value() {
        let mut ini = IniMap::new();
        let section = ini.ensure_section("playlist");
        section.set("playlist_reset", false);
        section.push("playlist_year +", 0);
        section.push("playlist_year +", 3);

        let text = ini.to_string();
        assert_eq!(
            text,
            "[playlist]\nplaylist_reset = false\nplaylist_year + = 0\nplaylist_year + = 3\n\n"
        );
    }

    #[test]
    fn round_trips_through_parse() {
        let mut ini = IniMap::new();
        let general = ini.ensure_section("general");
        general.set("horizon", "2030");
        general.set_f64_6("power", 1.5);

        let reparsed = IniMap::parse(&ini.to_string()).unwrap();
        assert_eq!(reparsed, ini);
        assert_eq!(reparsed.section("general").unwrap().get("power"), Some("1.500000"));
    }

    #[test]
    fn top_level_entries_use_the_implicit_section() {
        let ini = IniMap::parse("uc_type = expansion_fast\nmaster = integer\n").unwrap();
        let section = ini.section("").unwrap();
        assert_eq!(section.get("master"), Some("integer"));
        assert!(ini.to_string().starts_with("uc_type = expansion_fast\n"));
    }
}
