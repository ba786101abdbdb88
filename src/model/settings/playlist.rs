use serde::{Deserialize, Serialize};

/// Whether a Monte-Carlo year takes part in the simulation, and with which
/// weight. Years are keyed 1-based, like in the Antares GUI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistData {
    pub status: bool,
    pub weight: f64,
}

impl Default for PlaylistData {
    fn default() -> Self {
        Self { status: true, weight: 1.0 }
    }
}

impl PlaylistData {
    pub fn enabled() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self { status: false, weight: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_play_with_unit_weight_by_default() {
        let data = PlaylistData::default();
        assert!(data.status);
        assert_eq!(data.weight, 1.0);
    }
}
