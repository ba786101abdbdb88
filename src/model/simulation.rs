use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Solver {
    Coin,
    Xpress,
    #[default]
    Sirius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntaresSimulationParameters {
    pub solver: Solver,
    pub nb_cpu: Option<u32>,
    pub unzip_output: bool,
    pub output_suffix: Option<String>,
    pub presolve: bool,
}

impl Default for AntaresSimulationParameters {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            nb_cpu: None,
            unzip_output: true,
            output_suffix: None,
            presolve: false,
        }
    }
}

impl AntaresSimulationParameters {
    /// Extra launcher options passed alongside the request: the presolve flag
    /// and any non-default solver name.
    pub fn other_options(&self) -> String {
        let mut options = Vec::new();
        if self.presolve {
            options.push("presolve".to_string());
        }
        if self.solver != Solver::Sirius {
            options.push(self.solver.to_string());
        }
        options.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// A launched simulation, local subprocess or AntaresWeb job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub output_id: Option<String>,
    pub parameters: AntaresSimulationParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_options_skips_defaults() {
        let params = AntaresSimulationParameters::default();
        assert_eq!(params.other_options(), "");

        let params = AntaresSimulationParameters {
            solver: Solver::Xpress,
            presolve: true,
            ..Default::default()
        };
        assert_eq!(params.other_options(), "presolve xpress");
    }

    #[test]
    fn job_status_parses_case_insensitively() {
        assert_eq!("SUCCESS".parse::<JobStatus>().unwrap(), JobStatus::Success);
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }
}
