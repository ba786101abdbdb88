//! Runs the Antares solver as a subprocess and tracks it as a [`Job`].

use std::collections::HashMap;
use std::fs;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::model::simulation::{AntaresSimulationParameters, Job, JobStatus};
use crate::service::RunService;
use crate::utils::error::{Result, StudyError};

use super::LocalContext;

const SOLVER_BINARY: &str = "antares-solver";
const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct RunLocalService {
    context: Arc<LocalContext>,
    /// Children we spawned ourselves, keyed by job id (the PID).
    children: Mutex<HashMap<String, Child>>,
}

impl RunLocalService {
    pub fn new(context: Arc<LocalContext>) -> Self {
        Self {
            context,
            children: Mutex::new(HashMap::new()),
        }
    }

    /// Latest entry of the output directory, freshly written by the solver.
    fn latest_output(&self) -> Option<String> {
        let entries = fs::read_dir(self.context.paths.output_dir()).ok()?;
        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, entry.file_name().to_string_lossy().to_string()))
            })
            .max()
            .map(|(_, name)| name)
    }

    /// Polling fallback for jobs whose child handle we no longer hold.
    async fn wait_for_pid(&self, job: &Job, time_out: u64) -> Result<Job> {
        let pid = job.job_id.parse::<usize>().map_err(|_| StudyError::SimulationFailed {
            job_id: job.job_id.clone(),
            cause: "invalid job id".to_string(),
        })?;
        let pid = Pid::from(pid);
        let mut system = System::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(time_out);
        loop {
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing(),
            );
            if system.process(pid).is_none() {
                return Ok(Job {
                    status: JobStatus::Success,
                    output_id: self.latest_output(),
                    ..job.clone()
                });
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(StudyError::SimulationTimeOut {
                    job_id: job.job_id.clone(),
                    timeout: time_out,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl RunService for RunLocalService {
    async fn run_antares_simulation(
        &self,
        parameters: Option<AntaresSimulationParameters>,
    ) -> Result<Job> {
        let parameters = parameters.unwrap_or_default();
        let mut command = Command::new(SOLVER_BINARY);
        command
            .arg(self.context.paths.root())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(nb_cpu) = parameters.nb_cpu {
            command.arg(format!("--force-parallel={nb_cpu}"));
        }
        if parameters.presolve {
            command.arg("--use-ortools");
        }
        if parameters.solver != crate::model::simulation::Solver::Sirius {
            command.arg(format!("--solver={}", parameters.solver));
        }

        let child = command.spawn().map_err(|err| StudyError::SimulationRunning {
            name: self.context.paths.root().display().to_string(),
            cause: err.to_string(),
        })?;
        let job_id = child
            .id()
            .map(|pid| pid.to_string())
            .ok_or_else(|| StudyError::SimulationRunning {
                name: self.context.paths.root().display().to_string(),
                cause: "solver exited before it could be tracked".to_string(),
            })?;
        info!(%job_id, "launched local simulation");
        self.children.lock().await.insert(job_id.clone(), child);
        Ok(Job {
            job_id,
            status: JobStatus::Running,
            output_id: None,
            parameters,
        })
    }

    async fn wait_job_completion(&self, job: &Job, time_out: u64) -> Result<Job> {
        if job.status.is_terminal() {
            return Ok(job.clone());
        }
        let child = self.children.lock().await.remove(&job.job_id);
        let Some(mut child) = child else {
            warn!(job_id = %job.job_id, "no child handle, falling back to pid polling");
            return self.wait_for_pid(job, time_out).await;
        };

        let status = match tokio::time::timeout(Duration::from_secs(time_out), child.wait()).await
        {
            Ok(waited) => waited?,
            Err(_) => {
                // Put the child back so a later call can keep waiting.
                self.children.lock().await.insert(job.job_id.clone(), child);
                return Err(StudyError::SimulationTimeOut {
                    job_id: job.job_id.clone(),
                    timeout: time_out,
                });
            }
        };

        if status.success() {
            Ok(Job {
                status: JobStatus::Success,
                output_id: self.latest_output(),
                ..job.clone()
            })
        } else {
            Err(StudyError::SimulationFailed {
                job_id: job.job_id.clone(),
                cause: format!("solver exited with {status}"),
            })
        }
    }
}
