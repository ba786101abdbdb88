//! Launches simulations through the AntaresWeb launcher and polls their jobs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::simulation::{AntaresSimulationParameters, Job, JobStatus};
use crate::service::RunService;
use crate::utils::error::{Result, StudyError};

use super::models::{JobDto, RunRequestDto, RunResponseDto};
use super::ApiContext;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct RunApiService {
    context: Arc<ApiContext>,
}

impl RunApiService {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    async fn read_job(&self, job_id: &str) -> Result<JobDto> {
        self.context
            .get_json(&self.context.api_url(&format!("launcher/jobs/{job_id}")))
            .await
    }
}

#[async_trait]
impl RunService for RunApiService {
    async fn run_antares_simulation(
        &self,
        parameters: Option<AntaresSimulationParameters>,
    ) -> Result<Job> {
        let parameters = parameters.unwrap_or_default();
        let other_options = parameters.other_options();
        let request = RunRequestDto {
            nb_cpu: parameters.nb_cpu,
            auto_unzip: parameters.unzip_output,
            output_suffix: parameters.output_suffix.clone(),
            other_options: (!other_options.is_empty()).then_some(other_options),
        };
        let url = self
            .context
            .api_url(&format!("launcher/run/{}", self.context.study_id));
        let response: RunResponseDto = self
            .context
            .post_for_json(&url, &request)
            .await
            .map_err(|err| StudyError::SimulationRunning {
                name: self.context.study_id.clone(),
                cause: err.to_string(),
            })?;
        info!(job_id = %response.job_id, "launched simulation");
        Ok(Job {
            job_id: response.job_id,
            status: JobStatus::Pending,
            output_id: None,
            parameters,
        })
    }

    async fn wait_job_completion(&self, job: &Job, time_out: u64) -> Result<Job> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(time_out);
        loop {
            let current = self.read_job(&job.job_id).await?;
            if current.status.is_terminal() {
                if current.status == JobStatus::Failed {
                    return Err(StudyError::SimulationFailed {
                        job_id: job.job_id.clone(),
                        cause: "the launcher reported a failure".to_string(),
                    });
                }
                debug!(job_id = %job.job_id, "job completed");
                return Ok(Job {
                    status: current.status,
                    output_id: current.output_id,
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
