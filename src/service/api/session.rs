//! Shared HTTP plumbing for the AntaresWeb backend: one configured
//! `reqwest::Client`, uniform error translation and task/job polling.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConf;
use crate::utils::error::{Result, StudyError};

/// Default hard timeout for task and job polling, in seconds. Two days, the
/// same bound AntaresWeb applies to its own launcher queue.
pub const DEFAULT_TIME_OUT: u64 = 172_800;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Wraps a `reqwest::Client` so every call shares the bearer token and the
/// non-2xx handling. Errors surface the `description` field AntaresWeb puts
/// in its JSON error bodies.
#[derive(Clone)]
pub struct RequestWrapper {
    client: Client,
    base_url: String,
}

impl RequestWrapper {
    pub fn new(conf: &ApiConf) -> Result<Self> {
        let mut headers = HeaderMap::new();
        match conf.token() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| StudyError::MissingToken)?;
                headers.insert(AUTHORIZATION, value);
            }
            None if !conf.is_launched_locally() => return Err(StudyError::MissingToken),
            None => {}
        }

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!conf.verify())
            .build()?;
        // Hosts given without a scheme resolve against http, reqwest only
        // accepts absolute URLs.
        let host = url::Url::parse(conf.api_host())
            .or_else(|_| url::Url::parse(&format!("http://{}", conf.api_host())))?;
        let base_url = format!("{}/api/v1", host.as_str().trim_end_matches('/'));
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<Response> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        handle_response(response).await
    }

    pub async fn get(&self, url: &str) -> Result<Response> {
        self.send(Method::GET, url, None).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.get(url).await?.json().await?)
    }

    pub async fn post(&self, url: &str) -> Result<Response> {
        self.send(Method::POST, url, None).await
    }

    pub async fn post_json(&self, url: &str, body: &impl Serialize) -> Result<Response> {
        self.send(Method::POST, url, Some(serde_json::to_value(body)?)).await
    }

    pub async fn put(&self, url: &str) -> Result<Response> {
        self.send(Method::PUT, url, None).await
    }

    pub async fn put_json(&self, url: &str, body: &impl Serialize) -> Result<Response> {
        self.send(Method::PUT, url, Some(serde_json::to_value(body)?)).await
    }

    pub async fn patch_json(&self, url: &str, body: &impl Serialize) -> Result<Response> {
        self.send(Method::PATCH, url, Some(serde_json::to_value(body)?)).await
    }

    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.send(Method::DELETE, url, None).await
    }

    pub async fn delete_json(&self, url: &str, body: &impl Serialize) -> Result<Response> {
        self.send(Method::DELETE, url, Some(serde_json::to_value(body)?)).await
    }

    /// Polls `tasks/{task_id}` until it carries a result, failing on task
    /// failure or after `time_out` seconds.
    pub async fn wait_task_completion(&self, task_id: &str, time_out: u64) -> Result<()> {
        let url = format!("{}/tasks/{task_id}", self.base_url);
        let deadline = tokio::time::Instant::now() + Duration::from_secs(time_out);
        loop {
            let task: Value = self.get_json(&url).await?;
            if let Some(result) = task.get("result").filter(|r| !r.is_null()) {
                let success = result.get("success").and_then(Value::as_bool).unwrap_or(false);
                if success {
                    debug!(task_id, "task completed");
                    return Ok(());
                }
                return Err(StudyError::TaskFailed {
                    task_id: task_id.to_string(),
                });
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(StudyError::TaskTimeOut {
                    task_id: task_id.to_string(),
                    timeout: time_out,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Non-2xx responses are turned into `StudyError::Api` carrying the
/// `description` field of the JSON body when present, else the status line.
async fn handle_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<Value>().await {
        Ok(body) => body
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status_reason(status)),
        Err(_) => status_reason(status),
    };
    Err(StudyError::Api(message))
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
