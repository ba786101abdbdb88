use std::path::{Path, PathBuf};

/// Host and token to use when talking to an AntaresWeb server.
#[derive(Debug, Clone)]
pub struct ApiConf {
    api_host: String,
    token: Option<String>,
    verify: bool,
}

impl ApiConf {
    pub fn new(api_host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            token: Some(token.into()),
            verify: true,
        }
    }

    /// Tokenless configuration, only valid against a locally launched server.
    pub fn local(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            token: None,
            verify: true,
        }
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn is_launched_locally(&self) -> bool {
        self.api_host.starts_with("localhost")
            || self.api_host.starts_with("http://localhost")
            || self.api_host.starts_with("http://127.0.0.1")
    }
}

/// Location of an on-disk study directory.
#[derive(Debug, Clone)]
pub struct LocalConfiguration {
    local_path: PathBuf,
    study_name: String,
}

impl LocalConfiguration {
    pub fn new(local_path: impl Into<PathBuf>, study_name: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            study_name: study_name.into(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn study_name(&self) -> &str {
        &self.study_name
    }

    pub fn study_path(&self) -> PathBuf {
        self.local_path.join(&self.study_name)
    }
}
