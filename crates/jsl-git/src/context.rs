//! Read-only repository context threaded through every translation

use jsl_core::JslConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only handle describing where and how commands run
///
/// The environment is an explicit snapshot; auxiliary git calls use it
/// instead of whatever the process environment is at call time.
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    cwd: PathBuf,
    env: Arc<BTreeMap<String, String>>,
    config: Arc<JslConfig>,
}

impl RepositoryContext {
    /// Context with an empty environment and the given configuration
    pub fn new(cwd: impl Into<PathBuf>, config: JslConfig) -> Self {
        Self {
            cwd: cwd.into(),
            env: Arc::new(BTreeMap::new()),
            config: Arc::new(config),
        }
    }

    /// Context whose environment is a snapshot of the current process environment
    pub fn from_process_env(cwd: impl Into<PathBuf>, config: JslConfig) -> Self {
        Self::new(cwd, config).with_env(std::env::vars())
    }

    /// Replace the environment snapshot
    pub fn with_env(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env = Arc::new(vars.into_iter().collect());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn config(&self) -> &JslConfig {
        &self.config
    }

    /// Program every translation targets
    pub(crate) fn git(&self) -> &str {
        &self.config.git_program
    }
}
