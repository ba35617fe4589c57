//! Git command execution abstraction
//!
//! The translator itself never runs anything. Only the head annotation pass
//! needs auxiliary lookups, and it reaches git through [`GitExecutor`] so it
//! can be exercised against canned output.

use async_trait::async_trait;
use jsl_core::{JslError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::context::RepositoryContext;

/// Output from a git command
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl GitOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// Failed output with the given stderr
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }

    /// Turn a non-zero exit into an error carrying stderr
    pub fn into_result(self, what: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(JslError::GitCommand(format!(
                "{}: {}",
                what,
                self.stderr.trim()
            )))
        }
    }
}

impl From<Output> for GitOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Trait for executing git commands (allows mocking in tests)
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Execute a git command with the given arguments
    async fn exec(&self, args: &[&str]) -> Result<GitOutput>;

    /// Working directory the commands run in
    fn cwd(&self) -> &Path;
}

/// Real git command executor
///
/// Runs with exactly the environment captured in the [`RepositoryContext`];
/// the process environment is cleared first.
#[derive(Clone)]
pub struct GitCommand {
    program: String,
    cwd: PathBuf,
    env: Vec<(String, String)>,
}

impl GitCommand {
    /// Create an executor bound to a repository context
    pub fn new(ctx: &RepositoryContext) -> Self {
        Self {
            program: ctx.config().git_program.clone(),
            cwd: ctx.cwd().to_path_buf(),
            env: ctx
                .env()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl GitExecutor for GitCommand {
    #[instrument(skip(self), fields(cwd = %self.cwd.display()))]
    async fn exec(&self, args: &[&str]) -> Result<GitOutput> {
        debug!("Executing {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.cwd)
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .await
            .map_err(|e| JslError::GitCommand(format!("Failed to execute git: {}", e)))?;

        let git_output = GitOutput::from(output);

        if !git_output.success {
            debug!("git command failed: {}", git_output.stderr);
        }

        Ok(git_output)
    }

    fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Mock git executor for testing
#[derive(Clone)]
pub struct MockGitExecutor {
    cwd: PathBuf,
    responses: HashMap<String, GitOutput>,
}

impl Default for MockGitExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitExecutor {
    pub fn new() -> Self {
        Self {
            cwd: PathBuf::from("/mock/repo"),
            responses: HashMap::new(),
        }
    }

    /// Register output for the command whose args, joined by spaces, equal `command`
    pub fn with_response(mut self, command: &str, output: GitOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }
}

#[async_trait]
impl GitExecutor for MockGitExecutor {
    async fn exec(&self, args: &[&str]) -> Result<GitOutput> {
        let key = args.join(" ");
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| JslError::GitCommand(format!("No mock response for: {}", key)))
    }

    fn cwd(&self) -> &Path {
        &self.cwd
    }
}
