//! Configuration management for jsl
//!
//! Repository-level settings that shape the produced git invocations:
//! which git binary to name, which remote `push` targets, and how the
//! smartlog annotation pass gathers per-commit file counts.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{JslError, Result};

/// Repository-level jsl configuration
///
/// Loaded from `.jsl/config.toml` in the repo root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JslConfig {
    /// Program placed in every translation
    #[serde(default = "default_git_program")]
    pub git_program: String,

    /// Remote that `push` publishes to
    #[serde(default = "default_remote")]
    pub default_remote: String,

    /// Log annotation settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Settings for the full-history log path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Count changed files for all records with one git call instead of one per record
    #[serde(default = "default_batch_file_counts")]
    pub batch_file_counts: bool,

    /// Phase written into every commit record (git has no phases)
    #[serde(default = "default_phase")]
    pub phase: String,
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_batch_file_counts() -> bool {
    true
}

fn default_phase() -> String {
    "public".to_string()
}

impl JslConfig {
    /// Load configuration from `.jsl/config.toml` or use defaults
    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let config_path = repo_root.join(".jsl/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| JslError::Config(format!("Failed to parse config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.jsl/config.toml`
    pub fn write_default(repo_root: &Path) -> Result<()> {
        let config_dir = repo_root.join(".jsl");
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| JslError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_dir.join("config.toml"), content)?;
        Ok(())
    }
}

impl Default for JslConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            default_remote: default_remote(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            batch_file_counts: default_batch_file_counts(),
            phase: default_phase(),
        }
    }
}
