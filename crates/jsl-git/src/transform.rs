//! Output transformers
//!
//! A translation may carry an [`OutputTransform`]. The caller runs the git
//! command, then hands the captured stdout to [`OutputTransform::apply`] to
//! get the text the Sapling caller would have seen.

use serde::{Deserialize, Serialize};
use jsl_core::{JslError, Result};
use tracing::warn;

use crate::command::GitExecutor;
use crate::head::HeadAnnotator;
use crate::{blame, config_cmd, log, resolve, status};

/// How to reshape a translated command's stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutputTransform {
    /// `git status --porcelain=v2` → status JSON
    Status,
    /// `git show --name-status` → five-line changed-files record
    ChangedFiles,
    /// Full-history log → commit records with head marker, refs and file counts
    #[serde(rename_all = "camelCase")]
    HeadAnnotate { batch_file_counts: bool },
    /// `git config --list` → `[{name, value}]` filtered to the requested names
    Config { sections: Vec<String> },
    /// `git diff --name-only --diff-filter=U` → merge conflict report
    Conflicts,
    /// `git blame --line-porcelain` → blame JSON
    Blame,
    /// Always an empty JSON array
    EmptyList,
}

impl OutputTransform {
    /// Reshape captured output
    ///
    /// Never fails. Only [`OutputTransform::HeadAnnotate`] touches git, through
    /// `executor`; every other variant is a pure function of `output`.
    pub async fn apply(&self, output: &str, executor: &dyn GitExecutor) -> String {
        match self {
            Self::HeadAnnotate { batch_file_counts } => {
                HeadAnnotator::new(executor, *batch_file_counts)
                    .annotate(output)
                    .await
            }
            pure => pure
                .apply_pure(output)
                .unwrap_or_else(|| output.to_string()),
        }
    }

    /// Reshape output without git access; `None` for transforms that need it
    pub fn apply_pure(&self, output: &str) -> Option<String> {
        let transformed = match self {
            Self::Status => status::status_to_json(output),
            Self::ChangedFiles => log::changed_files_record(output),
            Self::HeadAnnotate { .. } => return None,
            Self::Config { sections } => config_cmd::config_to_json(output, sections),
            Self::Conflicts => resolve::conflicts_to_json(output),
            Self::Blame => blame::blame_to_json(output),
            Self::EmptyList => "[]".to_string(),
        };
        Some(transformed)
    }
}

/// A configuration item as Sapling's `config -Tjson` prints it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
}

/// Serialize a transformer result, degrading to an empty array
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    let serialized: Result<String> = serde_json::to_string(value).map_err(JslError::from);
    serialized.unwrap_or_else(|e| {
        warn!("Failed to serialize transformed output: {}", e);
        "[]".to_string()
    })
}
