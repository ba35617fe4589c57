//! # jsl-git
//!
//! Translation engine from the Sapling command vocabulary to git.
//!
//! This crate provides:
//! - Command translation (`translate`), one Sapling verb at a time
//! - Output transformers that reshape git output into Sapling's records
//! - Revision expression simplification and ref classification
//! - The smartlog head annotation pass, backed by a mockable git executor

mod blame;
mod bookmark;
mod command;
mod config_cmd;
mod context;
mod head;
mod log;
mod paths;
mod refs;
mod resolve;
mod revsets;
mod status;
mod transform;
mod translator;

pub use command::{GitCommand, GitExecutor, GitOutput, MockGitExecutor};
pub use context::RepositoryContext;
pub use head::HeadAnnotator;
pub use log::{COMMIT_END_MARK, FIELD_SEPARATOR, LIST_SEPARATOR, RECORD_FIELD_COUNT};
pub use refs::{classify_refs, RefLists};
pub use revsets::simplify_revision;
pub use status::{map_status_code, FileStatusEntry};
pub use transform::{ConfigEntry, OutputTransform};
pub use translator::{translate, CommandRequest, CommandTranslation};
