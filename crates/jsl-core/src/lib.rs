//! # jsl-core
//!
//! Core types for the jsl translation layer.
//!
//! jsl lets a UI written against the Sapling command vocabulary drive a plain
//! git repository. Commands are rewritten into `git` (and `git branchless`)
//! invocations and their output is reshaped into the records the UI parses.
//! This crate holds the pieces every layer shares: the error type, the
//! repository configuration and the fail-open helpers.

mod config;
mod error;
pub mod fail_open;

pub use config::{JslConfig, LogConfig};
pub use error::{JslError, Result};
