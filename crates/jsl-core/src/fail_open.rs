//! Fail-open utilities for graceful degradation
//!
//! Output reshaping must never turn a successful git command into a failed
//! request. Auxiliary lookups made while reshaping (head resolution, file
//! counts) go through these helpers so a failure degrades to a default value.
//!
//! DO NOT use fail-open for:
//! - Command translation (it is total and has nothing to fail)
//! - Configuration loading (a broken config should be reported)

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an operation that should fail open
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```no_run
/// use jsl_core::fail_open::fail_open;
/// use jsl_core::Result;
///
/// async fn count_files() -> Result<usize> {
///     Ok(3)
/// }
///
/// async fn example() {
///     let count = fail_open("file_count", || count_files()).await.unwrap_or(0);
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

/// Like [`fail_open`] but substitutes `default` on failure
pub async fn fail_open_or<F, Fut, T>(operation_name: &str, default: T, f: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    fail_open(operation_name, f).await.unwrap_or(default)
}
