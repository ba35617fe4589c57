//! Head annotation for the commit record stream
//!
//! `git log` cannot tell which commit is checked out, split local from
//! remote branches, or count files per commit inside one format string.
//! [`HeadAnnotator`] post-processes the records to fill those fields.

use jsl_core::fail_open::fail_open_or;
use jsl_core::{JslError, Result};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::command::GitExecutor;
use crate::log::{field, COMMIT_END_MARK, FIELD_SEPARATOR, LIST_SEPARATOR, RECORD_FIELD_COUNT};
use crate::refs::classify_refs;

/// Marker Sapling uses for the working copy parent
const HEAD_MARKER: &str = "@";

/// Prefixes each commit header in the batched file listing
const BATCH_HEADER: char = '\0';

/// Fills the head marker, bookmark lists and file counts of commit records
pub struct HeadAnnotator<'a> {
    executor: &'a dyn GitExecutor,
    batch_file_counts: bool,
}

impl<'a> HeadAnnotator<'a> {
    pub fn new(executor: &'a dyn GitExecutor, batch_file_counts: bool) -> Self {
        Self {
            executor,
            batch_file_counts,
        }
    }

    /// Annotate the output of the full-history log
    ///
    /// If the checked-out commit cannot be resolved the input is returned
    /// unchanged. A file count that cannot be computed stays `0`.
    #[instrument(skip(self, output), fields(cwd = %self.executor.cwd().display()))]
    pub async fn annotate(&self, output: &str) -> String {
        let head = match self.head_hash().await {
            Ok(head) => head,
            Err(e) => {
                warn!("Leaving log output unannotated: {}", e);
                return output.to_string();
            }
        };

        let chunks: Vec<&str> = output.split(COMMIT_END_MARK).collect();
        let hashes: Vec<&str> = chunks.iter().filter_map(|c| record_hash(c)).collect();
        let counts = self.file_counts(&hashes).await;

        chunks
            .iter()
            .map(|chunk| annotate_record(chunk, &head, &counts))
            .collect::<Vec<_>>()
            .join(COMMIT_END_MARK)
    }

    /// Resolve the checked-out commit
    pub async fn head_hash(&self) -> Result<String> {
        let output = self
            .executor
            .exec(&["rev-parse", "HEAD"])
            .await?
            .into_result("rev-parse HEAD")?;

        let head = output.stdout.trim();
        if head.is_empty() {
            return Err(JslError::GitLookup("rev-parse HEAD printed nothing".to_string()));
        }
        Ok(head.to_string())
    }

    async fn file_counts(&self, hashes: &[&str]) -> HashMap<String, usize> {
        if hashes.is_empty() {
            return HashMap::new();
        }

        if self.batch_file_counts {
            match self.batched_file_counts(hashes).await {
                Ok(counts) => return counts,
                Err(e) => warn!("Batched file count failed, counting per commit: {}", e),
            }
        }

        let mut counts = HashMap::with_capacity(hashes.len());
        for hash in hashes {
            let count = fail_open_or("file_count", 0, || self.commit_file_count(hash)).await;
            counts.insert(hash.to_string(), count);
        }
        counts
    }

    /// One `git show` listing the files of every commit
    async fn batched_file_counts(&self, hashes: &[&str]) -> Result<HashMap<String, usize>> {
        let mut args = vec!["show", "--format=%x00%H", "--name-only"];
        args.extend_from_slice(hashes);

        let output = self
            .executor
            .exec(&args)
            .await?
            .into_result("batched file count")?;

        let counts = parse_batched_counts(&output.stdout);
        debug!("Counted files for {} commits in one call", counts.len());
        Ok(counts)
    }

    /// Files touched by a single commit
    pub async fn commit_file_count(&self, hash: &str) -> Result<usize> {
        let output = self
            .executor
            .exec(&["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", hash])
            .await?
            .into_result("diff-tree")?;

        Ok(output
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count())
    }
}

/// Parse `git show --format=%x00%H --name-only` output into per-commit counts
fn parse_batched_counts(stdout: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    let mut current: Option<String> = None;

    for line in stdout.lines() {
        if let Some(hash) = line.strip_prefix(BATCH_HEADER) {
            let hash = hash.trim().to_string();
            counts.insert(hash.clone(), 0);
            current = Some(hash);
        } else if !line.trim().is_empty() {
            if let Some(count) = current.as_ref().and_then(|h| counts.get_mut(h)) {
                *count += 1;
            }
        }
    }

    counts
}

/// Split a chunk into the leading record separator and the record body
fn split_chunk(chunk: &str) -> (&str, &str) {
    match chunk.strip_prefix(FIELD_SEPARATOR) {
        Some(body) => (&chunk[..FIELD_SEPARATOR.len_utf8()], body),
        None => ("", chunk),
    }
}

fn record_hash(chunk: &str) -> Option<&str> {
    let (_, body) = split_chunk(chunk);
    if body.trim().is_empty() {
        return None;
    }
    body.split(FIELD_SEPARATOR)
        .next()
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

fn annotate_record(chunk: &str, head: &str, counts: &HashMap<String, usize>) -> String {
    let (prefix, body) = split_chunk(chunk);
    if body.trim().is_empty() {
        return chunk.to_string();
    }

    let mut fields: Vec<String> = body
        .splitn(RECORD_FIELD_COUNT, FIELD_SEPARATOR)
        .map(str::to_string)
        .collect();
    if fields.len() < RECORD_FIELD_COUNT {
        debug!("Record with {} fields left as is", fields.len());
        return chunk.to_string();
    }

    let hash = fields[field::HASH].trim().to_string();
    if hash == head {
        fields[field::IS_DOT] = HEAD_MARKER.to_string();
    }

    let refs = classify_refs(&fields[field::BOOKMARKS]);
    fields[field::BOOKMARKS] = join_list(&refs.local);
    fields[field::REMOTE_BOOKMARKS] = join_list(&refs.remote);

    let parents = join_list(&fields[field::PARENTS].split_whitespace().collect::<Vec<_>>());
    fields[field::PARENTS] = parents;

    let count = counts.get(&hash).copied().unwrap_or(0);
    fields[field::TOTAL_FILE_COUNT] = count.to_string();

    let separator = FIELD_SEPARATOR.to_string();
    format!("{}{}", prefix, fields.join(&separator))
}

fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let separator = LIST_SEPARATOR.to_string();
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&separator)
}
