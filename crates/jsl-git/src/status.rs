//! Working tree status
//!
//! `sl status -Tjson` becomes `git status --porcelain=v2` and the porcelain
//! lines are rewritten into Sapling's `[{path, status, copy?}]` entries.

use serde::Serialize;
use tracing::debug;

use crate::context::RepositoryContext;
use crate::paths::{unquote_path, RAW_PATH_OPTIONS};
use crate::transform::{to_json, OutputTransform};
use crate::translator::{take_flag, take_json_flag, CommandTranslation};

/// Sapling code for files git does not track
pub const UNTRACKED: &str = "?";
/// Sapling code for ignored files
pub const IGNORED: &str = "I";
/// Sapling code for files with unresolved merge conflicts
pub const UNRESOLVED: &str = "U";

/// One changed file as Sapling reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatusEntry {
    pub path: String,
    pub status: String,
    /// Source path of a rename or copy
    #[serde(rename = "copy", skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
}

/// Map one git status letter to the Sapling status code
///
/// Returns `None` for unmodified (`.` in porcelain v2, space in v1), which
/// means no entry should be emitted. Unrecognised letters count as modified.
pub fn map_status_code(code: char) -> Option<&'static str> {
    match code {
        'M' => Some("M"),
        'A' => Some("A"),
        'D' => Some("R"),
        'R' => Some("M"),
        'C' => Some("A"),
        '.' | ' ' => None,
        _ => Some("M"),
    }
}

pub(crate) fn translate_status(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (json, rest) = take_json_flag(args);
    let (_, rest) = take_flag(&rest, &["--copies"]);

    if json {
        CommandTranslation::new(ctx.git(), RAW_PATH_OPTIONS)
            .extend(["status", "--porcelain=v2", "--untracked-files=all"])
            .extend(rest)
            .with_transform(OutputTransform::Status)
    } else {
        CommandTranslation::new(ctx.git(), ["status"]).extend(rest)
    }
}

/// Rewrite `git status --porcelain=v2` output as a Sapling status JSON array
pub(crate) fn status_to_json(output: &str) -> String {
    let entries: Vec<FileStatusEntry> = output
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let entry = parse_porcelain_line(line);
            if entry.is_none() {
                debug!("Skipping status line: {:?}", line);
            }
            entry
        })
        .collect();

    to_json(&entries)
}

fn parse_porcelain_line(line: &str) -> Option<FileStatusEntry> {
    let (kind, rest) = line.split_once(' ')?;

    match kind {
        // 1 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>
        "1" => {
            let fields: Vec<&str> = rest.splitn(8, ' ').collect();
            if fields.len() != 8 {
                return None;
            }
            Some(entry(fields[7], status_from_xy(fields[0])?, None))
        }
        // 2 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <Xscore> <path>\t<origPath>
        "2" => {
            let fields: Vec<&str> = rest.splitn(9, ' ').collect();
            if fields.len() != 9 {
                return None;
            }
            let (path, original) = fields[8].split_once('\t')?;
            Some(entry(path, status_from_xy(fields[0])?, Some(original)))
        }
        // u <XY> <sub> <m1> <m2> <m3> <mW> <h1> <h2> <h3> <path>
        "u" => {
            let fields: Vec<&str> = rest.splitn(10, ' ').collect();
            if fields.len() != 10 {
                return None;
            }
            Some(entry(fields[9], UNRESOLVED, None))
        }
        "?" => Some(entry(rest, UNTRACKED, None)),
        "!" => Some(entry(rest, IGNORED, None)),
        _ => None,
    }
}

/// The worktree letter decides; a clean worktree falls back to the staged letter
///
/// A change that is only staged (`A.`, `R.`, `M.`) still reports its
/// staged code instead of being dropped as unmodified.
fn status_from_xy(xy: &str) -> Option<&'static str> {
    let mut letters = xy.chars();
    let staged = letters.next()?;
    let worktree = letters.next()?;

    match map_status_code(worktree) {
        Some(code) => Some(code),
        None => map_status_code(staged),
    }
}

/// Build an entry from paths exactly as they appear in the porcelain
fn entry(path: &str, status: &str, renamed_from: Option<&str>) -> FileStatusEntry {
    FileStatusEntry {
        path: unquote_path(path),
        status: status.to_string(),
        renamed_from: renamed_from.map(unquote_path),
    }
}
