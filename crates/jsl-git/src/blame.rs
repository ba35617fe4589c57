//! Blame translation
//!
//! `sl blame -Tjson --change --rev REV FILE` becomes
//! `git blame --line-porcelain REV -- FILE`, and the porcelain is turned
//! into `[{"path", "lines": [{"line", "node", "lineno"}]}]`.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::warn;

use crate::context::RepositoryContext;
use crate::paths::{unquote_path, RAW_PATH_OPTIONS};
use crate::revsets::git_revision;
use crate::transform::{to_json, OutputTransform};
use crate::translator::{take_flag, take_json_flag, take_option, CommandTranslation, REV_FLAGS};

#[derive(Debug, Serialize)]
struct BlameFile {
    path: String,
    lines: Vec<BlameLine>,
}

#[derive(Debug, Serialize)]
struct BlameLine {
    line: String,
    node: String,
    lineno: usize,
}

/// `<sha> <orig-line> <final-line> [<group-size>]`
fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^([0-9a-f]{40}|[0-9a-f]{64}) (\d+) (\d+)(?: \d+)?$")
            .expect("blame header pattern is valid")
    })
}

pub(crate) fn translate_blame(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (json, rest) = take_json_flag(args);
    if !json {
        return CommandTranslation::new(ctx.git(), ["blame"]).extend(rest);
    }

    let (rev, rest) = take_option(&rest, REV_FLAGS);
    let (_, rest) = take_flag(&rest, &["--change", "-c"]);
    let (flags, files): (Vec<String>, Vec<String>) =
        rest.into_iter().partition(|a| a.starts_with('-'));

    let mut translation = CommandTranslation::new(ctx.git(), RAW_PATH_OPTIONS)
        .extend(["blame", "--line-porcelain"])
        .extend(flags);
    if let Some(rev) = rev {
        translation = translation.extend([git_revision(&rev)]);
    }
    translation
        .extend(["--"])
        .extend(files)
        .with_transform(OutputTransform::Blame)
}

/// Convert `git blame --line-porcelain` output to blame JSON
///
/// Output that contains no blame lines at all is returned unchanged.
pub(crate) fn blame_to_json(output: &str) -> String {
    let mut path = String::new();
    let mut lines = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for raw in output.lines() {
        if let Some(content) = raw.strip_prefix('\t') {
            if let Some((node, lineno)) = current.take() {
                lines.push(BlameLine {
                    line: format!("{}\n", content),
                    node,
                    lineno,
                });
            }
        } else if let Some(caps) = header_pattern().captures(raw) {
            let lineno = caps[3].parse().unwrap_or(0);
            current = Some((caps[1].to_string(), lineno));
        } else if let Some(name) = raw.strip_prefix("filename ") {
            if path.is_empty() {
                path = unquote_path(name);
            }
        }
    }

    if lines.is_empty() {
        if !output.trim().is_empty() {
            warn!("Blame output not in porcelain form, passing through");
            return output.to_string();
        }
        return "[]".to_string();
    }

    to_json(&[BlameFile { path, lines }])
}
