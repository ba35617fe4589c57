//! Log translation
//!
//! Sapling's UI asks for commits through `log --template ... --rev ...`.
//! Three shapes of request are recognised:
//!
//! - a template naming `file_adds`/`file_mods`/`file_dels` wants the
//!   changed-files record of one commit
//! - a smartlog/stack revset, no revset, or any other template wants the
//!   full commit record stream (see [`RECORD_FIELD_COUNT`])
//! - anything else is a plain log of the given revision

use tracing::debug;

use crate::context::RepositoryContext;
use crate::paths::{unquote_path, RAW_PATH_OPTIONS};
use crate::revsets::git_revision;
use crate::transform::{to_json, OutputTransform};
use crate::translator::{take_option, CommandTranslation, REV_FLAGS, TEMPLATE_FLAGS};

/// Terminates every commit record and changed-files record
pub const COMMIT_END_MARK: &str = "<<COMMIT_END_MARK>>";

/// Separates the fields of one commit record
pub const FIELD_SEPARATOR: char = '\n';

/// Joins the values of a multi-valued field (bookmarks, parents)
pub const LIST_SEPARATOR: char = '\0';

/// Fields per commit record, description last
pub const RECORD_FIELD_COUNT: usize = 18;

/// Positions within a commit record
pub(crate) mod field {
    pub const HASH: usize = 0;
    pub const BOOKMARKS: usize = 5;
    pub const REMOTE_BOOKMARKS: usize = 6;
    pub const PARENTS: usize = 7;
    pub const IS_DOT: usize = 9;
    pub const TOTAL_FILE_COUNT: usize = 11;
}

/// Template keywords that select the changed-files record
const FILE_TEMPLATE_KEYWORDS: &[&str] = &["file_adds", "file_mods", "file_dels"];

/// Compact format for plain logs: hash, parents, author name, email, time, subject
const PLAIN_FORMAT: &str = "%H%x00%P%x00%an%x00%ae%x00%at%x00%s";

pub(crate) fn translate_log(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (template, rest) = take_option(args, TEMPLATE_FLAGS);
    let (revset, rest) = take_option(&rest, REV_FLAGS);
    let revset = revset.filter(|r| !r.is_empty());

    if let Some(template) = &template {
        if FILE_TEMPLATE_KEYWORDS.iter().any(|k| template.contains(k)) {
            let rev = git_revision(revset.as_deref().unwrap_or_default());
            debug!("Changed-files request for {}", rev);
            return CommandTranslation::new(ctx.git(), RAW_PATH_OPTIONS)
                .extend([
                    "show".to_string(),
                    "--format=%H".to_string(),
                    "--name-status".to_string(),
                    "--find-renames".to_string(),
                    "--find-copies".to_string(),
                    rev,
                ])
                .with_transform(OutputTransform::ChangedFiles);
        }
    }

    let wants_records = match &revset {
        None => true,
        Some(r) => r.contains("smartlog") || r.contains("stack") || template.is_some(),
    };

    if wants_records {
        return CommandTranslation::new(
            ctx.git(),
            [
                "log".to_string(),
                "--all".to_string(),
                format!("--format={}", record_format(&ctx.config().log.phase)),
                "--date-order".to_string(),
            ],
        )
        .extend(rest)
        .with_transform(OutputTransform::HeadAnnotate {
            batch_file_counts: ctx.config().log.batch_file_counts,
        });
    }

    CommandTranslation::new(
        ctx.git(),
        [
            "log".to_string(),
            format!("--format={}", PLAIN_FORMAT),
            git_revision(revset.as_deref().unwrap_or_default()),
        ],
    )
    .extend(rest)
}

/// `git log --format` string emitting one commit record per commit
///
/// Fields that git cannot fill are written as placeholders; the head
/// annotation pass fills the head marker, remote bookmarks and file count.
pub(crate) fn record_format(phase: &str) -> String {
    let phase = phase.replace('%', "%%");
    let fields: [&str; RECORD_FIELD_COUNT] = [
        "%H",           // hash
        "%s",           // title
        "%an",          // author
        "%cI",          // date, strict ISO 8601
        phase.as_str(), // phase
        "%D",           // bookmarks (raw decorations until annotated)
        "",             // remote bookmarks
        "%P",           // parents
        "",             // grandparents
        "",             // head marker
        "",             // files
        "0",            // total file count
        "",             // successor info
        "",             // closest predecessors
        "",             // diff id
        "{}",           // follower map
        "",             // stable commit metadata
        "%B",           // description
    ];

    let mut format = fields.join("%n");
    format.push_str("%n");
    format.push_str(COMMIT_END_MARK);
    format
}

/// Turn `git show --format=%H --name-status` output into the changed-files record
///
/// ```text
/// <hash>
/// ["added", ...]
/// ["modified", ...]
/// ["removed", ...]
/// <<COMMIT_END_MARK>>
/// ```
///
/// Renames count as modifications of the new path, copies as additions.
pub(crate) fn changed_files_record(output: &str) -> String {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let hash = lines.next().unwrap_or_default().trim();

    let mut added = Vec::new();
    let mut modified = Vec::new();
    let mut removed = Vec::new();

    for line in lines {
        let mut parts = line.split('\t');
        let code = parts.next().unwrap_or_default();
        let paths: Vec<&str> = parts.collect();
        // Renames and copies list the old path first
        let Some(path) = paths.last().map(|p| unquote_path(p)) else {
            debug!("Skipping name-status line: {:?}", line);
            continue;
        };

        match code.chars().next() {
            Some('A') | Some('C') => added.push(path),
            Some('D') => removed.push(path),
            _ => modified.push(path),
        }
    }

    format!(
        "{}\n{}\n{}\n{}\n{}",
        hash,
        to_json(&added),
        to_json(&modified),
        to_json(&removed),
        COMMIT_END_MARK
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsl_core::JslConfig;

    fn ctx() -> RepositoryContext {
        RepositoryContext::new("/repo", JslConfig::default())
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_format_has_all_fields() {
        let format = record_format("public");
        assert_eq!(format.matches("%n").count(), RECORD_FIELD_COUNT);
        assert!(format.starts_with("%H%n%s%n%an%n%cI%npublic%n%D%n"));
        assert!(format.ends_with("%B%n<<COMMIT_END_MARK>>"));
        assert!(record_format("100%").contains("%n100%%%n"));
    }

    #[test]
    fn test_changed_files_strategy() {
        let t = translate_log(
            &args(&["--template", "{file_adds|json}\n{file_mods|json}", "--rev", "abc123"]),
            &ctx(),
        );
        assert_eq!(
            t.args,
            args(&[
                "-c",
                "core.quotePath=false",
                "show",
                "--format=%H",
                "--name-status",
                "--find-renames",
                "--find-copies",
                "abc123",
            ])
        );
        assert_eq!(t.output_transform, Some(OutputTransform::ChangedFiles));
    }

    #[test]
    fn test_record_strategy() {
        for input in [
            args(&[]),
            args(&["--rev", "smartlog()"]),
            args(&["-r", "stack(.)"]),
            args(&["-T", "{node}", "-r", "abc"]),
        ] {
            let t = translate_log(&input, &ctx());
            assert_eq!(t.args[0], "log");
            assert_eq!(t.args[1], "--all");
            assert_eq!(t.args[2], format!("--format={}", record_format("public")));
            assert_eq!(t.args[3], "--date-order");
            assert_eq!(
                t.output_transform,
                Some(OutputTransform::HeadAnnotate {
                    batch_file_counts: true
                })
            );
        }
    }

    #[test]
    fn test_record_strategy_keeps_other_args() {
        let t = translate_log(&args(&["--limit", "5"]), &ctx());
        assert_eq!(&t.args[4..], &args(&["--limit", "5"])[..]);
    }

    #[test]
    fn test_plain_strategy() {
        let t = translate_log(&args(&["--rev", "max(successors(abc))", "-n", "1"]), &ctx());
        assert_eq!(
            t.args,
            args(&["log", "--format=%H%x00%P%x00%an%x00%ae%x00%at%x00%s", "abc", "-n", "1"])
        );
        assert!(t.output_transform.is_none());
    }

    #[test]
    fn test_changed_files_record_buckets() {
        let output = "\
1234567890abcdef1234567890abcdef12345678

A\tadded.rs
M\tmodified.rs
D\tdeleted.rs
R087\told_name.rs\tnew_name.rs
C100\tsource.rs\tcopy.rs
";
        let record = changed_files_record(output);
        let lines: Vec<&str> = record.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "1234567890abcdef1234567890abcdef12345678");
        assert_eq!(lines[1], r#"["added.rs","copy.rs"]"#);
        assert_eq!(lines[2], r#"["modified.rs","new_name.rs"]"#);
        assert_eq!(lines[3], r#"["deleted.rs"]"#);
        assert_eq!(lines[4], COMMIT_END_MARK);
    }

    #[test]
    fn test_changed_files_record_empty_commit() {
        let record = changed_files_record("abc\n");
        assert_eq!(record, format!("abc\n[]\n[]\n[]\n{}", COMMIT_END_MARK));
    }

    #[test]
    fn test_changed_files_record_quoted_paths() {
        let output = "abc\n\nA\t\"caf\\303\\251.txt\"\nR100\t\"old\\tname.rs\"\t\"new\\tname.rs\"\n";
        let lines: Vec<String> = changed_files_record(output)
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines[1], r#"["café.txt"]"#);
        assert_eq!(lines[2], r#"["new\tname.rs"]"#);
    }
}
