//! Merge conflict resolution

use serde::Serialize;

use crate::context::RepositoryContext;
use crate::paths::{unquote_path, RAW_PATH_OPTIONS};
use crate::transform::{to_json, OutputTransform};
use crate::translator::{take_option, CommandTranslation};

#[derive(Debug, Serialize)]
struct ConflictReport {
    command: Option<&'static str>,
    conflicts: Vec<Conflict>,
}

#[derive(Debug, Serialize)]
struct Conflict {
    path: String,
    status: &'static str,
}

pub(crate) fn translate_resolve(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    if args.iter().any(|a| a == "--list" || a == "--all") {
        return CommandTranslation::new(ctx.git(), RAW_PATH_OPTIONS)
            .extend(["diff", "--name-only", "--diff-filter=U"])
            .with_transform(OutputTransform::Conflicts);
    }

    if let (Some(file), _) = take_option(args, &["-m", "--mark"]) {
        return CommandTranslation::new(ctx.git(), ["add".to_string(), file]);
    }

    if let (Some(file), _) = take_option(args, &["-u", "--unmark"]) {
        return CommandTranslation::new(
            ctx.git(),
            ["checkout".to_string(), "-m".to_string(), "--".to_string(), file],
        );
    }

    CommandTranslation::new(ctx.git(), ["merge", "--continue"])
}

/// Turn a list of unmerged paths into Sapling's conflict report
pub(crate) fn conflicts_to_json(output: &str) -> String {
    let conflicts: Vec<Conflict> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|path| Conflict {
            path: unquote_path(path),
            status: "unresolved",
        })
        .collect();

    let report = ConflictReport {
        command: if conflicts.is_empty() { None } else { Some("merge") },
        conflicts,
    };
    to_json(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsl_core::JslConfig;

    fn run(list: &[&str]) -> CommandTranslation {
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        translate_resolve(&args, &RepositoryContext::new("/repo", JslConfig::default()))
    }

    #[test]
    fn test_translations() {
        let t = run(&["--tool", "internal:dumpjson", "--all"]);
        assert_eq!(
            t.args,
            ["-c", "core.quotePath=false", "diff", "--name-only", "--diff-filter=U"]
        );
        assert_eq!(t.output_transform, Some(OutputTransform::Conflicts));

        assert_eq!(run(&["--mark", "src/a.rs"]).args, ["add", "src/a.rs"]);
        assert_eq!(run(&["--unmark", "src/a.rs"]).args, ["checkout", "-m", "--", "src/a.rs"]);
        assert_eq!(run(&[]).args, ["merge", "--continue"]);
    }

    #[test]
    fn test_conflict_report() {
        let json: serde_json::Value =
            serde_json::from_str(&conflicts_to_json("src/a.rs\nsrc/b.rs\n\n")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "command": "merge",
                "conflicts": [
                    {"path": "src/a.rs", "status": "unresolved"},
                    {"path": "src/b.rs", "status": "unresolved"},
                ]
            })
        );
    }

    #[test]
    fn test_no_conflicts() {
        assert_eq!(conflicts_to_json("\n"), r#"{"command":null,"conflicts":[]}"#);
    }

    #[test]
    fn test_conflict_paths_unquoted() {
        let json: serde_json::Value =
            serde_json::from_str(&conflicts_to_json("\"caf\\303\\251.txt\"\n")).unwrap();
        assert_eq!(json["conflicts"][0]["path"], "café.txt");
    }
}
