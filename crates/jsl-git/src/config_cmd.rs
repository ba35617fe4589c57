//! `sl config` translation

use crate::context::RepositoryContext;
use crate::transform::{to_json, ConfigEntry, OutputTransform};
use crate::translator::{take_json_flag, CommandTranslation};

pub(crate) fn translate_config(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (json, rest) = take_json_flag(args);

    if json {
        let sections = rest.into_iter().filter(|a| !a.starts_with('-')).collect();
        return CommandTranslation::new(ctx.git(), ["config", "--list"])
            .with_transform(OutputTransform::Config { sections });
    }

    CommandTranslation::new(ctx.git(), ["config"]).extend(args.iter().cloned())
}

/// Filter `git config --list` output to the requested names
///
/// A requested name matches the key itself or any key in that section
/// (`user` matches `user.name`). No requested names keeps everything.
pub(crate) fn config_to_json(output: &str, sections: &[String]) -> String {
    let entries: Vec<ConfigEntry> = output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let (name, value) = line.split_once('=').unwrap_or((line, ""));
            if name.is_empty() {
                return None;
            }
            let wanted = sections.is_empty()
                || sections.iter().any(|s| {
                    name == s
                        || name
                            .strip_prefix(s.as_str())
                            .is_some_and(|tail| tail.starts_with('.'))
                });
            wanted.then(|| ConfigEntry {
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect();

    to_json(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsl_core::JslConfig;

    fn sections(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_section_filter() {
        let output = "user.name=Alice\ncore.editor=vim\n";
        let json: serde_json::Value =
            serde_json::from_str(&config_to_json(output, &sections(&["user"]))).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "user.name", "value": "Alice"}]));
    }

    #[test]
    fn test_exact_key_and_value_with_equals() {
        let output = "ui.username=Alice <a@example.com>\nalias.lg=log --format=%h\nuiextra.x=1\n";
        let json: serde_json::Value = serde_json::from_str(&config_to_json(
            output,
            &sections(&["ui.username", "alias", "ui"]),
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "ui.username", "value": "Alice <a@example.com>"},
                {"name": "alias.lg", "value": "log --format=%h"},
            ])
        );
    }

    #[test]
    fn test_no_sections_keeps_all() {
        let json: serde_json::Value =
            serde_json::from_str(&config_to_json("a.b=1\nflag\n\n", &[])).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"name": "a.b", "value": "1"}, {"name": "flag", "value": ""}])
        );
    }

    #[test]
    fn test_translation() {
        let ctx = RepositoryContext::new("/repo", JslConfig::default());
        let args: Vec<String> = sections(&["-Tjson", "isl.foo", "ui"]);
        let t = translate_config(&args, &ctx);
        assert_eq!(t.args, ["config", "--list"]);
        assert_eq!(
            t.output_transform,
            Some(OutputTransform::Config {
                sections: sections(&["isl.foo", "ui"])
            })
        );

        let t = translate_config(&sections(&["user.name", "Bob"]), &ctx);
        assert_eq!(t.args, ["config", "user.name", "Bob"]);
        assert!(t.output_transform.is_none());
    }
}
