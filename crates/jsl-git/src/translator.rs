//! Sapling verb dispatch
//!
//! [`translate`] maps one Sapling command line onto one git invocation.
//! Verbs with real argument rewriting live in their own modules; the
//! near-literal ones are handled here.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::context::RepositoryContext;
use crate::revsets::git_revision;
use crate::transform::OutputTransform;
use crate::{blame, bookmark, config_cmd, log, resolve, status};

/// Template flag spellings (`-Tjson`, `-T json`, `--template json`)
pub(crate) const TEMPLATE_FLAGS: &[&str] = &["-T", "--template"];

/// Revision flag spellings
pub(crate) const REV_FLAGS: &[&str] = &["-r", "--rev"];

/// One incoming Sapling command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub verb: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    /// Split a full Sapling argument list into verb and arguments
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let verb = argv.next()?;
        Some(Self {
            verb,
            args: argv.collect(),
        })
    }

    /// Translate this request
    pub fn translate(&self, ctx: &RepositoryContext) -> CommandTranslation {
        translate(&self.verb, &self.args, ctx)
    }
}

/// The git invocation standing in for a Sapling command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTranslation {
    pub program: String,
    pub args: Vec<String>,
    /// Reshapes the captured stdout into what the Sapling caller expects
    pub output_transform: Option<OutputTransform>,
    /// The command runs through `git branchless`, which must be installed
    pub uses_extension_subsystem: bool,
}

impl CommandTranslation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            output_transform: None,
            uses_extension_subsystem: false,
        }
    }

    pub fn with_transform(mut self, transform: OutputTransform) -> Self {
        self.output_transform = Some(transform);
        self
    }

    pub fn with_extension_subsystem(mut self) -> Self {
        self.uses_extension_subsystem = true;
        self
    }

    /// Append more arguments
    pub(crate) fn extend<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Translate a Sapling verb and its arguments into a git invocation
///
/// Never fails: unknown verbs are logged and passed to git unchanged.
#[instrument(skip(args, ctx), fields(cwd = %ctx.cwd().display()))]
pub fn translate(verb: &str, args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let git = ctx.git();

    let translation = match verb {
        "root" => {
            if args.iter().any(|a| a == "--dotdir") {
                CommandTranslation::new(git, ["rev-parse", "--git-dir"])
            } else {
                CommandTranslation::new(git, ["rev-parse", "--show-toplevel"])
            }
        }
        // git has no nested roots; the top level is the only one
        "debugroots" => CommandTranslation::new(git, ["rev-parse", "--show-toplevel"]),

        "status" => status::translate_status(args, ctx),
        "log" => log::translate_log(args, ctx),
        "goto" => translate_goto(args, ctx),

        "rebase" => CommandTranslation::new(git, ["branchless", "rebase"])
            .extend(args.iter().cloned())
            .with_extension_subsystem(),
        "histedit" => CommandTranslation::new(git, ["branchless", "rebase", "--interactive"])
            .extend(args.iter().cloned())
            .with_extension_subsystem(),

        "commit" => CommandTranslation::new(git, ["commit"]).extend(args.iter().cloned()),
        "amend" => CommandTranslation::new(git, ["commit", "--amend"]).extend(args.iter().cloned()),
        "pull" => CommandTranslation::new(git, ["pull"]).extend(args.iter().cloned()),
        "push" => translate_push(args, ctx),
        "diff" => CommandTranslation::new(git, ["diff"]).extend(args.iter().cloned()),
        "show" => CommandTranslation::new(git, ["show"]).extend(args.iter().cloned()),
        "cat" => translate_cat(args, ctx),
        "blame" => blame::translate_blame(args, ctx),

        "bookmark" | "bookmarks" => bookmark::translate_bookmark(args, ctx),
        "resolve" => resolve::translate_resolve(args, ctx),
        "config" => config_cmd::translate_config(args, ctx),

        "smartlog" | "sl" => CommandTranslation::new(git, ["branchless", "smartlog"])
            .extend(args.iter().cloned())
            .with_extension_subsystem(),

        // Sapling-only queries with nothing to ask git; answer with empty values
        "debuggitmodules" => CommandTranslation::new("echo", ["[]"]),
        "debugcommitmessage" => CommandTranslation::new("echo", [""]),

        _ => {
            warn!("Untranslated Sapling command: {}", verb);
            CommandTranslation::new(git, std::iter::once(verb.to_string()).chain(args.iter().cloned()))
        }
    };

    debug!(
        "Translated {} -> {} {:?}",
        verb, translation.program, translation.args
    );
    translation
}

/// `goto [REV] [--rev REV] [--clean]` → `checkout [--force] REV`
fn translate_goto(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (rev, rest) = take_option(args, REV_FLAGS);
    let (clean, rest) = take_flag(&rest, &["-C", "--clean"]);

    let target = rev
        .or_else(|| rest.iter().find(|a| !a.starts_with('-')).cloned())
        .unwrap_or_default();

    let mut translation = CommandTranslation::new(ctx.git(), ["checkout"]);
    if clean {
        translation = translation.extend(["--force"]);
    }
    translation.extend([git_revision(&target)])
}

/// `push [--to NAME] [--rev REV]` → `push --set-upstream REMOTE SRC[:NAME]`
fn translate_push(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (to, rest) = take_option(args, &["-t", "--to"]);
    let (rev, rest) = take_option(&rest, REV_FLAGS);

    let source = rev.map(|r| git_revision(&r)).unwrap_or_else(|| "HEAD".to_string());
    let refspec = match to {
        Some(name) => format!("{}:{}", source, name),
        None => source,
    };

    CommandTranslation::new(
        ctx.git(),
        ["push".to_string(), "--set-upstream".to_string(), ctx.config().default_remote.clone(), refspec],
    )
    .extend(rest)
}

/// `cat FILE [--rev REV]` → `show REV:FILE`
fn translate_cat(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    let (rev, rest) = take_option(args, REV_FLAGS);
    let file = rest
        .iter()
        .rev()
        .find(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_default();
    let rev = git_revision(rev.as_deref().unwrap_or_default());

    CommandTranslation::new(ctx.git(), ["show".to_string(), format!("{}:{}", rev, file)])
}

/// Remove the first occurrence of an option and return its value
///
/// Accepts `--name value`, `--name=value`, `-n value` and `-nvalue`. A
/// trailing option with no value yields an empty string.
pub(crate) fn take_option(args: &[String], names: &[&str]) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if value.is_some() {
            rest.push(arg.clone());
            continue;
        }

        if names.contains(&arg.as_str()) {
            value = Some(iter.next().cloned().unwrap_or_default());
            continue;
        }

        let attached = names.iter().find_map(|name| {
            if name.starts_with("--") {
                arg.strip_prefix(name)?.strip_prefix('=')
            } else {
                arg.strip_prefix(name).filter(|v| !v.is_empty())
            }
        });
        match attached {
            Some(v) => value = Some(v.to_string()),
            None => rest.push(arg.clone()),
        }
    }

    (value, rest)
}

/// Remove every occurrence of a boolean flag
pub(crate) fn take_flag(args: &[String], names: &[&str]) -> (bool, Vec<String>) {
    let rest: Vec<String> = args
        .iter()
        .filter(|a| !names.contains(&a.as_str()))
        .cloned()
        .collect();
    (rest.len() != args.len(), rest)
}

/// Remove a `-Tjson` style template request; true when JSON was asked for
pub(crate) fn take_json_flag(args: &[String]) -> (bool, Vec<String>) {
    let (template, rest) = take_option(args, TEMPLATE_FLAGS);
    (template.as_deref() == Some("json"), rest)
}
