//! Bookmark translation
//!
//! Sapling bookmarks are git branches. Subscriptions have no git
//! counterpart and always list as empty.

use crate::context::RepositoryContext;
use crate::revsets::git_revision;
use crate::transform::OutputTransform;
use crate::translator::{take_flag, take_option, CommandTranslation, REV_FLAGS};

/// `bookmark [-f] [-d] [-r REV] [NAME..]` → `branch [-f] [-d] [NAME.. [REV]]`
pub(crate) fn translate_bookmark(args: &[String], ctx: &RepositoryContext) -> CommandTranslation {
    if args.iter().any(|a| a == "--list-subscriptions") {
        return CommandTranslation::new(ctx.git(), ["branch", "--list"])
            .with_transform(OutputTransform::EmptyList);
    }

    let (rev, rest) = take_option(args, REV_FLAGS);
    let (force, rest) = take_flag(&rest, &["-f", "--force"]);
    let (delete, rest) = take_flag(&rest, &["-d", "--delete"]);

    let (flags, positional): (Vec<String>, Vec<String>) =
        rest.into_iter().partition(|a| a.starts_with('-'));

    let mut translation = CommandTranslation::new(ctx.git(), ["branch"]);
    if force {
        translation = translation.extend(["--force"]);
    }
    if delete {
        translation = translation.extend(["--delete"]);
    }
    translation = translation.extend(flags);

    let named = !positional.is_empty();
    translation = translation.extend(positional);
    match rev {
        Some(rev) if named && !delete => translation.extend([git_revision(&rev)]),
        _ => translation,
    }
}
