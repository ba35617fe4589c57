//! Ref decoration classification
//!
//! `git log --format=%D` prints decorations like
//! `HEAD -> main, origin/main, tag: v1.0`. Sapling separates local
//! bookmarks from remote bookmarks, so the list is split in two.

use crate::log::{COMMIT_END_MARK, LIST_SEPARATOR};

/// Local and remote branch names in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefLists {
    pub local: Vec<String>,
    pub remote: Vec<String>,
}

/// Split a `%D` decoration string into local and remote branches
///
/// Tags and a bare detached `HEAD` are dropped. Names containing `/` are
/// taken as remote branches, so a local branch such as `feat/x` is listed
/// as remote too; `%D` does not say which namespace a name came from.
pub fn classify_refs(decorations: &str) -> RefLists {
    let mut lists = RefLists::default();

    let trimmed = decorations.trim_matches(|c: char| c == LIST_SEPARATOR || c.is_whitespace());
    if trimmed.is_empty() || trimmed == COMMIT_END_MARK {
        return lists;
    }

    for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(branch) = token.strip_prefix("HEAD -> ") {
            push_unique(&mut lists.local, branch.trim());
            continue;
        }

        if token.starts_with("tag: ") || token == "HEAD" {
            continue;
        }

        if token.contains('/') {
            push_unique(&mut lists.remote, token);
        } else {
            push_unique(&mut lists.local, token);
        }
    }

    lists
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !name.is_empty() && !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}
