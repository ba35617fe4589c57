//! Revision expression simplification
//!
//! Sapling revsets like `max(successors(abc123))` pick a commit through
//! obsolescence history. Git has no such history, so the selector wrappers
//! are peeled off and the inner reference is used directly.

/// Unary selector functions that are replaced by their argument
const WRAPPERS: &[&str] = &["max", "min", "successors", "predecessors"];

/// Strip selector wrappers from a revision expression
///
/// Every `max(..)`, `min(..)`, `successors(..)` and `predecessors(..)` call
/// is replaced by its (recursively simplified) argument, at any nesting
/// depth. Other text, including calls to other functions, is kept as is.
/// A wrapper with unbalanced parentheses is left untouched.
pub fn simplify_revision(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut rest = expr;

    while let Some(c) = rest.chars().next() {
        if is_ident_char(c) {
            let end = rest
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(rest.len());
            let (word, after) = rest.split_at(end);

            if WRAPPERS.contains(&word) {
                if let Some((argument, remainder)) = call_argument(after) {
                    out.push_str(&simplify_revision(argument.trim()));
                    rest = remainder;
                    continue;
                }
            }

            out.push_str(word);
            rest = after;
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Simplify an expression into something `git rev-parse` accepts
///
/// An empty expression or Sapling's `.` (the working copy parent) is `HEAD`.
pub(crate) fn git_revision(expr: &str) -> String {
    let simplified = simplify_revision(expr.trim());
    match simplified.trim() {
        "" | "." => "HEAD".to_string(),
        other => other.to_string(),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `(argument)remainder` at the matching close paren
fn call_argument(after_name: &str) -> Option<(&str, &str)> {
    let body = after_name.trim_start().strip_prefix('(')?;
    let mut depth = 1usize;

    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&body[..i], &body[i + 1..]));
                }
            }
            _ => {}
        }
    }

    None
}
