use std::collections::BTreeSet;

use super::schema::{IssueKind, ParseError, PathSegment};

/// Field name that picks the variant of a picture element.
pub const DISCRIMINATOR: &str = "type";

/// Collect human readable locations of the issues in `error`.
///
/// Issues inside unions are ambiguous: a union fails when no option matches,
/// and most options fail only because they are not what the user meant.  Any
/// issue list that contains a type error on the discriminator itself yields
/// `None`: the user's `type` matched no variant at all, and listing the fields
/// of every other variant would only mislead.
pub fn parse_error_paths(error: &ParseError) -> Option<BTreeSet<String>> {
    let mut contenders = BTreeSet::new();
    for issue in &error.issues {
        match &issue.kind {
            IssueKind::InvalidUnion { branches } => {
                for branch in branches {
                    if let Some(nested) = parse_error_paths(branch) {
                        contenders.extend(nested);
                    }
                }
            }
            IssueKind::InvalidType { .. } => {
                if matches!(issue.path.last(), Some(PathSegment::Key(key)) if key == DISCRIMINATOR)
                {
                    return None;
                }
                contenders.insert(path_string(&issue.path));
            }
            IssueKind::Custom { .. } => {}
            _ => {
                contenders.insert(path_string(&issue.path));
            }
        }
    }
    Some(contenders)
}

/// Render a path as e.g. `elements[2] -> style`.
pub fn path_string(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Index(index) => {
                out.push_str(&format!("[{index}]"));
            }
            PathSegment::Key(key) if out.is_empty() => out.push_str(key),
            PathSegment::Key(key) => {
                out.push_str(" -> ");
                out.push_str(key);
            }
        }
    }
    out
}
