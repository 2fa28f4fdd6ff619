//! Scope matching — glob patterns over workspace-relative POSIX paths
//!
//! `**` matches any run of characters including `/`, `*` matches within a
//! single path segment, everything else (`?` included) is literal. A
//! pattern that matches neither way is retried as a directory prefix, so
//! `src/auth` owns everything under `src/auth/`.

use regex::Regex;
use std::path::Path;

/// Convert a glob scope pattern to an anchored regex and test the path
/// against it.
fn glob_match(pattern: &str, path: &str) -> bool {
    let mut regex_str = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    regex_str.push_str(".*"); // ** crosses directory boundaries
                    i += 2;
                    continue;
                }
                regex_str.push_str("[^/]*"); // * stays within one segment
            }
            '?' | '.' | '^' | '$' | '+' | '{' | '}' | '[' | ']' | '|' | '(' | ')' | '\\' => {
                regex_str.push('\\');
                regex_str.push(chars[i]);
            }
            c => regex_str.push(c),
        }
        i += 1;
    }
    regex_str.push('$');

    Regex::new(&regex_str)
        .map(|re| re.is_match(path))
        .unwrap_or(false)
}

/// Whether a workspace-relative POSIX path falls inside a scope pattern.
pub fn matches_scope(path: &str, pattern: &str) -> bool {
    if path == pattern {
        return true;
    }
    if glob_match(pattern, path) {
        return true;
    }
    // Bare directory patterns own their whole subtree.
    let dir_prefix = if pattern.ends_with('/') {
        pattern.to_string()
    } else {
        format!("{}/", pattern)
    };
    path.starts_with(&dir_prefix)
}

/// Normalize a tool-supplied path to workspace-relative POSIX form.
///
/// Backslashes become slashes, a leading `./` is dropped, and an absolute
/// path under the workspace root is rebased onto it. Absolute paths outside
/// the workspace are returned as-is (still POSIX-normalized); scope patterns
/// are workspace-relative, so they will not match such paths.
pub fn to_workspace_relative(workspace: &Path, raw: &str) -> String {
    let posix = raw.replace('\\', "/");
    let workspace_posix = workspace.to_string_lossy().replace('\\', "/");

    let rebased = if posix == workspace_posix {
        String::new()
    } else if let Some(rest) = posix.strip_prefix(&format!("{}/", workspace_posix)) {
        rest.to_string()
    } else {
        posix
    };

    rebased.strip_prefix("./").unwrap_or(&rebased).to_string()
}
