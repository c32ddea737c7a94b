//! Virtual path normalization
//!
//! All index keys are canonical absolute paths:
//! - Always start with `/`
//! - Directories end with `/`, files do not
//! - No empty, `.` or `..` components
//!
//! The root directory is `/`.

/// Path separator used inside the archive
pub const SEPARATOR: char = '/';

/// Canonical path of the root directory
pub const ROOT: &str = "/";

/// Resolve a raw path to a canonical directory path (trailing separator)
pub fn resolve_dir(raw: &str, cwd: &str) -> String {
    to_dir_form(&components(raw, cwd))
}

/// Resolve a raw path to a canonical file path (no trailing separator)
///
/// Paths that collapse to the root resolve to `/`.
pub fn resolve_file(raw: &str, cwd: &str) -> String {
    let parts = components(raw, cwd);
    if parts.is_empty() {
        return ROOT.to_string();
    }
    let mut out = String::with_capacity(raw.len() + cwd.len() + 1);
    for part in &parts {
        out.push(SEPARATOR);
        out.push_str(part);
    }
    out
}

/// Parent directory of a canonical path, clamped at the root
pub fn parent(path: &str) -> String {
    let mut parts = components(path, ROOT);
    parts.pop();
    to_dir_form(&parts)
}

/// Last component of a canonical path (empty for the root)
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or_default()
}

/// Whether a canonical path is in directory form
pub fn is_dir_form(path: &str) -> bool {
    path.ends_with(SEPARATOR)
}

/// Strip the trailing separator from a directory-form path
pub fn to_file_form(path: &str) -> String {
    if path == ROOT {
        return ROOT.to_string();
    }
    path.trim_end_matches(SEPARATOR).to_string()
}

/// Convert an archive member name into its canonical key
///
/// Member names such as `./docs/a.txt`, `docs/` or `/docs` are accepted.
/// Returns `None` when the name refers to the archive root itself.
pub fn canonical_member(name: &str, is_dir: bool) -> Option<String> {
    let parts = components(name, ROOT);
    if parts.is_empty() {
        return None;
    }
    if is_dir {
        Some(to_dir_form(&parts))
    } else {
        Some(resolve_file(name, ROOT))
    }
}

/// All proper ancestor directories of a canonical path, root first
///
/// `/a/b/c.txt` yields `/`, `/a/`, `/a/b/`.
pub fn ancestors(path: &str) -> Vec<String> {
    let parts = components(path, ROOT);
    let mut out = Vec::with_capacity(parts.len());
    for depth in 0..parts.len() {
        out.push(to_dir_form(&parts[..depth]));
    }
    out
}

/// Split `raw` into normalized components, resolving it against `cwd`
///
/// `.` is dropped and `..` pops the previous component; popping past the
/// root is a no-op.
fn components<'a>(raw: &'a str, cwd: &'a str) -> Vec<&'a str> {
    let mut parts: Vec<&str> = Vec::new();

    let base = if raw.starts_with(SEPARATOR) { "" } else { cwd };

    for part in base.split(SEPARATOR).chain(raw.split(SEPARATOR)) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    parts
}

fn to_dir_form(parts: &[&str]) -> String {
    let mut out = String::from(ROOT);
    for part in parts {
        out.push_str(part);
        out.push(SEPARATOR);
    }
    out
}
