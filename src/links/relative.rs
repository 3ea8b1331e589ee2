//! Relative-path arithmetic between root-relative document paths.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a root-relative path.
///
/// `.` segments are dropped and `..` pops the previous segment. Returns
/// `None` when a `..` would climb above the root, or when the path is
/// absolute.
#[must_use]
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

/// Link text that reaches `to_document` from a document at `from_document`.
///
/// Both paths are relative to the same root. The result uses forward
/// slashes regardless of platform, climbing out of `from_document`'s
/// directory with `..` as far as the two paths diverge.
#[must_use]
pub fn relative_link(from_document: &Path, to_document: &Path) -> String {
    let from_dir = from_document.parent().unwrap_or_else(|| Path::new(""));
    let from = segments(from_dir);
    let to = segments(to_document);

    // Never consume the target's file name as a shared directory.
    let shared = from
        .iter()
        .zip(to.iter().take(to.len().saturating_sub(1)))
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - shared];
    parts.extend(to[shared..].iter().map(String::as_str));
    parts.join("/")
}

fn segments(path: &Path) -> Vec<String> {
    normalize(path)
        .unwrap_or_else(|| path.to_path_buf())
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
