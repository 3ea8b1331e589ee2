//! Link classification for the rewriter.

use super::scan::split_target;
use crate::plan::RelocationMap;

/// What a link target points at, as far as relocation is concerned.
///
/// Only [`LinkClass::InternalMapped`] links are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Absolute URI such as `https://…`.
    External,
    /// Empty target or a pure `#fragment`.
    FragmentOnly,
    /// A file that is not a managed document (images, PDFs, …).
    NonDocument,
    /// A document the plan does not relocate.
    InternalUnmapped,
    /// A document the plan relocates.
    InternalMapped,
}

/// Classifies a link target; the first matching rule wins.
///
/// `target` is trimmed before inspection. The extension comparison is
/// case-sensitive.
#[must_use]
pub fn classify(target: &str, extension: &str, map: &RelocationMap) -> LinkClass {
    let target = target.trim();
    if target.is_empty() || target.starts_with('#') {
        return LinkClass::FragmentOnly;
    }
    if has_uri_scheme(target) {
        return LinkClass::External;
    }

    let (file_part, _) = split_target(target);
    if !has_extension(file_part, extension, false) {
        return LinkClass::NonDocument;
    }
    if map.destination_of(base_name(file_part)).is_some() {
        LinkClass::InternalMapped
    } else {
        LinkClass::InternalUnmapped
    }
}

/// Returns `true` for targets of the form `scheme://…`.
#[must_use]
pub fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Returns `true` if `file_part` ends in `.<extension>`.
#[must_use]
pub fn has_extension(file_part: &str, extension: &str, ignore_case: bool) -> bool {
    let suffix_len = extension.len() + 1;
    if file_part.len() < suffix_len || !file_part.is_char_boundary(file_part.len() - suffix_len) {
        return false;
    }
    let (_, suffix) = file_part.split_at(file_part.len() - suffix_len);
    let Some(ext) = suffix.strip_prefix('.') else {
        return false;
    };
    if ignore_case {
        ext.eq_ignore_ascii_case(extension)
    } else {
        ext == extension
    }
}

/// Last path segment of a link's file part.
#[must_use]
pub fn base_name(file_part: &str) -> &str {
    file_part.rsplit(['/', '\\']).next().unwrap_or(file_part)
}
