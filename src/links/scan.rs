//! Link extraction.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("link pattern is a valid regex")
});

/// A `[label](target)` occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    /// Text between the brackets.
    pub label: &'a str,
    /// Text between the parentheses, exactly as written.
    pub target: &'a str,
    /// Byte range of the whole link in the document.
    pub span: Range<usize>,
    /// 1-based line the link starts on.
    pub line: usize,
}

/// Extracts every link in `text`, in order of appearance.
#[must_use]
pub fn links(text: &str) -> Vec<Link<'_>> {
    let mut line = 1;
    let mut counted_to = 0;

    LINK_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            let target = caps.get(2)?;

            line += text[counted_to..whole.start()].matches('\n').count();
            counted_to = whole.start();

            Some(Link {
                label: label.as_str(),
                target: target.as_str(),
                span: whole.range(),
                line,
            })
        })
        .collect()
}

/// Splits a target on its first `#` into the file part and the fragment.
///
/// The fragment keeps its leading `#`; everything after the first `#`,
/// including further `#`s, belongs to it.
#[must_use]
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.find('#') {
        Some(at) => (&target[..at], Some(&target[at..])),
        None => (target, None),
    }
}
