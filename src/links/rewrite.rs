//! Rewriting a document's links for the future layout.

use std::borrow::Cow;
use std::path::Path;

use super::classify::{base_name, classify, LinkClass};
use super::relative::relative_link;
use super::scan::{links, split_target};
use crate::plan::RelocationMap;

/// One link whose target text changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLink {
    /// 1-based line of the link.
    pub line: usize,
    /// Target as it was written.
    pub from: String,
    /// Target as it will be written.
    pub to: String,
}

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    /// The new text; borrowed when nothing changed.
    pub text: Cow<'a, str>,
    /// Links whose text changed, in document order.
    pub links: Vec<RewrittenLink>,
}

impl Rewrite<'_> {
    /// Returns `true` if the output differs from the input.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self.text, Cow::Owned(_))
    }
}

/// Rewrites every link in `text` that points at a relocated document.
///
/// `future_path` is where the document being rewritten will live, relative
/// to the root. A link to a relocated document becomes the relative path
/// from `future_path`'s directory to the target's destination, with any
/// fragment reattached verbatim. Every other link, and any text the link
/// pattern does not match, is copied unchanged.
#[must_use]
pub fn rewrite<'a>(
    text: &'a str,
    future_path: &Path,
    map: &RelocationMap,
    extension: &str,
) -> Rewrite<'a> {
    let mut out = String::new();
    let mut copied_to = 0;
    let mut rewritten = Vec::new();

    for link in links(text) {
        if classify(link.target, extension, map) != LinkClass::InternalMapped {
            continue;
        }
        let (file_part, fragment) = split_target(link.target.trim());
        let Some(destination) = map.destination_of(base_name(file_part)) else {
            continue;
        };

        let new_target =
            format!("{}{}", relative_link(future_path, destination), fragment.unwrap_or(""));
        let replacement = format!("[{}]({new_target})", link.label);
        if replacement == text[link.span.clone()] {
            continue;
        }

        out.push_str(&text[copied_to..link.span.start]);
        out.push_str(&replacement);
        copied_to = link.span.end;
        rewritten.push(RewrittenLink {
            line: link.line,
            from: link.target.to_string(),
            to: new_target,
        });
    }

    if rewritten.is_empty() {
        return Rewrite { text: Cow::Borrowed(text), links: rewritten };
    }
    out.push_str(&text[copied_to..]);
    Rewrite { text: Cow::Owned(out), links: rewritten }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RelocationEntry;

    fn map(pairs: &[(&str, &str)]) -> RelocationMap {
        RelocationMap::new(pairs.iter().map(|(i, d)| RelocationEntry::new(*i, *d)).collect())
            .unwrap()
    }

    #[test]
    fn link_to_moved_document_follows_it() {
        let map = map(&[("B.md", "sub/B.md")]);
        let result = rewrite("[see B](B.md)", Path::new("A.md"), &map, "md");

        assert_eq!(result.text, "[see B](sub/B.md)");
        assert_eq!(
            result.links,
            vec![RewrittenLink { line: 1, from: "B.md".into(), to: "sub/B.md".into() }]
        );
    }

    #[test]
    fn moving_document_fixes_its_own_links() {
        let map = map(&[("A.md", "deep/er/A.md"), ("B.md", "other/B.md")]);
        let text = "[b](B.md) [a](A.md#self)";
        let result = rewrite(text, Path::new("deep/er/A.md"), &map, "md");

        assert_eq!(result.text, "[b](../../other/B.md) [a](A.md#self)");
    }

    #[test]
    fn fragment_is_preserved_verbatim() {
        let map = map(&[("B.md", "sub/B.md")]);
        let result = rewrite("[x](B.md#sec#tion) [y](B.md#)", Path::new("A.md"), &map, "md");
        assert_eq!(result.text, "[x](sub/B.md#sec#tion) [y](sub/B.md#)");
    }

    #[test]
    fn already_correct_document_is_untouched() {
        let map = map(&[("B.md", "sub/B.md"), ("A.md", "x/A.md")]);
        let text = "line\n[b](../sub/B.md#top)\n[a](A.md)\n";

        let result = rewrite(text, Path::new("x/A.md"), &map, "md");

        assert!(!result.changed());
        assert!(result.links.is_empty());
        assert!(matches!(result.text, Cow::Borrowed(t) if std::ptr::eq(t, text)));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let map = map(&[("B.md", "a/B.md"), ("C.md", "b/c/C.md")]);
        let text = "[b](B.md) and [c](C.md#h)";
        let first = rewrite(text, Path::new("b/c/C.md"), &map, "md");
        let second = rewrite(&first.text, Path::new("b/c/C.md"), &map, "md");

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn non_targets_pass_through_byte_identical() {
        let map = map(&[("B.md", "sub/B.md")]);
        let text = concat!(
            "[web](https://example.com/B.md)\n",
            "[top](#B.md)\n",
            "![img](B.png)\n",
            "[pdf](files/B.pdf)\n",
            "[other](C.md)\n",
            "[nested [label]](B.md)\n",
            "[mail](mailto:b@example.com)\n",
            "[unterminated](B.md\n",
        );

        let result = rewrite(text, Path::new("A.md"), &map, "md");

        assert!(!result.changed());
        assert_eq!(result.text, text);
    }

    #[test]
    fn whitespace_around_target_is_dropped_on_rewrite() {
        let map = map(&[("B.md", "sub/B.md")]);
        let result = rewrite("[b]( B.md )", Path::new("A.md"), &map, "md");
        assert_eq!(result.text, "[b](sub/B.md)");
    }

    #[test]
    fn custom_extension() {
        let map = map(&[("B.txt", "sub/B.txt")]);
        let result = rewrite("[b](B.txt) [m](B.md)", Path::new("A.txt"), &map, "txt");
        assert_eq!(result.text, "[b](sub/B.txt) [m](B.md)");
    }

    #[test]
    fn reports_line_of_each_rewrite() {
        let map = map(&[("B.md", "sub/B.md")]);
        let result = rewrite("a\nb\n[x](B.md)\n\n[y](./B.md)", Path::new("A.md"), &map, "md");
        let lines: Vec<_> = result.links.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![3, 5]);
    }
}
