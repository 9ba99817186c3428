//! Wiki-link resolution pass.
//!
//! Rewrites `[[target]]`, `[[target#section]]`, and `[[target|label]]`
//! into internal HTML anchors before Markdown parsing, using the
//! permalink index for canonical routes. The rewrite is textual and
//! fence-aware: fenced code lines are left alone, inline code spans are
//! not (an accepted approximation of the dialect, not a parser).

use std::sync::LazyLock;

use regex::{Captures, Regex};

use quarry_vault::PermalinkIndex;

static WIKI_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid regex"));

/// Resolve every wiki link in `text` against the index.
pub(crate) fn resolve_links(text: &str, index: &PermalinkIndex) -> String {
    let mut out = String::with_capacity(text.len());
    // Which marker opened the current fence, if any. Only the matching
    // marker closes it; the other kind is literal content inside.
    let mut fence: Option<char> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some('`')
        } else if trimmed.starts_with("~~~") {
            Some('~')
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(open)) => {
                fence = Some(open);
                out.push_str(line);
            }
            (Some(open), Some(close)) if close == open => {
                fence = None;
                out.push_str(line);
            }
            (Some(_), _) => out.push_str(line),
            (None, None) => out.push_str(&rewrite_line(line, index)),
        }
        out.push('\n');
    }

    if !text.ends_with('\n') {
        out.pop();
    }
    out
}

fn rewrite_line(line: &str, index: &PermalinkIndex) -> String {
    WIKI_LINK_RE
        .replace_all(line, |caps: &Captures| anchor_for(&caps[1], index))
        .into_owned()
}

/// Build the anchor markup for one wiki-link body.
fn anchor_for(inner: &str, index: &PermalinkIndex) -> String {
    let (target_part, label) = match inner.split_once('|') {
        Some((target, label)) => (target, Some(label.trim())),
        None => (inner, None),
    };
    let (target, section) = match target_part.split_once('#') {
        Some((target, section)) => (target.trim(), Some(section.trim())),
        None => (target_part.trim(), None),
    };

    // Short-path display: the label when given, else the note's own name.
    let display = label
        .or_else(|| target.rsplit('/').next().filter(|s| !s.is_empty()))
        .or(section)
        .unwrap_or(inner);

    let (mut href, class) = if target.is_empty() {
        // Same-page section link: [[#Heading]].
        (String::new(), "internal")
    } else if let Some(route) = index.resolve(target) {
        (format!("/{route}"), "internal")
    } else {
        (format!("/{}", slug::slugify(target)), "internal new")
    };

    if let Some(section) = section {
        href.push('#');
        href.push_str(&slug::slugify(section));
    }

    format!(
        r#"<a class="{class}" href="{href}">{}</a>"#,
        escape_html(display)
    )
}

/// Minimal HTML escaping for link display text.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn index_with(paths: &[&str]) -> PermalinkIndex {
        let paths: Vec<PathBuf> = paths.iter().map(|p| PathBuf::from("/v").join(p)).collect();
        PermalinkIndex::build(Path::new("/v"), &paths)
    }

    #[test]
    fn plain_link_uses_note_name_as_display() {
        let index = index_with(&["guides/Deep Dive.md"]);
        let out = resolve_links("see [[Deep Dive]]", &index);
        assert_eq!(
            out,
            r#"see <a class="internal" href="/guides/deep-dive">Deep Dive</a>"#
        );
    }

    #[test]
    fn path_target_displays_short_name() {
        let index = index_with(&["guides/Deep Dive.md"]);
        let out = resolve_links("[[guides/Deep Dive]]", &index);
        assert!(out.contains(">Deep Dive</a>"));
        assert!(out.contains(r#"href="/guides/deep-dive""#));
    }

    #[test]
    fn label_overrides_display() {
        let index = index_with(&["Intro.md"]);
        let out = resolve_links("[[Intro|start here]]", &index);
        assert!(out.contains(">start here</a>"));
    }

    #[test]
    fn section_is_slugified_into_fragment() {
        let index = index_with(&["Intro.md"]);
        let out = resolve_links("[[Intro#First Steps]]", &index);
        assert!(out.contains(r#"href="/intro#first-steps""#));
        assert!(out.contains(">Intro</a>"));
    }

    #[test]
    fn same_page_section_link() {
        let out = resolve_links("[[#Summary]]", &index_with(&[]));
        assert!(out.contains(r##"href="#summary""##));
        assert!(out.contains(">Summary</a>"));
    }

    #[test]
    fn tilde_line_inside_backtick_fence_does_not_close_it() {
        let index = index_with(&["Intro.md"]);
        let text = "```\n~~~\n[[Intro]]\n```\nafter [[Intro]]";
        let out = resolve_links(text, &index);
        assert!(out.contains("\n[[Intro]]\n"), "link inside fence rewritten");
        assert!(out.contains(r#"after <a class="internal" href="/intro">Intro</a>"#));
    }

    #[test]
    fn backtick_line_inside_tilde_fence_does_not_close_it() {
        let index = index_with(&["Intro.md"]);
        let text = "~~~\n```\n[[Intro]]\n~~~\n[[Intro]] again";
        let out = resolve_links(text, &index);
        assert!(out.contains("\n[[Intro]]\n"));
        assert!(out.contains(r#"<a class="internal" href="/intro">Intro</a> again"#));
    }

    #[test]
    fn unresolved_target_gets_new_class() {
        let out = resolve_links("[[Nowhere]]", &index_with(&[]));
        assert!(out.contains(r#"class="internal new""#));
    }

    #[test]
    fn display_text_is_escaped() {
        let out = resolve_links("[[Nowhere|a <b> & c]]", &index_with(&[]));
        assert!(out.contains(">a &lt;b&gt; &amp; c</a>"));
    }

    #[test]
    fn multiple_links_on_one_line() {
        let index = index_with(&["A.md", "B.md"]);
        let out = resolve_links("[[A]] then [[B]]", &index);
        assert_eq!(out.matches("<a class=\"internal\"").count(), 2);
    }
}
