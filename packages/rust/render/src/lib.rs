//! Markdown-to-HTML rendering for Quarry notes.
//!
//! Renders the wiki-link-aware dialect: CommonMark plus hard breaks on
//! single newlines, `[[wiki links]]` resolved against the permalink index,
//! a YAML frontmatter block at the top of the file, and raw-HTML
//! passthrough. Produces the HTML body together with the extracted
//! frontmatter mapping.

mod wiki;

use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd, html};
use tracing::{debug, instrument};

use quarry_shared::{Frontmatter, QuarryError, RenderedDocument, Result};
use quarry_vault::PermalinkIndex;

/// Render a note's raw text to HTML, extracting its frontmatter.
///
/// Wiki links are resolved first, as a fence-aware textual pass over the
/// Markdown source; the result then goes through `pulldown-cmark` with
/// soft breaks promoted to hard breaks and the YAML metadata block routed
/// into the frontmatter mapping instead of the HTML body.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn render(text: &str, index: &PermalinkIndex) -> Result<RenderedDocument> {
    let linked = wiki::resolve_links(text, index);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut yaml = String::new();
    let mut in_metadata = false;
    let mut events = Vec::new();

    for event in Parser::new_ext(&linked, options) {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_metadata = true;
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_metadata = false;
            }
            Event::Text(text) if in_metadata => yaml.push_str(&text),
            // Single newlines are line breaks in this dialect.
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut body = String::new();
    html::push_html(&mut body, events.into_iter());

    let frontmatter = parse_frontmatter(&yaml)?;
    debug!(
        html_bytes = body.len(),
        frontmatter_keys = frontmatter.len(),
        "render complete"
    );

    Ok(RenderedDocument {
        html: body,
        frontmatter,
    })
}

/// Parse the extracted YAML block into the ordered frontmatter mapping.
fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    let value: serde_json::Value = serde_yaml::from_str(yaml)
        .map_err(|e| QuarryError::render(format!("invalid frontmatter: {e}")))?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(Frontmatter::new()),
        other => Err(QuarryError::render(format!(
            "frontmatter must be a mapping, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn empty_index() -> PermalinkIndex {
        PermalinkIndex::build(Path::new("/vault"), &[])
    }

    fn index_with(paths: &[&str]) -> PermalinkIndex {
        let paths: Vec<PathBuf> = paths.iter().map(|p| PathBuf::from("/vault").join(p)).collect();
        PermalinkIndex::build(Path::new("/vault"), &paths)
    }

    #[test]
    fn renders_basic_markdown() {
        let doc = render("# Title\n\nSome *text*.", &empty_index()).unwrap();
        assert!(doc.html.contains("<h1>Title</h1>"));
        assert!(doc.html.contains("<em>text</em>"));
        assert!(doc.frontmatter.is_empty());
    }

    #[test]
    fn single_newlines_become_hard_breaks() {
        let doc = render("line one\nline two", &empty_index()).unwrap();
        assert!(doc.html.contains("<br />"));
    }

    #[test]
    fn frontmatter_is_extracted_not_rendered() {
        let text = "---\ntitle: Intro\ntags:\n  - rust\n  - notes\n---\n\nBody text.";
        let doc = render(text, &empty_index()).unwrap();

        assert_eq!(doc.frontmatter["title"], "Intro");
        assert_eq!(doc.frontmatter["tags"][0], "rust");
        assert!(!doc.html.contains("title: Intro"));
        assert!(doc.html.contains("Body text."));
    }

    #[test]
    fn frontmatter_preserves_key_order() {
        let text = "---\nzeta: 1\nalpha: 2\nmiddle: 3\n---\n\nBody.";
        let doc = render(text, &empty_index()).unwrap();
        let keys: Vec<&String> = doc.frontmatter.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "middle"]);
    }

    #[test]
    fn malformed_frontmatter_is_render_error() {
        let text = "---\ntitle: [unclosed\n---\n\nBody.";
        let err = render(text, &empty_index()).unwrap_err();
        assert!(matches!(err, QuarryError::Render { .. }));
    }

    #[test]
    fn scalar_frontmatter_is_render_error() {
        let text = "---\njust a string\n---\n\nBody.";
        let err = render(text, &empty_index()).unwrap_err();
        assert!(matches!(err, QuarryError::Render { .. }));
    }

    #[test]
    fn resolved_wiki_link_becomes_internal_anchor() {
        let index = index_with(&["guides/Getting Started.md"]);
        let doc = render("See [[Getting Started]] first.", &index).unwrap();
        assert!(
            doc.html
                .contains(r#"<a class="internal" href="/guides/getting-started">Getting Started</a>"#),
            "html was: {}",
            doc.html
        );
    }

    #[test]
    fn unresolved_wiki_link_is_marked_new() {
        let doc = render("See [[Missing Note]].", &empty_index()).unwrap();
        assert!(doc.html.contains(r#"class="internal new""#));
        assert!(doc.html.contains(r#"href="/missing-note""#));
    }

    #[test]
    fn wiki_links_inside_fences_are_untouched() {
        let index = index_with(&["Intro.md"]);
        let text = "```\n[[Intro]]\n```\n";
        let doc = render(text, &index).unwrap();
        assert!(doc.html.contains("[[Intro]]"));
        assert!(!doc.html.contains("<a class"));
    }

    #[test]
    fn raw_html_passes_through() {
        let doc = render("before\n\n<div class=\"callout\">raw</div>\n\nafter", &empty_index())
            .unwrap();
        assert!(doc.html.contains("<div class=\"callout\">raw</div>"));
    }
}
