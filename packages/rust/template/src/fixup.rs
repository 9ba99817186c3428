//! Textual fixup passes over the generated module.
//!
//! Each pass is a function `&str -> String` applied in sequence, each
//! consuming the previous pass's output — order matters, later passes
//! assume earlier rewrites already happened. These are whole-text regex
//! substitutions, not a structural HTML rewrite: nested or malformed HTML
//! may be rewritten incorrectly. That is an accepted approximation.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full fixup pipeline on generated module text.
pub fn run_pipeline(text: &str) -> String {
    let mut result = rename_class_attributes(text);
    result = unescape_equals(&result);
    result = rewrite_code_blocks(&result);
    result = tag_headings(&result);
    result
}

// ---------------------------------------------------------------------------
// Pass 1: class= → className=
// ---------------------------------------------------------------------------

/// Replace the HTML class attribute with the JSX spelling.
fn rename_class_attributes(text: &str) -> String {
    text.replace("class=", "className=")
}

// ---------------------------------------------------------------------------
// Pass 2: escaped equals entity → literal =
// ---------------------------------------------------------------------------

/// Replace the escaped equals-sign entity with a literal `=`.
fn unescape_equals(text: &str) -> String {
    text.replace("&#x3D;", "=")
}

// ---------------------------------------------------------------------------
// Pass 3: code blocks and inline code → code components
// ---------------------------------------------------------------------------

static FENCE_OPEN_LANG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pre><code className="language-([^"]+)">"#).expect("valid regex")
});

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<code>(.*?)</code>").expect("valid regex"));

/// Rewrite code markup into the code component, in this exact order:
/// untagged fence opens, fence closes, language-tagged fence opens, then
/// inline spans. The close rewrite must run before the language-tagged
/// open rewrite so every `</code></pre>` already belongs to a component.
fn rewrite_code_blocks(text: &str) -> String {
    let result = text.replace("<pre><code>", "<Code language=\"none\">{`");
    let result = result.replace("</code></pre>", "`}</Code>");
    let result = FENCE_OPEN_LANG_RE.replace_all(&result, "<Code language=\"$1\">{`");
    INLINE_CODE_RE
        .replace_all(&result, "<code className={bem(\"code\", \"inline\")}>{`$1`}</code>")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: heading classes
// ---------------------------------------------------------------------------

/// Give levels 2–5 their semantic header classes. Level 1 is untouched:
/// rendered `<h1>`s were already replaced by the generated header block.
fn tag_headings(text: &str) -> String {
    text.replace("<h2>", "<h2 className={bem(\"header\", \"section\")}>")
        .replace("<h3>", "<h3 className={bem(\"header\", \"subsection\")}>")
        .replace("<h4>", "<h4 className={bem(\"header\", \"example\")}>")
        .replace("<h5>", "<h5 className={bem(\"header\", \"summary\")}>")
}
