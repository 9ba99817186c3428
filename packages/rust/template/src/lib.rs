//! Component-module generation and post-processing.
//!
//! Wraps a rendered HTML body in a generated TSX module ([`generate`]),
//! rewrites HTML idioms into the component syntax ([`fixup`]), and
//! validates/serializes the result through the external formatter
//! ([`format`]).

pub mod fixup;
pub mod format;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use quarry_shared::{ComponentConfig, DocumentIdentity, Frontmatter};

/// Rendered `<h1>` elements are replaced wholesale by the generated
/// header block, so they are dropped from the body here.
static RENDERED_H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h1>.*?</h1>\n?").expect("valid regex"));

/// Wrap a rendered body in the generated component module.
///
/// The module exports the slug (`NAME`), the frontmatter as 2-space
/// indented JSON (`DATA`), and a render function whose root element holds
/// the generated header block immediately followed by the body markup,
/// with no separating whitespace between them.
pub fn generate(
    source: &Path,
    identity: &DocumentIdentity,
    frontmatter: &Frontmatter,
    body: &str,
    component: &ComponentConfig,
) -> String {
    let data = serde_json::to_string_pretty(&serde_json::Value::Object(frontmatter.clone()))
        .expect("JSON value serializes");
    let header = header_block(identity);
    let body = RENDERED_H1_RE.replace_all(body, "");

    format!(
        r#"import blem from "blem"

import Code from "{code_import}"

// This file was automatically generated from:
// {source}

export const NAME = "{slug}"
export const DATA = {data}
export const COMPONENT = () => {{
  const bem = blem("{block}")
  return (<article className={{bem("")}}>{header}{body}</article>)
}}

export default COMPONENT
"#,
        code_import = component.code_import,
        source = source.display(),
        slug = identity.slug,
        block = component.block,
    )
}

/// The generated `<h1>` header block: title, plus ordinal when present.
fn header_block(identity: &DocumentIdentity) -> String {
    let title = format!(
        r#"<div className={{bem("title")}}>{}</div>"#,
        identity.title
    );

    let inner = match &identity.ordinal {
        Some(ordinal) => format!(
            "{title}\n<div className={{bem(\"index\", \"ordinal\")}}>{ordinal}</div>\n"
        ),
        None => title,
    };

    format!(r#"<h1 className={{bem("header", "main")}}>{inner}</h1>"#)
}
