//! Outbound markup helpers.
//!
//! All record markup is rendered into the `t:` types prefix; the transport
//! layer owns the envelope that binds the prefix to its namespace URI.

use std::fmt::Write;

use ews_core::constants::TYPES_PREFIX;

/// Escapes text or attribute content for embedding in markup.
#[must_use]
pub fn escape(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

/// Renders `<t:Tag>body</t:Tag>`, or a self-closing tag when `body` is empty.
#[must_use]
pub fn element(tag: &str, body: &str) -> String {
    if body.is_empty() {
        format!("<{TYPES_PREFIX}:{tag}/>")
    } else {
        format!("<{TYPES_PREFIX}:{tag}>{body}</{TYPES_PREFIX}:{tag}>")
    }
}

/// Renders an opening tag with the given attributes, `/>`-closed when
/// `self_closing`. Attributes with `None` values are omitted.
#[must_use]
pub fn open_tag(tag: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "<{TYPES_PREFIX}:{tag}");
    for (name, value) in attributes {
        if let Some(value) = value {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
    }
    out.push_str(if self_closing { "/>" } else { ">" });
    out
}

/// Renders a closing tag.
#[must_use]
pub fn close_tag(tag: &str) -> String {
    format!("</{TYPES_PREFIX}:{tag}>")
}
