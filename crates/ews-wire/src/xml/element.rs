//! Parsed XML element tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{WireError, WireResult};

/// A parsed XML element with namespace prefixes stripped.
///
/// This is the inbound representation of one record or child fragment.
/// Element and attribute order is preserved as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Local element name (prefix removed).
    pub name: String,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content of this element.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element with the given local name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a UTF-8 XML fragment into an element tree.
    ///
    /// The first start element becomes the root; anything before it
    /// (declaration, comments) is skipped.
    ///
    /// ## Errors
    /// Returns an error if the XML is malformed, not valid UTF-8, or
    /// contains no element at all.
    #[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
    pub fn parse(xml: &[u8]) -> WireResult<Self> {
        let mut reader = Reader::from_reader(xml);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => {
                            root = Some(element);
                            break;
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let decoded = reader.decoder().decode(e.as_ref())?;
                        let unescaped = quick_xml::escape::unescape(&decoded)
                            .map_err(|err| WireError::Xml(err.to_string()))?;
                        match current.text.as_mut() {
                            Some(text) => text.push_str(&unescaped),
                            None => current.text = Some(unescaped.into_owned()),
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(e.as_ref())?;
                        match current.text.as_mut() {
                            Some(existing) => existing.push_str(text),
                            None => current.text = Some(text.to_owned()),
                        }
                    }
                }
                // Entity references inside text arrive as their own events.
                Ok(Event::GeneralRef(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = reader.decoder().decode(e.as_ref())?;
                        match resolve_entity(&name) {
                            Some(c) => match current.text.as_mut() {
                                Some(text) => text.push(c),
                                None => current.text = Some(c.to_string()),
                            },
                            None => {
                                tracing::warn!(entity = %name, "unresolvable entity reference, dropping");
                            }
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(mut done) = stack.pop() else {
                        return Err(WireError::Xml("unbalanced end tag".to_owned()));
                    };
                    // Text is accumulated raw so entity-adjacent spaces
                    // survive; inter-element whitespace goes away here.
                    if let Some(text) = done.text.take() {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            done.text = Some(trimmed.to_owned());
                        }
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => {
                            root = Some(done);
                            break;
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(WireError::Xml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| WireError::MissingElement("document root".to_owned()))
    }

    /// Returns the value of an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the names of all attributes in document order.
    #[must_use]
    pub fn attr_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns the first child element with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the text of the first child with the given local name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)?.text.as_deref()
    }

    /// Returns the text content of this element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Finds the first descendant with the given local name, depth-first.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Resolves a predefined or numeric character entity reference.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        other => {
            let digits = other.strip_prefix('#')?;
            let code = digits
                .strip_prefix('x')
                .or_else(|| digits.strip_prefix('X'))
                .map_or_else(|| digits.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok())?;
            char::from_u32(code)
        }
    }
}

/// Builds an element from a start tag, stripping namespace prefixes and
/// dropping `xmlns` declarations.
fn element_from_start(e: &BytesStart<'_>) -> WireResult<XmlElement> {
    let local = e.local_name();
    let name = std::str::from_utf8(local.as_ref())?.to_owned();

    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let key = key.rsplit(':').next().unwrap_or(key).to_owned();
        let raw = std::str::from_utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(raw).map_err(|err| WireError::Xml(err.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn parse_strips_prefixes() {
        let xml = br#"<t:Contact xmlns:t="http://example.test/types">
            <t:Subject>Hello</t:Subject>
            <t:ItemId Id="abc" ChangeKey="ck"/>
        </t:Contact>"#;

        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "Contact");
        assert_eq!(root.child_text("Subject"), Some("Hello"));

        let item_id = root.child("ItemId").unwrap();
        assert_eq!(item_id.attr("Id"), Some("abc"));
        assert_eq!(item_id.attr("ChangeKey"), Some("ck"));
        assert!(item_id.attr("xmlns:t").is_none());
    }

    #[test_log::test]
    fn parse_unescapes_text() {
        let xml = b"<Subject>Q1 &amp; Q2 &lt;review&gt;</Subject>";
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.text(), Some("Q1 & Q2 <review>"));
    }

    #[test_log::test]
    fn find_descends_depth_first() {
        let xml = b"<Item><Outer><Value>42</Value></Outer></Item>";
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.find("Value").and_then(XmlElement::text), Some("42"));
        assert!(root.find("Missing").is_none());
    }

    #[test_log::test]
    fn parse_rejects_garbage() {
        assert!(XmlElement::parse(b"").is_err());
        assert!(XmlElement::parse(b"no markup here").is_err());
    }
}
