//! Extended property identifiers and the three addressing variants.

use crate::property::mapi::{self, MapiPropertyType};
use crate::xml::{XmlElement, writer};

/// The mutually exclusive addressing shapes for extended properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropVariant {
    /// Addressed by raw property tag: exactly `PropertyTag` + `PropertyType`.
    Tagged,
    /// Named by numeric id within a property set: a set id, `PropertyId`,
    /// and `PropertyType`.
    NamedInt,
    /// Named by string within a property set: a set id, `PropertyName`,
    /// and `PropertyType`.
    NamedStr,
    /// Any other component combination; carried opaquely.
    Unknown,
}

/// The identifier half of an extended property.
///
/// All components are optional; which ones are populated determines the
/// addressing variant. Component combinations matching none of the three
/// valid shapes classify as [`PropVariant::Unknown`] rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedFieldUri {
    pub distinguished_set_id: Option<String>,
    pub set_id: Option<String>,
    pub property_tag: Option<String>,
    pub property_name: Option<String>,
    pub property_id: Option<u32>,
    pub property_type: Option<String>,
}

impl ExtendedFieldUri {
    /// Builds a tagged-property identifier.
    #[must_use]
    pub fn tagged(pid: u16, ptype: MapiPropertyType) -> Self {
        Self {
            property_tag: Some(format!("0x{pid:x}")),
            property_type: Some(ptype.wire_name().to_owned()),
            ..Self::default()
        }
    }

    /// Builds a named identifier with a numeric id.
    #[must_use]
    pub fn named_int(set_id: impl Into<String>, pid: u32, ptype: MapiPropertyType) -> Self {
        Self {
            set_id: Some(set_id.into()),
            property_id: Some(pid),
            property_type: Some(ptype.wire_name().to_owned()),
            ..Self::default()
        }
    }

    /// Builds a named identifier with a string name.
    #[must_use]
    pub fn named_str(
        set_id: impl Into<String>,
        name: impl Into<String>,
        ptype: MapiPropertyType,
    ) -> Self {
        Self {
            set_id: Some(set_id.into()),
            property_name: Some(name.into()),
            property_type: Some(ptype.wire_name().to_owned()),
            ..Self::default()
        }
    }

    /// Extracts the identifier components from a parsed `ExtendedFieldURI`
    /// element. Unparseable numeric ids are logged and left unset.
    #[must_use]
    pub fn from_element(element: &XmlElement) -> Self {
        let property_id = element.attr("PropertyId").and_then(|raw| {
            let parsed = mapi::safe_int(raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "malformed PropertyId attribute, leaving unset");
            }
            parsed
        });
        Self {
            distinguished_set_id: element.attr("DistinguishedPropertySetId").map(str::to_owned),
            set_id: element.attr("PropertySetId").map(str::to_owned),
            property_tag: element.attr("PropertyTag").map(str::to_owned),
            property_name: element.attr("PropertyName").map(str::to_owned),
            property_id,
            property_type: element.attr("PropertyType").map(str::to_owned),
        }
    }

    /// Classifies a parsed `ExtendedFieldURI` element by the exact set of
    /// attributes present. Extra or missing keys force `Unknown`; there are
    /// no partial matches, and classification is total.
    #[must_use]
    pub fn classify(element: &XmlElement) -> PropVariant {
        let names = element.attr_names();
        let has = |name: &str| names.contains(&name);
        let set_id = has("PropertySetId") || has("DistinguishedPropertySetId");

        if names.len() == 2 && has("PropertyTag") && has("PropertyType") {
            PropVariant::Tagged
        } else if names.len() == 3 && set_id && has("PropertyId") && has("PropertyType") {
            PropVariant::NamedInt
        } else if names.len() == 3 && set_id && has("PropertyName") && has("PropertyType") {
            PropVariant::NamedStr
        } else {
            PropVariant::Unknown
        }
    }

    /// Classifies this identifier by which components are populated, using
    /// the same exact shapes as [`ExtendedFieldUri::classify`].
    #[must_use]
    pub fn variant(&self) -> PropVariant {
        let set_id = self.set_id.is_some() || self.distinguished_set_id.is_some();
        let populated = [
            self.distinguished_set_id.is_some(),
            self.set_id.is_some(),
            self.property_tag.is_some(),
            self.property_name.is_some(),
            self.property_id.is_some(),
            self.property_type.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        if populated == 2 && self.property_tag.is_some() && self.property_type.is_some() {
            PropVariant::Tagged
        } else if populated == 3 && set_id && self.property_id.is_some() && self.property_type.is_some()
        {
            PropVariant::NamedInt
        } else if populated == 3
            && set_id
            && self.property_name.is_some()
            && self.property_type.is_some()
        {
            PropVariant::NamedStr
        } else {
            PropVariant::Unknown
        }
    }

    /// The combined MAPI property tag, for tagged-variant identifiers.
    #[must_use]
    pub fn prop_tag(&self) -> Option<u32> {
        let pid = mapi::safe_int(self.property_tag.as_deref()?)?;
        let ptype = MapiPropertyType::from_wire_name(self.property_type.as_deref()?)?;
        Some(mapi::prop_tag(ptype.code(), u16::try_from(pid).ok()?))
    }

    /// Renders the identifier as a self-closing `ExtendedFieldURI` element,
    /// empty when no component is populated.
    #[must_use]
    pub fn write_xml(&self) -> String {
        let id_text = self.property_id.map(|id| id.to_string());
        let attrs: Vec<(&str, Option<&str>)> = vec![
            (
                "DistinguishedPropertySetId",
                self.distinguished_set_id.as_deref(),
            ),
            ("PropertySetId", self.set_id.as_deref()),
            ("PropertyTag", self.property_tag.as_deref()),
            ("PropertyName", self.property_name.as_deref()),
            ("PropertyId", id_text.as_deref()),
            ("PropertyType", self.property_type.as_deref()),
        ];
        if attrs.iter().all(|(_, v)| v.is_none()) {
            return String::new();
        }
        writer::open_tag("ExtendedFieldURI", &attrs, true)
    }
}

/// One out-of-schema property: an identifier plus a single scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedProperty {
    pub uri: ExtendedFieldUri,
    pub value: Option<String>,
}

impl ExtendedProperty {
    #[must_use]
    pub fn new(uri: ExtendedFieldUri) -> Self {
        Self { uri, value: None }
    }

    #[must_use]
    pub fn with_value(uri: ExtendedFieldUri, value: impl Into<String>) -> Self {
        Self {
            uri,
            value: Some(value.into()),
        }
    }

    /// Decodes a parsed `ExtendedProperty` element: the identifier comes
    /// from the `ExtendedFieldURI` child, the value from the sibling
    /// `Value` element.
    ///
    /// Never fails: a missing or unrecognizable identifier yields the
    /// `Unknown` variant and is passed through opaquely.
    #[must_use]
    pub fn decode(node: &XmlElement) -> Self {
        let uri = match node.child("ExtendedFieldURI") {
            Some(uri_el) => ExtendedFieldUri::from_element(uri_el),
            None => {
                tracing::warn!("ExtendedProperty without ExtendedFieldURI child");
                ExtendedFieldUri::default()
            }
        };
        Self {
            uri,
            value: node.child_text("Value").map(str::to_owned),
        }
    }

    #[must_use]
    pub fn variant(&self) -> PropVariant {
        self.uri.variant()
    }

    #[must_use]
    pub fn has_updates(&self) -> bool {
        self.value.is_some()
    }

    /// Renders the property for a full-record serialization.
    #[must_use]
    pub fn write_xml(&self) -> String {
        let uri = self.uri.write_xml();
        if uri.is_empty() && self.value.is_none() {
            return String::new();
        }
        let mut body = uri;
        if let Some(value) = &self.value {
            body.push_str(&writer::element("Value", &writer::escape(value)));
        }
        writer::element("ExtendedProperty", &body)
    }

    /// Renders a set directive addressed by the identifier itself.
    #[must_use]
    pub fn write_set_field(&self, container: &str) -> String {
        let Some(value) = &self.value else {
            return String::new();
        };
        let uri = self.uri.write_xml();
        if uri.is_empty() {
            return String::new();
        }
        format!(
            "<t:SetItemField>{uri}<t:{container}><t:ExtendedProperty>{uri}\
             <t:Value>{value}</t:Value></t:ExtendedProperty></t:{container}></t:SetItemField>",
            value = writer::escape(value),
        )
    }

    /// Renders a delete directive addressed by the identifier itself.
    #[must_use]
    pub fn write_delete_field(&self) -> String {
        let uri = self.uri.write_xml();
        if uri.is_empty() {
            return String::new();
        }
        format!("<t:DeleteItemField>{uri}</t:DeleteItemField>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri_element(attrs: &[(&str, &str)]) -> XmlElement {
        let mut el = XmlElement::new("ExtendedFieldURI");
        for (k, v) in attrs {
            el.attributes.push(((*k).to_owned(), (*v).to_owned()));
        }
        el
    }

    #[test]
    fn classify_tagged() {
        let el = uri_element(&[("PropertyTag", "0x3008"), ("PropertyType", "SystemTime")]);
        assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::Tagged);
    }

    #[test]
    fn classify_named_int_with_either_set_id() {
        let el = uri_element(&[
            ("PropertySetId", "deadbeef-0000"),
            ("PropertyId", "0x8233"),
            ("PropertyType", "String"),
        ]);
        assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::NamedInt);

        let el = uri_element(&[
            ("DistinguishedPropertySetId", "Common"),
            ("PropertyId", "34112"),
            ("PropertyType", "String"),
        ]);
        assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::NamedInt);
    }

    #[test]
    fn classify_named_str() {
        let el = uri_element(&[
            ("DistinguishedPropertySetId", "PublicStrings"),
            ("PropertyName", "Keywords"),
            ("PropertyType", "String"),
        ]);
        assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::NamedStr);
    }

    #[test]
    fn classify_extra_key_forces_unknown() {
        // All the tagged keys are present, but the extra key breaks the
        // exact-arity match.
        let el = uri_element(&[
            ("PropertyTag", "0x3008"),
            ("PropertyType", "SystemTime"),
            ("PropertyName", "extra"),
        ]);
        assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::Unknown);
    }

    #[test]
    fn classify_is_total_over_arbitrary_attribute_sets() {
        for attrs in [
            &[][..],
            &[("PropertyTag", "0x3008")][..],
            &[("Bogus", "1"), ("PropertyType", "String")][..],
            &[
                ("PropertySetId", "x"),
                ("DistinguishedPropertySetId", "y"),
                ("PropertyId", "1"),
                ("PropertyType", "String"),
            ][..],
        ] {
            let el = uri_element(attrs);
            // No panic, and arity violations land in Unknown.
            assert_eq!(ExtendedFieldUri::classify(&el), PropVariant::Unknown);
        }
    }

    #[test]
    fn decode_reads_identifier_and_value() {
        let xml = br#"<ExtendedProperty>
            <ExtendedFieldURI PropertyTag="0x3008" PropertyType="SystemTime"/>
            <Value>2016-02-01T10:00:00Z</Value>
        </ExtendedProperty>"#;
        let node = XmlElement::parse(xml).unwrap();

        let prop = ExtendedProperty::decode(&node);
        assert_eq!(prop.variant(), PropVariant::Tagged);
        assert_eq!(prop.value.as_deref(), Some("2016-02-01T10:00:00Z"));
        assert_eq!(prop.uri.prop_tag(), Some(0x3008_0040));
    }

    #[test]
    fn decode_without_identifier_is_unknown_not_fatal() {
        let node = XmlElement::parse(b"<ExtendedProperty><Value>x</Value></ExtendedProperty>").unwrap();
        let prop = ExtendedProperty::decode(&node);
        assert_eq!(prop.variant(), PropVariant::Unknown);
        assert_eq!(prop.value.as_deref(), Some("x"));
    }

    #[test]
    fn encode_set_field_addresses_by_identifier() {
        let prop = ExtendedProperty::with_value(
            ExtendedFieldUri::tagged(0x3A50, MapiPropertyType::String8),
            "https://example.org",
        );
        let markup = prop.write_set_field("Contact");
        assert!(markup.starts_with("<t:SetItemField><t:ExtendedFieldURI"));
        assert!(markup.contains("PropertyTag=\"0x3a50\""));
        assert!(markup.contains("<t:Value>https://example.org</t:Value>"));
    }

    #[test]
    fn malformed_property_id_degrades_to_unset() {
        let el = uri_element(&[
            ("PropertySetId", "x"),
            ("PropertyId", "not-a-number"),
            ("PropertyType", "String"),
        ]);
        let uri = ExtendedFieldUri::from_element(&el);
        assert_eq!(uri.property_id, None);
        // The populated-component shape no longer matches NamedInt.
        assert_eq!(uri.variant(), PropVariant::Unknown);
    }
}
