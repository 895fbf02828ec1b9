//! The atomic unit of the record tree: one named, typed wire element.

use std::borrow::Cow;
use std::fmt::Write;
use std::ops::RangeInclusive;

use crate::error::{WireError, WireResult};
use crate::xml::{XmlElement, writer};

/// Scalar content of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Rendered as the lowercase literals `true`/`false`.
    Boolean(bool),
}

impl FieldValue {
    /// Renders the value as wire text, unescaped.
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Boolean(true) => Cow::Borrowed("true"),
            Self::Boolean(false) => Cow::Borrowed("false"),
        }
    }
}

/// How a field renders itself as an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Ordinary element with text content and/or element children.
    #[default]
    Element,
    /// Reference element that deliberately emits attribute-only
    /// self-closing markup (`ItemId`, `ExtendedFieldURI`, ...); it is
    /// suppressed only when every attribute is null.
    Reference,
}

/// How a field renders itself inside an update request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdateStyle {
    /// One `SetItemField`/`DeleteItemField` addressed by the field URI.
    #[default]
    FieldUri,
    /// Keyed entry collection: each `Entry` child becomes its own
    /// set-or-delete directive addressed by `IndexedFieldURI` with the
    /// entry's `Key` attribute as the index.
    IndexedEntries { base_uri: &'static str },
    /// Keyed entry collection whose entries hold sub-fields: each sub-field
    /// of each entry becomes a directive addressed by
    /// `{base_uri}:{sub-field tag}` plus the entry key.
    IndexedFields { base_uri: &'static str },
}

/// A tagged wire element: optional scalar value, ordered attributes, and
/// ordered children.
///
/// A field with no value, no non-null attributes, and no non-empty children
/// serializes to the empty string (suppressed, not emitted as an empty tag).
/// [`FieldKind::Reference`] fields are the modeled exception and render as
/// attribute-only self-closing markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: Cow<'static, str>,
    value: Option<FieldValue>,
    attributes: Vec<(Cow<'static, str>, Option<String>)>,
    children: Vec<Field>,
    /// Protocol addressing string used in update directives, distinct from
    /// the wire tag (e.g. `contacts:JobTitle` for `JobTitle`).
    field_uri: Option<Cow<'static, str>>,
    kind: FieldKind,
    update_style: UpdateStyle,
    read_only: bool,
    update_eligible: bool,
    /// Collection fields treat their children as entries; content checks
    /// look at the entry list rather than the scalar value.
    collection: bool,
}

impl Field {
    /// Creates an empty element field.
    #[must_use]
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
            field_uri: None,
            kind: FieldKind::Element,
            update_style: UpdateStyle::FieldUri,
            read_only: false,
            update_eligible: true,
            collection: false,
        }
    }

    /// Creates a field holding text.
    #[must_use]
    pub fn text(tag: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        let mut field = Self::new(tag);
        field.value = Some(FieldValue::Text(value.into()));
        field
    }

    /// Creates an attribute-only reference field.
    #[must_use]
    pub fn reference(tag: impl Into<Cow<'static, str>>) -> Self {
        let mut field = Self::new(tag);
        field.kind = FieldKind::Reference;
        field
    }

    /// Creates a collection field whose children act as entries.
    #[must_use]
    pub fn collection(tag: impl Into<Cow<'static, str>>) -> Self {
        let mut field = Self::new(tag);
        field.collection = true;
        field
    }

    /// Creates a field whose value must belong to a fixed legal set.
    ///
    /// ## Errors
    /// Returns [`WireError::InvalidEnumValue`] naming the field and the
    /// legal set when `value` is not a member; this indicates programmer
    /// error and fails immediately.
    pub fn enumerated(
        tag: impl Into<Cow<'static, str>>,
        value: &str,
        legal: &'static [&'static str],
    ) -> WireResult<Self> {
        let tag = tag.into();
        if !legal.contains(&value) {
            return Err(WireError::InvalidEnumValue {
                field: tag.into_owned(),
                value: value.to_owned(),
                legal,
            });
        }
        Ok(Self::text(tag, value))
    }

    /// Creates an integer field constrained to `range`.
    ///
    /// Out-of-range or unparseable input degrades to an unset value and is
    /// logged; bounded numeric fields are parsed tolerantly rather than
    /// failing the record.
    #[must_use]
    pub fn bounded_int(
        tag: impl Into<Cow<'static, str>>,
        value: &str,
        range: RangeInclusive<i64>,
    ) -> Self {
        let tag = tag.into();
        let parsed = value.trim().parse::<i64>();
        match parsed {
            Ok(n) if range.contains(&n) => Self::text(tag, n.to_string()),
            _ => {
                tracing::warn!(
                    field = %tag,
                    value = %value,
                    min = *range.start(),
                    max = *range.end(),
                    "malformed numeric field, leaving unset"
                );
                Self::new(tag)
            }
        }
    }

    /// Sets the field URI used in update directives.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.field_uri = Some(uri.into());
        self
    }

    /// Sets the update rendering style.
    #[must_use]
    pub fn with_update_style(mut self, style: UpdateStyle) -> Self {
        self.update_style = style;
        self
    }

    /// Marks the field read-only: it never emits output in the full or
    /// update serialization paths regardless of content.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Excludes the field from update requests even when it has content.
    #[must_use]
    pub fn not_updatable(mut self) -> Self {
        self.update_eligible = false;
        self
    }

    /// Declares an attribute slot, initially null. Null attributes are
    /// omitted from output.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: Option<String>,
    ) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<Cow<'static, str>>, value: Option<String>) {
        let name = name.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn field_uri(&self) -> Option<&str> {
        self.field_uri.as_deref()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.value = Some(FieldValue::Text(value.into()));
    }

    pub fn set_boolean(&mut self, value: bool) {
        self.value = Some(FieldValue::Boolean(value));
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    #[must_use]
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    /// Returns the scalar value as text, booleans in wire spelling.
    #[must_use]
    pub fn value_text(&self) -> Option<Cow<'_, str>> {
        self.value.as_ref().map(FieldValue::render)
    }

    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self.value {
            Some(FieldValue::Boolean(b)) => Some(b),
            _ => None,
        }
    }

    pub fn add_child(&mut self, child: Field) {
        self.children.push(child);
    }

    #[must_use]
    pub fn children(&self) -> &[Field] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Field> {
        &mut self.children
    }

    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Field> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// Whether this field carries update-worthy content: a scalar value,
    /// or for collections at least one entry.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        if self.collection {
            !self.children.is_empty()
        } else {
            self.value.is_some()
        }
    }

    /// Populates scalar content and attributes from a parsed element.
    ///
    /// Children are not descended into here; structured fields recurse via
    /// their owning record's schema, and free-form subtrees use
    /// [`Field::populate_tree`].
    pub fn populate(&mut self, element: &XmlElement, boolean: bool) {
        for (name, value) in &element.attributes {
            self.set_attribute(Cow::Owned(name.clone()), Some(value.clone()));
        }
        if let Some(text) = element.text() {
            if boolean {
                self.value = Some(FieldValue::Boolean(text == "true"));
            } else {
                self.value = Some(FieldValue::Text(text.to_owned()));
            }
        }
    }

    /// Populates this field and a generic child subtree from a parsed
    /// element, recursively. Used for free-form containers whose exact
    /// shape the schema does not model.
    pub fn populate_tree(&mut self, element: &XmlElement) {
        self.populate(element, false);
        for child_element in &element.children {
            let mut child = Field::new(Cow::Owned(child_element.name.clone()));
            child.populate_tree(child_element);
            self.children.push(child);
        }
    }

    /// Renders the field as wire markup, empty when suppressed.
    #[must_use]
    pub fn write_xml(&self) -> String {
        if self.read_only {
            return String::new();
        }

        let attrs: Vec<(&str, Option<&str>)> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_deref()))
            .collect();
        let has_attrs = attrs.iter().any(|(_, v)| v.is_some());

        match self.kind {
            FieldKind::Reference => {
                if has_attrs {
                    writer::open_tag(&self.tag, &attrs, true)
                } else {
                    String::new()
                }
            }
            FieldKind::Element => {
                let mut body = String::new();
                if let Some(value) = &self.value {
                    body.push_str(&writer::escape(&value.render()));
                }
                for child in &self.children {
                    body.push_str(&child.write_xml());
                }
                if body.is_empty() && !has_attrs {
                    return String::new();
                }
                let mut out = writer::open_tag(&self.tag, &attrs, false);
                out.push_str(&body);
                out.push_str(&writer::close_tag(&self.tag));
                out
            }
        }
    }

    /// Renders this field as a set directive inside an update request,
    /// wrapped in the given record container tag. Emits nothing when the
    /// field is read-only, not update-eligible, or has no update-worthy
    /// content.
    #[must_use]
    pub fn write_set_field(&self, container: &str) -> String {
        if self.read_only || !self.update_eligible || !self.has_updates() {
            return String::new();
        }
        match &self.update_style {
            UpdateStyle::FieldUri => {
                let Some(uri) = self.field_uri.as_deref() else {
                    tracing::debug!(tag = %self.tag, "field has no update address, skipping");
                    return String::new();
                };
                let body = self.write_xml();
                if body.is_empty() {
                    return String::new();
                }
                format!(
                    "<t:SetItemField><t:FieldURI FieldURI=\"{uri}\"/>\
                     <t:{container}>{body}</t:{container}></t:SetItemField>"
                )
            }
            UpdateStyle::IndexedEntries { base_uri } => {
                self.write_indexed_entries(container, base_uri)
            }
            UpdateStyle::IndexedFields { base_uri } => self.write_indexed_fields(container, base_uri),
        }
    }

    /// Renders this field as a delete directive inside an update request.
    /// Emits nothing when the field is read-only, not update-eligible, or
    /// has no addressable form.
    #[must_use]
    pub fn write_delete_field(&self) -> String {
        if self.read_only || !self.update_eligible {
            return String::new();
        }
        match &self.update_style {
            UpdateStyle::FieldUri => self.field_uri.as_deref().map_or_else(String::new, |uri| {
                format!("<t:DeleteItemField><t:FieldURI FieldURI=\"{uri}\"/></t:DeleteItemField>")
            }),
            // Keyed collections have no whole-collection address; entries
            // without values already render as per-entry deletes in the set
            // path, and an empty collection has nothing to address.
            UpdateStyle::IndexedEntries { .. } | UpdateStyle::IndexedFields { .. } => String::new(),
        }
    }

    /// Per-entry set-or-delete directives for flat keyed collections
    /// (email, phone, and IM entries).
    fn write_indexed_entries(&self, container: &str, base_uri: &str) -> String {
        let mut out = String::new();
        for entry in &self.children {
            let Some(key) = entry.attribute("Key") else {
                tracing::warn!(tag = %self.tag, "keyed entry without Key attribute, skipping");
                continue;
            };
            let key = writer::escape(key);
            match entry.value_text() {
                Some(value) => {
                    let _ = write!(
                        out,
                        "<t:SetItemField>\
                         <t:IndexedFieldURI FieldURI=\"{base_uri}\" FieldIndex=\"{key}\"/>\
                         <t:{container}><t:{tag}><t:Entry Key=\"{key}\">{value}</t:Entry></t:{tag}></t:{container}>\
                         </t:SetItemField>",
                        tag = self.tag,
                        value = writer::escape(&value),
                    );
                }
                None => {
                    let _ = write!(
                        out,
                        "<t:DeleteItemField>\
                         <t:IndexedFieldURI FieldURI=\"{base_uri}\" FieldIndex=\"{key}\"/>\
                         </t:DeleteItemField>",
                    );
                }
            }
        }
        out
    }

    /// Per-sub-field set-or-delete directives for structured keyed
    /// collections (physical address entries).
    fn write_indexed_fields(&self, container: &str, base_uri: &str) -> String {
        let mut out = String::new();
        for entry in &self.children {
            let Some(key) = entry.attribute("Key") else {
                tracing::warn!(tag = %self.tag, "keyed entry without Key attribute, skipping");
                continue;
            };
            let key = writer::escape(key);
            for part in &entry.children {
                match part.value_text() {
                    Some(value) => {
                        let _ = write!(
                            out,
                            "<t:SetItemField>\
                             <t:IndexedFieldURI FieldURI=\"{base_uri}:{part_tag}\" FieldIndex=\"{key}\"/>\
                             <t:{container}><t:{tag}><t:Entry Key=\"{key}\">\
                             <t:{part_tag}>{value}</t:{part_tag}>\
                             </t:Entry></t:{tag}></t:{container}>\
                             </t:SetItemField>",
                            tag = self.tag,
                            part_tag = part.tag,
                            value = writer::escape(&value),
                        );
                    }
                    None => {
                        let _ = write!(
                            out,
                            "<t:DeleteItemField>\
                             <t:IndexedFieldURI FieldURI=\"{base_uri}:{part_tag}\" FieldIndex=\"{key}\"/>\
                             </t:DeleteItemField>",
                            part_tag = part.tag,
                        );
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_serializes_to_nothing() {
        let field = Field::new("Subject");
        assert_eq!(field.write_xml(), "");
    }

    #[test]
    fn empty_children_are_suppressed_at_every_level() {
        let mut outer = Field::new("CompleteName");
        outer.add_child(Field::new("FirstName"));
        outer.add_child(Field::new("Surname"));
        assert_eq!(outer.write_xml(), "");

        outer.child_mut("Surname").unwrap().set_text("Karra");
        assert_eq!(
            outer.write_xml(),
            "<t:CompleteName><t:Surname>Karra</t:Surname></t:CompleteName>"
        );
    }

    #[test]
    fn boolean_renders_lowercase() {
        let mut field = Field::new("ReminderIsSet");
        field.set_boolean(true);
        assert_eq!(field.write_xml(), "<t:ReminderIsSet>true</t:ReminderIsSet>");
    }

    #[test]
    fn text_is_escaped() {
        let field = Field::text("Subject", "Q&A <tonight>");
        assert_eq!(
            field.write_xml(),
            "<t:Subject>Q&amp;A &lt;tonight&gt;</t:Subject>"
        );
    }

    #[test]
    fn reference_field_renders_attribute_only() {
        let mut item_id = Field::reference("ItemId");
        assert_eq!(item_id.write_xml(), "");

        item_id.set_attribute("Id", Some("abc".to_owned()));
        item_id.set_attribute("ChangeKey", None);
        assert_eq!(item_id.write_xml(), "<t:ItemId Id=\"abc\"/>");
    }

    #[test]
    fn read_only_field_never_emits() {
        let field = Field::text("DateTimeCreated", "2016-02-01T10:00:00Z").read_only();
        assert_eq!(field.write_xml(), "");
        assert_eq!(field.write_set_field("Item"), "");
        assert_eq!(field.write_delete_field(), "");
    }

    #[test]
    fn enumerated_rejects_values_outside_the_set() {
        let err = Field::enumerated("LegacyFreeBusyStatus", "Bogus", crate::data::FREE_BUSY_VALUES)
            .unwrap_err();
        match err {
            WireError::InvalidEnumValue { field, value, legal } => {
                assert_eq!(field, "LegacyFreeBusyStatus");
                assert_eq!(value, "Bogus");
                assert!(legal.contains(&"Busy"));
            }
            other => panic!("expected InvalidEnumValue, got {other:?}"),
        }

        let ok =
            Field::enumerated("LegacyFreeBusyStatus", "Busy", crate::data::FREE_BUSY_VALUES)
                .unwrap();
        assert_eq!(ok.value_text().as_deref(), Some("Busy"));
    }

    #[test]
    fn bounded_int_degrades_to_unset() {
        let field = Field::bounded_int("DayOfMonth", "45", 1..=31);
        assert!(field.value().is_none());
        assert_eq!(field.write_xml(), "");

        let ok = Field::bounded_int("DayOfMonth", "28", 1..=31);
        assert_eq!(ok.value_text().as_deref(), Some("28"));
    }

    #[test]
    fn set_field_wraps_in_container() {
        let mut field = Field::new("JobTitle").with_uri("contacts:JobTitle");
        field.set_text("Plumber");
        assert_eq!(
            field.write_set_field("Contact"),
            "<t:SetItemField><t:FieldURI FieldURI=\"contacts:JobTitle\"/>\
             <t:Contact><t:JobTitle>Plumber</t:JobTitle></t:Contact></t:SetItemField>"
        );
    }

    #[test]
    fn delete_field_has_no_payload() {
        let field = Field::new("JobTitle").with_uri("contacts:JobTitle");
        assert_eq!(
            field.write_delete_field(),
            "<t:DeleteItemField><t:FieldURI FieldURI=\"contacts:JobTitle\"/></t:DeleteItemField>"
        );
    }

    #[test]
    fn collection_has_updates_tracks_entries() {
        let mut categories = Field::collection("Categories");
        assert!(!categories.has_updates());
        categories.add_child(Field::text("String", "clients"));
        assert!(categories.has_updates());
    }

    #[test]
    fn indexed_entries_mix_sets_and_deletes() {
        let mut emails = Field::collection("EmailAddresses").with_update_style(
            UpdateStyle::IndexedEntries {
                base_uri: "contacts:EmailAddress",
            },
        );
        let mut keep = Field::text("Entry", "new@example.org");
        keep.set_attribute("Key", Some("EmailAddress1".to_owned()));
        emails.add_child(keep);
        let mut drop = Field::new("Entry");
        drop.set_attribute("Key", Some("EmailAddress2".to_owned()));
        emails.add_child(drop);

        let markup = emails.write_set_field("Contact");
        assert!(markup.contains("FieldIndex=\"EmailAddress1\""));
        assert!(markup.contains("new@example.org"));
        assert!(markup.contains(
            "<t:DeleteItemField><t:IndexedFieldURI FieldURI=\"contacts:EmailAddress\" \
             FieldIndex=\"EmailAddress2\"/></t:DeleteItemField>"
        ));
    }
}
