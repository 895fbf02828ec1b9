//! Ordered tag-to-field binding for one record type.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use super::Field;

/// Ordered registry of the fields making up one record instance.
///
/// Registration order is the exact order fields appear in outgoing markup;
/// the protocol rejects reordered records, so serialization always walks
/// the registry in insertion order. A derived index gives O(1) dispatch
/// from wire tags during parse.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    entries: Vec<Field>,
    index: HashMap<Cow<'static, str>, usize>,
    /// Tags that parse and render as boolean literals even though their
    /// name does not carry the `Is` prefix.
    boolean_tags: HashSet<&'static str>,
}

impl RecordSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one tag binding; insertion order is preserved for serialization.
    ///
    /// ## Panics
    /// Panics when the tag is already registered: tags are unique within a
    /// record instance and a duplicate registration is programmer error.
    pub fn register(&mut self, field: Field) {
        let tag = Cow::Owned(field.tag().to_owned());
        self.entries.push(field);
        let previous = self.index.insert(tag, self.entries.len() - 1);
        assert!(
            previous.is_none(),
            "duplicate tag registered in record schema"
        );
    }

    /// Marks a tag as boolean by override rather than by naming convention.
    pub fn mark_boolean(&mut self, tag: &'static str) {
        self.boolean_tags.insert(tag);
    }

    /// Whether a tag renders and parses as a boolean literal. Tags starting
    /// with `Is` are boolean by convention; others only by explicit
    /// override.
    #[must_use]
    pub fn is_boolean(&self, tag: &str) -> bool {
        self.boolean_tags.contains(tag) || tag.starts_with("Is")
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.index.get(tag).map(|&i| &self.entries[i])
    }

    pub fn field_mut(&mut self, tag: &str) -> Option<&mut Field> {
        self.index.get(tag).map(|&i| &mut self.entries[i])
    }

    /// Fields in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets the text value of a registered field. A miss is programmer
    /// error and only asserted in debug builds.
    pub fn set_text(&mut self, tag: &str, value: impl Into<String>) {
        match self.field_mut(tag) {
            Some(field) => field.set_text(value),
            None => debug_assert!(false, "set_text on unregistered tag {tag}"),
        }
    }

    /// Sets the boolean value of a registered field.
    pub fn set_boolean(&mut self, tag: &str, value: bool) {
        match self.field_mut(tag) {
            Some(field) => field.set_boolean(value),
            None => debug_assert!(false, "set_boolean on unregistered tag {tag}"),
        }
    }

    /// Returns the text value of a registered field, booleans in wire
    /// spelling.
    #[must_use]
    pub fn text(&self, tag: &str) -> Option<Cow<'_, str>> {
        self.field(tag)?.value_text()
    }

    /// Concatenates the serialization of every bound field in registration
    /// order; each field is individually subject to empty suppression.
    #[must_use]
    pub fn serialize_all(&self) -> String {
        let mut out = String::new();
        for field in &self.entries {
            out.push_str(&field.write_xml());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> RecordSchema {
        let mut schema = RecordSchema::new();
        schema.register(Field::new("Subject").with_uri("item:Subject"));
        schema.register(Field::new("Sensitivity").with_uri("item:Sensitivity"));
        schema.register(Field::new("HasAttachments"));
        schema.mark_boolean("HasAttachments");
        schema
    }

    #[test]
    fn serialization_preserves_registration_order() {
        let mut schema = sample_schema();
        schema.set_text("Sensitivity", "Normal");
        schema.set_text("Subject", "Weekly sync");

        assert_eq!(
            schema.serialize_all(),
            "<t:Subject>Weekly sync</t:Subject><t:Sensitivity>Normal</t:Sensitivity>"
        );
    }

    #[test]
    fn boolean_tags_by_prefix_and_override() {
        let schema = sample_schema();
        assert!(schema.is_boolean("IsDraft"));
        assert!(schema.is_boolean("HasAttachments"));
        assert!(!schema.is_boolean("Subject"));
    }

    #[test]
    #[should_panic(expected = "duplicate tag")]
    fn duplicate_registration_panics() {
        let mut schema = sample_schema();
        schema.register(Field::new("Subject"));
    }

    #[test]
    fn lookup_is_by_tag() {
        let mut schema = sample_schema();
        schema.set_boolean("HasAttachments", false);
        assert_eq!(schema.text("HasAttachments").as_deref(), Some("false"));
        assert!(schema.field("Nope").is_none());
    }
}
