//! Add/set/delete partitioning for partial updates.

use crate::field::Field;
use crate::property::ExtendedProperty;

/// One updatable child of a record: a schema field or an extended property.
#[derive(Debug, Clone, Copy)]
pub enum UpdateEntry<'a> {
    Field(&'a Field),
    Extended(&'a ExtendedProperty),
}

impl UpdateEntry<'_> {
    /// Whether the entry carries update-worthy content.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        match self {
            Self::Field(f) => f.has_updates(),
            Self::Extended(p) => p.has_updates(),
        }
    }

    /// Renders the entry as a set directive in the given record container.
    #[must_use]
    pub fn write_set_field(&self, container: &str) -> String {
        match self {
            Self::Field(f) => f.write_set_field(container),
            Self::Extended(p) => p.write_set_field(container),
        }
    }

    /// Renders the entry as a delete directive.
    #[must_use]
    pub fn write_delete_field(&self) -> String {
        match self {
            Self::Field(f) => f.write_delete_field(),
            Self::Extended(p) => p.write_delete_field(),
        }
    }
}

/// The add/set/delete partition of a record's fields.
///
/// Every walked child lands in exactly one of `sets`/`dels`. A field the
/// caller never touched is indistinguishable from one the caller wants
/// cleared and is emitted as a delete directive; this mirrors the protocol
/// usage this model was built against and must not be "fixed" without
/// product confirmation.
#[derive(Debug, Default)]
pub struct ChangeSet<'a> {
    /// Attachment additions. Always empty from the generic diff:
    /// attachments are created through their own dedicated call.
    pub adds: Vec<UpdateEntry<'a>>,
    pub sets: Vec<UpdateEntry<'a>>,
    pub dels: Vec<UpdateEntry<'a>>,
}

impl<'a> ChangeSet<'a> {
    /// Partitions the record's ordered children.
    #[must_use]
    pub fn compute(children: impl IntoIterator<Item = UpdateEntry<'a>>) -> Self {
        let mut change_set = Self::default();
        for child in children {
            if child.has_updates() {
                change_set.sets.push(child);
            } else {
                change_set.dels.push(child);
            }
        }
        change_set
    }

    /// Total number of partitioned children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adds.len() + self.sets.len() + self.dels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the directives for the `Updates` element of an update
    /// request, sets first, then deletes. Entries that have no addressable
    /// or eligible markup contribute nothing.
    #[must_use]
    pub fn render_updates(&self, container: &str) -> String {
        let mut out = String::new();
        for entry in &self.sets {
            out.push_str(&entry.write_set_field(container));
        }
        for entry in &self.dels {
            out.push_str(&entry.write_delete_field());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_child_lands_in_exactly_one_partition() {
        let subject = Field::text("Subject", "hello").with_uri("item:Subject");
        let location = Field::new("Location").with_uri("calendar:Location");
        let mut categories = Field::collection("Categories").with_uri("item:Categories");
        categories.add_child(Field::text("String", "work"));

        let children = [
            UpdateEntry::Field(&subject),
            UpdateEntry::Field(&location),
            UpdateEntry::Field(&categories),
        ];
        let change_set = ChangeSet::compute(children);

        assert!(change_set.adds.is_empty());
        assert_eq!(change_set.sets.len() + change_set.dels.len(), 3);
        assert_eq!(change_set.sets.len(), 2);
        assert_eq!(change_set.dels.len(), 1);
    }

    #[test]
    fn untouched_field_becomes_a_delete_directive() {
        // Deliberate: an unset field is emitted as an explicit delete.
        let untouched = Field::new("SpouseName").with_uri("contacts:SpouseName");
        let change_set = ChangeSet::compute([UpdateEntry::Field(&untouched)]);

        assert_eq!(change_set.dels.len(), 1);
        assert_eq!(
            change_set.render_updates("Contact"),
            "<t:DeleteItemField><t:FieldURI FieldURI=\"contacts:SpouseName\"/></t:DeleteItemField>"
        );
    }

    #[test]
    fn render_orders_sets_before_deletes() {
        let set_me = Field::text("JobTitle", "Plumber").with_uri("contacts:JobTitle");
        let del_me = Field::new("Department").with_uri("contacts:Department");
        let change_set = ChangeSet::compute([UpdateEntry::Field(&del_me), UpdateEntry::Field(&set_me)]);

        let markup = change_set.render_updates("Contact");
        let set_pos = markup.find("SetItemField").unwrap();
        let del_pos = markup.find("DeleteItemField").unwrap();
        assert!(set_pos < del_pos);
    }

    #[test]
    fn read_only_delete_is_suppressed_in_render_but_counted() {
        let created = Field::new("DateTimeCreated").read_only();
        let change_set = ChangeSet::compute([UpdateEntry::Field(&created)]);

        assert_eq!(change_set.len(), 1);
        assert_eq!(change_set.render_updates("Item"), "");
    }
}
