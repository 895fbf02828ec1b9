//! The generic record base shared by all item kinds.

use std::collections::HashMap;

use ews_core::types::ItemRef;

use super::attachment::Attachments;
use super::changeset::{ChangeSet, UpdateEntry};
use crate::data::{IMPORTANCE_VALUES, Importance, SENSITIVITY_VALUES, Sensitivity};
use crate::error::{WireError, WireResult};
use crate::field::{Field, RecordSchema};
use crate::property::well_known::WellKnownProperty;
use crate::property::{ExtendedFieldUri, ExtendedProperty, PropVariant};
use crate::xml::{XmlElement, writer};

/// Common wire tags of the base item schema.
pub mod tags {
    pub const ITEM_ID: &str = "ItemId";
    pub const PARENT_FOLDER_ID: &str = "ParentFolderId";
    pub const ITEM_CLASS: &str = "ItemClass";
    pub const SUBJECT: &str = "Subject";
    pub const SENSITIVITY: &str = "Sensitivity";
    pub const BODY: &str = "Body";
    pub const DATE_TIME_CREATED: &str = "DateTimeCreated";
    pub const CATEGORIES: &str = "Categories";
    pub const IMPORTANCE: &str = "Importance";
    pub const IS_DRAFT: &str = "IsDraft";
    pub const REMINDER_DUE_BY: &str = "ReminderDueBy";
    pub const REMINDER_IS_SET: &str = "ReminderIsSet";
    pub const REMINDER_MINUTES: &str = "ReminderMinutesBeforeStart";
    pub const HAS_ATTACHMENTS: &str = "HasAttachments";
    pub const ATTACHMENTS: &str = "Attachments";
    pub const EXTENDED_PROPERTY: &str = "ExtendedProperty";
}

/// A generic record: the ordered field schema, the attachment collection,
/// and the extended properties keyed by addressing variant.
///
/// Concrete record types ([`super::Contact`], [`super::CalendarItem`])
/// extend the schema with their own bindings and special-case their own
/// container tags during parse.
#[derive(Debug, Clone)]
pub struct Item {
    container_tag: &'static str,
    schema: RecordSchema,
    attachments: Attachments,
    eprops: Vec<ExtendedProperty>,
    tagged_index: HashMap<u32, usize>,
    named_int_index: HashMap<(String, u32), usize>,
    named_str_index: HashMap<(String, String), usize>,
    /// Materialized well-known server timestamp; read-only, never
    /// serialized back.
    last_modified_time: Option<String>,
}

impl Item {
    /// Builds the base schema for the given record container tag.
    #[must_use]
    pub fn new(container_tag: &'static str) -> Self {
        let mut schema = RecordSchema::new();
        schema.register(Field::reference(tags::ITEM_ID).read_only());
        schema.register(
            Field::reference(tags::PARENT_FOLDER_ID)
                .with_uri("folder:ParentFolderId")
                .read_only(),
        );
        schema.register(Field::new(tags::ITEM_CLASS).with_uri("item:ItemClass"));
        schema.register(Field::new(tags::SUBJECT).with_uri("item:Subject"));
        schema.register(Field::new(tags::SENSITIVITY).with_uri("item:Sensitivity"));
        schema.register(
            Field::new(tags::BODY)
                .with_uri("item:Body")
                .with_attribute("BodyType", None),
        );
        schema.register(Field::new(tags::DATE_TIME_CREATED).read_only());
        schema.register(Field::collection(tags::CATEGORIES).with_uri("item:Categories"));
        schema.register(Field::new(tags::IMPORTANCE).with_uri("item:Importance"));
        schema.register(Field::new(tags::IS_DRAFT).read_only());
        schema.register(Field::new(tags::REMINDER_DUE_BY).with_uri("item:ReminderDueBy"));
        schema.register(Field::new(tags::REMINDER_IS_SET).with_uri("item:ReminderIsSet"));
        schema.register(Field::new(tags::REMINDER_MINUTES).with_uri("item:ReminderMinutesBeforeStart"));
        schema.register(Field::new(tags::HAS_ATTACHMENTS).read_only());
        schema.mark_boolean(tags::REMINDER_IS_SET);
        schema.mark_boolean(tags::HAS_ATTACHMENTS);

        Self {
            container_tag,
            schema,
            attachments: Attachments::new(),
            eprops: Vec::new(),
            tagged_index: HashMap::new(),
            named_int_index: HashMap::new(),
            named_str_index: HashMap::new(),
            last_modified_time: None,
        }
    }

    /// The wire tag wrapping this record (`Contact`, `CalendarItem`, ...).
    #[must_use]
    pub fn container_tag(&self) -> &'static str {
        self.container_tag
    }

    #[must_use]
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut RecordSchema {
        &mut self.schema
    }

    #[must_use]
    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }

    // Typed accessors for the common fields.

    /// The server handle for this record, available once it has been
    /// created or parsed from a response.
    #[must_use]
    pub fn item_ref(&self) -> Option<ItemRef> {
        let field = self.schema.field(tags::ITEM_ID)?;
        let id = field.attribute("Id")?;
        Some(match field.attribute("ChangeKey") {
            Some(ck) => ItemRef::with_change_key(id, ck),
            None => ItemRef::new(id),
        })
    }

    pub fn set_item_ref(&mut self, item: &ItemRef) {
        if let Some(field) = self.schema.field_mut(tags::ITEM_ID) {
            field.set_attribute("Id", Some(item.id.clone()));
            field.set_attribute("ChangeKey", item.change_key.clone());
        }
    }

    #[must_use]
    pub fn parent_folder_id(&self) -> Option<&str> {
        self.schema.field(tags::PARENT_FOLDER_ID)?.attribute("Id")
    }

    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.schema.text(tags::SUBJECT).map(|s| s.into_owned())
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.schema.set_text(tags::SUBJECT, subject);
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.schema.set_text(tags::SENSITIVITY, sensitivity.as_str());
    }

    pub fn set_importance(&mut self, importance: Importance) {
        self.schema.set_text(tags::IMPORTANCE, importance.as_str());
    }

    /// Sets the body text and its `BodyType` attribute (`Text` or `HTML`).
    pub fn set_body(&mut self, body_type: &str, text: impl Into<String>) {
        if let Some(field) = self.schema.field_mut(tags::BODY) {
            field.set_attribute("BodyType", Some(body_type.to_owned()));
            field.set_text(text);
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<String> {
        self.schema.text(tags::BODY).map(|s| s.into_owned())
    }

    /// Adds a category, ignoring duplicates.
    pub fn add_category(&mut self, category: &str) {
        let Some(field) = self.schema.field_mut(tags::CATEGORIES) else {
            return;
        };
        let exists = field
            .children()
            .iter()
            .any(|c| c.value_text().as_deref() == Some(category));
        if !exists {
            field.add_child(Field::text("String", category));
        }
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.schema
            .field(tags::CATEGORIES)
            .map(|f| {
                f.children()
                    .iter()
                    .filter_map(|c| c.value_text().map(|v| v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The materialized last-modification timestamp, when the server sent
    /// one.
    #[must_use]
    pub fn last_modified_time(&self) -> Option<&str> {
        self.last_modified_time.as_deref()
    }

    // Extended properties.

    #[must_use]
    pub fn extended_properties(&self) -> &[ExtendedProperty] {
        &self.eprops
    }

    /// Adds a tagged property programmatically.
    pub fn add_tagged_property(
        &mut self,
        pid: u16,
        ptype: crate::property::mapi::MapiPropertyType,
        value: impl Into<String>,
    ) {
        let prop = ExtendedProperty::with_value(ExtendedFieldUri::tagged(pid, ptype), value);
        self.adopt_extended(prop);
    }

    /// Adds a named property with a numeric id programmatically.
    pub fn add_named_int_property(
        &mut self,
        set_id: impl Into<String>,
        pid: u32,
        ptype: crate::property::mapi::MapiPropertyType,
        value: impl Into<String>,
    ) {
        let prop = ExtendedProperty::with_value(ExtendedFieldUri::named_int(set_id, pid, ptype), value);
        self.adopt_extended(prop);
    }

    /// Adds a named property with a string name programmatically.
    pub fn add_named_str_property(
        &mut self,
        set_id: impl Into<String>,
        name: impl Into<String>,
        ptype: crate::property::mapi::MapiPropertyType,
        value: impl Into<String>,
    ) {
        let prop =
            ExtendedProperty::with_value(ExtendedFieldUri::named_str(set_id, name, ptype), value);
        self.adopt_extended(prop);
    }

    /// The tagged property with the given combined MAPI tag, if present.
    #[must_use]
    pub fn tagged_property(&self, tag: u32) -> Option<&ExtendedProperty> {
        self.tagged_index.get(&tag).map(|&i| &self.eprops[i])
    }

    /// The named numeric property for a set id and property id, if present.
    #[must_use]
    pub fn named_int_property(&self, set_id: &str, pid: u32) -> Option<&ExtendedProperty> {
        self.named_int_index
            .get(&(set_id.to_owned(), pid))
            .map(|&i| &self.eprops[i])
    }

    /// The named string property for a set id and name, if present.
    #[must_use]
    pub fn named_str_property(&self, set_id: &str, name: &str) -> Option<&ExtendedProperty> {
        self.named_str_index
            .get(&(set_id.to_owned(), name.to_owned()))
            .map(|&i| &self.eprops[i])
    }

    /// Stores a decoded extended property, materializing well-known ids as
    /// typed fields and indexing the rest by their addressing variant.
    pub(crate) fn adopt_extended(&mut self, prop: ExtendedProperty) {
        if let Some(tag) = prop.uri.prop_tag() {
            let pid = crate::property::mapi::prop_id(tag);
            if WellKnownProperty::from_property_id(pid)
                == Some(WellKnownProperty::LastModificationTime)
            {
                self.last_modified_time = prop.value;
                return;
            }
        }

        let index = self.eprops.len();
        let set_id = prop
            .uri
            .set_id
            .clone()
            .or_else(|| prop.uri.distinguished_set_id.clone());
        match prop.variant() {
            PropVariant::Tagged => {
                if let Some(tag) = prop.uri.prop_tag() {
                    self.tagged_index.insert(tag, index);
                }
            }
            PropVariant::NamedInt => {
                if let (Some(set_id), Some(pid)) = (set_id, prop.uri.property_id) {
                    self.named_int_index.insert((set_id, pid), index);
                }
            }
            PropVariant::NamedStr => {
                if let (Some(set_id), Some(name)) = (set_id, prop.uri.property_name.clone()) {
                    self.named_str_index.insert((set_id, name), index);
                }
            }
            PropVariant::Unknown => {
                tracing::debug!("unrecognized extended property shape, keeping opaquely");
            }
        }
        self.eprops.push(prop);
    }

    /// Routes one parsed child element into the schema.
    ///
    /// The closed set of container tags (item id references, body,
    /// categories, attachments, extended properties) is handled explicitly;
    /// every other known tag populates its bound field, and unknown tags
    /// are logged and dropped without failing the parse.
    ///
    /// ## Errors
    /// Propagates enumerated-value violations.
    pub fn apply_child(&mut self, child: &XmlElement) -> WireResult<()> {
        match child.name.as_str() {
            tags::ITEM_ID | tags::PARENT_FOLDER_ID => {
                if let Some(field) = self.schema.field_mut(&child.name) {
                    field.set_attribute("Id", child.attr("Id").map(str::to_owned));
                    field.set_attribute("ChangeKey", child.attr("ChangeKey").map(str::to_owned));
                }
            }
            tags::BODY => {
                let body_type = child.attr("BodyType").unwrap_or("HTML").to_owned();
                if let Some(field) = self.schema.field_mut(tags::BODY) {
                    field.set_attribute("BodyType", Some(body_type));
                    if let Some(text) = child.text() {
                        field.set_text(text);
                    }
                }
            }
            tags::CATEGORIES => {
                for entry in &child.children {
                    if let Some(text) = entry.text() {
                        self.add_category(text);
                    }
                }
            }
            tags::ATTACHMENTS => self.attachments.populate_from(child),
            tags::EXTENDED_PROPERTY => {
                self.adopt_extended(ExtendedProperty::decode(child));
            }
            tags::SENSITIVITY => self.apply_enumerated(child, SENSITIVITY_VALUES)?,
            tags::IMPORTANCE => self.apply_enumerated(child, IMPORTANCE_VALUES)?,
            tag if self.schema.contains(tag) => {
                let boolean = self.schema.is_boolean(tag);
                if let Some(field) = self.schema.field_mut(tag) {
                    field.populate(child, boolean);
                }
            }
            tag => {
                tracing::warn!(tag = %tag, "unknown field tag, dropping");
            }
        }
        Ok(())
    }

    /// Populates a field whose values form a closed set; a value outside
    /// the set fails the parse.
    fn apply_enumerated(
        &mut self,
        child: &XmlElement,
        legal: &'static [&'static str],
    ) -> WireResult<()> {
        let Some(text) = child.text() else {
            return Ok(());
        };
        if !legal.contains(&text) {
            return Err(WireError::InvalidEnumValue {
                field: child.name.clone(),
                value: text.to_owned(),
                legal,
            });
        }
        self.schema.set_text(&child.name, text);
        Ok(())
    }

    /// Populates the record from a parsed record element.
    ///
    /// ## Errors
    /// Propagates enumerated-value violations; unknown tags never fail the
    /// parse.
    pub fn populate_from(&mut self, element: &XmlElement) -> WireResult<()> {
        for child in &element.children {
            self.apply_child(child)?;
        }
        Ok(())
    }

    /// The record's ordered children as walked by the partial-update diff:
    /// schema fields in registration order, then extended properties.
    #[must_use]
    pub fn update_children(&self) -> Vec<UpdateEntry<'_>> {
        let mut children: Vec<UpdateEntry<'_>> =
            self.schema.fields().map(UpdateEntry::Field).collect();
        children.extend(self.eprops.iter().map(UpdateEntry::Extended));
        children
    }

    /// Partitions the record's children into update directives.
    #[must_use]
    pub fn change_set(&self) -> ChangeSet<'_> {
        ChangeSet::compute(self.update_children())
    }

    /// Renders the record body: schema fields in registration order, then
    /// extended properties, each subject to empty suppression.
    #[must_use]
    pub fn write_body(&self) -> String {
        let mut out = self.schema.serialize_all();
        for prop in &self.eprops {
            out.push_str(&prop.write_xml());
        }
        out
    }

    /// Renders the full record wrapped in its container tag.
    #[must_use]
    pub fn write_xml(&self) -> String {
        let body = self.write_body();
        let mut out = writer::open_tag(self.container_tag, &[], false);
        out.push_str(&body);
        out.push_str(&writer::close_tag(self.container_tag));
        out
    }
}
