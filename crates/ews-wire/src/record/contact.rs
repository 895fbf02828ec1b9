//! Contact records.

use ews_core::types::ItemRef;

use super::changeset::{ChangeSet, UpdateEntry};
use super::item::Item;
use crate::data::Gender;
use crate::error::WireResult;
use crate::field::{Field, UpdateStyle};
use crate::property::well_known::WellKnownProperty;
use crate::property::{ExtendedFieldUri, ExtendedProperty};
use crate::property::mapi::prop_id;
use crate::xml::{XmlElement, writer};

/// Contact-specific wire tags.
pub mod tags {
    pub const FILE_AS: &str = "FileAs";
    pub const FILE_AS_MAPPING: &str = "FileAsMapping";
    pub const DISPLAY_NAME: &str = "DisplayName";
    pub const GIVEN_NAME: &str = "GivenName";
    pub const INITIALS: &str = "Initials";
    pub const MIDDLE_NAME: &str = "MiddleName";
    pub const NICKNAME: &str = "Nickname";
    pub const COMPLETE_NAME: &str = "CompleteName";
    pub const COMPANY_NAME: &str = "CompanyName";
    pub const EMAIL_ADDRESSES: &str = "EmailAddresses";
    pub const PHYSICAL_ADDRESSES: &str = "PhysicalAddresses";
    pub const PHONE_NUMBERS: &str = "PhoneNumbers";
    pub const ASSISTANT_NAME: &str = "AssistantName";
    pub const BIRTHDAY: &str = "Birthday";
    pub const BUSINESS_HOME_PAGE: &str = "BusinessHomePage";
    pub const DEPARTMENT: &str = "Department";
    pub const IM_ADDRESSES: &str = "ImAddresses";
    pub const JOB_TITLE: &str = "JobTitle";
    pub const MANAGER: &str = "Manager";
    pub const POSTAL_ADDRESS_INDEX: &str = "PostalAddressIndex";
    pub const PROFESSION: &str = "Profession";
    pub const SPOUSE_NAME: &str = "SpouseName";
    pub const SURNAME: &str = "Surname";
    pub const WEDDING_ANNIVERSARY: &str = "WeddingAnniversary";
    pub const ALIAS: &str = "Alias";
}

/// A contact record: the base item schema extended with the contact tag
/// bindings, keyed entry collections, and two well-known extended
/// properties materialized as typed fields.
#[derive(Debug, Clone)]
pub struct Contact {
    base: Item,
    gender: Option<ExtendedProperty>,
    personal_home_page: Option<ExtendedProperty>,
}

impl Contact {
    #[must_use]
    pub fn new() -> Self {
        let mut base = Item::new("Contact");
        let schema = base.schema_mut();

        for tag in [
            tags::FILE_AS,
            tags::FILE_AS_MAPPING,
            tags::DISPLAY_NAME,
            tags::GIVEN_NAME,
            tags::INITIALS,
            tags::MIDDLE_NAME,
            tags::NICKNAME,
        ] {
            schema.register(Field::new(tag).with_uri(format!("contacts:{tag}")));
        }
        // Server-composed; parsed for its shortcuts but never written back.
        schema.register(Field::new(tags::COMPLETE_NAME).read_only());
        schema.register(Field::new(tags::COMPANY_NAME).with_uri("contacts:CompanyName"));
        schema.register(
            Field::collection(tags::EMAIL_ADDRESSES)
                .with_uri("contacts:EmailAddresses")
                .with_update_style(UpdateStyle::IndexedEntries {
                    base_uri: "contacts:EmailAddress",
                }),
        );
        schema.register(
            Field::collection(tags::PHYSICAL_ADDRESSES)
                .with_uri("contacts:PhysicalAddresses")
                .with_update_style(UpdateStyle::IndexedFields {
                    base_uri: "contacts:PhysicalAddress",
                }),
        );
        schema.register(
            Field::collection(tags::PHONE_NUMBERS)
                .with_uri("contacts:PhoneNumbers")
                .with_update_style(UpdateStyle::IndexedEntries {
                    base_uri: "contacts:PhoneNumber",
                }),
        );
        for tag in [
            tags::ASSISTANT_NAME,
            tags::BIRTHDAY,
            tags::BUSINESS_HOME_PAGE,
            tags::DEPARTMENT,
        ] {
            schema.register(Field::new(tag).with_uri(format!("contacts:{tag}")));
        }
        schema.register(
            Field::collection(tags::IM_ADDRESSES)
                .with_uri("contacts:ImAddresses")
                .with_update_style(UpdateStyle::IndexedEntries {
                    base_uri: "contacts:ImAddress",
                }),
        );
        for tag in [
            tags::JOB_TITLE,
            tags::MANAGER,
            tags::POSTAL_ADDRESS_INDEX,
            tags::PROFESSION,
            tags::SPOUSE_NAME,
            tags::SURNAME,
            tags::WEDDING_ANNIVERSARY,
            tags::ALIAS,
        ] {
            schema.register(Field::new(tag).with_uri(format!("contacts:{tag}")));
        }

        Self {
            base,
            gender: None,
            personal_home_page: None,
        }
    }

    #[must_use]
    pub fn base(&self) -> &Item {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Item {
        &mut self.base
    }

    #[must_use]
    pub fn item_ref(&self) -> Option<ItemRef> {
        self.base.item_ref()
    }

    pub fn set_item_ref(&mut self, item: &ItemRef) {
        self.base.set_item_ref(item);
    }

    // Scalar fields.

    pub fn set_file_as(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::FILE_AS, value);
    }

    pub fn set_display_name(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::DISPLAY_NAME, value);
    }

    pub fn set_given_name(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::GIVEN_NAME, value);
    }

    pub fn set_surname(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::SURNAME, value);
    }

    pub fn set_job_title(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::JOB_TITLE, value);
    }

    pub fn set_company_name(&mut self, value: impl Into<String>) {
        self.base.schema_mut().set_text(tags::COMPANY_NAME, value);
    }

    /// Sets the free-form notes, carried in the item body as plain text.
    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.base.set_body("Text", text);
    }

    /// First name: the top-level given name, falling back to the
    /// server-composed complete name.
    #[must_use]
    pub fn first_name(&self) -> Option<String> {
        self.scalar_or_complete_name(tags::GIVEN_NAME, &["FirstName", "GivenName"])
    }

    /// Last name: the top-level surname, falling back to the
    /// server-composed complete name.
    #[must_use]
    pub fn last_name(&self) -> Option<String> {
        self.scalar_or_complete_name(tags::SURNAME, &["LastName", "Surname"])
    }

    /// Display name, falling back to the complete name's full name, then
    /// to "first last".
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.base.schema().text(tags::DISPLAY_NAME) {
            return Some(name.into_owned());
        }
        if let Some(name) = self.complete_name_part("FullName") {
            return Some(name);
        }
        match (self.first_name(), self.last_name()) {
            (None, None) => None,
            (first, last) => Some(
                [first, last]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }

    fn scalar_or_complete_name(&self, tag: &str, fallbacks: &[&str]) -> Option<String> {
        if let Some(value) = self.base.schema().text(tag) {
            return Some(value.into_owned());
        }
        fallbacks.iter().find_map(|part| self.complete_name_part(part))
    }

    fn complete_name_part(&self, part: &str) -> Option<String> {
        self.base
            .schema()
            .field(tags::COMPLETE_NAME)?
            .child(part)?
            .value_text()
            .map(|v| v.into_owned())
    }

    // Keyed entry collections.

    /// Sets the email address stored under a well-known key
    /// (`EmailAddress1`..`EmailAddress3`).
    pub fn set_email(&mut self, key: &str, address: impl Into<String>) {
        self.upsert_entry(tags::EMAIL_ADDRESSES, key, Some(address.into()));
    }

    /// Clears the email address under a key. The entry is kept with no
    /// value, so a subsequent update emits a delete directive for it.
    pub fn clear_email(&mut self, key: &str) {
        self.upsert_entry(tags::EMAIL_ADDRESSES, key, None);
    }

    pub fn set_phone(&mut self, key: &str, number: impl Into<String>) {
        self.upsert_entry(tags::PHONE_NUMBERS, key, Some(number.into()));
    }

    pub fn set_im_address(&mut self, key: &str, address: impl Into<String>) {
        self.upsert_entry(tags::IM_ADDRESSES, key, Some(address.into()));
    }

    /// The (key, address) email entries currently on the record.
    #[must_use]
    pub fn emails(&self) -> Vec<(String, String)> {
        self.entry_values(tags::EMAIL_ADDRESSES)
    }

    #[must_use]
    pub fn phones(&self) -> Vec<(String, String)> {
        self.entry_values(tags::PHONE_NUMBERS)
    }

    /// Sets one part (`Street`, `City`, `State`, `CountryOrRegion`,
    /// `PostalCode`) of the physical address stored under a key.
    pub fn set_address_part(&mut self, key: &str, part: &str, value: impl Into<String>) {
        let Some(field) = self.base.schema_mut().field_mut(tags::PHYSICAL_ADDRESSES) else {
            return;
        };
        let missing = !field
            .children()
            .iter()
            .any(|e| e.attribute("Key") == Some(key));
        if missing {
            field.add_child(Field::new("Entry").with_attribute("Key", Some(key.to_owned())));
        }
        if let Some(entry) = field
            .children_mut()
            .iter_mut()
            .find(|e| e.attribute("Key") == Some(key))
        {
            match entry.child_mut(part) {
                Some(existing) => existing.set_text(value),
                None => entry.add_child(Field::text(part.to_owned(), value)),
            }
        }
    }

    /// One part of the physical address stored under a key.
    #[must_use]
    pub fn address_part(&self, key: &str, part: &str) -> Option<String> {
        self.base
            .schema()
            .field(tags::PHYSICAL_ADDRESSES)?
            .children()
            .iter()
            .find(|e| e.attribute("Key") == Some(key))?
            .child(part)?
            .value_text()
            .map(|v| v.into_owned())
    }

    fn upsert_entry(&mut self, collection_tag: &str, key: &str, value: Option<String>) {
        let Some(field) = self.base.schema_mut().field_mut(collection_tag) else {
            return;
        };
        if let Some(entry) = field
            .children_mut()
            .iter_mut()
            .find(|e| e.attribute("Key") == Some(key))
        {
            match value {
                Some(v) => entry.set_text(v),
                None => entry.clear(),
            }
            return;
        }
        let mut entry = Field::new("Entry").with_attribute("Key", Some(key.to_owned()));
        if let Some(v) = value {
            entry.set_text(v);
        }
        field.add_child(entry);
    }

    fn entry_values(&self, collection_tag: &str) -> Vec<(String, String)> {
        self.base
            .schema()
            .field(collection_tag)
            .map(|field| {
                field
                    .children()
                    .iter()
                    .filter_map(|e| {
                        let key = e.attribute("Key")?.to_owned();
                        let value = e.value_text()?.into_owned();
                        Some((key, value))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    // Well-known extended properties.

    pub fn set_gender(&mut self, gender: Gender) {
        let prop = WellKnownProperty::Gender;
        self.gender = Some(ExtendedProperty::with_value(
            ExtendedFieldUri::tagged(prop_id(prop.tag()), prop.property_type()),
            gender.wire_value().to_string(),
        ));
    }

    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
            .as_ref()
            .and_then(|p| p.value.as_deref())
            .map_or(Gender::Unspecified, Gender::from_wire_text)
    }

    pub fn set_personal_home_page(&mut self, url: impl Into<String>) {
        let prop = WellKnownProperty::PersonalHomePage;
        self.personal_home_page = Some(ExtendedProperty::with_value(
            ExtendedFieldUri::tagged(prop_id(prop.tag()), prop.property_type()),
            url,
        ));
    }

    #[must_use]
    pub fn personal_home_page(&self) -> Option<&str> {
        self.personal_home_page.as_ref()?.value.as_deref()
    }

    // Parse and serialize.

    /// Populates the contact from a parsed `Contact` element.
    ///
    /// ## Errors
    /// Propagates enumerated-value violations from the base item fields.
    pub fn populate_from(&mut self, element: &XmlElement) -> WireResult<()> {
        for child in &element.children {
            match child.name.as_str() {
                tags::COMPLETE_NAME => {
                    if let Some(field) = self.base.schema_mut().field_mut(tags::COMPLETE_NAME) {
                        field.children_mut().clear();
                        for part in &child.children {
                            let mut part_field = Field::new(part.name.clone());
                            part_field.populate(part, false);
                            field.add_child(part_field);
                        }
                    }
                }
                tags::EMAIL_ADDRESSES | tags::PHONE_NUMBERS | tags::IM_ADDRESSES => {
                    if let Some(field) = self.base.schema_mut().field_mut(&child.name) {
                        populate_flat_entries(field, child);
                    }
                }
                tags::PHYSICAL_ADDRESSES => {
                    if let Some(field) = self.base.schema_mut().field_mut(tags::PHYSICAL_ADDRESSES) {
                        populate_structured_entries(field, child);
                    }
                }
                "ExtendedProperty" => {
                    let prop = ExtendedProperty::decode(child);
                    self.adopt_extended(prop);
                }
                _ => self.base.apply_child(child)?,
            }
        }
        Ok(())
    }

    /// Routes a decoded extended property to the contact's typed slots
    /// before falling back to the generic store.
    fn adopt_extended(&mut self, prop: ExtendedProperty) {
        let well_known = prop
            .uri
            .prop_tag()
            .map(prop_id)
            .and_then(WellKnownProperty::from_property_id);
        match well_known {
            Some(WellKnownProperty::Gender) => self.gender = Some(prop),
            Some(WellKnownProperty::PersonalHomePage) => self.personal_home_page = Some(prop),
            _ => self.base.adopt_extended(prop),
        }
    }

    /// The ordered children walked by the update diff: the base item's
    /// children plus the typed extended properties.
    #[must_use]
    pub fn update_children(&self) -> Vec<UpdateEntry<'_>> {
        let mut children = self.base.update_children();
        children.extend(self.gender.iter().map(UpdateEntry::Extended));
        children.extend(self.personal_home_page.iter().map(UpdateEntry::Extended));
        children
    }

    /// Partitions the contact's children into update directives.
    #[must_use]
    pub fn change_set(&self) -> ChangeSet<'_> {
        ChangeSet::compute(self.update_children())
    }

    /// Renders the full contact wrapped in its container tag.
    #[must_use]
    pub fn write_xml(&self) -> String {
        let mut body = self.base.write_body();
        for prop in [&self.gender, &self.personal_home_page].into_iter().flatten() {
            if prop.value.is_some() {
                body.push_str(&prop.write_xml());
            }
        }
        let mut out = writer::open_tag("Contact", &[], false);
        out.push_str(&body);
        out.push_str(&writer::close_tag("Contact"));
        out
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces a collection's entries from a parsed flat entry list
/// (`Entry` children carrying a `Key` attribute and a text value).
fn populate_flat_entries(field: &mut Field, element: &XmlElement) {
    field.children_mut().clear();
    for entry_el in &element.children {
        let mut entry = Field::new("Entry");
        entry.populate(entry_el, false);
        field.add_child(entry);
    }
}

/// Replaces a collection's entries from a parsed structured entry list
/// (`Entry` children carrying sub-fields).
fn populate_structured_entries(field: &mut Field, element: &XmlElement) {
    field.children_mut().clear();
    for entry_el in &element.children {
        let mut entry = Field::new("Entry");
        entry.populate_tree(entry_el);
        field.add_child(entry);
    }
}
