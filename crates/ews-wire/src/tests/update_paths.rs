//! Partial-update rendering over whole records.

use crate::data::email_keys;
use crate::property::mapi::MapiPropertyType;
use crate::record::Contact;

#[test_log::test]
fn update_partition_covers_every_child() {
    let mut contact = Contact::new();
    contact.set_job_title("Plumber");
    contact.set_email(email_keys::EMAIL1, "p@example.org");

    let children = contact.update_children();
    let change_set = contact.change_set();

    assert!(change_set.adds.is_empty());
    assert_eq!(change_set.sets.len() + change_set.dels.len(), children.len());
}

#[test_log::test]
fn untouched_fields_are_emitted_as_deletes() {
    // The diff cannot distinguish "never touched" from "please clear";
    // untouched addressable fields come out as explicit delete directives.
    let mut contact = Contact::new();
    contact.set_job_title("Plumber");

    let markup = contact.change_set().render_updates("Contact");
    assert!(markup.contains(
        "<t:SetItemField><t:FieldURI FieldURI=\"contacts:JobTitle\"/>\
         <t:Contact><t:JobTitle>Plumber</t:JobTitle></t:Contact></t:SetItemField>"
    ));
    assert!(markup.contains(
        "<t:DeleteItemField><t:FieldURI FieldURI=\"contacts:SpouseName\"/></t:DeleteItemField>"
    ));
    // Read-only server fields never appear in either direction.
    assert!(!markup.contains("DateTimeCreated"));
    assert!(!markup.contains("folder:ParentFolderId"));
}

#[test_log::test]
fn extended_properties_update_by_identifier() {
    let mut contact = Contact::new();
    contact
        .base_mut()
        .add_named_str_property("set-guid", "Keywords", MapiPropertyType::Unicode, "alpha");

    let markup = contact.change_set().render_updates("Contact");
    assert!(markup.contains(
        "<t:SetItemField><t:ExtendedFieldURI PropertySetId=\"set-guid\" \
         PropertyName=\"Keywords\" PropertyType=\"String\"/>"
    ));
    assert!(markup.contains("<t:Value>alpha</t:Value>"));
}

#[test_log::test]
fn boolean_fields_update_with_lowercase_literals() {
    let mut contact = Contact::new();
    contact
        .base_mut()
        .schema_mut()
        .set_boolean("ReminderIsSet", true);

    let markup = contact.change_set().render_updates("Contact");
    assert!(markup.contains(
        "<t:SetItemField><t:FieldURI FieldURI=\"item:ReminderIsSet\"/>\
         <t:Contact><t:ReminderIsSet>true</t:ReminderIsSet></t:Contact></t:SetItemField>"
    ));
}
