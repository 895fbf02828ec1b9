//! Populate → serialize → reparse fidelity tests.
//!
//! A record built through its typed setters must survive a trip through
//! markup and back with its values intact, modulo boolean literal
//! normalization to lowercase.

use crate::data::{Gender, Importance, LegacyFreeBusyStatus, Sensitivity, email_keys, phone_keys};
use crate::record::{CalendarItem, Contact};
use crate::xml::XmlElement;

#[test_log::test]
fn contact_round_trips_through_markup() {
    let mut contact = Contact::new();
    contact.set_given_name("Sriram");
    contact.set_surname("Karra");
    contact.set_display_name("Sriram Karra");
    contact.set_job_title("Engineer & Author");
    contact.set_company_name("ACME");
    contact.set_email(email_keys::EMAIL1, "sk@example.org");
    contact.set_phone(phone_keys::MOBILE, "+91 98765");
    contact.set_gender(Gender::Male);
    contact.set_personal_home_page("https://example.org/~sk");
    contact.base_mut().set_sensitivity(Sensitivity::Personal);
    contact.base_mut().set_importance(Importance::High);
    contact.base_mut().add_category("friends");

    let markup = contact.write_xml();
    let element = XmlElement::parse(markup.as_bytes()).unwrap();
    let mut reparsed = Contact::new();
    reparsed.populate_from(&element).unwrap();

    assert_eq!(reparsed.first_name(), contact.first_name());
    assert_eq!(reparsed.last_name(), contact.last_name());
    assert_eq!(reparsed.display_name(), contact.display_name());
    assert_eq!(reparsed.emails(), contact.emails());
    assert_eq!(reparsed.phones(), contact.phones());
    assert_eq!(reparsed.gender(), Gender::Male);
    assert_eq!(reparsed.personal_home_page(), Some("https://example.org/~sk"));
    assert_eq!(reparsed.base().categories(), vec!["friends"]);
    // The escaped ampersand comes back intact.
    assert_eq!(
        reparsed.base().schema().text("JobTitle").as_deref(),
        Some("Engineer & Author")
    );
}

#[test_log::test]
fn calendar_item_round_trips_with_recurrence() {
    let mut item = CalendarItem::new();
    item.set_subject("Gym");
    item.set_location("Basement");
    item.set_all_day(false);
    item.set_free_busy_status(LegacyFreeBusyStatus::Busy);
    item.recurrence_mut().set_weekly("2", "Tuesday").unwrap();
    item.recurrence_mut().set_end_date("2016-03-01", "2016-09-01");

    let markup = item.write_xml().unwrap();
    let element = XmlElement::parse(markup.as_bytes()).unwrap();
    let mut reparsed = CalendarItem::new();
    reparsed.populate_from(&element).unwrap();

    assert_eq!(reparsed.subject().as_deref(), Some("Gym"));
    let children = reparsed.recurrence().active_children().unwrap();
    assert_eq!(children[0].tag(), "WeeklyRecurrence");
    assert_eq!(children[1].tag(), "EndDateRecurrence");

    // Booleans normalize to lowercase literals on the wire.
    assert!(markup.contains("<t:IsAllDayEvent>false</t:IsAllDayEvent>"));
    assert_eq!(
        reparsed
            .base()
            .schema()
            .field("IsAllDayEvent")
            .unwrap()
            .as_boolean(),
        Some(false)
    );
}

#[test_log::test]
fn empty_records_serialize_to_bare_containers() {
    let contact = Contact::new();
    assert_eq!(contact.write_xml(), "<t:Contact></t:Contact>");

    let item = CalendarItem::new();
    assert_eq!(item.write_xml().unwrap(), "<t:CalendarItem></t:CalendarItem>");
}
