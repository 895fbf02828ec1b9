//! Calendar records.

use chrono::{DateTime, Utc};
use ews_core::constants::EXCHANGE_DATETIME_FORMAT;
use ews_core::types::ItemRef;

use super::changeset::ChangeSet;
use super::item::Item;
use crate::data::{CALENDAR_ITEM_TYPE_VALUES, CalendarItemType, FREE_BUSY_VALUES, LegacyFreeBusyStatus};
use crate::error::{WireError, WireResult};
use crate::field::Field;
use crate::recurrence::Recurrence;
use crate::xml::{XmlElement, writer};

/// Calendar-specific wire tags.
pub mod tags {
    pub const START: &str = "Start";
    pub const END: &str = "End";
    pub const ORIGINAL_START: &str = "OriginalStart";
    pub const IS_ALL_DAY_EVENT: &str = "IsAllDayEvent";
    pub const FREE_BUSY_STATUS: &str = "LegacyFreeBusyStatus";
    pub const LOCATION: &str = "Location";
    pub const WHEN: &str = "When";
    pub const IS_MEETING: &str = "IsMeeting";
    pub const IS_CANCELLED: &str = "IsCancelled";
    pub const IS_RECURRING: &str = "IsRecurring";
    pub const MEETING_REQUEST_WAS_SENT: &str = "MeetingRequestWasSent";
    pub const IS_RESPONSE_REQUESTED: &str = "IsResponseRequested";
    pub const CALENDAR_ITEM_TYPE: &str = "CalendarItemType";
    pub const ORGANIZER: &str = "Organizer";
    pub const DURATION: &str = "Duration";
    pub const TIME_ZONE: &str = "TimeZone";
    pub const APPOINTMENT_SEQUENCE_NUMBER: &str = "AppointmentSequenceNumber";
    pub const RECURRENCE: &str = "Recurrence";
    pub const CONFLICTING_MEETINGS: &str = "ConflictingMeetings";
    pub const ADJACENT_MEETINGS: &str = "AdjacentMeetings";
}

/// How deep nested meeting lists are followed before the remainder is
/// dropped. The wire format carries no explicit depth limit, so the cap is
/// enforced here.
const MAX_NESTED_MEETING_DEPTH: usize = 4;

/// A calendar record: the base item schema extended with scheduling
/// fields, a recurrence rule, and the self-referential conflicting and
/// adjacent meeting lists.
#[derive(Debug, Clone)]
pub struct CalendarItem {
    base: Item,
    recurrence: Recurrence,
    conflicting_meetings: Vec<CalendarItem>,
    adjacent_meetings: Vec<CalendarItem>,
}

impl CalendarItem {
    #[must_use]
    pub fn new() -> Self {
        let mut base = Item::new("CalendarItem");
        let schema = base.schema_mut();

        schema.register(Field::new(tags::START).with_uri("calendar:Start"));
        schema.register(Field::new(tags::END).with_uri("calendar:End"));
        schema.register(Field::new(tags::ORIGINAL_START).read_only());
        schema.register(Field::new(tags::IS_ALL_DAY_EVENT).with_uri("calendar:IsAllDayEvent"));
        schema.register(
            Field::new(tags::FREE_BUSY_STATUS).with_uri("calendar:LegacyFreeBusyStatus"),
        );
        schema.register(Field::new(tags::LOCATION).with_uri("calendar:Location"));
        // Server-rendered display text; written on create, not updatable.
        schema.register(Field::new(tags::WHEN).with_uri("calendar:When").not_updatable());
        schema.register(Field::new(tags::IS_MEETING).read_only());
        schema.register(Field::new(tags::IS_CANCELLED).read_only());
        schema.register(Field::new(tags::IS_RECURRING).read_only());
        schema.register(Field::new(tags::MEETING_REQUEST_WAS_SENT).read_only());
        schema.register(
            Field::new(tags::IS_RESPONSE_REQUESTED).with_uri("calendar:IsResponseRequested"),
        );
        schema.register(Field::new(tags::CALENDAR_ITEM_TYPE).read_only());
        schema.register(Field::new(tags::ORGANIZER).read_only());
        schema.register(Field::new(tags::DURATION).read_only());
        schema.register(Field::new(tags::TIME_ZONE).with_uri("calendar:TimeZone"));
        schema.register(Field::new(tags::APPOINTMENT_SEQUENCE_NUMBER).read_only());
        schema.mark_boolean(tags::MEETING_REQUEST_WAS_SENT);

        Self {
            base,
            recurrence: Recurrence::new(),
            conflicting_meetings: Vec::new(),
            adjacent_meetings: Vec::new(),
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

    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.base.subject()
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.base.set_subject(subject);
    }

    pub fn set_start(&mut self, start: DateTime<Utc>) {
        self.base
            .schema_mut()
            .set_text(tags::START, start.format(EXCHANGE_DATETIME_FORMAT).to_string());
    }

    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.base
            .schema_mut()
            .set_text(tags::END, end.format(EXCHANGE_DATETIME_FORMAT).to_string());
    }

    #[must_use]
    pub fn start(&self) -> Option<String> {
        self.base.schema().text(tags::START).map(|s| s.into_owned())
    }

    #[must_use]
    pub fn end(&self) -> Option<String> {
        self.base.schema().text(tags::END).map(|s| s.into_owned())
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.base.schema_mut().set_text(tags::LOCATION, location);
    }

    pub fn set_all_day(&mut self, all_day: bool) {
        self.base.schema_mut().set_boolean(tags::IS_ALL_DAY_EVENT, all_day);
    }

    pub fn set_free_busy_status(&mut self, status: LegacyFreeBusyStatus) {
        self.base
            .schema_mut()
            .set_text(tags::FREE_BUSY_STATUS, status.as_str());
    }

    #[must_use]
    pub fn calendar_item_type(&self) -> Option<CalendarItemType> {
        let text = self.base.schema().text(tags::CALENDAR_ITEM_TYPE)?;
        CalendarItemType::parse(&text)
    }

    /// The organizer's display name, when the server sent one.
    #[must_use]
    pub fn organizer_name(&self) -> Option<String> {
        self.base
            .schema()
            .field(tags::ORGANIZER)?
            .child("Mailbox")?
            .child("Name")?
            .value_text()
            .map(|v| v.into_owned())
    }

    #[must_use]
    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    pub fn recurrence_mut(&mut self) -> &mut Recurrence {
        &mut self.recurrence
    }

    /// Meetings the server reported as conflicting with this one.
    #[must_use]
    pub fn conflicting_meetings(&self) -> &[CalendarItem] {
        &self.conflicting_meetings
    }

    /// Meetings the server reported as adjacent to this one.
    #[must_use]
    pub fn adjacent_meetings(&self) -> &[CalendarItem] {
        &self.adjacent_meetings
    }

    /// Populates the record from a parsed `CalendarItem` element.
    ///
    /// ## Errors
    /// Propagates enumerated-value violations.
    pub fn populate_from(&mut self, element: &XmlElement) -> WireResult<()> {
        self.populate_at(element, 0)
    }

    fn populate_at(&mut self, element: &XmlElement, depth: usize) -> WireResult<()> {
        for child in &element.children {
            match child.name.as_str() {
                tags::RECURRENCE => self.recurrence.populate(child)?,
                tags::CONFLICTING_MEETINGS | tags::ADJACENT_MEETINGS => {
                    let meetings = Self::populate_meetings(child, depth)?;
                    if child.name == tags::CONFLICTING_MEETINGS {
                        self.conflicting_meetings = meetings;
                    } else {
                        self.adjacent_meetings = meetings;
                    }
                }
                tags::ORGANIZER => {
                    if let Some(field) = self.base.schema_mut().field_mut(tags::ORGANIZER) {
                        field.children_mut().clear();
                        field.populate_tree(child);
                    }
                }
                tags::FREE_BUSY_STATUS => {
                    self.apply_enum(child, FREE_BUSY_VALUES)?;
                }
                tags::CALENDAR_ITEM_TYPE => {
                    self.apply_enum(child, CALENDAR_ITEM_TYPE_VALUES)?;
                }
                _ => self.base.apply_child(child)?,
            }
        }
        Ok(())
    }

    fn apply_enum(&mut self, child: &XmlElement, legal: &'static [&'static str]) -> WireResult<()> {
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
        self.base.schema_mut().set_text(&child.name, text);
        Ok(())
    }

    /// Reads a nested meeting list, dropping anything past the depth cap.
    fn populate_meetings(element: &XmlElement, depth: usize) -> WireResult<Vec<CalendarItem>> {
        if depth >= MAX_NESTED_MEETING_DEPTH {
            tracing::warn!(
                depth,
                tag = %element.name,
                "nested meeting list exceeds depth cap, dropping"
            );
            return Ok(Vec::new());
        }
        let mut meetings = Vec::new();
        for meeting_el in &element.children {
            if meeting_el.name != "CalendarItem" {
                tracing::warn!(tag = %meeting_el.name, "unexpected meeting list entry, dropping");
                continue;
            }
            let mut meeting = CalendarItem::new();
            meeting.populate_at(meeting_el, depth + 1)?;
            meetings.push(meeting);
        }
        Ok(meetings)
    }

    /// The ordered children walked by the update diff. The recurrence rule
    /// and the server-owned meeting lists are not updatable through the
    /// generic diff.
    #[must_use]
    pub fn change_set(&self) -> ChangeSet<'_> {
        self.base.change_set()
    }

    /// Renders the full record wrapped in its container tag.
    ///
    /// ## Errors
    /// Propagates recurrence validation errors; a record with an invalid
    /// recurrence configuration cannot be serialized.
    pub fn write_xml(&self) -> WireResult<String> {
        let mut body = self.base.write_body();
        body.push_str(&self.recurrence.write_xml()?);
        let mut out = writer::open_tag("CalendarItem", &[], false);
        out.push_str(&body);
        out.push_str(&writer::close_tag("CalendarItem"));
        Ok(out)
    }
}

impl Default for CalendarItem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_end_use_exchange_datetime_format() {
        let mut item = CalendarItem::new();
        item.set_start(Utc.with_ymd_and_hms(2016, 3, 3, 9, 30, 0).unwrap());
        item.set_end(Utc.with_ymd_and_hms(2016, 3, 3, 10, 0, 0).unwrap());

        let xml = item.write_xml().unwrap();
        assert!(xml.contains("<t:Start>2016-03-03T09:30:00Z</t:Start>"));
        assert!(xml.contains("<t:End>2016-03-03T10:00:00Z</t:End>"));
    }

    #[test]
    fn recurrence_is_validated_at_serialize_time() {
        let mut item = CalendarItem::new();
        item.set_subject("gym");
        item.recurrence_mut().set_daily("1");
        // Type configured but no end: serialization must refuse.
        assert!(item.write_xml().is_err());

        item.recurrence_mut().set_no_end("2016-03-03");
        let xml = item.write_xml().unwrap();
        assert!(xml.contains("<t:Recurrence><t:DailyRecurrence>"));
    }

    #[test]
    fn populate_reads_nested_meetings() {
        let xml = br#"<CalendarItem>
            <Subject>Planning</Subject>
            <ConflictingMeetings>
                <CalendarItem><Subject>Standup</Subject></CalendarItem>
                <CalendarItem><Subject>1:1</Subject></CalendarItem>
            </ConflictingMeetings>
            <AdjacentMeetings>
                <CalendarItem><Subject>Lunch</Subject></CalendarItem>
            </AdjacentMeetings>
        </CalendarItem>"#;
        let element = XmlElement::parse(xml).unwrap();

        let mut item = CalendarItem::new();
        item.populate_from(&element).unwrap();

        assert_eq!(item.conflicting_meetings().len(), 2);
        assert_eq!(
            item.conflicting_meetings()[0].subject().as_deref(),
            Some("Standup")
        );
        assert_eq!(item.adjacent_meetings().len(), 1);
    }

    #[test]
    fn nested_meetings_stop_at_depth_cap() {
        // Build a chain deeper than the cap.
        let mut xml = String::from("<CalendarItem><Subject>top</Subject>");
        for _ in 0..6 {
            xml.push_str("<ConflictingMeetings><CalendarItem><Subject>n</Subject>");
        }
        for _ in 0..6 {
            xml.push_str("</CalendarItem></ConflictingMeetings>");
        }
        xml.push_str("</CalendarItem>");
        let element = XmlElement::parse(xml.as_bytes()).unwrap();

        let mut item = CalendarItem::new();
        item.populate_from(&element).unwrap();

        let mut depth = 0;
        let mut cursor = &item;
        while let Some(next) = cursor.conflicting_meetings().first() {
            depth += 1;
            cursor = next;
        }
        assert_eq!(depth, MAX_NESTED_MEETING_DEPTH);
    }

    #[test]
    fn bogus_free_busy_fails_the_parse() {
        let element = XmlElement::parse(
            b"<CalendarItem><LegacyFreeBusyStatus>Partying</LegacyFreeBusyStatus></CalendarItem>",
        )
        .unwrap();
        let mut item = CalendarItem::new();
        assert!(matches!(
            item.populate_from(&element).unwrap_err(),
            WireError::InvalidEnumValue { .. }
        ));
    }

    #[test]
    fn organizer_parses_as_free_form_subtree() {
        let xml = br#"<CalendarItem><Organizer>
            <Mailbox><Name>Chair</Name><EmailAddress>chair@example.org</EmailAddress></Mailbox>
        </Organizer></CalendarItem>"#;
        let element = XmlElement::parse(xml).unwrap();

        let mut item = CalendarItem::new();
        item.populate_from(&element).unwrap();
        assert_eq!(item.organizer_name().as_deref(), Some("Chair"));
    }
}
