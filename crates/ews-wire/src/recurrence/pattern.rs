//! Recurrence pattern members and group validation.

use super::RecurrenceError;
use crate::data::{DAY_OF_WEEK_INDEX_VALUES, DAYS_OF_WEEK_VALUES, MONTH_VALUES};
use crate::error::{WireError, WireResult};
use crate::field::Field;
use crate::xml::XmlElement;

// Type-group member tags.
const RELATIVE_YEARLY: &str = "RelativeYearlyRecurrence";
const ABSOLUTE_YEARLY: &str = "AbsoluteYearlyRecurrence";
const RELATIVE_MONTHLY: &str = "RelativeMonthlyRecurrence";
const ABSOLUTE_MONTHLY: &str = "AbsoluteMonthlyRecurrence";
const WEEKLY: &str = "WeeklyRecurrence";
const DAILY: &str = "DailyRecurrence";

// End-group member tags.
const NO_END: &str = "NoEndRecurrence";
const END_DATE: &str = "EndDateRecurrence";
const NUMBERED: &str = "NumberedRecurrence";

/// A recurrence rule: six type-group members and three end-group members,
/// of which at most one per group may carry its discriminant.
///
/// The discriminant is `Month` for the two yearly members, `Interval` for
/// the remaining type members, and `StartDate` for all three end members.
/// Once any discriminant is set the pattern is configured for the life of
/// the value; there is no reset, callers construct a fresh pattern to
/// change variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    relative_yearly: Field,
    absolute_yearly: Field,
    relative_monthly: Field,
    absolute_monthly: Field,
    weekly: Field,
    daily: Field,
    no_end: Field,
    end_date: Field,
    numbered: Field,
}

fn member(tag: &'static str, children: &[&'static str]) -> Field {
    let mut field = Field::new(tag);
    for child in children {
        field.add_child(Field::new(*child));
    }
    field
}

/// Whether a member's discriminant child carries a value.
fn discriminant_set(member: &Field, discriminant: &str) -> bool {
    member
        .child(discriminant)
        .is_some_and(|f| f.value().is_some())
}

impl Recurrence {
    #[must_use]
    pub fn new() -> Self {
        Self {
            relative_yearly: member(RELATIVE_YEARLY, &["DaysOfWeek", "DayOfWeekIndex", "Month"]),
            absolute_yearly: member(ABSOLUTE_YEARLY, &["DayOfMonth", "Month"]),
            relative_monthly: member(RELATIVE_MONTHLY, &["Interval", "DaysOfWeek", "DayOfWeekIndex"]),
            absolute_monthly: member(ABSOLUTE_MONTHLY, &["Interval", "DayOfMonth"]),
            weekly: member(WEEKLY, &["Interval", "DaysOfWeek"]),
            daily: member(DAILY, &["Interval"]),
            no_end: member(NO_END, &["StartDate"]),
            end_date: member(END_DATE, &["StartDate", "EndDate"]),
            numbered: member(NUMBERED, &["StartDate", "NumberOfOccurrences"]),
        }
    }

    /// Type-group members with their discriminant child tags.
    fn type_members(&self) -> [(&Field, &'static str); 6] {
        [
            (&self.relative_yearly, "Month"),
            (&self.absolute_yearly, "Month"),
            (&self.relative_monthly, "Interval"),
            (&self.absolute_monthly, "Interval"),
            (&self.weekly, "Interval"),
            (&self.daily, "Interval"),
        ]
    }

    /// End-group members; the shared discriminant is `StartDate`.
    fn end_members(&self) -> [&Field; 3] {
        [&self.no_end, &self.end_date, &self.numbered]
    }

    /// Whether any discriminant in either group has been set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.type_members()
            .iter()
            .any(|(m, d)| discriminant_set(m, d))
            || self
                .end_members()
                .iter()
                .any(|m| discriminant_set(m, "StartDate"))
    }

    /// Selects the single configured type-group member.
    ///
    /// ## Errors
    /// [`RecurrenceError::MissingRecurrenceType`] when no member is
    /// configured, [`RecurrenceError::AmbiguousRecurrenceType`] when more
    /// than one is.
    pub fn active_type(&self) -> Result<&Field, RecurrenceError> {
        let mut active = None;
        let mut count = 0usize;
        for (m, d) in self.type_members() {
            if discriminant_set(m, d) {
                active = Some(m);
                count += 1;
            }
        }
        match (count, active) {
            (1, Some(m)) => Ok(m),
            (0, _) => Err(RecurrenceError::MissingRecurrenceType),
            _ => Err(RecurrenceError::AmbiguousRecurrenceType),
        }
    }

    /// Selects the single configured end-group member.
    ///
    /// ## Errors
    /// [`RecurrenceError::MissingEndType`] when no member is configured,
    /// [`RecurrenceError::AmbiguousEndType`] when more than one is.
    pub fn active_end(&self) -> Result<&Field, RecurrenceError> {
        let mut active = None;
        let mut count = 0usize;
        for m in self.end_members() {
            if discriminant_set(m, "StartDate") {
                active = Some(m);
                count += 1;
            }
        }
        match (count, active) {
            (1, Some(m)) => Ok(m),
            (0, _) => Err(RecurrenceError::MissingEndType),
            _ => Err(RecurrenceError::AmbiguousEndType),
        }
    }

    /// The active members, one per group.
    ///
    /// Returns an empty list when the pattern is wholly unconfigured — a
    /// legitimate "no recurrence" state, not an error.
    ///
    /// ## Errors
    /// Propagates either group's validation error once any discriminant is
    /// set.
    pub fn active_children(&self) -> Result<Vec<&Field>, RecurrenceError> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }
        Ok(vec![self.active_type()?, self.active_end()?])
    }

    /// Renders the `Recurrence` element, empty when unconfigured.
    ///
    /// ## Errors
    /// Propagates group validation errors; an invalid configuration cannot
    /// be serialized.
    pub fn write_xml(&self) -> WireResult<String> {
        let active = self.active_children()?;
        if active.is_empty() {
            return Ok(String::new());
        }
        let mut body = String::new();
        for member in active {
            body.push_str(&member.write_xml());
        }
        Ok(format!("<t:Recurrence>{body}</t:Recurrence>"))
    }

    // Type-group setters. Setting a member only touches that member; group
    // exclusivity is enforced lazily when the pattern is read.

    /// Configures a yearly pattern on a relative weekday (e.g. the second
    /// Tuesday of April).
    ///
    /// ## Errors
    /// Rejects values outside the fixed day, index, and month sets.
    pub fn set_relative_yearly(&mut self, day: &str, index: &str, month: &str) -> WireResult<()> {
        check_enum("DaysOfWeek", day, DAYS_OF_WEEK_VALUES)?;
        check_enum("DayOfWeekIndex", index, DAY_OF_WEEK_INDEX_VALUES)?;
        check_enum("Month", month, MONTH_VALUES)?;
        set_child(&mut self.relative_yearly, "DaysOfWeek", day);
        set_child(&mut self.relative_yearly, "DayOfWeekIndex", index);
        set_child(&mut self.relative_yearly, "Month", month);
        Ok(())
    }

    /// Configures a yearly pattern on a fixed date. A day of month outside
    /// 1-31 is logged and left unset.
    ///
    /// ## Errors
    /// Rejects months outside the fixed set.
    pub fn set_absolute_yearly(&mut self, month: &str, day_of_month: &str) -> WireResult<()> {
        check_enum("Month", month, MONTH_VALUES)?;
        set_bounded_child(&mut self.absolute_yearly, "DayOfMonth", day_of_month, 1..=31);
        set_child(&mut self.absolute_yearly, "Month", month);
        Ok(())
    }

    /// Configures a monthly pattern on a relative weekday.
    ///
    /// ## Errors
    /// Rejects values outside the fixed day and index sets.
    pub fn set_relative_monthly(&mut self, interval: &str, day: &str, index: &str) -> WireResult<()> {
        check_enum("DaysOfWeek", day, DAYS_OF_WEEK_VALUES)?;
        check_enum("DayOfWeekIndex", index, DAY_OF_WEEK_INDEX_VALUES)?;
        set_bounded_child(&mut self.relative_monthly, "Interval", interval, 1..=99);
        set_child(&mut self.relative_monthly, "DaysOfWeek", day);
        set_child(&mut self.relative_monthly, "DayOfWeekIndex", index);
        Ok(())
    }

    /// Configures a monthly pattern on a fixed day of month.
    pub fn set_absolute_monthly(&mut self, interval: &str, day_of_month: &str) {
        set_bounded_child(&mut self.absolute_monthly, "Interval", interval, 1..=99);
        set_bounded_child(&mut self.absolute_monthly, "DayOfMonth", day_of_month, 1..=31);
    }

    /// Configures a weekly pattern.
    ///
    /// ## Errors
    /// Rejects days outside the fixed set.
    pub fn set_weekly(&mut self, interval: &str, days: &str) -> WireResult<()> {
        for token in days.split_whitespace() {
            check_enum("DaysOfWeek", token, DAYS_OF_WEEK_VALUES)?;
        }
        set_bounded_child(&mut self.weekly, "Interval", interval, 1..=99);
        set_child(&mut self.weekly, "DaysOfWeek", days);
        Ok(())
    }

    /// Configures a daily pattern.
    pub fn set_daily(&mut self, interval: &str) {
        set_bounded_child(&mut self.daily, "Interval", interval, 1..=999);
    }

    // End-group setters.

    /// Recurs forever from the given start date.
    pub fn set_no_end(&mut self, start_date: &str) {
        set_child(&mut self.no_end, "StartDate", start_date);
    }

    /// Recurs until the given end date.
    pub fn set_end_date(&mut self, start_date: &str, end_date: &str) {
        set_child(&mut self.end_date, "StartDate", start_date);
        set_child(&mut self.end_date, "EndDate", end_date);
    }

    /// Recurs for a fixed number of occurrences. An occurrence count
    /// outside 1-999 is logged and left unset.
    pub fn set_numbered(&mut self, start_date: &str, occurrences: &str) {
        set_child(&mut self.numbered, "StartDate", start_date);
        set_bounded_child(&mut self.numbered, "NumberOfOccurrences", occurrences, 1..=999);
    }

    /// Populates the pattern from a parsed `Recurrence` element.
    ///
    /// Unknown child tags are logged and dropped; leaf values go through
    /// the same checks as the setters.
    ///
    /// ## Errors
    /// Propagates enumerated-value violations, which indicate a record the
    /// model cannot faithfully represent.
    pub fn populate(&mut self, element: &XmlElement) -> WireResult<()> {
        for child in &element.children {
            let target = match child.name.as_str() {
                RELATIVE_YEARLY => &mut self.relative_yearly,
                ABSOLUTE_YEARLY => &mut self.absolute_yearly,
                RELATIVE_MONTHLY => &mut self.relative_monthly,
                ABSOLUTE_MONTHLY => &mut self.absolute_monthly,
                WEEKLY => &mut self.weekly,
                DAILY => &mut self.daily,
                NO_END => &mut self.no_end,
                END_DATE => &mut self.end_date,
                NUMBERED => &mut self.numbered,
                other => {
                    tracing::warn!(tag = %other, "unknown recurrence member, dropping");
                    continue;
                }
            };
            populate_member(target, child)?;
        }
        Ok(())
    }
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::new()
    }
}

fn check_enum(field: &str, value: &str, legal: &'static [&'static str]) -> WireResult<()> {
    if legal.contains(&value) {
        Ok(())
    } else {
        Err(WireError::InvalidEnumValue {
            field: field.to_owned(),
            value: value.to_owned(),
            legal,
        })
    }
}

fn set_child(member: &mut Field, tag: &str, value: &str) {
    if let Some(child) = member.child_mut(tag) {
        child.set_text(value);
    }
}

fn set_bounded_child(member: &mut Field, tag: &str, value: &str, range: std::ops::RangeInclusive<i64>) {
    let checked = Field::bounded_int(tag.to_owned(), value, range);
    if let (Some(child), Some(v)) = (member.child_mut(tag), checked.value_text()) {
        child.set_text(v.into_owned());
    }
}

/// Fills one member's leaf children from its parsed element.
fn populate_member(member: &mut Field, element: &XmlElement) -> WireResult<()> {
    for leaf in &element.children {
        let Some(text) = leaf.text() else {
            continue;
        };
        match leaf.name.as_str() {
            "Interval" => set_bounded_child(member, "Interval", text, 1..=999),
            "DayOfMonth" => set_bounded_child(member, "DayOfMonth", text, 1..=31),
            "NumberOfOccurrences" => {
                set_bounded_child(member, "NumberOfOccurrences", text, 1..=999);
            }
            "DaysOfWeek" => {
                for token in text.split_whitespace() {
                    check_enum("DaysOfWeek", token, DAYS_OF_WEEK_VALUES)?;
                }
                set_child(member, "DaysOfWeek", text);
            }
            "DayOfWeekIndex" => {
                check_enum("DayOfWeekIndex", text, DAY_OF_WEEK_INDEX_VALUES)?;
                set_child(member, "DayOfWeekIndex", text);
            }
            "Month" => {
                check_enum("Month", text, MONTH_VALUES)?;
                set_child(member, "Month", text);
            }
            "StartDate" | "EndDate" => set_child(member, leaf.name.as_str(), text),
            other => tracing::warn!(tag = %other, "unknown recurrence leaf, dropping"),
        }
    }
    Ok(())
}
