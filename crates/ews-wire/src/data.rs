//! Closed wire value sets.
//!
//! Each enum carries its exact wire spelling; `as_str`/`parse` pairs follow
//! the scheme used throughout the protocol. The `*_VALUES` slices are the
//! legal sets handed to [`crate::field::Field::enumerated`] when a field is
//! populated from text rather than through a typed setter.

/// Legal wire values for the `Sensitivity` field.
pub const SENSITIVITY_VALUES: &[&str] = &["Normal", "Personal", "Private", "Confidential"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensitivity {
    Normal,
    Personal,
    Private,
    Confidential,
}

impl Sensitivity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Personal => "Personal",
            Self::Private => "Private",
            Self::Confidential => "Confidential",
        }
    }
}

/// Legal wire values for the `Importance` field.
pub const IMPORTANCE_VALUES: &[&str] = &["Low", "Normal", "High"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Importance {
    Low,
    Normal,
    High,
}

impl Importance {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

/// Legal wire values for the `LegacyFreeBusyStatus` field.
pub const FREE_BUSY_VALUES: &[&str] = &["Free", "Tentative", "Busy", "OOF", "NoData"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyFreeBusyStatus {
    Free,
    Tentative,
    Busy,
    /// Out of facility.
    Oof,
    NoData,
}

impl LegacyFreeBusyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Tentative => "Tentative",
            Self::Busy => "Busy",
            Self::Oof => "OOF",
            Self::NoData => "NoData",
        }
    }
}

/// Legal wire values for the `CalendarItemType` field.
pub const CALENDAR_ITEM_TYPE_VALUES: &[&str] =
    &["Single", "Occurrence", "Exception", "RecurringMaster"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarItemType {
    Single,
    Occurrence,
    Exception,
    RecurringMaster,
}

impl CalendarItemType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Occurrence => "Occurrence",
            Self::Exception => "Exception",
            Self::RecurringMaster => "RecurringMaster",
        }
    }

    /// Parses a calendar item type from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Single" => Some(Self::Single),
            "Occurrence" => Some(Self::Occurrence),
            "Exception" => Some(Self::Exception),
            "RecurringMaster" => Some(Self::RecurringMaster),
            _ => None,
        }
    }
}

/// Legal wire values for `DaysOfWeek` inside recurrence patterns.
///
/// The last three are the collective pseudo-days the protocol allows in
/// relative patterns.
pub const DAYS_OF_WEEK_VALUES: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Day",
    "Weekday",
    "WeekendDay",
];

/// Legal wire values for `DayOfWeekIndex` inside relative recurrence patterns.
pub const DAY_OF_WEEK_INDEX_VALUES: &[&str] = &["First", "Second", "Third", "Fourth", "Last"];

/// Legal wire values for `Month` inside yearly recurrence patterns.
pub const MONTH_VALUES: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Gender encoded as a numeric MAPI property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    #[default]
    Unspecified,
    Female,
    Male,
}

impl Gender {
    /// The numeric wire value carried in the extended property.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Unspecified => 1,
            Self::Female => 2,
            Self::Male => 3,
        }
    }

    /// Decodes a gender from the extended property's numeric text.
    #[must_use]
    pub fn from_wire_text(s: &str) -> Self {
        match s.trim() {
            "2" => Self::Female,
            "3" => Self::Male,
            _ => Self::Unspecified,
        }
    }
}

/// Well-known keys for phone number entries.
pub mod phone_keys {
    pub const ASSISTANT: &str = "AssistantPhone";
    pub const BUSINESS_FAX: &str = "BusinessFax";
    pub const BUSINESS: &str = "BusinessPhone";
    pub const BUSINESS2: &str = "BusinessPhone2";
    pub const CALLBACK: &str = "Callback";
    pub const CAR: &str = "CarPhone";
    pub const COMPANY_MAIN: &str = "CompanyMainPhone";
    pub const HOME_FAX: &str = "HomeFax";
    pub const HOME: &str = "HomePhone";
    pub const HOME2: &str = "HomePhone2";
    pub const MOBILE: &str = "MobilePhone";
    pub const PAGER: &str = "Pager";
    pub const PRIMARY: &str = "PrimaryPhone";
}

/// Well-known keys for email address entries.
pub mod email_keys {
    pub const EMAIL1: &str = "EmailAddress1";
    pub const EMAIL2: &str = "EmailAddress2";
    pub const EMAIL3: &str = "EmailAddress3";
}

/// Well-known keys for instant messaging address entries.
pub mod im_keys {
    pub const IM1: &str = "ImAddress1";
    pub const IM2: &str = "ImAddress2";
}

/// Well-known keys for physical address entries.
pub mod address_keys {
    pub const BUSINESS: &str = "Business";
    pub const HOME: &str = "Home";
    pub const OTHER: &str = "Other";
}

/// Conflict resolution mode for update calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConflictResolution {
    NeverOverwrite,
    #[default]
    AutoResolve,
    AlwaysOverwrite,
}

impl ConflictResolution {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeverOverwrite => "NeverOverwrite",
            Self::AutoResolve => "AutoResolve",
            Self::AlwaysOverwrite => "AlwaysOverwrite",
        }
    }
}

/// Deletion mode for delete calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Disposal {
    HardDelete,
    SoftDelete,
    #[default]
    MoveToDeletedItems,
}

impl Disposal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HardDelete => "HardDelete",
            Self::SoftDelete => "SoftDelete",
            Self::MoveToDeletedItems => "MoveToDeletedItems",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_busy_wire_spelling() {
        assert_eq!(LegacyFreeBusyStatus::Oof.as_str(), "OOF");
        assert!(FREE_BUSY_VALUES.contains(&"OOF"));
    }

    #[test]
    fn gender_wire_round_trip() {
        for gender in [Gender::Unspecified, Gender::Female, Gender::Male] {
            let text = gender.wire_value().to_string();
            assert_eq!(Gender::from_wire_text(&text), gender);
        }
        assert_eq!(Gender::from_wire_text("junk"), Gender::Unspecified);
    }

    #[test]
    fn calendar_item_type_parse() {
        assert_eq!(
            CalendarItemType::parse("RecurringMaster"),
            Some(CalendarItemType::RecurringMaster)
        );
        assert_eq!(CalendarItemType::parse("recurringmaster"), None);
    }
}
