//! Fixed table of well-known numeric properties.
//!
//! These ids are recognized during extended-property decode and materialize
//! as strongly-typed convenience fields on the owning record instead of
//! generic extended properties. The table is static and consulted before
//! the generic path.

use crate::property::mapi::{MapiPropertyType, prop_id, prop_tag};

/// Last modification time, a read-only server timestamp.
pub const PR_LAST_MODIFICATION_TIME: u32 = prop_tag(MapiPropertyType::SystemTime.code(), 0x3008);

/// Contact gender, stored as a small numeric code.
pub const PR_GENDER: u32 = prop_tag(MapiPropertyType::Short.code(), 0x3A4D);

/// Contact personal home page URL.
pub const PR_PERSONAL_HOME_PAGE: u32 = prop_tag(MapiPropertyType::String8.code(), 0x3A50);

/// The well-known properties this model materializes as typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownProperty {
    LastModificationTime,
    Gender,
    PersonalHomePage,
}

impl WellKnownProperty {
    /// Looks up a property id in the fixed table.
    #[must_use]
    pub fn from_property_id(pid: u16) -> Option<Self> {
        const LMT: u16 = prop_id(PR_LAST_MODIFICATION_TIME);
        const GENDER: u16 = prop_id(PR_GENDER);
        const HOME_PAGE: u16 = prop_id(PR_PERSONAL_HOME_PAGE);

        match pid {
            LMT => Some(Self::LastModificationTime),
            GENDER => Some(Self::Gender),
            HOME_PAGE => Some(Self::PersonalHomePage),
            _ => None,
        }
    }

    /// The full MAPI property tag.
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::LastModificationTime => PR_LAST_MODIFICATION_TIME,
            Self::Gender => PR_GENDER,
            Self::PersonalHomePage => PR_PERSONAL_HOME_PAGE,
        }
    }

    /// The MAPI type this property carries.
    #[must_use]
    pub const fn property_type(self) -> MapiPropertyType {
        match self {
            Self::LastModificationTime => MapiPropertyType::SystemTime,
            Self::Gender => MapiPropertyType::Short,
            Self::PersonalHomePage => MapiPropertyType::String8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::mapi::prop_id;

    #[test]
    fn lookup_by_property_id() {
        assert_eq!(
            WellKnownProperty::from_property_id(0x3008),
            Some(WellKnownProperty::LastModificationTime)
        );
        assert_eq!(
            WellKnownProperty::from_property_id(0x3A4D),
            Some(WellKnownProperty::Gender)
        );
        assert_eq!(WellKnownProperty::from_property_id(0x1234), None);
    }

    #[test]
    fn tags_round_trip_through_prop_id() {
        for prop in [
            WellKnownProperty::LastModificationTime,
            WellKnownProperty::Gender,
            WellKnownProperty::PersonalHomePage,
        ] {
            assert_eq!(WellKnownProperty::from_property_id(prop_id(prop.tag())), Some(prop));
        }
    }
}
