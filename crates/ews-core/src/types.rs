//! Scalar handles passed between the wire core and the client operations.

/// Server version advertised in the request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerVersion {
    Exchange2007Sp1,
    Exchange2010,
    Exchange2010Sp1,
    Exchange2010Sp2,
    Exchange2013,
}

impl ServerVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange2007Sp1 => "Exchange2007_SP1",
            Self::Exchange2010 => "Exchange2010",
            Self::Exchange2010Sp1 => "Exchange2010_SP1",
            Self::Exchange2010Sp2 => "Exchange2010_SP2",
            Self::Exchange2013 => "Exchange2013",
        }
    }

    /// Parses a server version from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Exchange2007_SP1" => Some(Self::Exchange2007Sp1),
            "Exchange2010" => Some(Self::Exchange2010),
            "Exchange2010_SP1" => Some(Self::Exchange2010Sp1),
            "Exchange2010_SP2" => Some(Self::Exchange2010Sp2),
            "Exchange2013" => Some(Self::Exchange2013),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item handle: the opaque server id plus the change key required for
/// update and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub id: String,
    pub change_key: Option<String>,
}

impl ItemRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: None,
        }
    }

    #[must_use]
    pub fn with_change_key(id: impl Into<String>, change_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: Some(change_key.into()),
        }
    }
}

/// A folder handle: either a well-known distinguished name or a server id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderRef {
    /// Well-known folder addressed by distinguished name (`calendar`,
    /// `contacts`, ...).
    Distinguished(&'static str),
    /// Folder addressed by server id.
    Id(String),
}

impl FolderRef {
    /// The well-known calendar folder.
    pub const CALENDAR: Self = Self::Distinguished("calendar");

    /// The well-known contacts folder.
    pub const CONTACTS: Self = Self::Distinguished("contacts");
}
