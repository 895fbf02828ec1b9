use thiserror::Error;

use crate::recurrence::RecurrenceError;

/// Wire marshaling and validation errors
#[derive(Error, Debug)]
pub enum WireError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Invalid value for {field}: {value:?} is not one of {legal:?}")]
    InvalidEnumValue {
        field: String,
        value: String,
        legal: &'static [&'static str],
    },

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    #[error(transparent)]
    Core(#[from] ews_core::error::CoreError),
}

impl From<quick_xml::Error> for WireError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for WireError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for WireError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for WireError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Encoding(err.to_string())
    }
}

pub type WireResult<T> = std::result::Result<T, WireError>;
