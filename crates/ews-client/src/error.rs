use thiserror::Error;

/// Transport and protocol-level errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Wire(#[from] ews_wire::error::WireError),

    #[error("SOAP fault: {0}")]
    Fault(String),

    #[error("Response error {code}: {message}")]
    Response { code: String, message: String },

    #[error("Missing response node: {0}")]
    MissingNode(&'static str),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
