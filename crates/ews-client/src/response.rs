//! Response envelope triage.
//!
//! Every operation response carries a `ResponseMessages` element whose
//! children each report a `ResponseClass` of `Success`, `Warning`, or
//! `Error`. Warnings are logged and tolerated; errors surface the server's
//! response code and message text.

use ews_wire::xml::XmlElement;

use crate::error::{ClientError, ClientResult};

/// Parses a response body and returns the per-item response messages with
/// the given tag, failing on SOAP faults and error-class messages.
///
/// ## Errors
/// Returns a fault for SOAP faults, a response error for error-class
/// messages, and a missing-node error when the expected structure is
/// absent.
#[tracing::instrument(skip(body), fields(body_len = body.len()))]
pub fn scan_response_messages(body: &str, message_tag: &'static str) -> ClientResult<Vec<XmlElement>> {
    let root = XmlElement::parse(body.as_bytes())?;

    if let Some(fault) = root.find("Fault") {
        let text = fault
            .child_text("faultstring")
            .unwrap_or("unspecified fault")
            .to_owned();
        return Err(ClientError::Fault(text));
    }

    let messages = root
        .find("ResponseMessages")
        .ok_or(ClientError::MissingNode("ResponseMessages"))?;

    let mut accepted = Vec::new();
    for message in &messages.children {
        if message.name != message_tag {
            tracing::warn!(tag = %message.name, expected = message_tag, "unexpected response message, skipping");
            continue;
        }
        match message.attr("ResponseClass") {
            Some("Success") => accepted.push(message.clone()),
            Some("Warning") => {
                tracing::warn!(
                    code = message.child_text("ResponseCode").unwrap_or("unknown"),
                    text = message.child_text("MessageText").unwrap_or(""),
                    "response message carries a warning"
                );
                accepted.push(message.clone());
            }
            _ => {
                return Err(ClientError::Response {
                    code: message
                        .child_text("ResponseCode")
                        .unwrap_or("unknown")
                        .to_owned(),
                    message: message.child_text("MessageText").unwrap_or("").to_owned(),
                });
            }
        }
    }
    Ok(accepted)
}
