//! SOAP envelope assembly.

use ews_core::constants::{MESSAGES_NS, SOAP_NS, TYPES_NS};
use ews_core::types::ServerVersion;

/// Wraps an operation body into a complete request envelope.
///
/// The body is expected to be `m:`/`t:`-prefixed markup produced by the
/// wire core and the operation builders; the envelope binds those prefixes.
#[must_use]
pub fn build_envelope(version: ServerVersion, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="{SOAP_NS}" xmlns:t="{TYPES_NS}" xmlns:m="{MESSAGES_NS}"><soap:Header><t:RequestServerVersion Version="{version}"/></soap:Header><soap:Body>{body}</soap:Body></soap:Envelope>"#,
        version = version.as_str(),
    )
}
