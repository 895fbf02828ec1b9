//! Attachment retrieval and creation requests.
//!
//! Attachments never ride the generic item diff; they are created and
//! fetched through these dedicated calls.

use ews_wire::record::FileAttachment;
use ews_wire::xml::{XmlElement, writer};

use crate::error::{ClientError, ClientResult};

/// Builds a `GetAttachment` body for one attachment id.
#[must_use]
pub fn build_get_attachment(attachment_id: &str) -> String {
    let id = writer::open_tag("AttachmentId", &[("Id", Some(attachment_id))], true);
    format!("<m:GetAttachment><m:AttachmentIds>{id}</m:AttachmentIds></m:GetAttachment>")
}

/// Builds a `CreateAttachment` body attaching files to an existing item.
#[must_use]
pub fn build_create_attachment(parent_item_id: &str, attachments: &[FileAttachment]) -> String {
    let mut body = String::new();
    for attachment in attachments {
        body.push_str(&attachment.write_create_xml());
    }
    format!(
        "<m:CreateAttachment><m:ParentItemId Id=\"{id}\"/>\
         <m:Attachments>{body}</m:Attachments></m:CreateAttachment>",
        id = writer::escape(parent_item_id),
    )
}

/// Pulls the decoded content bytes out of scanned `GetAttachment` response
/// messages.
///
/// ## Errors
/// Returns a missing-node error when no content came back, or an encoding
/// error when the content is not valid base64.
pub fn extract_attachment_content(messages: &[XmlElement]) -> ClientResult<Vec<u8>> {
    for message in messages {
        let Some(attachment_el) = message.find("FileAttachment") else {
            continue;
        };
        let attachment = FileAttachment::from_element(attachment_el);
        if let Some(bytes) = attachment.content_bytes()? {
            return Ok(bytes);
        }
    }
    Err(ClientError::MissingNode("FileAttachment/Content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_attachment_addresses_by_id() {
        let body = build_get_attachment("att-1");
        assert_eq!(
            body,
            "<m:GetAttachment><m:AttachmentIds><t:AttachmentId Id=\"att-1\"/>\
             </m:AttachmentIds></m:GetAttachment>"
        );
    }

    #[test]
    fn create_attachment_wraps_parent_and_files() {
        let body = build_create_attachment(
            "item-1",
            &[FileAttachment::from_bytes("a.txt", "text/plain", b"hi")],
        );
        assert!(body.contains("<m:ParentItemId Id=\"item-1\"/>"));
        assert!(body.contains("<t:FileAttachment><t:Name>a.txt</t:Name>"));
    }

    #[test]
    fn extracts_content_bytes() {
        let message = XmlElement::parse(
            b"<M><Attachments><FileAttachment>\
              <AttachmentId Id=\"att-1\"/><Content>aGk=</Content>\
              </FileAttachment></Attachments></M>",
        )
        .unwrap();
        assert_eq!(extract_attachment_content(&[message]).unwrap(), b"hi");
    }

    #[test]
    fn content_less_response_is_an_error() {
        let message = XmlElement::parse(b"<M><Attachments/></M>").unwrap();
        assert!(extract_attachment_content(&[message]).is_err());
    }
}
