//! CreateItem requests.

use ews_core::types::{FolderRef, ItemRef};
use ews_wire::xml::XmlElement;

use super::folder_ref;
use crate::error::{ClientError, ClientResult};

/// Builds a `CreateItem` body saving fully-serialized records into the
/// given folder.
#[must_use]
pub fn build_create_item(folder: &FolderRef, records_markup: &[String]) -> String {
    let mut items = String::new();
    for record in records_markup {
        items.push_str(record);
    }
    format!(
        "<m:CreateItem MessageDisposition=\"SaveOnly\" SendMeetingInvitations=\"SendToNone\">\
         <m:SavedItemFolderId>{folder}</m:SavedItemFolderId>\
         <m:Items>{items}</m:Items></m:CreateItem>",
        folder = folder_ref(folder),
    )
}

/// Pulls the newly assigned item handles out of scanned response messages.
///
/// ## Errors
/// Returns a missing-node error when a message carries no item id.
pub fn extract_item_refs(messages: &[XmlElement]) -> ClientResult<Vec<ItemRef>> {
    let mut refs = Vec::new();
    for message in messages {
        let id = message
            .find("ItemId")
            .ok_or(ClientError::MissingNode("ItemId"))?;
        let item_id = id.attr("Id").ok_or(ClientError::MissingNode("ItemId/@Id"))?;
        refs.push(match id.attr("ChangeKey") {
            Some(ck) => ItemRef::with_change_key(item_id, ck),
            None => ItemRef::new(item_id),
        });
    }
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_nests_folder_and_items() {
        let body = build_create_item(
            &FolderRef::CONTACTS,
            &["<t:Contact><t:GivenName>Jo</t:GivenName></t:Contact>".to_owned()],
        );
        assert!(body.starts_with("<m:CreateItem MessageDisposition=\"SaveOnly\""));
        assert!(body.contains(
            "<m:SavedItemFolderId><t:DistinguishedFolderId Id=\"contacts\"/></m:SavedItemFolderId>"
        ));
        assert!(body.contains("<m:Items><t:Contact>"));
    }

    #[test]
    fn extracts_refs_from_messages() {
        let message = XmlElement::parse(
            b"<M><Items><Contact><ItemId Id=\"new-1\" ChangeKey=\"ck\"/></Contact></Items></M>",
        )
        .unwrap();
        let refs = extract_item_refs(&[message]).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, "new-1");
        assert_eq!(refs[0].change_key.as_deref(), Some("ck"));
    }

    #[test]
    fn missing_item_id_is_an_error() {
        let message = XmlElement::parse(b"<M><Items/></M>").unwrap();
        assert!(extract_item_refs(&[message]).is_err());
    }
}
