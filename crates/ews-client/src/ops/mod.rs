//! Operation builders and their response extractors.
//!
//! Builders produce `m:`-prefixed operation bodies for
//! [`crate::envelope::build_envelope`]; extractors pull record fragments
//! and item handles out of scanned response messages.

mod attachments;
mod create_item;
mod delete_item;
mod get_item;
mod update_item;

pub use attachments::{build_create_attachment, build_get_attachment, extract_attachment_content};
pub use create_item::{build_create_item, extract_item_refs};
pub use delete_item::build_delete_item;
pub use get_item::{build_get_item, extract_items};
pub use update_item::build_update_item;

use ews_core::types::{FolderRef, ItemRef};
use ews_wire::xml::writer;

/// Renders an item handle as an `ItemId` reference element.
#[must_use]
fn item_id_ref(item: &ItemRef) -> String {
    writer::open_tag(
        "ItemId",
        &[
            ("Id", Some(item.id.as_str())),
            ("ChangeKey", item.change_key.as_deref()),
        ],
        true,
    )
}

/// Renders a folder handle as its reference element.
#[must_use]
fn folder_ref(folder: &FolderRef) -> String {
    match folder {
        FolderRef::Distinguished(name) => {
            writer::open_tag("DistinguishedFolderId", &[("Id", Some(name))], true)
        }
        FolderRef::Id(id) => writer::open_tag("FolderId", &[("Id", Some(id))], true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_omits_missing_change_key() {
        assert_eq!(item_id_ref(&ItemRef::new("abc")), "<t:ItemId Id=\"abc\"/>");
        assert_eq!(
            item_id_ref(&ItemRef::with_change_key("abc", "ck")),
            "<t:ItemId Id=\"abc\" ChangeKey=\"ck\"/>"
        );
    }

    #[test]
    fn folder_refs_render_by_kind() {
        assert_eq!(
            folder_ref(&FolderRef::CONTACTS),
            "<t:DistinguishedFolderId Id=\"contacts\"/>"
        );
        assert_eq!(
            folder_ref(&FolderRef::Id("AAMkAD=".to_owned())),
            "<t:FolderId Id=\"AAMkAD=\"/>"
        );
    }
}
