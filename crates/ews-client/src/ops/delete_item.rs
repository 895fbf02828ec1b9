//! DeleteItem requests.

use ews_core::types::ItemRef;
use ews_wire::data::Disposal;

use super::item_id_ref;

/// Builds a `DeleteItem` body for the given item handles.
#[must_use]
pub fn build_delete_item(items: &[ItemRef], disposal: Disposal) -> String {
    let mut ids = String::new();
    for item in items {
        ids.push_str(&item_id_ref(item));
    }
    format!(
        "<m:DeleteItem DeleteType=\"{disposal}\" SendMeetingCancellations=\"SendToNone\">\
         <m:ItemIds>{ids}</m:ItemIds></m:DeleteItem>",
        disposal = disposal.as_str(),
    )
}
