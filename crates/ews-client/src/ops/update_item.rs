//! UpdateItem requests.

use ews_core::types::ItemRef;
use ews_wire::data::ConflictResolution;

use super::item_id_ref;

/// Builds an `UpdateItem` body applying one record's rendered update
/// directives to the item the handle points at.
#[must_use]
pub fn build_update_item(
    item: &ItemRef,
    updates_markup: &str,
    conflict_resolution: ConflictResolution,
) -> String {
    format!(
        "<m:UpdateItem MessageDisposition=\"SaveOnly\" \
         ConflictResolution=\"{resolution}\" \
         SendMeetingInvitationsOrCancellations=\"SendToNone\">\
         <m:ItemChanges><t:ItemChange>{id}\
         <t:Updates>{updates_markup}</t:Updates>\
         </t:ItemChange></m:ItemChanges></m:UpdateItem>",
        resolution = conflict_resolution.as_str(),
        id = item_id_ref(item),
    )
}
