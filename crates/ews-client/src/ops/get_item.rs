//! GetItem requests.

use ews_core::types::ItemRef;
use ews_wire::xml::XmlElement;

use super::item_id_ref;

/// Builds a `GetItem` body fetching all properties of the given items.
#[must_use]
pub fn build_get_item(items: &[ItemRef]) -> String {
    let mut ids = String::new();
    for item in items {
        ids.push_str(&item_id_ref(item));
    }
    format!(
        "<m:GetItem><m:ItemShape><t:BaseShape>AllProperties</t:BaseShape></m:ItemShape>\
         <m:ItemIds>{ids}</m:ItemIds></m:GetItem>"
    )
}

/// Pulls the record elements with the given container tag out of scanned
/// response messages.
#[must_use]
pub fn extract_items(messages: &[XmlElement], container_tag: &str) -> Vec<XmlElement> {
    let mut items = Vec::new();
    for message in messages {
        let Some(wrapper) = message.child("Items") else {
            continue;
        };
        for child in &wrapper.children {
            if child.name == container_tag {
                items.push(child.clone());
            } else {
                tracing::warn!(tag = %child.name, expected = container_tag, "unexpected record kind, skipping");
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_requests_all_properties() {
        let body = build_get_item(&[ItemRef::with_change_key("a", "ck")]);
        assert!(body.contains("<t:BaseShape>AllProperties</t:BaseShape>"));
        assert!(body.contains("<t:ItemId Id=\"a\" ChangeKey=\"ck\"/>"));
    }

    #[test]
    fn extracts_matching_records_only() {
        let message = XmlElement::parse(
            b"<M><Items><Contact><Subject>x</Subject></Contact><Message/></Items></M>",
        )
        .unwrap();
        let items = extract_items(&[message], "Contact");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Contact");
    }
}
