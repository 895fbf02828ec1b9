//! The high-level client tying settings, transport, and operations
//! together.

use ews_core::types::{FolderRef, ItemRef, ServerVersion};
use ews_wire::data::{ConflictResolution, Disposal};
use ews_wire::record::{CalendarItem, Contact};

use crate::envelope::build_envelope;
use crate::error::{ClientError, ClientResult};
use crate::ops;
use crate::response::scan_response_messages;
use crate::transport::Transport;

/// A connected Exchange Web Services client.
#[derive(Debug)]
pub struct ExchangeClient<T: Transport> {
    transport: T,
    version: ServerVersion,
}

impl<T: Transport> ExchangeClient<T> {
    #[must_use]
    pub fn new(transport: T, version: ServerVersion) -> Self {
        Self { transport, version }
    }

    async fn call(&self, body: &str, message_tag: &'static str) -> ClientResult<Vec<ews_wire::xml::XmlElement>> {
        let envelope = build_envelope(self.version, body);
        let response = self.transport.post_envelope(envelope).await?;
        scan_response_messages(&response, message_tag)
    }

    /// Creates a contact in the given folder and returns its new handle.
    ///
    /// ## Errors
    /// Fails on transport errors or an error-class response message.
    pub async fn create_contact(
        &self,
        folder: &FolderRef,
        contact: &Contact,
    ) -> ClientResult<ItemRef> {
        let body = ops::build_create_item(folder, &[contact.write_xml()]);
        let messages = self.call(&body, "CreateItemResponseMessage").await?;
        ops::extract_item_refs(&messages)?
            .into_iter()
            .next()
            .ok_or(ClientError::MissingNode("ItemId"))
    }

    /// Creates a calendar item in the given folder and returns its new
    /// handle.
    ///
    /// ## Errors
    /// Fails on an invalid recurrence configuration, transport errors, or
    /// an error-class response message.
    pub async fn create_calendar_item(
        &self,
        folder: &FolderRef,
        item: &CalendarItem,
    ) -> ClientResult<ItemRef> {
        let body = ops::build_create_item(folder, &[item.write_xml()?]);
        let messages = self.call(&body, "CreateItemResponseMessage").await?;
        ops::extract_item_refs(&messages)?
            .into_iter()
            .next()
            .ok_or(ClientError::MissingNode("ItemId"))
    }

    /// Applies a contact's change set to the server copy and returns the
    /// refreshed handle.
    ///
    /// ## Errors
    /// Fails when the record has no server handle yet, on transport
    /// errors, or on an error-class response message.
    pub async fn update_contact(&self, contact: &Contact) -> ClientResult<ItemRef> {
        let item_ref = contact
            .item_ref()
            .ok_or(ClientError::MissingNode("ItemId"))?;
        let updates = contact.change_set().render_updates("Contact");
        let body = ops::build_update_item(&item_ref, &updates, ConflictResolution::AutoResolve);
        let messages = self.call(&body, "UpdateItemResponseMessage").await?;
        ops::extract_item_refs(&messages)?
            .into_iter()
            .next()
            .ok_or(ClientError::MissingNode("ItemId"))
    }

    /// Fetches a contact by handle, resolving attachment references that
    /// came back without inline content.
    ///
    /// ## Errors
    /// Fails on transport errors, an error-class response message, or a
    /// response without the expected record.
    pub async fn get_contact(&self, item: &ItemRef) -> ClientResult<Contact> {
        let body = ops::build_get_item(std::slice::from_ref(item));
        let messages = self.call(&body, "GetItemResponseMessage").await?;
        let element = ops::extract_items(&messages, "Contact")
            .into_iter()
            .next()
            .ok_or(ClientError::MissingNode("Contact"))?;

        let mut contact = Contact::new();
        contact.populate_from(&element)?;
        self.resolve_attachment_content(contact.base_mut().attachments_mut())
            .await?;
        Ok(contact)
    }

    /// Fetches a calendar item by handle.
    ///
    /// ## Errors
    /// Fails on transport errors, an error-class response message, or a
    /// response without the expected record.
    pub async fn get_calendar_item(&self, item: &ItemRef) -> ClientResult<CalendarItem> {
        let body = ops::build_get_item(std::slice::from_ref(item));
        let messages = self.call(&body, "GetItemResponseMessage").await?;
        let element = ops::extract_items(&messages, "CalendarItem")
            .into_iter()
            .next()
            .ok_or(ClientError::MissingNode("CalendarItem"))?;

        let mut record = CalendarItem::new();
        record.populate_from(&element)?;
        self.resolve_attachment_content(record.base_mut().attachments_mut())
            .await?;
        Ok(record)
    }

    /// Deletes items by handle.
    ///
    /// ## Errors
    /// Fails on transport errors or an error-class response message.
    pub async fn delete_items(&self, items: &[ItemRef], disposal: Disposal) -> ClientResult<()> {
        let body = ops::build_delete_item(items, disposal);
        self.call(&body, "DeleteItemResponseMessage").await?;
        Ok(())
    }

    /// Retrieves one attachment's content bytes.
    ///
    /// ## Errors
    /// Fails on transport errors, an error-class response message, or a
    /// content-less response.
    pub async fn fetch_attachment_content(&self, attachment_id: &str) -> ClientResult<Vec<u8>> {
        let body = ops::build_get_attachment(attachment_id);
        let messages = self.call(&body, "GetAttachmentResponseMessage").await?;
        ops::extract_attachment_content(&messages)
    }

    /// Attaches files to an existing item.
    ///
    /// ## Errors
    /// Fails on transport errors or an error-class response message.
    pub async fn create_attachments(
        &self,
        parent: &ItemRef,
        attachments: &[ews_wire::record::FileAttachment],
    ) -> ClientResult<()> {
        let body = ops::build_create_attachment(&parent.id, attachments);
        self.call(&body, "CreateAttachmentResponseMessage").await?;
        Ok(())
    }

    /// Fills in content for attachment references that lack it, one
    /// retrieval per reference.
    async fn resolve_attachment_content(
        &self,
        attachments: &mut ews_wire::record::Attachments,
    ) -> ClientResult<()> {
        let missing: Vec<String> = attachments
            .missing_content()
            .map(str::to_owned)
            .collect();
        for attachment_id in missing {
            tracing::debug!(attachment_id = %attachment_id, "retrieving attachment content");
            let bytes = self.fetch_attachment_content(&attachment_id).await?;
            attachments.set_content(&attachment_id, &bytes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;
    use std::sync::Mutex;

    /// Transport double that replays canned response bodies and records
    /// posted envelopes.
    struct FakeTransport {
        posted: Mutex<Vec<String>>,
        responses: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                posted: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into_iter().rev().map(str::to_owned).collect()),
            }
        }
    }

    impl Transport for FakeTransport {
        async fn post_envelope(&self, envelope: String) -> ClientResult<String> {
            self.posted.lock().unwrap().push(envelope);
            Ok(self.responses.lock().unwrap().pop().unwrap_or_default())
        }
    }

    const CREATE_RESPONSE: &str = r#"<Envelope><Body><CreateItemResponse><ResponseMessages>
        <CreateItemResponseMessage ResponseClass="Success">
            <Items><Contact><ItemId Id="new-1" ChangeKey="ck-1"/></Contact></Items>
        </CreateItemResponseMessage>
    </ResponseMessages></CreateItemResponse></Body></Envelope>"#;

    #[test_log::test(tokio::test)]
    async fn create_contact_round_trip() {
        let transport = FakeTransport::new(vec![CREATE_RESPONSE]);
        let client = ExchangeClient::new(transport, ServerVersion::Exchange2010Sp2);

        let mut contact = Contact::new();
        contact.set_given_name("Jo");

        let item_ref = client
            .create_contact(&FolderRef::CONTACTS, &contact)
            .await
            .unwrap();
        assert_eq!(item_ref.id, "new-1");

        let posted = client.transport.posted.lock().unwrap();
        assert!(posted[0].contains("<m:CreateItem"));
        assert!(posted[0].contains("<t:GivenName>Jo</t:GivenName>"));
        assert!(posted[0].contains("RequestServerVersion Version=\"Exchange2010_SP2\""));
    }

    #[test_log::test(tokio::test)]
    async fn get_contact_resolves_missing_attachment_content() {
        let get_response = r#"<Envelope><Body><GetItemResponse><ResponseMessages>
            <GetItemResponseMessage ResponseClass="Success">
                <Items><Contact>
                    <ItemId Id="c-1" ChangeKey="ck"/>
                    <GivenName>Jo</GivenName>
                    <Attachments><FileAttachment>
                        <AttachmentId Id="att-9"/><Name>notes.txt</Name>
                    </FileAttachment></Attachments>
                </Contact></Items>
            </GetItemResponseMessage>
        </ResponseMessages></GetItemResponse></Body></Envelope>"#;
        let attachment_response = r#"<Envelope><Body><GetAttachmentResponse><ResponseMessages>
            <GetAttachmentResponseMessage ResponseClass="Success">
                <Attachments><FileAttachment>
                    <AttachmentId Id="att-9"/><Content>aGk=</Content>
                </FileAttachment></Attachments>
            </GetAttachmentResponseMessage>
        </ResponseMessages></GetAttachmentResponse></Body></Envelope>"#;

        let transport = FakeTransport::new(vec![get_response, attachment_response]);
        let client = ExchangeClient::new(transport, ServerVersion::Exchange2010Sp2);

        let contact = client.get_contact(&ItemRef::new("c-1")).await.unwrap();
        assert_eq!(contact.first_name().as_deref(), Some("Jo"));

        let attachments = contact.base().attachments();
        assert_eq!(attachments.missing_content().count(), 0);
        assert_eq!(
            attachments.entries()[0].content_bytes().unwrap().unwrap(),
            b"hi"
        );

        // Two envelopes: the item fetch, then the lazy content retrieval.
        assert_eq!(client.transport.posted.lock().unwrap().len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn update_without_handle_is_rejected() {
        let transport = FakeTransport::new(vec![]);
        let client = ExchangeClient::new(transport, ServerVersion::Exchange2010Sp2);

        let contact = Contact::new();
        assert!(matches!(
            client.update_contact(&contact).await.unwrap_err(),
            ClientError::MissingNode("ItemId")
        ));
    }
}
