//! File attachments and their reference/content split.
//!
//! A parsed record may reference attachments without inline content; the
//! content is then retrieved lazily through the transport collaborator and
//! written back with [`Attachments::set_content`]. This module never
//! performs the retrieval itself.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{WireError, WireResult};
use crate::xml::{XmlElement, writer};

/// One file attachment: server id, metadata, and optional inline content
/// (base64 text as carried on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileAttachment {
    pub attachment_id: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub content: Option<String>,
}

impl FileAttachment {
    /// Creates an outgoing attachment from raw bytes.
    #[must_use]
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            attachment_id: None,
            name: Some(name.into()),
            content_type: Some(content_type.into()),
            content: Some(BASE64.encode(bytes)),
        }
    }

    /// Reads an attachment from a parsed `FileAttachment` element.
    #[must_use]
    pub fn from_element(element: &XmlElement) -> Self {
        Self {
            attachment_id: element
                .child("AttachmentId")
                .and_then(|id| id.attr("Id"))
                .map(str::to_owned),
            name: element.child_text("Name").map(str::to_owned),
            content_type: element.child_text("ContentType").map(str::to_owned),
            content: element.child_text("Content").map(str::to_owned),
        }
    }

    /// Decodes the inline content, `None` when the reference has no content
    /// yet.
    ///
    /// ## Errors
    /// Returns an encoding error when the inline content is not valid
    /// base64.
    pub fn content_bytes(&self) -> WireResult<Option<Vec<u8>>> {
        match &self.content {
            None => Ok(None),
            Some(text) => BASE64
                .decode(text.trim())
                .map(Some)
                .map_err(|err| WireError::Encoding(err.to_string())),
        }
    }

    /// Renders the markup used when creating this attachment on the
    /// server.
    #[must_use]
    pub fn write_create_xml(&self) -> String {
        let mut body = String::new();
        if let Some(name) = &self.name {
            body.push_str(&writer::element("Name", &writer::escape(name)));
        }
        if let Some(content_type) = &self.content_type {
            body.push_str(&writer::element("ContentType", &writer::escape(content_type)));
        }
        if let Some(content) = &self.content {
            body.push_str(&writer::element("Content", &writer::escape(content)));
        }
        if body.is_empty() {
            return String::new();
        }
        writer::element("FileAttachment", &body)
    }
}

/// The attachment collection of one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attachments {
    entries: Vec<FileAttachment>,
}

impl Attachments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attachment: FileAttachment) {
        self.entries.push(attachment);
    }

    #[must_use]
    pub fn entries(&self) -> &[FileAttachment] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Populates the collection from a parsed `Attachments` element.
    /// Non-file attachment kinds are logged and skipped.
    pub fn populate_from(&mut self, element: &XmlElement) {
        for child in &element.children {
            if child.name == "FileAttachment" {
                self.entries.push(FileAttachment::from_element(child));
            } else {
                tracing::warn!(tag = %child.name, "unsupported attachment kind, skipping");
            }
        }
    }

    /// Ids of attachment references that still lack inline content.
    pub fn missing_content(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|a| a.content.is_none())
            .filter_map(|a| a.attachment_id.as_deref())
    }

    /// Fills in content retrieved for the given attachment id. Returns
    /// whether a matching reference was found.
    pub fn set_content(&mut self, attachment_id: &str, bytes: &[u8]) -> bool {
        for entry in &mut self.entries {
            if entry.attachment_id.as_deref() == Some(attachment_id) {
                entry.content = Some(BASE64.encode(bytes));
                return true;
            }
        }
        tracing::warn!(attachment_id, "no attachment reference for retrieved content");
        false
    }
}
