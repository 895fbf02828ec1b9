//! Record types and partial-update diffing.
//!
//! [`Item`] is the generic record base; [`Contact`] and [`CalendarItem`]
//! extend its schema with their own tag bindings. [`ChangeSet`] partitions
//! a record's fields into the set/delete directives of an update request.

mod attachment;
mod calendar;
mod changeset;
mod contact;
mod item;

pub use attachment::{Attachments, FileAttachment};
pub use calendar::CalendarItem;
pub use changeset::{ChangeSet, UpdateEntry};
pub use contact::Contact;
pub use item::Item;
