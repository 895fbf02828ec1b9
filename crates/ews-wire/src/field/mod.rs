//! The generic field engine.
//!
//! A record is a tree of [`Field`] nodes bound into a [`RecordSchema`];
//! the schema owns wire ordering and parse dispatch, the node owns its own
//! markup and update semantics.

mod node;
mod schema;

pub use node::{Field, FieldKind, FieldValue, UpdateStyle};
pub use schema::RecordSchema;
