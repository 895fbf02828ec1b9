//! Transport plumbing around the wire core.
//!
//! Every operation here is a thin wrapper: build a request envelope, post
//! it through the [`transport::Transport`], scan the response messages for
//! per-item errors, and hand the record fragments to `ews-wire`. No
//! marshaling logic lives in this crate.

pub mod client;
pub mod envelope;
pub mod error;
pub mod ops;
pub mod response;
pub mod transport;
