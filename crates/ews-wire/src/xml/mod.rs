//! XML boundary types.
//!
//! Inbound, the transport hands this crate already-deserialized bytes which
//! [`XmlElement::parse`] turns into a namespace-stripped element tree.
//! Outbound, [`writer`] renders escaped markup fragments in the `t:` types
//! namespace for the transport to embed into a request envelope.

mod element;
pub mod writer;

pub use element::XmlElement;
