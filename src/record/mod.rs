//! Record Module
//!
//! The contract every stored entity satisfies.
//!
//! ## Responsibilities
//! - Carry a numeric identity, assigned once by the store on `write()`
//! - Convert losslessly to and from a non-blank text form
//!
//! ## Identity Rules
//! - Identities are positive and unique within a store
//! - Callers never set the identity themselves; `Store::write` does
//! - `Store::update` never changes it
//!
//! The text form is opaque to the store. `json` implements it for any serde
//! type; `Document` is a ready-made record built on top of that.

pub mod json;
mod document;

pub use document::Document;

use crate::error::Result;

/// An entity storable in a [`Store`](crate::Store)
///
/// `to_text` and `from_text` must round-trip every field, identity included,
/// and `to_text` must never return blank text.
pub trait Record: Clone + Send + Sync + 'static {
    /// The identity assigned by the store (0 until written)
    fn identity(&self) -> u64;

    /// Called by the store exactly once, when the record is first written
    fn set_identity(&mut self, identity: u64);

    /// Serialize to the text stored in this record's file
    fn to_text(&self) -> Result<String>;

    /// Rebuild a record from the text of its file
    fn from_text(text: &str) -> Result<Self>;
}
