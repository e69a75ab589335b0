//! Document record
//!
//! A schemaless record: an identity plus ordered string fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{json, Record};
use crate::error::Result;

/// A record holding named string fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Assigned by the store on write
    pub identity: u64,

    /// Payload, kept sorted by field name
    pub fields: BTreeMap<String, String>,
}

impl Document {
    /// Create an unwritten document with no fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Build a document from `name=value` pairs
    ///
    /// "color=orange" → ("color", "orange"). A pair without '=' is a field
    /// with an empty value.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((name, value)) => doc.set(name, value),
                None => doc.set(pair, ""),
            };
        }
        doc
    }
}

impl Record for Document {
    fn identity(&self) -> u64 {
        self.identity
    }

    fn set_identity(&mut self, identity: u64) {
        self.identity = identity;
    }

    fn to_text(&self) -> Result<String> {
        json::to_text(self)
    }

    fn from_text(text: &str) -> Result<Self> {
        json::from_text(text)
    }
}
