//! JSON text encoding for records
//!
//! Any serde type can implement [`Record`](super::Record) by delegating its
//! text conversion here.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Encode a value as single-line JSON
pub fn to_text<T: Serialize>(value: &T) -> Result<String> {
    let text = serde_json::to_string(value)?;
    Ok(text)
}

/// Decode a value from JSON text (surrounding whitespace is ignored)
pub fn from_text<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Serialization(
            "cannot decode a record from blank text".to_string(),
        ));
    }
    Ok(serde_json::from_str(trimmed)?)
}
