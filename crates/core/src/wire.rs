//! Decoding helpers for the backend's JSON.

use serde::{Deserialize, Deserializer};

/// Read a string field that the backend may send as `null`.
pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
