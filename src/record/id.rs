//! Serde helpers for record identifiers.
//!
//! Backends hand out numeric ids (`{"id": 7}`) as often as string ids. Records
//! keep ids as strings, so numbers are stringified on the way in.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

/// Deserialize a string or integer id. `null` becomes an empty id.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(text)) => text,
        Some(RawId::Signed(n)) => n.to_string(),
        Some(RawId::Unsigned(n)) => n.to_string(),
        None => String::new(),
    })
}
