//! Shared types for the data protocol client.
//!
//! Every request parameter, result and notification payload that crosses the
//! wire lives here, next to the host-domain shapes the client hands back to
//! its host when the two differ. All wire types use camelCase field names and
//! treat absent optional fields as `None`, so servers can add optional fields
//! without breaking older clients.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod admin;
pub mod backup;
pub mod capabilities;
pub mod connection;
pub mod edit;
pub mod file_browser;
pub mod metadata;
pub mod object_explorer;
pub mod profiler;
pub mod query;
pub mod restore;
pub mod scripting;
pub mod tasks;

/// Free-form option bag keyed by option name.
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Deserialize a Vec that may be null or missing (both become empty vec)
pub(crate) fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Result of requests whose success carries no data.
///
/// Servers answer these with `{}` or `null`; both decode, and the value
/// always encodes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmptyResult;

impl Serialize for EmptyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Map::new().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmptyResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(EmptyResult)
    }
}

pub use admin::*;
pub use backup::*;
pub use capabilities::*;
pub use connection::*;
pub use edit::*;
pub use file_browser::*;
pub use metadata::*;
pub use object_explorer::*;
pub use profiler::*;
pub use query::*;
pub use restore::*;
pub use scripting::*;
pub use tasks::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_result_accepts_null_and_object() {
        let from_null: EmptyResult = serde_json::from_value(json!(null)).unwrap();
        let from_object: EmptyResult = serde_json::from_value(json!({"extra": 1})).unwrap();
        assert_eq!(from_null, from_object);
        assert_eq!(serde_json::to_value(EmptyResult).unwrap(), json!({}));
    }
}
