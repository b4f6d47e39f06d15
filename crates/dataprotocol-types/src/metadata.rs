//! Metadata browsing shapes (`metadata/*`).

use serde::{Deserialize, Serialize};

/// Object kind as the server encodes it (a number on the wire).
///
/// Unknown values decode as [`MetadataType::Table`], which is also the
/// display fallback for objects without an explicit type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MetadataType {
    #[default]
    Table,
    View,
    SProc,
    Function,
}

impl From<i32> for MetadataType {
    fn from(value: i32) -> Self {
        match value {
            1 => MetadataType::View,
            2 => MetadataType::SProc,
            3 => MetadataType::Function,
            _ => MetadataType::Table,
        }
    }
}

impl From<MetadataType> for i32 {
    fn from(value: MetadataType) -> Self {
        match value {
            MetadataType::Table => 0,
            MetadataType::View => 1,
            MetadataType::SProc => 2,
            MetadataType::Function => 3,
        }
    }
}

/// Object metadata as the server sends it; older servers omit
/// `metadataTypeName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObjectMetadata {
    #[serde(default)]
    pub metadata_type: MetadataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    pub name: String,
    #[serde(default)]
    pub schema: String,
}

/// Object metadata handed to the host, always carrying a display type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub metadata_type: MetadataType,
    pub metadata_type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    pub name: String,
    pub schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub object_metadata: Vec<ObjectMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataQueryParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataQueryResult {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub metadata: Vec<WireObjectMetadata>,
}

/// Parameters shared by `metadata/table` and `metadata/view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadataParams {
    pub owner_uri: String,
    pub schema: String,
    pub object_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(default)]
    pub has_extended_properties: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escaped_name: Option<String>,
    #[serde(default)]
    pub is_computed: bool,
    #[serde(default)]
    pub is_deterministic: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub ordinal: i32,
    #[serde(default)]
    pub is_calculated: bool,
    #[serde(default)]
    pub is_key: bool,
    #[serde(default)]
    pub is_trustworthy_for_uniqueness: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadataResult {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub columns: Vec<ColumnMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_type_numeric_encoding() {
        assert_eq!(serde_json::to_value(MetadataType::SProc).unwrap(), json!(2));
        let parsed: MetadataType = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(parsed, MetadataType::Function);
    }

    #[test]
    fn test_unknown_metadata_type_decodes_as_table() {
        let parsed: MetadataType = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(parsed, MetadataType::Table);
    }

    #[test]
    fn test_wire_metadata_without_type_name() {
        let entry: WireObjectMetadata = serde_json::from_value(json!({
            "metadataType": 1,
            "name": "v_orders",
            "schema": "dbo"
        }))
        .unwrap();
        assert_eq!(entry.metadata_type, MetadataType::View);
        assert!(entry.metadata_type_name.is_none());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_numeric_type_decodes(raw in any::<i32>()) {
                let parsed: MetadataType = serde_json::from_value(json!(raw)).unwrap();
                if (0..=3).contains(&raw) {
                    prop_assert_eq!(i32::from(parsed), raw);
                } else {
                    prop_assert_eq!(parsed, MetadataType::Table);
                }
            }
        }
    }
}
