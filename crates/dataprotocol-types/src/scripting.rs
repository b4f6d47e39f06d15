//! Scripting shapes (`scripting/*`).

use serde::{Deserialize, Serialize};

/// What the host wants a script for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ScriptOperation {
    Select,
    Create,
    Insert,
    Update,
    Delete,
    Execute,
    Alter,
}

impl ScriptOperation {
    pub const ALL: [ScriptOperation; 7] = [
        ScriptOperation::Select,
        ScriptOperation::Create,
        ScriptOperation::Insert,
        ScriptOperation::Update,
        ScriptOperation::Delete,
        ScriptOperation::Execute,
        ScriptOperation::Alter,
    ];
}

impl TryFrom<i32> for ScriptOperation {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| format!("unknown script operation: {value}"))
    }
}

impl From<ScriptOperation> for i32 {
    fn from(value: ScriptOperation) -> Self {
        match value {
            ScriptOperation::Select => 0,
            ScriptOperation::Create => 1,
            ScriptOperation::Insert => 2,
            ScriptOperation::Update => 3,
            ScriptOperation::Delete => 4,
            ScriptOperation::Execute => 5,
            ScriptOperation::Alter => 6,
        }
    }
}

/// Optional knobs the host may pass along with a scripting call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingParamDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_compatibility_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_database_engine_edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_database_engine_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub schema: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOptions {
    pub script_create_drop: String,
    pub type_of_data_to_script: String,
    pub script_statistics: String,
    pub target_database_engine_edition: String,
    pub target_database_engine_type: String,
    pub script_compatibility_option: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub script_destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    pub scripting_objects: Vec<ScriptingObject>,
    pub script_options: ScriptOptions,
    #[serde(rename = "ownerURI")]
    pub owner_uri: String,
    pub operation: ScriptOperation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingResult {
    pub operation_id: String,
    #[serde(default)]
    pub script: String,
}

/// Payload of `scripting/scriptComplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingCompleteParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub operation_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_operation_numeric_encoding() {
        for (index, op) in ScriptOperation::ALL.iter().enumerate() {
            let expected = i32::try_from(index).unwrap();
            assert_eq!(serde_json::to_value(op).unwrap(), json!(expected));
        }
        assert!(serde_json::from_value::<ScriptOperation>(json!(7)).is_err());
        assert!(serde_json::from_value::<ScriptOperation>(json!(-1)).is_err());
    }

    #[test]
    fn test_scripting_object_type_key() {
        let object = ScriptingObject {
            object_type: "Table".to_string(),
            schema: "dbo".to_string(),
            name: "orders".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({"type": "Table", "schema": "dbo", "name": "orders"})
        );
    }
}
