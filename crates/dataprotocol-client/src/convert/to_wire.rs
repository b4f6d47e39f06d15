//! Host values to wire params.

use dataprotocol_types::{
    ConnectParams, ConnectionDetails, ConnectionInfo, EditInitializeFiltering,
    EditInitializeParams, ExecutionPlanOptions, ObjectMetadata, Options, QueryExecuteParams,
    QueryExecutionPlanOptions, ScriptOperation, ScriptOptions, ScriptingObject,
    ScriptingParamDetails, ScriptingParams, SelectionData, StartProfilingParams,
    StopProfilingParams, TableMetadataParams,
};

pub const DEFAULT_ENGINE_EDITION: &str = "SqlServerEnterpriseEdition";
pub const DEFAULT_ENGINE_TYPE: &str = "SingleInstance";
pub const DEFAULT_COMPATIBILITY: &str = "Script140Compat";

const SCRIPT_DESTINATION: &str = "ToEditor";
const DATA_TO_SCRIPT: &str = "SchemaOnly";
const SCRIPT_STATISTICS: &str = "ScriptStatsNone";

#[must_use]
pub fn connection_details(info: &ConnectionInfo) -> ConnectionDetails {
    ConnectionDetails {
        options: info.options.clone(),
    }
}

/// `connection/connect` nests the options under `connection`.
#[must_use]
pub fn connect_params(owner_uri: &str, info: &ConnectionInfo) -> ConnectParams {
    ConnectParams {
        owner_uri: owner_uri.to_string(),
        connection: connection_details(info),
    }
}

/// `None` leaves both wire fields unset, which is not the same as two `false`s.
#[must_use]
pub fn execution_plan_options(options: Option<ExecutionPlanOptions>) -> QueryExecutionPlanOptions {
    match options {
        Some(options) => QueryExecutionPlanOptions {
            include_estimated_execution_plan_xml: Some(options.display_estimated_query_plan),
            include_actual_execution_plan_xml: Some(options.display_actual_query_plan),
        },
        None => QueryExecutionPlanOptions::default(),
    }
}

#[must_use]
pub fn query_execute_params(
    owner_uri: &str,
    selection: Option<SelectionData>,
    plan: Option<ExecutionPlanOptions>,
) -> QueryExecuteParams {
    QueryExecuteParams {
        owner_uri: owner_uri.to_string(),
        query_selection: selection,
        execution_plan_options: execution_plan_options(plan),
    }
}

/// Target object of an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget<'a> {
    pub schema_name: &'a str,
    pub object_name: &'a str,
    pub object_type: &'a str,
}

#[must_use]
pub fn edit_initialize_params(
    owner_uri: &str,
    target: &EditTarget<'_>,
    row_limit: Option<u64>,
    query_string: Option<&str>,
) -> EditInitializeParams {
    EditInitializeParams {
        owner_uri: owner_uri.to_string(),
        schema_name: target.schema_name.to_string(),
        object_name: target.object_name.to_string(),
        object_type: target.object_type.to_string(),
        filters: EditInitializeFiltering {
            limit_results: row_limit,
        },
        query_string: query_string.map(str::to_string),
    }
}

/// Shared by `metadata/table` and `metadata/view`.
#[must_use]
pub fn table_metadata_params(owner_uri: &str, metadata: &ObjectMetadata) -> TableMetadataParams {
    TableMetadataParams {
        owner_uri: owner_uri.to_string(),
        schema: metadata.schema.clone(),
        object_name: metadata.name.clone(),
    }
}

#[must_use]
pub fn script_create_drop(operation: ScriptOperation) -> &'static str {
    match operation {
        ScriptOperation::Delete => "ScriptDrop",
        ScriptOperation::Select => "ScriptSelect",
        ScriptOperation::Create
        | ScriptOperation::Insert
        | ScriptOperation::Update
        | ScriptOperation::Execute
        | ScriptOperation::Alter => "ScriptCreate",
    }
}

fn or_default(value: Option<&String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .map_or_else(|| default.to_string(), Clone::clone)
}

/// Build `scripting/script` params. The server requires edition, engine type
/// and compatibility to be present, so unset or empty values get defaults.
#[must_use]
pub fn scripting_params(
    connection_uri: &str,
    operation: ScriptOperation,
    metadata: &ObjectMetadata,
    details: &ScriptingParamDetails,
) -> ScriptingParams {
    let script_options = ScriptOptions {
        script_create_drop: script_create_drop(operation).to_string(),
        type_of_data_to_script: DATA_TO_SCRIPT.to_string(),
        script_statistics: SCRIPT_STATISTICS.to_string(),
        target_database_engine_edition: or_default(
            details.target_database_engine_edition.as_ref(),
            DEFAULT_ENGINE_EDITION,
        ),
        target_database_engine_type: or_default(
            details.target_database_engine_type.as_ref(),
            DEFAULT_ENGINE_TYPE,
        ),
        script_compatibility_option: or_default(
            details.script_compatibility_option.as_ref(),
            DEFAULT_COMPATIBILITY,
        ),
    };

    ScriptingParams {
        file_path: details.file_path.clone(),
        script_destination: SCRIPT_DESTINATION.to_string(),
        connection_string: None,
        scripting_objects: vec![ScriptingObject {
            object_type: metadata.metadata_type_name.clone(),
            schema: metadata.schema.clone(),
            name: metadata.name.clone(),
        }],
        script_options,
        owner_uri: connection_uri.to_string(),
        operation,
    }
}

/// Profiler sessions are addressed by `ownerUri` on the wire.
#[must_use]
pub fn start_profiling_params(session_id: &str, options: Options) -> StartProfilingParams {
    StartProfilingParams {
        owner_uri: session_id.to_string(),
        options,
    }
}

#[must_use]
pub fn stop_profiling_params(session_id: &str) -> StopProfilingParams {
    StopProfilingParams {
        owner_uri: session_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataprotocol_types::MetadataType;
    use serde_json::json;

    fn orders_table() -> ObjectMetadata {
        ObjectMetadata {
            metadata_type: MetadataType::Table,
            metadata_type_name: "Table".to_string(),
            urn: None,
            name: "orders".to_string(),
            schema: "sales".to_string(),
        }
    }

    #[test]
    fn test_connect_params_nest_options() {
        let mut info = ConnectionInfo::default();
        info.options.insert("server".to_string(), json!("localhost"));
        info.options.insert("database".to_string(), json!("master"));

        let wire = serde_json::to_value(connect_params("conn://1", &info)).unwrap();
        assert_eq!(
            wire,
            json!({
                "ownerUri": "conn://1",
                "connection": {"options": {"server": "localhost", "database": "master"}}
            })
        );
    }

    #[test]
    fn test_no_plan_options_leaves_fields_unset() {
        let wire = serde_json::to_value(execution_plan_options(None)).unwrap();
        assert_eq!(wire, json!({}));
    }

    #[test]
    fn test_plan_options_both_false_are_sent() {
        let wire = serde_json::to_value(execution_plan_options(Some(ExecutionPlanOptions {
            display_estimated_query_plan: false,
            display_actual_query_plan: false,
        })))
        .unwrap();
        assert_eq!(
            wire,
            json!({
                "includeEstimatedExecutionPlanXml": false,
                "includeActualExecutionPlanXml": false
            })
        );
    }

    #[test]
    fn test_edit_initialize_row_limit() {
        let target = EditTarget {
            schema_name: "dbo",
            object_name: "orders",
            object_type: "Table",
        };
        let wire =
            serde_json::to_value(edit_initialize_params("edit://1", &target, Some(200), None))
                .unwrap();
        assert_eq!(wire["filters"], json!({"LimitResults": 200}));
        assert_eq!(wire["objectType"], "Table");
        assert!(wire.get("queryString").is_none());
    }

    #[test]
    fn test_table_metadata_params() {
        let params = table_metadata_params("conn://1", &orders_table());
        assert_eq!(params.schema, "sales");
        assert_eq!(params.object_name, "orders");
    }

    #[test]
    fn test_scripting_defaults_fill_unset_fields() {
        let params = scripting_params(
            "conn://1",
            ScriptOperation::Create,
            &orders_table(),
            &ScriptingParamDetails::default(),
        );
        let options = &params.script_options;
        assert_eq!(options.script_create_drop, "ScriptCreate");
        assert_eq!(options.target_database_engine_edition, DEFAULT_ENGINE_EDITION);
        assert_eq!(options.target_database_engine_type, DEFAULT_ENGINE_TYPE);
        assert_eq!(options.script_compatibility_option, DEFAULT_COMPATIBILITY);
        assert_eq!(options.type_of_data_to_script, "SchemaOnly");
        assert_eq!(options.script_statistics, "ScriptStatsNone");
        assert_eq!(params.script_destination, "ToEditor");
        assert_eq!(params.scripting_objects[0].object_type, "Table");
        assert_eq!(params.owner_uri, "conn://1");
    }

    #[test]
    fn test_scripting_explicit_values_pass_through() {
        let details = ScriptingParamDetails {
            file_path: Some("/tmp/out.sql".to_string()),
            script_compatibility_option: Some("Script130Compat".to_string()),
            target_database_engine_edition: Some("SqlAzureDatabaseEdition".to_string()),
            target_database_engine_type: Some("SqlAzure".to_string()),
        };
        let params = scripting_params("conn://1", ScriptOperation::Delete, &orders_table(), &details);
        let options = &params.script_options;
        assert_eq!(options.script_create_drop, "ScriptDrop");
        assert_eq!(options.script_compatibility_option, "Script130Compat");
        assert_eq!(options.target_database_engine_edition, "SqlAzureDatabaseEdition");
        assert_eq!(options.target_database_engine_type, "SqlAzure");
        assert_eq!(params.file_path.as_deref(), Some("/tmp/out.sql"));
    }

    #[test]
    fn test_scripting_empty_string_counts_as_unset() {
        let details = ScriptingParamDetails {
            target_database_engine_type: Some(String::new()),
            ..ScriptingParamDetails::default()
        };
        let params = scripting_params("c", ScriptOperation::Select, &orders_table(), &details);
        assert_eq!(params.script_options.target_database_engine_type, DEFAULT_ENGINE_TYPE);
        assert_eq!(params.script_options.script_create_drop, "ScriptSelect");
    }

    #[test]
    fn test_profiler_session_id_becomes_owner_uri() {
        let wire = serde_json::to_value(stop_profiling_params("session-7")).unwrap();
        assert_eq!(wire, json!({"ownerUri": "session-7"}));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn any_operation() -> impl Strategy<Value = ScriptOperation> {
            prop::sample::select(ScriptOperation::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn create_drop_follows_operation(op in any_operation()) {
                let expected = match op {
                    ScriptOperation::Delete => "ScriptDrop",
                    ScriptOperation::Select => "ScriptSelect",
                    _ => "ScriptCreate",
                };
                prop_assert_eq!(script_create_drop(op), expected);
            }

            #[test]
            fn supplied_edition_is_kept(op in any_operation(), edition in "[A-Za-z]{1,24}") {
                let details = ScriptingParamDetails {
                    target_database_engine_edition: Some(edition.clone()),
                    ..ScriptingParamDetails::default()
                };
                let params = scripting_params("c", op, &orders_table(), &details);
                prop_assert_eq!(params.script_options.target_database_engine_edition, edition);
                prop_assert_eq!(params.script_options.target_database_engine_type, DEFAULT_ENGINE_TYPE);
            }

            #[test]
            fn plan_options_project_one_to_one(estimated in any::<bool>(), actual in any::<bool>()) {
                let wire = execution_plan_options(Some(ExecutionPlanOptions {
                    display_estimated_query_plan: estimated,
                    display_actual_query_plan: actual,
                }));
                prop_assert_eq!(wire.include_estimated_execution_plan_xml, Some(estimated));
                prop_assert_eq!(wire.include_actual_execution_plan_xml, Some(actual));
            }
        }
    }
}
