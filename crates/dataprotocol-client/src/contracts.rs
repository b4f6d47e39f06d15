//! Message types exchanged with the server.
//!
//! A [`MessageType`] is a method name plus whether it is a request or a
//! notification. [`RequestType`] and [`NotificationType`] carry the param and
//! result shapes as phantom types so every call site is checked against the
//! wire contract. Method names are unique across the whole contract.

use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageType {
    pub method: &'static str,
    pub kind: MessageKind,
}

impl MessageType {
    #[must_use]
    pub const fn request(method: &'static str) -> Self {
        Self {
            method,
            kind: MessageKind::Request,
        }
    }

    #[must_use]
    pub const fn notification(method: &'static str) -> Self {
        Self {
            method,
            kind: MessageKind::Notification,
        }
    }

    /// Look a method up in [`ALL_MESSAGE_TYPES`].
    #[must_use]
    pub fn from_method(method: &str) -> Option<Self> {
        ALL_MESSAGE_TYPES.iter().copied().find(|t| t.method == method)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method)
    }
}

pub struct RequestType<P, R> {
    pub method: &'static str,
    _marker: PhantomData<fn(P) -> R>,
}

impl<P, R> RequestType<P, R> {
    #[must_use]
    pub const fn new(method: &'static str) -> Self {
        Self {
            method,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        MessageType::request(self.method)
    }
}

impl<P, R> Clone for RequestType<P, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, R> Copy for RequestType<P, R> {}

impl<P, R> fmt::Debug for RequestType<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestType").field(&self.method).finish()
    }
}

pub struct NotificationType<P> {
    pub method: &'static str,
    _marker: PhantomData<fn(P)>,
}

impl<P> NotificationType<P> {
    #[must_use]
    pub const fn new(method: &'static str) -> Self {
        Self {
            method,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        MessageType::notification(self.method)
    }
}

impl<P> Clone for NotificationType<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for NotificationType<P> {}

impl<P> fmt::Debug for NotificationType<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NotificationType").field(&self.method).finish()
    }
}

/// Handshake and dynamic registration. Owned by the client, not by a feature.
pub mod lifecycle {
    use super::{NotificationType, RequestType};
    use crate::handshake::{
        InitializeParams, InitializeResult, InitializedParams, RegistrationParams,
        UnregistrationParams,
    };
    use dataprotocol_types::EmptyResult;

    pub const INITIALIZE: RequestType<InitializeParams, InitializeResult> =
        RequestType::new("initialize");
    pub const INITIALIZED: NotificationType<InitializedParams> =
        NotificationType::new("initialized");
    pub const REGISTER_CAPABILITY: RequestType<RegistrationParams, EmptyResult> =
        RequestType::new("client/registerCapability");
    pub const UNREGISTER_CAPABILITY: RequestType<UnregistrationParams, EmptyResult> =
        RequestType::new("client/unregisterCapability");
}

pub mod capabilities {
    use super::{MessageType, RequestType};
    use dataprotocol_types::{CapabilitiesListParams, CapabilitiesResult};

    pub const LIST: RequestType<CapabilitiesListParams, CapabilitiesResult> =
        RequestType::new("capabilities/list");

    pub const OWNED: &[MessageType] = &[LIST.message_type()];
}

pub mod connection {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        CancelConnectParams, ChangeDatabaseParams, ConnectParams, ConnectionChangedParams,
        ConnectionCompleteParams, DisconnectParams, IntelliSenseReadyParams,
        LanguageFlavorChangedParams, ListDatabasesParams, ListDatabasesResult,
        RebuildIntelliSenseParams,
    };

    pub const CONNECT: RequestType<ConnectParams, bool> = RequestType::new("connection/connect");
    pub const DISCONNECT: RequestType<DisconnectParams, bool> =
        RequestType::new("connection/disconnect");
    pub const CANCEL_CONNECT: RequestType<CancelConnectParams, bool> =
        RequestType::new("connection/cancelconnect");
    pub const CHANGE_DATABASE: RequestType<ChangeDatabaseParams, bool> =
        RequestType::new("connection/changedatabase");
    pub const LIST_DATABASES: RequestType<ListDatabasesParams, ListDatabasesResult> =
        RequestType::new("connection/listdatabases");
    pub const CONNECTION_CHANGED: NotificationType<ConnectionChangedParams> =
        NotificationType::new("connection/connectionchanged");
    pub const CONNECTION_COMPLETE: NotificationType<ConnectionCompleteParams> =
        NotificationType::new("connection/complete");
    pub const LANGUAGE_FLAVOR_CHANGED: NotificationType<LanguageFlavorChangedParams> =
        NotificationType::new("connection/languageflavorchanged");
    pub const REBUILD_INTELLISENSE: NotificationType<RebuildIntelliSenseParams> =
        NotificationType::new("textDocument/rebuildIntelliSense");
    pub const INTELLISENSE_READY: NotificationType<IntelliSenseReadyParams> =
        NotificationType::new("textDocument/intelliSenseReady");

    pub const OWNED: &[MessageType] = &[
        CONNECT.message_type(),
        DISCONNECT.message_type(),
        CANCEL_CONNECT.message_type(),
        CHANGE_DATABASE.message_type(),
        LIST_DATABASES.message_type(),
        CONNECTION_CHANGED.message_type(),
        CONNECTION_COMPLETE.message_type(),
        LANGUAGE_FLAVOR_CHANGED.message_type(),
        REBUILD_INTELLISENSE.message_type(),
        INTELLISENSE_READY.message_type(),
    ];
}

pub mod metadata {
    use super::{MessageType, RequestType};
    use dataprotocol_types::{
        MetadataQueryParams, MetadataQueryResult, TableMetadataParams, TableMetadataResult,
    };

    pub const LIST: RequestType<MetadataQueryParams, MetadataQueryResult> =
        RequestType::new("metadata/list");
    pub const TABLE: RequestType<TableMetadataParams, TableMetadataResult> =
        RequestType::new("metadata/table");
    pub const VIEW: RequestType<TableMetadataParams, TableMetadataResult> =
        RequestType::new("metadata/view");

    pub const OWNED: &[MessageType] = &[
        LIST.message_type(),
        TABLE.message_type(),
        VIEW.message_type(),
    ];
}

pub mod query {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        EditCommitParams, EditCreateRowParams, EditCreateRowResult, EditDeleteRowParams,
        EditDisposeParams, EditInitializeParams, EditRevertCellParams, EditRevertCellResult,
        EditRevertRowParams, EditSessionReadyParams, EditSubsetParams, EditSubsetResult,
        EditUpdateCellParams, EditUpdateCellResult, EmptyResult, QueryCancelParams,
        QueryCancelResult, QueryDisposeParams, QueryExecuteBatchParams,
        QueryExecuteCompleteParams, QueryExecuteMessageParams, QueryExecuteParams,
        QueryExecuteResultSetCompleteParams, QueryExecuteStatementParams,
        QueryExecuteStringParams, QueryExecuteSubsetParams, QueryExecuteSubsetResult,
        SaveResultRequestResult, SaveResultsRequestParams, SimpleExecuteParams,
        SimpleExecuteResult,
    };

    pub type SaveResultsType = RequestType<SaveResultsRequestParams, SaveResultRequestResult>;

    pub const EXECUTE_DOCUMENT_SELECTION: RequestType<QueryExecuteParams, EmptyResult> =
        RequestType::new("query/executeDocumentSelection");
    pub const EXECUTE_DOCUMENT_STATEMENT: RequestType<QueryExecuteStatementParams, EmptyResult> =
        RequestType::new("query/executedocumentstatement");
    pub const EXECUTE_STRING: RequestType<QueryExecuteStringParams, EmptyResult> =
        RequestType::new("query/executeString");
    pub const SIMPLE_EXECUTE: RequestType<SimpleExecuteParams, SimpleExecuteResult> =
        RequestType::new("query/simpleexecute");
    pub const CANCEL: RequestType<QueryCancelParams, QueryCancelResult> =
        RequestType::new("query/cancel");
    pub const DISPOSE: RequestType<QueryDisposeParams, EmptyResult> =
        RequestType::new("query/dispose");
    pub const SUBSET: RequestType<QueryExecuteSubsetParams, QueryExecuteSubsetResult> =
        RequestType::new("query/subset");
    pub const SAVE_CSV: SaveResultsType = RequestType::new("query/saveCsv");
    pub const SAVE_JSON: SaveResultsType = RequestType::new("query/saveJson");
    pub const SAVE_EXCEL: SaveResultsType = RequestType::new("query/saveExcel");

    pub const COMPLETE: NotificationType<QueryExecuteCompleteParams> =
        NotificationType::new("query/complete");
    pub const BATCH_START: NotificationType<QueryExecuteBatchParams> =
        NotificationType::new("query/batchStart");
    pub const BATCH_COMPLETE: NotificationType<QueryExecuteBatchParams> =
        NotificationType::new("query/batchComplete");
    pub const RESULT_SET_COMPLETE: NotificationType<QueryExecuteResultSetCompleteParams> =
        NotificationType::new("query/resultSetComplete");
    pub const MESSAGE: NotificationType<QueryExecuteMessageParams> =
        NotificationType::new("query/message");

    pub const EDIT_INITIALIZE: RequestType<EditInitializeParams, EmptyResult> =
        RequestType::new("edit/initialize");
    pub const EDIT_COMMIT: RequestType<EditCommitParams, EmptyResult> =
        RequestType::new("edit/commit");
    pub const EDIT_CREATE_ROW: RequestType<EditCreateRowParams, EditCreateRowResult> =
        RequestType::new("edit/createRow");
    pub const EDIT_DELETE_ROW: RequestType<EditDeleteRowParams, EmptyResult> =
        RequestType::new("edit/deleteRow");
    pub const EDIT_DISPOSE: RequestType<EditDisposeParams, EmptyResult> =
        RequestType::new("edit/dispose");
    pub const EDIT_REVERT_CELL: RequestType<EditRevertCellParams, EditRevertCellResult> =
        RequestType::new("edit/revertCell");
    pub const EDIT_REVERT_ROW: RequestType<EditRevertRowParams, EmptyResult> =
        RequestType::new("edit/revertRow");
    pub const EDIT_UPDATE_CELL: RequestType<EditUpdateCellParams, EditUpdateCellResult> =
        RequestType::new("edit/updateCell");
    pub const EDIT_SUBSET: RequestType<EditSubsetParams, EditSubsetResult> =
        RequestType::new("edit/subset");
    pub const EDIT_SESSION_READY: NotificationType<EditSessionReadyParams> =
        NotificationType::new("edit/sessionReady");

    pub const OWNED: &[MessageType] = &[
        EXECUTE_DOCUMENT_SELECTION.message_type(),
        EXECUTE_DOCUMENT_STATEMENT.message_type(),
        EXECUTE_STRING.message_type(),
        SIMPLE_EXECUTE.message_type(),
        CANCEL.message_type(),
        DISPOSE.message_type(),
        SUBSET.message_type(),
        SAVE_CSV.message_type(),
        SAVE_JSON.message_type(),
        SAVE_EXCEL.message_type(),
        COMPLETE.message_type(),
        BATCH_START.message_type(),
        BATCH_COMPLETE.message_type(),
        RESULT_SET_COMPLETE.message_type(),
        MESSAGE.message_type(),
        EDIT_INITIALIZE.message_type(),
        EDIT_COMMIT.message_type(),
        EDIT_CREATE_ROW.message_type(),
        EDIT_DELETE_ROW.message_type(),
        EDIT_DISPOSE.message_type(),
        EDIT_REVERT_CELL.message_type(),
        EDIT_REVERT_ROW.message_type(),
        EDIT_UPDATE_CELL.message_type(),
        EDIT_SUBSET.message_type(),
        EDIT_SESSION_READY.message_type(),
    ];
}

pub mod admin {
    use super::{MessageType, RequestType};
    use dataprotocol_types::{
        CreateDatabaseParams, CreateDatabaseResponse, CreateLoginParams, CreateLoginResponse,
        DefaultDatabaseInfoParams, DefaultDatabaseInfoResponse, GetDatabaseInfoParams,
        GetDatabaseInfoResponse,
    };

    pub const CREATE_DATABASE: RequestType<CreateDatabaseParams, CreateDatabaseResponse> =
        RequestType::new("admin/createdatabase");
    pub const DEFAULT_DATABASE_INFO: RequestType<
        DefaultDatabaseInfoParams,
        DefaultDatabaseInfoResponse,
    > = RequestType::new("admin/defaultdatabaseinfo");
    pub const CREATE_LOGIN: RequestType<CreateLoginParams, CreateLoginResponse> =
        RequestType::new("admin/createlogin");
    pub const GET_DATABASE_INFO: RequestType<GetDatabaseInfoParams, GetDatabaseInfoResponse> =
        RequestType::new("admin/getdatabaseinfo");

    pub const OWNED: &[MessageType] = &[
        CREATE_DATABASE.message_type(),
        DEFAULT_DATABASE_INFO.message_type(),
        CREATE_LOGIN.message_type(),
        GET_DATABASE_INFO.message_type(),
    ];
}

pub mod backup {
    use super::{MessageType, RequestType};
    use dataprotocol_types::{
        BackupConfigInfoResponse, BackupParams, BackupResponse, DefaultDatabaseInfoParams,
    };

    pub const BACKUP: RequestType<BackupParams, BackupResponse> =
        RequestType::new("backup/backup");
    pub const BACKUP_CONFIG_INFO: RequestType<DefaultDatabaseInfoParams, BackupConfigInfoResponse> =
        RequestType::new("backup/backupconfiginfo");

    pub const OWNED: &[MessageType] = &[BACKUP.message_type(), BACKUP_CONFIG_INFO.message_type()];
}

pub mod restore {
    use super::{MessageType, RequestType};
    use dataprotocol_types::{
        RestoreConfigInfoRequestParams, RestoreConfigInfoResponse, RestoreParams,
        RestorePlanResponse, RestoreResponse,
    };

    pub const RESTORE: RequestType<RestoreParams, RestoreResponse> =
        RequestType::new("restore/restore");
    pub const RESTORE_PLAN: RequestType<RestoreParams, RestorePlanResponse> =
        RequestType::new("restore/restoreplan");
    pub const CANCEL_RESTORE_PLAN: RequestType<RestoreParams, bool> =
        RequestType::new("restore/cancelrestoreplan");
    pub const RESTORE_CONFIG_INFO: RequestType<
        RestoreConfigInfoRequestParams,
        RestoreConfigInfoResponse,
    > = RequestType::new("restore/restoreconfiginfo");

    pub const OWNED: &[MessageType] = &[
        RESTORE.message_type(),
        RESTORE_PLAN.message_type(),
        CANCEL_RESTORE_PLAN.message_type(),
        RESTORE_CONFIG_INFO.message_type(),
    ];
}

pub mod object_explorer {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        CloseSessionParams, CloseSessionResponse, ConnectionDetails, CreateSessionResponse,
        ExpandParams, ExpandResponse, SessionCreatedParameters,
    };

    pub const CREATE_SESSION: RequestType<ConnectionDetails, CreateSessionResponse> =
        RequestType::new("objectexplorer/createsession");
    pub const EXPAND: RequestType<ExpandParams, bool> = RequestType::new("objectexplorer/expand");
    pub const REFRESH: RequestType<ExpandParams, bool> =
        RequestType::new("objectexplorer/refresh");
    pub const CLOSE_SESSION: RequestType<CloseSessionParams, CloseSessionResponse> =
        RequestType::new("objectexplorer/closesession");
    pub const SESSION_CREATED: NotificationType<SessionCreatedParameters> =
        NotificationType::new("objectexplorer/sessioncreated");
    pub const EXPAND_COMPLETED: NotificationType<ExpandResponse> =
        NotificationType::new("objectexplorer/expandCompleted");

    pub const OWNED: &[MessageType] = &[
        CREATE_SESSION.message_type(),
        EXPAND.message_type(),
        REFRESH.message_type(),
        CLOSE_SESSION.message_type(),
        SESSION_CREATED.message_type(),
        EXPAND_COMPLETED.message_type(),
    ];
}

pub mod scripting {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{ScriptingCompleteParams, ScriptingParams, ScriptingResult};

    pub const SCRIPT: RequestType<ScriptingParams, ScriptingResult> =
        RequestType::new("scripting/script");
    pub const SCRIPT_COMPLETE: NotificationType<ScriptingCompleteParams> =
        NotificationType::new("scripting/scriptComplete");

    pub const OWNED: &[MessageType] = &[SCRIPT.message_type(), SCRIPT_COMPLETE.message_type()];
}

pub mod tasks {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        CancelTaskParams, ListTasksParams, ListTasksResponse, TaskInfo, TaskProgressInfo,
    };

    pub const LIST_TASKS: RequestType<ListTasksParams, ListTasksResponse> =
        RequestType::new("tasks/listtasks");
    pub const CANCEL_TASK: RequestType<CancelTaskParams, bool> =
        RequestType::new("tasks/canceltask");
    pub const STATUS_CHANGED: NotificationType<TaskProgressInfo> =
        NotificationType::new("tasks/statuschanged");
    pub const TASK_CREATED: NotificationType<TaskInfo> =
        NotificationType::new("tasks/newtaskcreated");

    pub const OWNED: &[MessageType] = &[
        LIST_TASKS.message_type(),
        CANCEL_TASK.message_type(),
        STATUS_CHANGED.message_type(),
        TASK_CREATED.message_type(),
    ];
}

pub mod file_browser {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        FileBrowserCloseParams, FileBrowserCloseResponse, FileBrowserExpandParams,
        FileBrowserExpandedParams, FileBrowserOpenParams, FileBrowserOpenedParams,
        FileBrowserValidateParams, FileBrowserValidatedParams,
    };

    pub const OPEN: RequestType<FileBrowserOpenParams, bool> =
        RequestType::new("filebrowser/open");
    pub const OPENED: NotificationType<FileBrowserOpenedParams> =
        NotificationType::new("filebrowser/opencomplete");
    pub const EXPAND: RequestType<FileBrowserExpandParams, bool> =
        RequestType::new("filebrowser/expand");
    pub const EXPANDED: NotificationType<FileBrowserExpandedParams> =
        NotificationType::new("filebrowser/expandcomplete");
    pub const VALIDATE: RequestType<FileBrowserValidateParams, bool> =
        RequestType::new("filebrowser/validate");
    pub const VALIDATED: NotificationType<FileBrowserValidatedParams> =
        NotificationType::new("filebrowser/validatecomplete");
    pub const CLOSE: RequestType<FileBrowserCloseParams, FileBrowserCloseResponse> =
        RequestType::new("filebrowser/close");

    pub const OWNED: &[MessageType] = &[
        OPEN.message_type(),
        OPENED.message_type(),
        EXPAND.message_type(),
        EXPANDED.message_type(),
        VALIDATE.message_type(),
        VALIDATED.message_type(),
        CLOSE.message_type(),
    ];
}

pub mod profiler {
    use super::{MessageType, NotificationType, RequestType};
    use dataprotocol_types::{
        ProfilerEventsAvailableParams, StartProfilingParams, StartProfilingResponse,
        StopProfilingParams, StopProfilingResponse,
    };

    pub const START: RequestType<StartProfilingParams, StartProfilingResponse> =
        RequestType::new("profiler/start");
    pub const STOP: RequestType<StopProfilingParams, StopProfilingResponse> =
        RequestType::new("profiler/stop");
    pub const EVENTS_AVAILABLE: NotificationType<ProfilerEventsAvailableParams> =
        NotificationType::new("profiler/eventsavailable");

    pub const OWNED: &[MessageType] = &[
        START.message_type(),
        STOP.message_type(),
        EVENTS_AVAILABLE.message_type(),
    ];
}

/// Every feature-owned message type, in wire-contract order.
pub const ALL_MESSAGE_TYPES: &[MessageType] = &[
    MessageType::request("connection/connect"),
    MessageType::request("connection/disconnect"),
    MessageType::request("connection/cancelconnect"),
    MessageType::request("connection/changedatabase"),
    MessageType::request("connection/listdatabases"),
    MessageType::notification("connection/connectionchanged"),
    MessageType::notification("connection/languageflavorchanged"),
    MessageType::notification("connection/complete"),
    MessageType::request("capabilities/list"),
    MessageType::notification("textDocument/rebuildIntelliSense"),
    MessageType::notification("textDocument/intelliSenseReady"),
    MessageType::request("metadata/list"),
    MessageType::request("metadata/table"),
    MessageType::request("metadata/view"),
    MessageType::request("query/executeDocumentSelection"),
    MessageType::request("query/executedocumentstatement"),
    MessageType::request("query/executeString"),
    MessageType::request("query/cancel"),
    MessageType::request("query/dispose"),
    MessageType::notification("query/complete"),
    MessageType::notification("query/batchStart"),
    MessageType::notification("query/batchComplete"),
    MessageType::notification("query/resultSetComplete"),
    MessageType::notification("query/message"),
    MessageType::request("query/subset"),
    MessageType::request("query/simpleexecute"),
    MessageType::request("query/saveCsv"),
    MessageType::request("query/saveJson"),
    MessageType::request("query/saveExcel"),
    MessageType::request("edit/commit"),
    MessageType::request("edit/createRow"),
    MessageType::request("edit/deleteRow"),
    MessageType::request("edit/dispose"),
    MessageType::request("edit/initialize"),
    MessageType::request("edit/revertCell"),
    MessageType::request("edit/revertRow"),
    MessageType::request("edit/updateCell"),
    MessageType::request("edit/subset"),
    MessageType::notification("edit/sessionReady"),
    MessageType::request("objectexplorer/createsession"),
    MessageType::request("objectexplorer/expand"),
    MessageType::request("objectexplorer/refresh"),
    MessageType::request("objectexplorer/closesession"),
    MessageType::notification("objectexplorer/sessioncreated"),
    MessageType::notification("objectexplorer/expandCompleted"),
    MessageType::request("scripting/script"),
    MessageType::notification("scripting/scriptComplete"),
    MessageType::request("tasks/listtasks"),
    MessageType::request("tasks/canceltask"),
    MessageType::notification("tasks/statuschanged"),
    MessageType::notification("tasks/newtaskcreated"),
    MessageType::request("admin/createdatabase"),
    MessageType::request("admin/defaultdatabaseinfo"),
    MessageType::request("admin/createlogin"),
    MessageType::request("admin/getdatabaseinfo"),
    MessageType::request("backup/backup"),
    MessageType::request("backup/backupconfiginfo"),
    MessageType::request("restore/restore"),
    MessageType::request("restore/restoreplan"),
    MessageType::request("restore/cancelrestoreplan"),
    MessageType::request("restore/restoreconfiginfo"),
    MessageType::request("filebrowser/open"),
    MessageType::notification("filebrowser/opencomplete"),
    MessageType::request("filebrowser/expand"),
    MessageType::notification("filebrowser/expandcomplete"),
    MessageType::request("filebrowser/validate"),
    MessageType::notification("filebrowser/validatecomplete"),
    MessageType::request("filebrowser/close"),
    MessageType::request("profiler/start"),
    MessageType::request("profiler/stop"),
    MessageType::notification("profiler/eventsavailable"),
];
