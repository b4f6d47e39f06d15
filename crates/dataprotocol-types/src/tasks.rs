//! Background task shapes (`tasks/*`) and the execution mode shared by
//! admin, backup and restore requests.

use serde::{Deserialize, Serialize};

/// How a long-running admin operation should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TaskExecutionMode {
    #[default]
    Execute,
    Script,
    ExecuteAndScript,
}

impl TryFrom<i32> for TaskExecutionMode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskExecutionMode::Execute),
            1 => Ok(TaskExecutionMode::Script),
            2 => Ok(TaskExecutionMode::ExecuteAndScript),
            other => Err(format!("unknown task execution mode: {other}")),
        }
    }
}

impl From<TaskExecutionMode> for i32 {
    fn from(value: TaskExecutionMode) -> Self {
        match value {
            TaskExecutionMode::Execute => 0,
            TaskExecutionMode::Script => 1,
            TaskExecutionMode::ExecuteAndScript => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Succeeded,
    SucceededWithWarning,
    Failed,
    Canceled,
    Canceling,
}

impl TaskStatus {
    /// Whether the task can no longer change state.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded
                | TaskStatus::SucceededWithWarning
                | TaskStatus::Failed
                | TaskStatus::Canceled
        )
    }
}

impl TryFrom<i32> for TaskStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::NotStarted),
            1 => Ok(TaskStatus::InProgress),
            2 => Ok(TaskStatus::Succeeded),
            3 => Ok(TaskStatus::SucceededWithWarning),
            4 => Ok(TaskStatus::Failed),
            5 => Ok(TaskStatus::Canceled),
            6 => Ok(TaskStatus::Canceling),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

impl From<TaskStatus> for i32 {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::NotStarted => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Succeeded => 2,
            TaskStatus::SucceededWithWarning => 3,
            TaskStatus::Failed => 4,
            TaskStatus::Canceled => 5,
            TaskStatus::Canceling => 6,
        }
    }
}

/// Payload of `tasks/newtaskcreated`, also the element of `tasks/listtasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub task_execution_mode: TaskExecutionMode,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub is_cancelable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    pub list_active_tasks_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResponse {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub tasks: Vec<TaskInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTaskParams {
    pub task_id: String,
}

/// Payload of `tasks/statuschanged`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgressInfo {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}
