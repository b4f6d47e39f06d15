use dataprotocol_types::{CancelTaskParams, ListTasksParams, TaskInfo, TaskProgressInfo};

use crate::contracts::tasks;

provider_handle! {
    TaskServicesProvider
}

impl TaskServicesProvider {
    pub async fn get_all_tasks(&self, list_active_only: bool) -> Vec<TaskInfo> {
        let params = ListTasksParams {
            list_active_tasks_only: list_active_only,
        };
        self.conn
            .request_or_default(tasks::LIST_TASKS, &params)
            .await
            .tasks
    }

    pub async fn cancel_task(&self, task_id: &str) -> bool {
        let params = CancelTaskParams {
            task_id: task_id.to_string(),
        };
        self.conn.request_or_default(tasks::CANCEL_TASK, &params).await
    }

    pub fn on_task_created<F>(&self, handler: F)
    where
        F: Fn(TaskInfo) + Send + Sync + 'static,
    {
        self.conn.on_notification(tasks::TASK_CREATED, handler);
    }

    pub fn on_task_status_changed<F>(&self, handler: F)
    where
        F: Fn(TaskProgressInfo) + Send + Sync + 'static,
    {
        self.conn.on_notification(tasks::STATUS_CHANGED, handler);
    }
}
