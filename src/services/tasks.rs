use std::sync::Arc;

use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskChanges, TaskInput};
use crate::store::TaskStore;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Task operations scoped to the authenticated caller.
///
/// Every read of a single task, update and delete goes through the same ownership
/// check: a missing task is `NotFound`, someone else's task is `Forbidden`.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Creates a task owned by `caller_id`.
    pub async fn create(&self, caller_id: i64, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.tasks.create_task(NewTask::new(input, caller_id)).await?;
        Ok(task)
    }

    /// Lists the caller's own tasks, newest first.
    pub async fn list(&self, caller_id: i64) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.list_tasks_by_owner(caller_id).await?)
    }

    pub async fn get(&self, task_id: i64, caller_id: i64) -> Result<Task, AppError> {
        self.fetch_owned(task_id, caller_id).await
    }

    pub async fn update(
        &self,
        task_id: i64,
        caller_id: i64,
        input: TaskInput,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let current = self.fetch_owned(task_id, caller_id).await?;
        let changes = TaskChanges::new(input, &current);

        // The store re-applies the owner filter; a miss here means the row vanished.
        self.tasks
            .update_task(task_id, caller_id, changes)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn delete(&self, task_id: i64, caller_id: i64) -> Result<(), AppError> {
        self.fetch_owned(task_id, caller_id).await?;
        if !self.tasks.delete_task(task_id, caller_id).await? {
            return Err(task_not_found());
        }
        Ok(())
    }

    async fn fetch_owned(&self, task_id: i64, caller_id: i64) -> Result<Task, AppError> {
        let task = self
            .tasks
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(task_not_found)?;

        if task.user_id != caller_id {
            log::debug!("User {} denied access to task {}", caller_id, task_id);
            return Err(AppError::Forbidden);
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::store::MemoryStore;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_stamps_caller_as_owner() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        let task = service.create(ALICE, input("Buy milk")).await.unwrap();

        assert_eq!(task.user_id, ALICE);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[actix_rt::test]
    async fn test_create_rejects_empty_title() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        let result = service.create(ALICE, input("")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_list_only_returns_callers_tasks() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        service.create(ALICE, input("alice 1")).await.unwrap();
        service.create(BOB, input("bob 1")).await.unwrap();

        let tasks = service.list(ALICE).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.iter().all(|t| t.user_id == ALICE));
    }

    #[actix_rt::test]
    async fn test_other_users_cannot_mutate() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        let task = service.create(ALICE, input("private")).await.unwrap();

        let update = service.update(task.id, BOB, input("hijacked")).await;
        assert!(matches!(update, Err(AppError::Forbidden)));

        let delete = service.delete(task.id, BOB).await;
        assert!(matches!(delete, Err(AppError::Forbidden)));

        let read = service.get(task.id, BOB).await;
        assert!(matches!(read, Err(AppError::Forbidden)));

        let updated = service
            .update(
                task.id,
                ALICE,
                TaskInput {
                    title: "still private".to_string(),
                    description: Some("edited".to_string()),
                    status: Some(TaskStatus::Completed),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "still private");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.user_id, ALICE);

        service.delete(task.id, ALICE).await.unwrap();
        assert!(service.list(ALICE).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_missing_task_is_not_found() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));

        let update = service.update(404, ALICE, input("ghost")).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        let delete = service.delete(404, ALICE).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }
}
