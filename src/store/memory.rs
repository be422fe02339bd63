use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, TaskChanges, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// Process-local storage used when no database is configured, and by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email);
        if taken {
            return Err(StoreError::Duplicate);
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_task_id += 1;

        let now = Utc::now();
        let task = Task {
            id: tables.last_task_id,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            user_id: new_task.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        // Ids grow monotonically, so reverse id order is newest first.
        Ok(tables
            .tasks
            .values()
            .rev()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        let task = match tables.tasks.get_mut(&id) {
            Some(task) if task.user_id == owner_id => task,
            _ => return Ok(None),
        };

        task.title = changes.title;
        task.description = changes.description;
        task.status = changes.status;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .tasks
            .get(&id)
            .map_or(false, |task| task.user_id == owner_id);
        if owned {
            tables.tasks.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_task(title: &str, owner: i64) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            user_id: owner,
        }
    }

    #[actix_rt::test]
    async fn test_usernames_and_emails_are_unique() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice", "alice@x.com")).await.unwrap();
        assert_eq!(alice.id, 1);

        let same_name = store.create_user(new_user("alice", "other@x.com")).await;
        assert!(matches!(same_name, Err(StoreError::Duplicate)));

        let same_email = store.create_user(new_user("bob", "alice@x.com")).await;
        assert!(matches!(same_email, Err(StoreError::Duplicate)));

        let found = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        let by_id = store.find_user_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");
        assert!(store.find_user_by_username("carol").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_list_is_scoped_and_newest_first() {
        let store = MemoryStore::new();
        store.create_task(new_task("first", 1)).await.unwrap();
        store.create_task(new_task("theirs", 2)).await.unwrap();
        store.create_task(new_task("second", 1)).await.unwrap();

        let titles: Vec<String> = store
            .list_tasks_by_owner(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[actix_rt::test]
    async fn test_update_and_delete_require_owner() {
        let store = MemoryStore::new();
        let task = store.create_task(new_task("mine", 1)).await.unwrap();
        let changes = TaskChanges {
            title: "changed".to_string(),
            description: String::new(),
            status: TaskStatus::Completed,
        };

        assert!(store
            .update_task(task.id, 2, changes.clone())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_task(task.id, 2).await.unwrap());

        let updated = store.update_task(task.id, 1, changes).await.unwrap().unwrap();
        assert_eq!(updated.title, "changed");
        assert_eq!(updated.user_id, 1);

        assert!(store.delete_task(task.id, 1).await.unwrap());
        assert!(store.find_task_by_id(task.id).await.unwrap().is_none());
    }
}
