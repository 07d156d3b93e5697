use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use taskgate_core::error::{Result, TaskGateError};
use taskgate_core::{Comment, Task};

use super::{NewComment, NewTask, ResourceStore};
use crate::config::SeedConfig;

#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    value: T,
}

/// In-process store. Listing order is insertion order.
#[derive(Debug)]
pub struct MemoryStore {
    tasks: DashMap<String, Entry<Task>>,
    comments: DashMap<String, Entry<Comment>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            comments: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Store preloaded with the config's seed data.
    pub fn seeded(seed: &SeedConfig) -> Self {
        let store = Self::new();
        for t in &seed.tasks {
            let task = Task {
                id: t.id.clone(),
                title: t.title.clone(),
                owner_id: t.owner_id.clone(),
                invited_users: t.invited_users.clone(),
                completed: t.completed,
            };
            let seq = store.next_seq();
            store.tasks.insert(task.id.clone(), Entry { seq, value: task });
        }
        for c in &seed.comments {
            let comment = Comment {
                id: c.id.clone(),
                body: c.body.clone(),
                author_id: c.author_id.clone(),
                task_id: c.task_id.clone(),
                created_at_ms: now_ms(),
            };
            let seq = store.next_seq();
            store.comments.insert(comment.id.clone(), Entry { seq, value: comment });
        }
        tracing::debug!(tasks = seed.tasks.len(), comments = seed.comments.len(), "store seeded");
        store
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Fresh id that does not collide with seeded ids.
    fn fresh_id<T>(&self, prefix: &str, map: &DashMap<String, Entry<T>>) -> (u64, String) {
        loop {
            let seq = self.next_seq();
            let id = format!("{prefix}_{seq}");
            if !map.contains_key(&id) {
                return (seq, id);
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Error for a conditional write that did not happen.
fn missing_or_changed<T>(map: &DashMap<String, Entry<T>>, what: &str, id: &str) -> TaskGateError {
    if map.contains_key(id) {
        TaskGateError::Conflict(format!("{what} {id} changed"))
    } else {
        TaskGateError::NotFound(format!("{what} {id}"))
    }
}

fn sorted<T: Clone>(mut entries: Vec<Entry<T>>) -> Vec<T> {
    entries.sort_by_key(|e| e.seq);
    entries.into_iter().map(|e| e.value).collect()
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(sorted(self.tasks.iter().map(|r| r.value().clone()).collect()))
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.tasks.get(id).map(|r| r.value().value.clone()))
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task> {
        let (seq, id) = self.fresh_id("task", &self.tasks);
        let task = Task {
            id,
            title: task.title,
            owner_id: task.owner_id,
            invited_users: task.invited_users,
            completed: task.completed,
        };
        self.tasks.insert(task.id.clone(), Entry { seq, value: task.clone() });
        Ok(task)
    }

    async fn update_task(&self, expected: &Task, next: Task) -> Result<Task> {
        let mut entry = self
            .tasks
            .get_mut(&expected.id)
            .ok_or_else(|| TaskGateError::NotFound(format!("task {}", expected.id)))?;
        if entry.value != *expected {
            return Err(TaskGateError::Conflict(format!("task {} changed", expected.id)));
        }
        entry.value = next.clone();
        Ok(next)
    }

    async fn delete_task(&self, expected: &Task) -> Result<Task> {
        let Some((_, removed)) = self.tasks.remove_if(&expected.id, |_, e| e.value == *expected) else {
            return Err(missing_or_changed(&self.tasks, "task", &expected.id));
        };
        self.comments.retain(|_, c| c.value.task_id != expected.id);
        Ok(removed.value)
    }

    async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        Ok(sorted(
            self.comments
                .iter()
                .filter(|r| r.value().value.task_id == task_id)
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.comments.get(id).map(|r| r.value().value.clone()))
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        if !self.tasks.contains_key(&comment.task_id) {
            return Err(TaskGateError::NotFound(format!("task {}", comment.task_id)));
        }
        let (seq, id) = self.fresh_id("comment", &self.comments);
        let comment = Comment {
            id,
            body: comment.body,
            author_id: comment.author_id,
            task_id: comment.task_id,
            created_at_ms: now_ms(),
        };
        self.comments.insert(comment.id.clone(), Entry { seq, value: comment.clone() });
        Ok(comment)
    }

    async fn update_comment(&self, expected: &Comment, next: Comment) -> Result<Comment> {
        let mut entry = self
            .comments
            .get_mut(&expected.id)
            .ok_or_else(|| TaskGateError::NotFound(format!("comment {}", expected.id)))?;
        if entry.value != *expected {
            return Err(TaskGateError::Conflict(format!("comment {} changed", expected.id)));
        }
        entry.value = next.clone();
        Ok(next)
    }

    async fn delete_comment(&self, expected: &Comment) -> Result<Comment> {
        self.comments
            .remove_if(&expected.id, |_, e| e.value == *expected)
            .map(|(_, removed)| removed.value)
            .ok_or_else(|| missing_or_changed(&self.comments, "comment", &expected.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeedComment, SeedTask};
    use crate::store::Resource;
    use taskgate_core::ResourceKind;

    fn seed() -> SeedConfig {
        SeedConfig {
            tasks: vec![
                SeedTask {
                    id: "todo_1".into(),
                    title: "Complete project presentation".into(),
                    owner_id: "u1".into(),
                    invited_users: Default::default(),
                    completed: false,
                },
                SeedTask {
                    id: "todo_2".into(),
                    title: "Review code changes".into(),
                    owner_id: "u2".into(),
                    invited_users: Default::default(),
                    completed: true,
                },
            ],
            comments: vec![
                SeedComment {
                    id: "1".into(),
                    body: "Great progress on this task!".into(),
                    author_id: "u1".into(),
                    task_id: "todo_1".into(),
                },
                SeedComment {
                    id: "2".into(),
                    body: "Need help with this one".into(),
                    author_id: "u2".into(),
                    task_id: "todo_2".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = MemoryStore::seeded(&seed());
        let created = store
            .insert_task(NewTask {
                title: "Write unit tests".into(),
                owner_id: "u3".into(),
                invited_users: Default::default(),
                completed: false,
            })
            .await
            .unwrap();
        let ids: Vec<String> = store.list_tasks().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["todo_1".to_string(), "todo_2".to_string(), created.id]);
    }

    #[tokio::test]
    async fn delete_cascades_to_comments() {
        let store = MemoryStore::seeded(&seed());
        let task = store.get_task("todo_1").await.unwrap().unwrap();
        let removed = store.delete_task(&task).await.unwrap();
        assert_eq!(removed.id, "todo_1");
        assert!(store.get_comment("1").await.unwrap().is_none());
        assert!(store.get_comment("2").await.unwrap().is_some());
        assert!(matches!(store.delete_task(&task).await, Err(TaskGateError::NotFound(_))));
    }

    #[tokio::test]
    async fn stale_task_is_not_deleted() {
        let store = MemoryStore::seeded(&seed());
        let seen = store.get_task("todo_2").await.unwrap().unwrap();
        let reopened = Task { completed: false, ..seen.clone() };
        store.update_task(&seen, reopened).await.unwrap();

        let err = store.delete_task(&seen).await.unwrap_err();
        assert!(matches!(err, TaskGateError::Conflict(_)));
        assert!(store.get_task("todo_2").await.unwrap().is_some());
        assert!(store.get_comment("2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let store = MemoryStore::seeded(&seed());
        let seen = store.get_task("todo_1").await.unwrap().unwrap();
        let first = Task { title: "first".into(), ..seen.clone() };
        let second = Task { title: "second".into(), ..seen.clone() };
        store.update_task(&seen, first).await.unwrap();

        let err = store.update_task(&seen, second).await.unwrap_err();
        assert!(matches!(err, TaskGateError::Conflict(_)));
        assert_eq!(store.get_task("todo_1").await.unwrap().unwrap().title, "first");
    }

    #[tokio::test]
    async fn comment_writes_compare_first() {
        let store = MemoryStore::seeded(&seed());
        let seen = store.get_comment("1").await.unwrap().unwrap();
        let edited = Comment { body: "edited".into(), ..seen.clone() };
        store.update_comment(&seen, edited.clone()).await.unwrap();

        assert!(matches!(store.delete_comment(&seen).await, Err(TaskGateError::Conflict(_))));
        assert_eq!(store.delete_comment(&edited).await.unwrap().body, "edited");
        assert!(matches!(store.delete_comment(&edited).await, Err(TaskGateError::NotFound(_))));
    }

    #[tokio::test]
    async fn comment_on_missing_task_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .insert_comment(NewComment {
                body: "hello".into(),
                author_id: "u1".into(),
                task_id: "nope".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TaskGateError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_instance_by_kind() {
        let store = MemoryStore::seeded(&seed());
        let got = store.fetch_instance(ResourceKind::Comment, "2").await.unwrap();
        assert!(matches!(got, Some(Resource::Comment(ref c)) if c.author_id == "u2"));
        assert!(store.fetch_instance(ResourceKind::Task, "2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_task_fails() {
        let store = MemoryStore::new();
        let ghost = Task {
            id: "ghost".into(),
            title: "x".into(),
            owner_id: "u1".into(),
            invited_users: Default::default(),
            completed: false,
        };
        assert!(matches!(
            store.update_task(&ghost, ghost.clone()).await,
            Err(TaskGateError::NotFound(_))
        ));
    }
}
