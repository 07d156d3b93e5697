//! Resource store seam.
//!
//! The policy engine never fetches anything; handlers read instances through
//! this trait and pass them in. Swapping the backend does not touch policy.

pub mod memory;

use async_trait::async_trait;
use taskgate_core::error::Result;
use taskgate_core::{Comment, Instance, ResourceKind, Task};

pub use memory::MemoryStore;

/// Owned instance returned by [`ResourceStore::fetch_instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Task(Task),
    Comment(Comment),
}

impl Resource {
    pub fn as_instance(&self) -> Instance<'_> {
        match self {
            Resource::Task(t) => Instance::Task(t),
            Resource::Comment(c) => Instance::Comment(c),
        }
    }

    pub fn into_task(self) -> Option<Task> {
        match self {
            Resource::Task(t) => Some(t),
            Resource::Comment(_) => None,
        }
    }

    pub fn into_comment(self) -> Option<Comment> {
        match self {
            Resource::Comment(c) => Some(c),
            Resource::Task(_) => None,
        }
    }
}

/// Fields accepted when creating a task; id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub owner_id: String,
    pub invited_users: std::collections::BTreeSet<String>,
    pub completed: bool,
}

/// Fields accepted when creating a comment; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub author_id: String,
    pub task_id: String,
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn get_task(&self, id: &str) -> Result<Option<Task>>;
    async fn insert_task(&self, task: NewTask) -> Result<Task>;
    /// Replace `expected` with `next` (same id). Writes only if the stored
    /// task still equals `expected`: `Conflict` if it changed, `NotFound` if gone.
    async fn update_task(&self, expected: &Task, next: Task) -> Result<Task>;
    /// Remove a task and every comment attached to it, under the same
    /// compare-before-write rule as `update_task`.
    async fn delete_task(&self, expected: &Task) -> Result<Task>;

    async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>>;
    async fn get_comment(&self, id: &str) -> Result<Option<Comment>>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn update_comment(&self, expected: &Comment, next: Comment) -> Result<Comment>;
    async fn delete_comment(&self, expected: &Comment) -> Result<Comment>;

    async fn fetch_instance(&self, kind: ResourceKind, id: &str) -> Result<Option<Resource>> {
        Ok(match kind {
            ResourceKind::Task => self.get_task(id).await?.map(Resource::Task),
            ResourceKind::Comment => self.get_comment(id).await?.map(Resource::Comment),
        })
    }
}
