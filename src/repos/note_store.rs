//! Note store interface used by the HTTP handlers.
//!
//! Every operation is scoped to an owner. A note that exists under another
//! owner is reported exactly like a missing one (`RepoError::NotFound`).
use async_trait::async_trait;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub body: String,
}

/// Persistence for notes.
///
/// Implementations must be shareable across requests (`Arc<dyn NoteStore>`).
/// Concurrent writes to the same note are last-writer-wins.
#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Assign a fresh id and persist the note.
    async fn create(&self, owner: &str, title: &str, body: &str) -> RepoResult<Note>;

    // The access-control gate: the note is returned only if `owner` matches.
    async fn find_for_owner(&self, id: i64, owner: &str) -> RepoResult<Note>;

    // All notes of `owner` in creation order.
    async fn list_for_owner(&self, owner: &str) -> RepoResult<Vec<Note>>;

    // Overwrite title/body. `id` and `owner` never change.
    async fn update(&self, id: i64, owner: &str, title: &str, body: &str) -> RepoResult<Note>;

    // Remove the note and return its last state.
    async fn delete(&self, id: i64, owner: &str) -> RepoResult<Note>;
}
