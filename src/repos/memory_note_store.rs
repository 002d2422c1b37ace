//! In-process note store.
//!
//! Used when no database is configured (development) and by the test suite.
//! Contents are lost on restart.
use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::{
    error::{RepoError, RepoResult},
    note_store::{Note, NoteStore},
};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    // Keyed by id; ids only grow, so iteration order is creation order.
    notes: BTreeMap<i64, Note>,
}

impl Inner {
    fn find_for_owner_mut(&mut self, id: i64, owner: &str) -> RepoResult<&mut Note> {
        self.notes
            .get_mut(&id)
            .filter(|note| note.owner == owner)
            .ok_or(RepoError::NotFound)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryNoteStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, owner: &str, title: &str, body: &str) -> RepoResult<Note> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let note = Note {
            id: inner.last_id,
            owner: owner.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };
        inner.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn find_for_owner(&self, id: i64, owner: &str) -> RepoResult<Note> {
        let inner = self.inner.read().await;
        inner
            .notes
            .get(&id)
            .filter(|note| note.owner == owner)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_for_owner(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let inner = self.inner.read().await;
        Ok(inner
            .notes
            .values()
            .filter(|note| note.owner == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, owner: &str, title: &str, body: &str) -> RepoResult<Note> {
        let mut inner = self.inner.write().await;
        let note = inner.find_for_owner_mut(id, owner)?;
        note.title = title.to_string();
        note.body = body.to_string();

        Ok(note.clone())
    }

    async fn delete(&self, id: i64, owner: &str) -> RepoResult<Note> {
        let mut inner = self.inner.write().await;
        inner.find_for_owner_mut(id, owner)?;

        inner.notes.remove(&id).ok_or(RepoError::NotFound)
    }
}
