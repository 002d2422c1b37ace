/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - notes: NoteStore 実装 (Postgres / in-memory), auth: AuthService
 * - 起動時に明示的に組み立てて注入する (グローバルは持たない)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::NoteStore;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteStore>, auth: Arc<AuthService>) -> Self {
        Self { notes, auth }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("notes", &self.notes.backend_name())
            .field("auth", &self.auth)
            .finish()
    }
}
