/*
 * Responsibility
 * - handler が受け取る extractor の公開
 */
pub mod auth_ctx;
pub mod note_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor, FreshAuthCtxExtractor};
pub use note_id::NoteId;
