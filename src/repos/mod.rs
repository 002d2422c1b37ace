pub mod error;
pub mod memory_note_store;
pub mod note_store;
pub mod pg_note_store;

pub use memory_note_store::MemoryNoteStore;
pub use note_store::{Note, NoteStore};
pub use pg_note_store::PgNoteStore;
