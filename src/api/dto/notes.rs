/*
 * Responsibility
 * - Notes の request/response DTO
 * - validation (形式チェック) は validate() に持たせる
 * - owner はレスポンスに含めない
 */
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repos::Note;

pub const TITLE_MAX_CHARS: usize = 256;
pub const BODY_MAX_CHARS: usize = 65_536;

/// POST / PUT 共通の body。
///
/// 欠落と null はどちらも None として受け、validate() で 422 にする。
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NoteRequest {
    /// Required, non-blank, at most 256 chars.
    #[schema(example = "title")]
    pub title: Option<String>,
    /// Required, may be empty, at most 65536 chars.
    #[schema(example = "body")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteFields<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl NoteRequest {
    pub fn validate(&self) -> Result<NoteFields<'_>, &'static str> {
        let title = self.title.as_deref().ok_or("title is required")?;
        let body = self.body.as_deref().ok_or("body is required")?;

        if title.trim().is_empty() {
            return Err("title cannot be empty");
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 256 chars");
        }
        if body.chars().count() > BODY_MAX_CHARS {
            return Err("body must be <= 65536 chars");
        }

        Ok(NoteFields { title, body })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            body: note.body,
        }
    }
}
