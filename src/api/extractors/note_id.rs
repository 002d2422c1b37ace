/*
 * Responsibility
 * - Path の {note_id} を i64 の note id として受け取る
 * - 整数でない id は 404 (その URL に note は存在しない) として扱い、parse の詳細は返さない
 */
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteId(pub i64);

impl<S> FromRequestParts<S> for NoteId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("Note"))?;

        parse_note_id(&raw).ok_or(AppError::not_found("Note"))
    }
}

fn parse_note_id(raw: &str) -> Option<NoteId> {
    // digits only; i64::from_str would also accept a leading '+'
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().map(NoteId)
}
