/*
 * Responsibility
 * - /note 系 CRUD handler
 * - 処理順: 認証 (middleware) → fresh 判定 (extractor) → body 検証 (422) → owner スコープの store 呼び出し
 * - 「存在しない」と「他人の note」は store 側で NotFound に統一済み。ここでは区別しない
 * - 書き込み系 (POST / PUT / DELETE) は fresh token 必須
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::notes::{NoteRequest, NoteResponse},
        extractors::{AuthCtxExtractor, FreshAuthCtxExtractor, NoteId},
    },
    error::{AppError, ErrorResponse},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/note",
    responses(
        (status = 200, description = "Notes of the caller in creation order", body = Vec<NoteResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub async fn list_notes(
    AuthCtxExtractor(auth): AuthCtxExtractor,
    State(state): State<AppState>,
) -> Result<Json<Vec<NoteResponse>>, AppError> {
    let notes = state.notes.list_for_owner(&auth.owner).await?;

    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/note",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 401, description = "Missing, invalid or non-fresh token", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 422, description = "Invalid body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub async fn create_note(
    FreshAuthCtxExtractor(auth): FreshAuthCtxExtractor,
    State(state): State<AppState>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    let Json(req) = payload?;
    let fields = req.validate().map_err(AppError::validation)?;

    let note = state
        .notes
        .create(&auth.owner, fields.title, fields.body)
        .await?;

    tracing::info!(note_id = note.id, owner = %auth.owner, "note created");
    Ok((StatusCode::CREATED, Json(note.into())))
}

#[utoipa::path(
    get,
    path = "/note/{note_id}",
    params(("note_id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such note for this owner", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub async fn get_note(
    NoteId(note_id): NoteId,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    State(state): State<AppState>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state.notes.find_for_owner(note_id, &auth.owner).await?;

    Ok(Json(note.into()))
}

#[utoipa::path(
    put,
    path = "/note/{note_id}",
    params(("note_id" = i64, Path, description = "Note id")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 401, description = "Missing, invalid or non-fresh token", body = ErrorResponse),
        (status = 404, description = "No such note for this owner", body = ErrorResponse),
        (status = 422, description = "Invalid body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub async fn update_note(
    NoteId(note_id): NoteId,
    FreshAuthCtxExtractor(auth): FreshAuthCtxExtractor,
    State(state): State<AppState>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<NoteResponse>, AppError> {
    // Validation comes before the ownership lookup: a bad body is 422 even for unknown ids.
    let Json(req) = payload?;
    let fields = req.validate().map_err(AppError::validation)?;

    let note = state
        .notes
        .update(note_id, &auth.owner, fields.title, fields.body)
        .await?;

    tracing::info!(note_id, owner = %auth.owner, "note updated");
    Ok(Json(note.into()))
}

#[utoipa::path(
    delete,
    path = "/note/{note_id}",
    params(("note_id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted, last state returned", body = NoteResponse),
        (status = 401, description = "Missing, invalid or non-fresh token", body = ErrorResponse),
        (status = 404, description = "No such note for this owner", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub async fn delete_note(
    NoteId(note_id): NoteId,
    FreshAuthCtxExtractor(auth): FreshAuthCtxExtractor,
    State(state): State<AppState>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state.notes.delete(note_id, &auth.owner).await?;

    tracing::info!(note_id, owner = %auth.owner, "note deleted");
    Ok(Json(note.into()))
}
