/*
 * Responsibility
 * - note API の URL 構造を定義
 * - 認証が必要な範囲 (note routes 全体) への middleware 適用もここで決める
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::handlers::notes::{create_note, delete_note, get_note, list_notes, update_note};

pub fn routes(state: AppState) -> Router<AppState> {
    let notes = Router::new()
        .route("/note", get(list_notes).post(create_note))
        .route(
            "/note/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        );

    middleware::auth::access::apply(notes, state)
}
