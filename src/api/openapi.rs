/*
 * Responsibility
 * - note API の OpenAPI document を組み立てる (utoipa)
 * - GET /openapi.json で公開する (認証不要)
 */
use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::{
        dto::notes::{NoteRequest, NoteResponse},
        handlers::notes,
    },
    error::{ErrorBody, ErrorResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "notes-api", description = "Operations on notes."),
    paths(
        notes::list_notes,
        notes::create_note,
        notes::get_note,
        notes::update_note,
        notes::delete_note
    ),
    components(schemas(NoteRequest, NoteResponse, ErrorResponse, ErrorBody)),
    modifiers(&BearerAuth),
    tags(
        (name = "notes", description = "Owner-scoped note CRUD")
    )
)]
pub struct ApiDoc;

// Registers the `bearer` scheme the note paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
