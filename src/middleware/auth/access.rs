//! access token (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を受け取り、署名 / exp / type を検証する
//! - `sub` を owner として `AuthCtx` に格納する
//! - fresh かどうかの判定結果も `AuthCtx` に載せ、要求するかは extractor 側で決める

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// note routes に認証を掛けるための middleware を適用する。
///
/// `route_layer` なので、どの route にもマッチしないリクエストは 401 ではなく 404 になる。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)?;

    let verified = match state.auth.verify_access(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::unauthorized(err.reason()));
        }
    };

    let auth_ctx = AuthCtx::from(verified);
    tracing::debug!(
        owner = %auth_ctx.owner,
        fresh = auth_ctx.fresh,
        jti = ?auth_ctx.jti,
        "authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Result<&str, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::unauthorized("missing bearer token"))?;

    let token = auth
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::unauthorized("missing bearer token"))?;

    Ok(token)
}
