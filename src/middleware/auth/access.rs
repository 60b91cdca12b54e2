//! Access gate: path rule → bearer 認証 → 権限チェック → AuthenticatedSession を extensions に入れる
//!
//! - PermitAll のパスは認証せずにそのまま通す
//! - Authorization ヘッダなし / 認証失敗 → 401
//! - 認証基盤側の想定外エラー → 500
//! - 認証済みだが権限不足 → 403

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Credentials;
use crate::state::AppState;

/// Router 全体にアクセスゲートを掛ける。
///
/// 例：
/// ```ignore
/// let router = api::routes();
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();
    let access = state.access_policy.access_for(&path);

    if !access.requires_authentication() {
        return Ok(next.run(req).await);
    }

    let credentials = match Credentials::from_headers(req.headers()) {
        Some(credentials) => credentials,
        None => {
            tracing::debug!(path = %path, "missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    let session = match state.auth.authenticate(credentials).await {
        Ok(session) => session,
        Err(err) if err.is_service_failure() => {
            tracing::error!(error = ?err, path = %path, "authentication service failure");
            return Err(AppError::Internal);
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, path = %path, "authentication failed");
            return Err(err.into());
        }
    };

    if !access.is_granted(&session) {
        tracing::warn!(subject = %session.subject, path = %path, "access denied");
        return Err(AppError::Forbidden);
    }

    tracing::debug!(subject = %session.subject, "authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
