use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedSession;
use crate::state::AppState;

/// Handler で AuthenticatedSession を受け取るための extractor
/// middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (公開パスで使われた・ミドルウェア未設定)
pub struct AuthSessionExtractor(pub AuthenticatedSession);

impl FromRequestParts<AppState> for AuthSessionExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedSession>()
            .cloned()
            .map(AuthSessionExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
