/*
 * Responsibility
 * - URL 構造を定義
 * - /contracts (要認証), /actuator 配下, /error (公開)
 * - 認証の要否は middleware::auth::policy 側で決める
 * - 未定義パス / 未対応メソッドも JSON の AppError で返す
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    actuator::{health, info},
    contracts::get_user_contracts,
    error::{error_page, method_not_allowed, not_found},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contracts", get(get_user_contracts))
        .route("/actuator/health", get(health))
        .route("/actuator/info", get(info))
        .route("/error", get(error_page))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}
