/*
 * Responsibility
 * - GET /contracts?userId=...
 * - access gate が通した AuthenticatedSession を受け取り、ログの相関にだけ使う
 */
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    api::{
        dto::contracts::{ContractResponse, ContractsQuery},
        extractors::AuthSessionExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn get_user_contracts(
    State(state): State<AppState>,
    AuthSessionExtractor(session): AuthSessionExtractor,
    query: Result<Query<ContractsQuery>, QueryRejection>,
) -> Result<Json<Vec<ContractResponse>>, AppError> {
    let Query(query) = query?;

    let contracts: Vec<ContractResponse> = state
        .contracts
        .load_user_contracts(query.user_id.as_deref())
        .map(ContractResponse::from)
        .collect();

    tracing::info!(
        subject = %session.subject,
        count = contracts.len(),
        "contracts loaded"
    );

    Ok(Json(contracts))
}
