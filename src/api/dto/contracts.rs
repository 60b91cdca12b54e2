/*
 * Responsibility
 * - /contracts の request/response DTO (JSON は camelCase)
 */
use serde::{Deserialize, Serialize};

use crate::services::contracts::ContractRecord;

#[derive(Debug, Deserialize)]
pub struct ContractsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub id: usize,
    pub contract_number: String,
    pub country: String,
}

impl From<ContractRecord> for ContractResponse {
    fn from(record: ContractRecord) -> Self {
        Self {
            id: record.id,
            contract_number: record.contract_number,
            country: record.country,
        }
    }
}
