/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthenticationManager, access_policy: AccessPolicy, contracts: ContractService
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::{sync::Arc, time::Duration};

use crate::middleware::auth::policy::AccessPolicy;
use crate::services::{auth::AuthenticationManager, contracts::ContractService};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthenticationManager>,
    pub access_policy: Arc<AccessPolicy>,
    pub contracts: ContractService,
    pub request_timeout: Duration,
}

impl AppState {
    /// Default access policy and request timeout.
    pub fn new(auth: Arc<AuthenticationManager>) -> Self {
        Self {
            auth,
            access_policy: Arc::new(AccessPolicy::default()),
            contracts: ContractService::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_access_policy(mut self, policy: AccessPolicy) -> Self {
        self.access_policy = Arc::new(policy);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
