/*
 * Responsibility
 * - subject (email) → UserRecord の lookup (UserDirectory trait)
 * - 起動時に組み立てる read-only な StaticUserDirectory
 *
 * Notes
 * - パスワード等の credential は持たない (本人性は token の検証に委譲)
 */
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::authority::{Authorities, GrantedAuthority, authorities};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub subject: String,
    pub authorities: Authorities,
}

impl UserRecord {
    pub fn new(subject: impl Into<String>, authorities: Authorities) -> Self {
        Self {
            subject: subject.into(),
            authorities,
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    // Returns:
    // - Ok(Some(_)) => known subject
    // - Ok(None)    => unknown subject
    // - Err(_)      => backend failure (not a credential problem)
    async fn find_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// In-memory directory built once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.subject.clone(), u))
            .collect();
        Self { users }
    }

    /// The two demo accounts.
    pub fn seeded() -> Self {
        Self::new([
            UserRecord::new("user@company.com", authorities(["ROLE_USER"])),
            UserRecord::new("admin@company.com", authorities(["ROLE_ADMIN"])),
        ])
    }

    /// Build from `(subject, [authority, ..])` pairs, e.g. parsed configuration.
    pub fn from_entries(entries: &[(String, Vec<String>)]) -> Self {
        Self::new(entries.iter().map(|(subject, names)| {
            UserRecord::new(
                subject.clone(),
                names.iter().map(|n| GrantedAuthority::new(n.clone())).collect(),
            )
        }))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.get(subject).cloned())
    }
}
