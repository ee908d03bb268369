//! `PostgreSQL` implementation of the `UserDirectory` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courier_core::error::DomainError;
use courier_core::identity::Role;
use courier_core::repository::UserDirectory;

use crate::infrastructure;

/// Role-indexed lookup over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Creates a new `PgUserDirectory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn users_with_role(&self, role: Role) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar("SELECT id FROM users WHERE role = $1 ORDER BY id")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))
    }
}
