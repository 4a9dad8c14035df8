//! Principal lookup.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Principal;

/// Resolves an authenticated user id to a principal.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_principal(&self, user_id: Uuid) -> Result<Option<Principal>, AppError>;
}

/// `users` table backed store.
#[derive(Debug, Clone)]
pub struct PgPrincipalStore {
    pool: PgPool,
}

impl PgPrincipalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalStore {
    async fn find_principal(&self, user_id: Uuid) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>(
            "SELECT id, username, api_key FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }
}
