//! `SQLite` implementation of [`AgentRepository`].

use std::future::Future;

use sqlx::SqlitePool;

use lettings_app::ports::AgentRepository;
use lettings_domain::error::{ConflictError, LettingsError};
use lettings_domain::id::{AgentId, UserId};

use crate::error::StorageError;

const INSERT: &str = "INSERT INTO agents (user_id, phone_number) VALUES (?, ?)";
const SELECT_ID_BY_USER: &str = "SELECT id FROM agents WHERE user_id = ?";
const SELECT_BY_PHONE: &str = "SELECT id FROM agents WHERE phone_number = ?";
const SELECT_RENT_BY_USER: &str = "SELECT id FROM houses WHERE renter_id = ? LIMIT 1";

/// `SQLite`-backed agent repository.
pub struct SqliteAgentRepository {
    pool: SqlitePool,
}

impl SqliteAgentRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map a unique-constraint violation on insert to the matching conflict.
///
/// The schema carries UNIQUE constraints on both `user_id` and
/// `phone_number`, so a registration that slips past the service
/// pre-checks under concurrency still surfaces as a typed conflict.
fn map_insert_error(err: sqlx::Error) -> LettingsError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.message().contains("phone_number") {
                ConflictError::PhoneNumberTaken.into()
            } else {
                ConflictError::AlreadyAgent.into()
            }
        }
        _ => StorageError::from(err).into(),
    }
}

impl AgentRepository for SqliteAgentRepository {
    fn insert(
        &self,
        user_id: &UserId,
        phone_number: &str,
    ) -> impl Future<Output = Result<AgentId, LettingsError>> + Send {
        let pool = self.pool.clone();
        let user_id = user_id.as_str().to_string();
        let phone_number = phone_number.to_string();
        async move {
            let result = sqlx::query(INSERT)
                .bind(user_id)
                .bind(phone_number)
                .execute(&pool)
                .await
                .map_err(map_insert_error)?;

            Ok(AgentId::new(result.last_insert_rowid()))
        }
    }

    fn exists_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let user_id = user_id.as_str().to_string();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_ID_BY_USER)
                .bind(user_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.is_some())
        }
    }

    fn phone_exists(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let phone_number = phone_number.to_string();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_BY_PHONE)
                .bind(phone_number)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.is_some())
        }
    }

    fn id_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<AgentId>, LettingsError>> + Send {
        let pool = self.pool.clone();
        let user_id = user_id.as_str().to_string();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_ID_BY_USER)
                .bind(user_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(id,)| AgentId::new(id)))
        }
    }

    fn user_has_rents(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let user_id = user_id.as_str().to_string();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_RENT_BY_USER)
                .bind(user_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteAgentRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAgentRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_insert_agent_and_resolve_id() {
        let repo = setup().await;
        let user = UserId::new("user-1");

        let id = repo.insert(&user, "+359881111111").await.unwrap();

        assert!(repo.exists_by_user(&user).await.unwrap());
        assert_eq!(repo.id_by_user(&user).await.unwrap(), Some(id));
        assert!(repo.phone_exists("+359881111111").await.unwrap());
    }

    #[tokio::test]
    async fn should_surface_duplicate_phone_as_conflict() {
        let repo = setup().await;
        repo.insert(&UserId::new("user-1"), "+359881111111")
            .await
            .unwrap();

        let result = repo.insert(&UserId::new("user-2"), "+359881111111").await;

        assert!(matches!(
            result,
            Err(LettingsError::Conflict(ConflictError::PhoneNumberTaken))
        ));
    }

    #[tokio::test]
    async fn should_surface_duplicate_user_as_conflict() {
        let repo = setup().await;
        let user = UserId::new("user-1");
        repo.insert(&user, "+359881111111").await.unwrap();

        let result = repo.insert(&user, "+359882222222").await;

        assert!(matches!(
            result,
            Err(LettingsError::Conflict(ConflictError::AlreadyAgent))
        ));
    }

    #[tokio::test]
    async fn should_detect_active_rents_from_houses_table() {
        let repo = setup().await;
        let agent = repo.insert(&UserId::new("agent-user"), "+359881111111")
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO houses (title, address, description, image_url, price_per_month, category_id, agent_id, renter_id) VALUES ('x', 'x', 'x', 'x', 500.0, 1, ?, 'renter-1')",
        )
        .bind(agent.as_i64())
        .execute(&repo.pool)
        .await
        .unwrap();

        assert!(repo.user_has_rents(&UserId::new("renter-1")).await.unwrap());
        assert!(!repo.user_has_rents(&UserId::new("renter-2")).await.unwrap());
    }

    #[tokio::test]
    async fn should_return_none_for_unknown_user() {
        let repo = setup().await;
        assert_eq!(repo.id_by_user(&UserId::new("nobody")).await.unwrap(), None);
    }
}
