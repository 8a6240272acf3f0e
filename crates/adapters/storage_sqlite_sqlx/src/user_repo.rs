//! `SQLite` implementation of [`UserDirectory`].

use std::future::Future;

use sqlx::SqlitePool;

use lettings_app::ports::UserDirectory;
use lettings_domain::error::LettingsError;
use lettings_domain::id::UserId;

use crate::error::StorageError;

// Upsert keeps an already-recorded email when the provider stops
// sending one.
const UPSERT: &str = "INSERT INTO users (id, email) VALUES (?, ?) ON CONFLICT (id) DO UPDATE SET email = COALESCE(excluded.email, users.email)";

/// `SQLite`-backed directory of identity-provider users.
pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    /// Create a new directory using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for SqliteUserDirectory {
    fn record(
        &self,
        user_id: &UserId,
        email: Option<&str>,
    ) -> impl Future<Output = Result<(), LettingsError>> + Send {
        let pool = self.pool.clone();
        let user_id = user_id.as_str().to_string();
        let email = email.map(str::to_string);
        async move {
            sqlx::query(UPSERT)
                .bind(user_id)
                .bind(email)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
