//! `SQLite` implementation of [`CategoryRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use lettings_app::ports::CategoryRepository;
use lettings_domain::category::Category;
use lettings_domain::error::LettingsError;
use lettings_domain::id::CategoryId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Category`].
struct Wrapper(Category);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        Ok(Self(Category {
            id: CategoryId::new(id),
            name: row.try_get("name")?,
        }))
    }
}

const SELECT_ALL: &str = "SELECT * FROM categories ORDER BY id";
const SELECT_BY_ID: &str = "SELECT id FROM categories WHERE id = ?";
const SELECT_NAME_BY_ID: &str = "SELECT name FROM categories WHERE id = ?";

/// `SQLite`-backed category repository. Categories are seeded reference
/// rows; this adapter only reads them.
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn exists(&self, id: CategoryId) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.is_some())
        }
    }

    fn name(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<String>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_NAME_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(name,)| name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteCategoryRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteCategoryRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_list_seeded_categories_in_id_order() {
        let repo = setup().await;

        let categories = repo.list().await.unwrap();

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cottage", "Single-Family", "Duplex"]);
    }

    #[tokio::test]
    async fn should_check_existence_by_id() {
        let repo = setup().await;

        assert!(repo.exists(CategoryId::new(1)).await.unwrap());
        assert!(!repo.exists(CategoryId::new(99)).await.unwrap());
    }

    #[tokio::test]
    async fn should_resolve_name_by_id() {
        let repo = setup().await;

        assert_eq!(
            repo.name(CategoryId::new(3)).await.unwrap().as_deref(),
            Some("Duplex")
        );
        assert_eq!(repo.name(CategoryId::new(99)).await.unwrap(), None);
    }
}
