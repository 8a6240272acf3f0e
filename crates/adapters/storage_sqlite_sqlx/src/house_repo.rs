//! `SQLite` implementation of [`HouseRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use lettings_app::ports::{HouseOwner, HouseRecord, HouseRepository};
use lettings_domain::error::LettingsError;
use lettings_domain::house::{House, HouseInput};
use lettings_domain::id::{AgentId, CategoryId, HouseId, UserId};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`House`].
struct Wrapper(House);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<House> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let category_id: i64 = row.try_get("category_id")?;
        let agent_id: i64 = row.try_get("agent_id")?;
        let renter_id: Option<String> = row.try_get("renter_id")?;

        Ok(Self(House {
            id: HouseId::new(id),
            title: row.try_get("title")?,
            address: row.try_get("address")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            price_per_month: row.try_get("price_per_month")?,
            category_id: CategoryId::new(category_id),
            agent_id: AgentId::new(agent_id),
            renter_id: renter_id.map(UserId::new),
        }))
    }
}

/// Wrapper for rows joined with the category name.
struct RecordWrapper(HouseRecord);

impl<'r> FromRow<'r, SqliteRow> for RecordWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(house) = Wrapper::from_row(row)?;
        Ok(Self(HouseRecord {
            house,
            category_name: row.try_get("category_name")?,
        }))
    }
}

/// Wrapper for the owning agent's contact row.
struct OwnerWrapper(HouseOwner);

impl<'r> FromRow<'r, SqliteRow> for OwnerWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let user_id: String = row.try_get("user_id")?;
        Ok(Self(HouseOwner {
            user_id: UserId::new(user_id),
            phone_number: row.try_get("phone_number")?,
            email: row.try_get("email")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO houses (title, address, description, image_url, price_per_month, category_id, agent_id) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM houses WHERE id = ?";
const SELECT_ALL_WITH_CATEGORY: &str = "SELECT houses.*, categories.name AS category_name FROM houses JOIN categories ON categories.id = houses.category_id";
const SELECT_BY_AGENT: &str = "SELECT * FROM houses WHERE agent_id = ?";
const SELECT_BY_RENTER: &str = "SELECT * FROM houses WHERE renter_id = ?";
const UPDATE: &str = "UPDATE houses SET title = ?, address = ?, description = ?, image_url = ?, price_per_month = ?, category_id = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM houses WHERE id = ?";
const SET_RENTER: &str = "UPDATE houses SET renter_id = ? WHERE id = ?";
const RENT_IF_VACANT: &str =
    "UPDATE houses SET renter_id = ? WHERE id = ? AND renter_id IS NULL";
const SELECT_OWNER: &str = "SELECT agents.user_id, agents.phone_number, users.email FROM houses JOIN agents ON agents.id = houses.agent_id LEFT JOIN users ON users.id = agents.user_id WHERE houses.id = ?";

/// `SQLite`-backed house repository.
pub struct SqliteHouseRepository {
    pool: SqlitePool,
}

impl SqliteHouseRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HouseRepository for SqliteHouseRepository {
    fn insert(
        &self,
        input: &HouseInput,
        agent_id: AgentId,
    ) -> impl Future<Output = Result<HouseId, LettingsError>> + Send {
        let pool = self.pool.clone();
        let input = input.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&input.title)
                .bind(&input.address)
                .bind(&input.description)
                .bind(&input.image_url)
                .bind(input.price_per_month)
                .bind(input.category_id.as_i64())
                .bind(agent_id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(HouseId::new(result.last_insert_rowid()))
        }
    }

    fn get(
        &self,
        id: HouseId,
    ) -> impl Future<Output = Result<Option<House>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<HouseRecord>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<RecordWrapper> = sqlx::query_as(SELECT_ALL_WITH_CATEGORY)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn by_agent(
        &self,
        agent_id: AgentId,
    ) -> impl Future<Output = Result<Vec<House>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_AGENT)
                .bind(agent_id.as_i64())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn by_renter(
        &self,
        renter: &UserId,
    ) -> impl Future<Output = Result<Vec<House>, LettingsError>> + Send {
        let pool = self.pool.clone();
        let renter = renter.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_RENTER)
                .bind(renter.as_str().to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        id: HouseId,
        input: &HouseInput,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let input = input.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&input.title)
                .bind(&input.address)
                .bind(&input.description)
                .bind(&input.image_url)
                .bind(input.price_per_month)
                .bind(input.category_id.as_i64())
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn delete(&self, id: HouseId) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn set_renter(
        &self,
        id: HouseId,
        renter: Option<&UserId>,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let renter = renter.map(|r| r.as_str().to_string());
        async move {
            let result = sqlx::query(SET_RENTER)
                .bind(renter)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn rent_if_vacant(
        &self,
        id: HouseId,
        renter: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
        let pool = self.pool.clone();
        let renter = renter.as_str().to_string();
        async move {
            let result = sqlx::query(RENT_IF_VACANT)
                .bind(renter)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn owner(
        &self,
        id: HouseId,
    ) -> impl Future<Output = Result<Option<HouseOwner>, LettingsError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<OwnerWrapper> = sqlx::query_as(SELECT_OWNER)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteHouseRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        sqlx::query("INSERT INTO users (id, email) VALUES ('agent-user', 'agent@example.com')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO agents (user_id, phone_number) VALUES ('agent-user', '+359881234567')")
            .execute(&pool)
            .await
            .unwrap();

        SqliteHouseRepository::new(pool)
    }

    fn test_input() -> HouseInput {
        HouseInput {
            title: "Cottage by the lake".to_string(),
            address: "7 Lakeside Road, Pancharevo, Sofia District".to_string(),
            description: "Detached cottage with a private dock, wood stove and a long porch."
                .to_string(),
            image_url: "https://example.com/cottage.jpg".to_string(),
            price_per_month: 650.0,
            category_id: CategoryId::new(1),
        }
    }

    #[tokio::test]
    async fn should_insert_and_retrieve_house() {
        let repo = setup().await;

        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        let house = repo.get(id).await.unwrap().unwrap();
        assert_eq!(house.title, "Cottage by the lake");
        assert_eq!(house.agent_id, AgentId::new(1));
        assert!(house.renter_id.is_none());
    }

    #[tokio::test]
    async fn should_assign_increasing_ids() {
        let repo = setup().await;

        let first = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();
        let second = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn should_return_none_when_house_not_found() {
        let repo = setup().await;
        let result = repo.get(HouseId::new(99)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_join_category_name_in_list() {
        let repo = setup().await;
        repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        let records = repo.list().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category_name, "Cottage");
    }

    #[tokio::test]
    async fn should_update_house_fields() {
        let repo = setup().await;
        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        let mut changed = test_input();
        changed.title = "Renovated lakeside home".to_string();
        changed.price_per_month = 720.0;
        let affected = repo.update(id, &changed).await.unwrap();
        assert!(affected);

        let house = repo.get(id).await.unwrap().unwrap();
        assert_eq!(house.title, "Renovated lakeside home");
        assert!((house.price_per_month - 720.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_report_no_rows_when_updating_missing_house() {
        let repo = setup().await;
        let affected = repo.update(HouseId::new(99), &test_input()).await.unwrap();
        assert!(!affected);
    }

    #[tokio::test]
    async fn should_delete_house() {
        let repo = setup().await;
        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get(id).await.unwrap().is_none());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn should_set_and_clear_renter() {
        let repo = setup().await;
        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();
        let renter = UserId::new("renter-1");

        assert!(repo.set_renter(id, Some(&renter)).await.unwrap());
        let house = repo.get(id).await.unwrap().unwrap();
        assert_eq!(house.renter_id, Some(renter.clone()));

        let rented = repo.by_renter(&renter).await.unwrap();
        assert_eq!(rented.len(), 1);

        assert!(repo.set_renter(id, None).await.unwrap());
        let house = repo.get(id).await.unwrap().unwrap();
        assert!(house.renter_id.is_none());
    }

    #[tokio::test]
    async fn should_only_rent_vacant_house_with_conditional_update() {
        let repo = setup().await;
        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        assert!(repo.rent_if_vacant(id, &UserId::new("user-1")).await.unwrap());
        assert!(!repo.rent_if_vacant(id, &UserId::new("user-2")).await.unwrap());

        let house = repo.get(id).await.unwrap().unwrap();
        assert_eq!(house.renter_id, Some(UserId::new("user-1")));
    }

    #[tokio::test]
    async fn should_join_owner_contact() {
        let repo = setup().await;
        let id = repo.insert(&test_input(), AgentId::new(1)).await.unwrap();

        let owner = repo.owner(id).await.unwrap().unwrap();

        assert_eq!(owner.user_id, UserId::new("agent-user"));
        assert_eq!(owner.phone_number, "+359881234567");
        assert_eq!(owner.email.as_deref(), Some("agent@example.com"));
    }

    #[tokio::test]
    async fn should_filter_houses_by_agent() {
        let repo = setup().await;
        sqlx::query("INSERT INTO agents (user_id, phone_number) VALUES ('other-user', '+359880000000')")
            .execute(&repo.pool)
            .await
            .unwrap();
        repo.insert(&test_input(), AgentId::new(1)).await.unwrap();
        repo.insert(&test_input(), AgentId::new(2)).await.unwrap();

        let mine = repo.by_agent(AgentId::new(1)).await.unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].agent_id, AgentId::new(1));
    }
}
