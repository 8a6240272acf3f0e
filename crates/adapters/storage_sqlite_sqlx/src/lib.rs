//! # lettings-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `lettings-app::ports`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `lettings-app` (for port traits) and `lettings-domain`
//! (for domain types). The `app` and `domain` crates must never
//! reference this adapter.

pub mod agent_repo;
pub mod category_repo;
pub mod error;
pub mod house_repo;
pub mod pool;
pub mod user_repo;

pub use agent_repo::SqliteAgentRepository;
pub use category_repo::SqliteCategoryRepository;
pub use error::StorageError;
pub use house_repo::SqliteHouseRepository;
pub use pool::{Config, Database};
pub use user_repo::SqliteUserDirectory;
