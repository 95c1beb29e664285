//! # dayplan-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `TimeBlockRepository` port defined in `dayplan-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Keep the daily budget check and the insert in one atomic statement
//!
//! ## Dependency rule
//! Depends on `dayplan-app` (for port traits) and `dayplan-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod time_block_repo;

pub use pool::{Config, Database};
pub use time_block_repo::SqliteTimeBlockRepository;
