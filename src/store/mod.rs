//! Persistence for `Example` records: PostgreSQL via sqlx, or an in-process map.

mod memory;
mod postgres;

pub use memory::MemoryExampleStore;
pub use postgres::{ensure_database_exists, PgExampleStore, EXAMPLE_TABLE};

use crate::entity::{Example, ExampleDraft};
use crate::error::AppError;
use async_trait::async_trait;

/// Default page size for listings; requests above `MAX_LIST_LIMIT` are clamped.
pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

#[async_trait]
pub trait ExampleStore: Send + Sync {
    /// Rows ordered by id.
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Example>, AppError>;

    async fn find(&self, id: i32) -> Result<Option<Example>, AppError>;

    async fn insert(&self, draft: ExampleDraft) -> Result<Example, AppError>;

    /// `None` when no row has this id.
    async fn replace(&self, id: i32, draft: ExampleDraft) -> Result<Option<Example>, AppError>;

    /// Returns the removed row.
    async fn delete(&self, id: i32) -> Result<Option<Example>, AppError>;

    /// Round-trip to the backing storage for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
