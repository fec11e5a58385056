use super::ExampleStore;
use crate::entity::{Example, ExampleDraft};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Example>,
    last_id: i32,
}

/// In-process store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryExampleStore {
    table: RwLock<Table>,
}

impl MemoryExampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ExampleStore for MemoryExampleStore {
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Example>, AppError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Example>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: ExampleDraft) -> Result<Example, AppError> {
        let mut table = self.table.write().await;
        table.last_id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::internal("id sequence exhausted"))?;
        let row = Example::create(table.last_id, draft);
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn replace(&self, id: i32, draft: ExampleDraft) -> Result<Option<Example>, AppError> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            row.replace_with(draft);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Example>, AppError> {
        Ok(self.table.write().await.rows.remove(&id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
