//! CRUD over `Example` records.

use crate::entity::ExampleDraft;
use crate::error::AppError;
use crate::routing::{Controller, HandlerResult, HttpMethod, RouteRegistry, RouteRequest};
use crate::state::AppContext;
use crate::store::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub struct ExampleController {
    ctx: AppContext,
}

impl ExampleController {
    pub const BASE_PATH: &'static str = "/examples";

    pub fn new(ctx: AppContext) -> Self {
        ExampleController { ctx }
    }

    async fn all(&self, request: &RouteRequest) -> HandlerResult {
        let limit = request.query_u32("limit")?.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        let offset = request.query_u32("offset")?.unwrap_or(0);
        let rows = self.ctx.store.list(limit, offset).await?;
        to_body(&rows).map(Some)
    }

    async fn one(&self, request: &RouteRequest) -> HandlerResult {
        let id = parse_id(request)?;
        match self.ctx.store.find(id).await? {
            Some(row) => to_body(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, request: RouteRequest) -> HandlerResult {
        let draft = ExampleDraft::from_json(request.body)?;
        let row = self.ctx.store.insert(draft).await?;
        tracing::info!(id = row.id, "example created");
        to_body(&row).map(Some)
    }

    async fn update(&self, request: RouteRequest) -> HandlerResult {
        let id = parse_id(&request)?;
        let draft = ExampleDraft::from_json(request.body)?;
        match self.ctx.store.replace(id, draft).await? {
            Some(row) => to_body(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn remove(&self, request: &RouteRequest) -> HandlerResult {
        let id = parse_id(request)?;
        match self.ctx.store.delete(id).await? {
            Some(row) => {
                tracing::info!(id, "example removed");
                to_body(&row).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn parse_id(request: &RouteRequest) -> Result<i32, AppError> {
    let raw = request.param("id")?;
    raw.parse().map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))
}

#[async_trait]
impl Controller for ExampleController {
    fn register(registry: &mut RouteRegistry) {
        registry.register_base_path::<Self>(Self::BASE_PATH);
        registry.register_route::<Self>(HttpMethod::Get, "", "all");
        registry.register_route::<Self>(HttpMethod::Get, "/:id", "one");
        registry.register_route::<Self>(HttpMethod::Post, "", "save");
        registry.register_route::<Self>(HttpMethod::Put, "/:id", "update");
        registry.register_route::<Self>(HttpMethod::Delete, "/:id", "remove");
    }

    async fn handle(&self, action: &str, request: RouteRequest) -> HandlerResult {
        match action {
            "all" => self.all(&request).await,
            "one" => self.one(&request).await,
            "save" => self.save(request).await,
            "update" => self.update(request).await,
            "remove" => self.remove(&request).await,
            other => Err(AppError::internal(format!("ExampleController has no action '{}'", other))),
        }
    }
}
