//! Service routes: health, readiness, version.

use crate::error::AppError;
use crate::routing::{Controller, HandlerResult, HttpMethod, RouteRegistry, RouteRequest};
use crate::state::AppContext;
use async_trait::async_trait;
use serde_json::json;

pub struct SystemController {
    ctx: AppContext,
}

impl SystemController {
    pub fn new(ctx: AppContext) -> Self {
        SystemController { ctx }
    }
}

#[async_trait]
impl Controller for SystemController {
    fn register(registry: &mut RouteRegistry) {
        registry.register_base_path::<Self>("");
        registry.register_route::<Self>(HttpMethod::Get, "/health", "health");
        registry.register_route::<Self>(HttpMethod::Get, "/ready", "ready");
        registry.register_route::<Self>(HttpMethod::Get, "/version", "version");
    }

    async fn handle(&self, action: &str, _request: RouteRequest) -> HandlerResult {
        match action {
            "health" => Ok(Some(json!({ "status": "ok" }))),
            "ready" => {
                self.ctx.store.ping().await?;
                Ok(Some(json!({ "status": "ok", "database": "ok" })))
            }
            "version" => Ok(Some(json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }))),
            other => Err(AppError::internal(format!("SystemController has no action '{}'", other))),
        }
    }
}
