//! Application assembly: controller registration, route binding, global middleware.
//!
//! Middleware runs in this order for every request: body limit, CORS, bearer
//! gate, then routing. Anything unmatched ends in the 404 fallback; every
//! failure is rendered by `AppError`'s response impl.

use crate::controllers::{ExampleController, SystemController};
use crate::error::{AppError, RegistryError};
use crate::middleware::{cors_layer, require_bearer};
use crate::response::error_response;
use crate::routing::{bind, not_found, Controller, RouteRegistry};
use crate::state::AppContext;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

type Binder = Box<dyn FnOnce(Router, &RouteRegistry) -> Result<Router, RegistryError> + Send>;

pub struct Application {
    registry: RouteRegistry,
    binders: Vec<Binder>,
    body_limit: usize,
}

impl Application {
    pub fn new(body_limit: usize) -> Self {
        Application {
            registry: RouteRegistry::new(),
            binders: Vec::new(),
            body_limit,
        }
    }

    /// Registers `C`'s routes now; they are bound when the router is built.
    pub fn controller<C: Controller>(mut self, controller: C) -> Self {
        C::register(&mut self.registry);
        let controller = Arc::new(controller);
        self.binders.push(Box::new(move |router: Router, registry: &RouteRegistry| {
            bind(router, registry, controller)
        }));
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn into_router(self) -> Result<Router, RegistryError> {
        for (controller, base_path, routes) in self.registry.summary() {
            tracing::info!(controller, base_path, routes, "controller registered");
        }
        let mut router = Router::new();
        for binder in self.binders {
            router = binder(router, &self.registry)?;
        }
        Ok(router
            .fallback(not_found)
            .layer(axum::middleware::from_fn(require_bearer))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(cors_layer())
            .layer(RequestBodyLimitLayer::new(self.body_limit))
            .layer(axum::middleware::map_response(limit_rejection))
            .layer(TraceLayer::new_for_http()))
    }
}

/// The service's router: system routes plus the example resource.
pub fn router(ctx: AppContext) -> Result<Router, RegistryError> {
    Application::new(ctx.config.body_limit)
        .controller(SystemController::new(ctx.clone()))
        .controller(ExampleController::new(ctx))
        .into_router()
}

/// `RequestBodyLimitLayer` answers a declared oversized body with its own
/// plain-text 413; re-render it through `AppError`.
async fn limit_rejection(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.as_bytes().starts_with(b"application/json"))
        .unwrap_or(false);
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_response();
    }
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Internal Server Error".to_string()
    };
    tracing::error!(panic = %message, "handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        message.clone(),
        &format!("Panic: {}", message),
    )
}
