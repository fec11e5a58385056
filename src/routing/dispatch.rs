//! Binds registered routes to axum and turns every handler outcome into a response.

use crate::error::{AppError, RegistryError};
use crate::routing::registry::{join_path, RouteDescriptor, RouteRegistry};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// `Ok(Some(body))` is written as JSON, `Ok(None)` means nothing was produced
/// and the request falls through to 404, `Err` goes to the error funnel.
pub type HandlerResult = Result<Option<Value>, AppError>;

/// A group of handlers sharing one base path.
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    /// Declares the base path and routes of this controller type.
    fn register(registry: &mut RouteRegistry);

    async fn handle(&self, action: &str, request: RouteRequest) -> HandlerResult;
}

/// What a handler sees of the HTTP request.
#[derive(Clone, Debug, Default)]
pub struct RouteRequest {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RouteRequest {
    pub fn param(&self, name: &str) -> Result<&str, AppError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("missing path parameter '{}'", name)))
    }

    pub fn query_u32(&self, name: &str) -> Result<Option<u32>, AppError> {
        self.query
            .get(name)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", name)))
            })
            .transpose()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Non-JSON and empty bodies are treated as absent; malformed JSON is a 400.
fn parse_body(headers: &HeaderMap, body: Result<Bytes, BytesRejection>) -> Result<Option<Value>, AppError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;
    if bytes.is_empty() || !is_json(headers) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))
}

pub fn respond(result: HandlerResult) -> Response {
    match result {
        Ok(Some(body)) => Json(body).into_response(),
        Ok(None) => AppError::NotFound.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

fn on_route<C: Controller>(
    method_router: MethodRouter,
    route: &RouteDescriptor,
    controller: Arc<C>,
) -> MethodRouter {
    let action = route.action;
    method_router.on(
        route.method.filter(),
        move |params: Option<Path<HashMap<String, String>>>,
              query: Option<Query<HashMap<String, String>>>,
              headers: HeaderMap,
              body: Result<Bytes, BytesRejection>| {
            let controller = Arc::clone(&controller);
            async move {
                let body = match parse_body(&headers, body) {
                    Ok(body) => body,
                    Err(err) => return err.into_response(),
                };
                let request = RouteRequest {
                    params: params.map(|Path(p)| p).unwrap_or_default(),
                    query: query.map(|Query(q)| q).unwrap_or_default(),
                    body,
                };
                respond(controller.handle(action, request).await)
            }
        },
    )
}

/// Reads `C`'s registry entry and mounts each descriptor at base path + sub path.
/// Descriptors sharing a path share one method router whose other methods are 404.
pub fn bind<C: Controller>(
    router: Router,
    registry: &RouteRegistry,
    controller: Arc<C>,
) -> Result<Router, RegistryError> {
    let base = registry.base_path::<C>()?;
    let mut by_path: Vec<(String, Vec<&RouteDescriptor>)> = Vec::new();
    for route in registry.routes::<C>()? {
        let path = join_path(base, &route.sub_path);
        let index = match by_path.iter().position(|(p, _)| *p == path) {
            Some(i) => i,
            None => {
                by_path.push((path.clone(), Vec::new()));
                by_path.len() - 1
            }
        };
        let slot = &mut by_path[index].1;
        if slot.iter().any(|r| r.method == route.method) {
            return Err(RegistryError::DuplicateRoute {
                controller: std::any::type_name::<C>(),
                method: route.method.as_str(),
                path,
            });
        }
        slot.push(route);
    }

    let mut router = router;
    for (path, routes) in by_path {
        let mut method_router = MethodRouter::new();
        for route in &routes {
            tracing::info!(method = %route.method, path = %path, action = route.action, "route bound");
            method_router = on_route(method_router, route, Arc::clone(&controller));
        }
        router = router.route(&path, method_router.fallback(not_found));
    }
    Ok(router)
}
