//! Route metadata keyed by controller type: one base path and an ordered list of descriptors.

use crate::error::RegistryError;
use axum::routing::MethodFilter;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    /// Appended to the controller's base path; may be empty.
    pub sub_path: String,
    /// Name the controller dispatches on.
    pub action: &'static str,
}

#[derive(Clone, Debug, Default)]
struct ControllerEntry {
    name: &'static str,
    base_path: Option<String>,
    routes: Vec<RouteDescriptor>,
}

/// Filled by each controller's `register` while the application is assembled,
/// then read once when routes are bound.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    entries: HashMap<TypeId, ControllerEntry>,
    order: Vec<TypeId>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry<C: 'static>(&mut self) -> &mut ControllerEntry {
        let id = TypeId::of::<C>();
        if !self.entries.contains_key(&id) {
            self.order.push(id);
        }
        self.entries.entry(id).or_insert_with(|| ControllerEntry {
            name: type_name::<C>(),
            ..ControllerEntry::default()
        })
    }

    /// Last write wins.
    pub fn register_base_path<C: 'static>(&mut self, path: impl Into<String>) {
        self.entry::<C>().base_path = Some(path.into());
    }

    pub fn register_route<C: 'static>(&mut self, method: HttpMethod, sub_path: impl Into<String>, action: &'static str) {
        self.entry::<C>().routes.push(RouteDescriptor {
            method,
            sub_path: sub_path.into(),
            action,
        });
    }

    pub fn base_path<C: 'static>(&self) -> Result<&str, RegistryError> {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|e| e.base_path.as_deref())
            .ok_or(RegistryError::Unregistered(type_name::<C>()))
    }

    /// Descriptors in declaration order.
    pub fn routes<C: 'static>(&self) -> Result<&[RouteDescriptor], RegistryError> {
        self.base_path::<C>()?;
        Ok(self
            .entries
            .get(&TypeId::of::<C>())
            .map(|e| e.routes.as_slice())
            .unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (controller type name, base path, route count) in registration order.
    pub fn summary(&self) -> impl Iterator<Item = (&'static str, &str, usize)> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id)).map(|e| {
            (e.name, e.base_path.as_deref().unwrap_or(""), e.routes.len())
        })
    }
}

/// Joins a base path and a sub path; an empty result is the root.
pub fn join_path(base: &str, sub: &str) -> String {
    let joined = format!("{}{}", base.trim_end_matches('/'), sub);
    if joined.is_empty() {
        "/".to_string()
    } else if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Jokes;
    struct Other;

    #[test]
    fn preserves_declaration_order() {
        let mut registry = RouteRegistry::new();
        registry.register_base_path::<Jokes>("/jokes");
        registry.register_route::<Jokes>(HttpMethod::Get, "", "all");
        registry.register_route::<Jokes>(HttpMethod::Post, "", "save");
        registry.register_route::<Jokes>(HttpMethod::Delete, "/:id", "remove");

        let actions: Vec<_> = registry.routes::<Jokes>().unwrap().iter().map(|r| r.action).collect();
        assert_eq!(actions, vec!["all", "save", "remove"]);
        assert_eq!(registry.base_path::<Jokes>().unwrap(), "/jokes");
    }

    #[test]
    fn base_path_last_write_wins() {
        let mut registry = RouteRegistry::new();
        registry.register_base_path::<Jokes>("/a");
        registry.register_base_path::<Jokes>("/b");
        assert_eq!(registry.base_path::<Jokes>().unwrap(), "/b");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_controller_fails() {
        let mut registry = RouteRegistry::new();
        registry.register_base_path::<Jokes>("/jokes");
        assert!(matches!(registry.base_path::<Other>(), Err(RegistryError::Unregistered(_))));
        assert!(registry.routes::<Other>().is_err());
    }

    #[test]
    fn routes_without_base_path_fail() {
        let mut registry = RouteRegistry::new();
        registry.register_route::<Other>(HttpMethod::Get, "", "all");
        assert!(matches!(registry.routes::<Other>(), Err(RegistryError::Unregistered(_))));
    }

    #[test]
    fn summary_follows_registration_order() {
        let mut registry = RouteRegistry::new();
        registry.register_base_path::<Other>("");
        registry.register_base_path::<Jokes>("/jokes");
        registry.register_route::<Jokes>(HttpMethod::Get, "", "all");
        let summary: Vec<_> = registry.summary().map(|(_, path, n)| (path.to_string(), n)).collect();
        assert_eq!(summary, vec![("".to_string(), 0), ("/jokes".to_string(), 1)]);
    }

    #[test]
    fn joins_paths() {
        assert_eq!(join_path("/examples", ""), "/examples");
        assert_eq!(join_path("/examples", "/:id"), "/examples/:id");
        assert_eq!(join_path("", "/health"), "/health");
        assert_eq!(join_path("", ""), "/");
        assert_eq!(join_path("/", "/x"), "/x");
    }
}
