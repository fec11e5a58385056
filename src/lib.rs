//! Joke API: CRUD over joke records behind a bearer gate, with CORS for local frontends.

pub mod app;
pub mod config;
pub mod controllers;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routing;
pub mod state;
pub mod store;

pub use app::{router, Application};
pub use config::ServerConfig;
pub use controllers::{ExampleController, SystemController};
pub use entity::{Example, ExampleDraft};
pub use error::{AppError, ConfigError, RegistryError};
pub use response::{error_body, ErrorEnvelope};
pub use routing::{Controller, HandlerResult, HttpMethod, RouteRegistry, RouteRequest};
pub use state::AppContext;
pub use store::{ensure_database_exists, ExampleStore, MemoryExampleStore, PgExampleStore};
