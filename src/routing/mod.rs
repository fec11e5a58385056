//! Route registry and the generic dispatch wrapper.

pub mod dispatch;
pub mod registry;

pub use dispatch::{bind, not_found, respond, Controller, HandlerResult, RouteRequest};
pub use registry::{join_path, HttpMethod, RouteDescriptor, RouteRegistry};
