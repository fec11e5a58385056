//! Route handlers grouped per resource.

mod example;
mod system;

pub use example::ExampleController;
pub use system::SystemController;
