//! Persisted entity and its field validation.

mod example;
pub mod validation;

pub use example::*;
pub use validation::{FieldRules, RequestValidator, Rule};
