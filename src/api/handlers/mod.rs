//! HTTP request handlers, one module per resource.

pub mod categories;
pub mod health;
