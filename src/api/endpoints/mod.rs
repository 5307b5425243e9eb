//! API endpoint handlers, one module per resource.

pub mod analyze;
pub mod dashboard;
pub mod health;
pub mod results;
pub mod rules;
pub mod trends;
