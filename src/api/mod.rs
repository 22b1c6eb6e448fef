//! HTTP surface for fact checking

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, FactCheckRequest};
pub use routes::build_router;
