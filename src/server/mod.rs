//! HTTP surface: status page, health probe and JSON status

mod routes;

pub use routes::{create_router, create_router_with_name, AppState, StatusResponse};
