//! HTTP server module
//!
//! Thin HTTP layer over the planner:
//! - Axum router with health, catalog and plan endpoints
//! - JSON request/response handlers
//! - CORS and request tracing middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
