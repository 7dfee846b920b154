//! Axum HTTP server for leaf disease classification.
//!
//! This crate provides:
//! - `/predict` multipart upload endpoint backed by the inference pipeline
//! - Liveness, readiness and ping endpoints
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
