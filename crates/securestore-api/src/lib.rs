//! # securestore-api
//!
//! HTTP API layer for SecureStore built on Axum.
//!
//! Provides the REST endpoints, the bearer-token extractor, DTOs, error
//! mapping, middleware layers and the server bootstrap that wires stores,
//! services and the background scheduler together.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Backends, build_app, build_state, close_pool, run_server};
pub use error::ApiError;
pub use state::AppState;
