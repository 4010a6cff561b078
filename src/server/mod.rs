//! HTTP server over a shared persona session.
//!
//! # Endpoints
//!
//! - `GET  /health`  — Liveness probe
//! - `POST /project` — Run a projection
//!
//! See [`routes`] for the full list.

pub mod routes;

pub use routes::{app_router, ApiError, AppState};
